pub mod authors;
pub mod books;
pub mod crud;
pub mod genres;
pub mod home;

use catalog_db::StoreHandle;
use catalog_kernel::ModuleRegistry;

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: &StoreHandle) {
    registry.register(home::create_module(store));
    registry.register(authors::create_module(store));
    registry.register(genres::create_module(store));
    registry.register(books::create_module(store));
}
