//! Library catalog application.
//!
//! Server-rendered pages for browsing and managing authors, genres and books.

pub mod modules;
pub mod validation;

use catalog_db::StoreHandle;
use catalog_kernel::ModuleRegistry;

pub use modules::register_all;

/// Every catalog URL lives under this path.
pub const MOUNT_PATH: &str = "/catalog";

/// Registry holding every catalog module, wired to `store`.
pub fn build_registry(store: &StoreHandle) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, store);
    registry
}
