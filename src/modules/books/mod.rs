pub mod models;
pub mod routes;
pub mod views;

use async_trait::async_trait;
use axum::Router;
use catalog_db::{Collection, StoreHandle};
use catalog_kernel::{InitCtx, Module};

/// Books module: read-only listing and detail pages
pub struct BooksModule {
    state: routes::BooksState,
}

impl BooksModule {
    pub fn new(store: &StoreHandle) -> Self {
        Self {
            state: routes::BooksState {
                books: Collection::new(store.clone()),
                authors: Collection::new(store.clone()),
                genres: Collection::new(store.clone()),
            },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.state.books.count().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: &StoreHandle) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
