pub mod forms;
pub mod models;
pub mod routes;
pub mod views;

use async_trait::async_trait;
use axum::Router;
use catalog_db::{Collection, StoreHandle};
use catalog_kernel::{InitCtx, Module};

/// Authors: list, detail, create, update and delete.
pub struct AuthorsModule {
    state: routes::AuthorsState,
}

impl AuthorsModule {
    pub fn new(store: &StoreHandle) -> Self {
        Self {
            state: routes::AuthorsState {
                authors: Collection::new(store.clone()),
                books: Collection::new(store.clone()),
            },
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let authors = self.state.authors.count().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            authors,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }
}

/// Create a new instance of the authors module
pub fn create_module(store: &StoreHandle) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(store))
}
