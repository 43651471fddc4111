pub mod forms;
pub mod models;
pub mod routes;
pub mod views;

use async_trait::async_trait;
use axum::Router;
use catalog_db::{Collection, StoreHandle};
use catalog_kernel::{InitCtx, Module};

/// Genres: list, detail, create, update and delete.
pub struct GenresModule {
    state: routes::GenresState,
}

impl GenresModule {
    pub fn new(store: &StoreHandle) -> Self {
        Self {
            state: routes::GenresState {
                genres: Collection::new(store.clone()),
                books: Collection::new(store.clone()),
            },
        }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let genres = self.state.genres.count().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            genres,
            "genres module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }
}

/// Create a new instance of the genres module
pub fn create_module(store: &StoreHandle) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(GenresModule::new(store))
}
