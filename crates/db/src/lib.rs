//! Document store for the catalog.
//!
//! Entities are persisted as JSON documents grouped in named collections. The
//! [`DocumentStore`] trait is the only writer of entity state; handlers talk to it
//! through the typed [`Collection`] wrapper.

use std::path::Path;
use std::sync::Arc;

pub mod collation;
pub mod collection;
pub mod document;
pub mod error;
pub mod memory;
pub mod query;
pub mod store;

pub use collection::{Collection, Entity, Record};
pub use document::{Document, DocumentId};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, Sanitizer};
pub use query::{Filter, Sort};
pub use store::DocumentStore;

/// Shared handle injected into every module.
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Open the store, loading the seed file when one is configured. Seeded
/// strings pass through `sanitize` before they are stored.
pub async fn connect(seed_path: Option<&Path>, sanitize: Sanitizer) -> StoreResult<StoreHandle> {
    let store = MemoryStore::new();

    if let Some(path) = seed_path {
        let loaded = store.seed_from_path(path, sanitize).await?;
        tracing::info!(
            target: "catalog-db",
            path = %path.display(),
            documents = loaded,
            "store seeded"
        );
    }

    tracing::info!(target: "catalog-db", "document store opened");
    Ok(Arc::new(store))
}
