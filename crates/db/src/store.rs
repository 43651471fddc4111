use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::document::{Document, DocumentId};
use crate::error::StoreResult;
use crate::query::{Filter, Sort};

/// Persistence interface over named document collections.
///
/// Single-document writes are atomic. Nothing spans more than one call, so a
/// caller that checks and then writes must expect the state to move in between.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_all(&self, collection: &str, sort: &Sort) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>>;

    async fn find_where(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// First document whose `field` equals `value` ignoring case and accents.
    async fn find_one_case_insensitive(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Document>>;

    async fn insert(&self, collection: &str, body: Map<String, Value>) -> StoreResult<Document>;

    /// Replace every field of an existing document, keeping its id.
    /// Returns `None` when no document has that id.
    async fn replace_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Map<String, Value>,
    ) -> StoreResult<Option<Document>>;

    /// Returns whether a document was removed.
    async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<bool>;

    async fn count(&self, collection: &str) -> StoreResult<usize>;

    /// Release the store. Later calls fail with [`crate::StoreError::Closed`].
    async fn close(&self) -> StoreResult<()>;
}
