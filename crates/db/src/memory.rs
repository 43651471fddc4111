//! In-memory document store.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::collation;
use crate::document::{Document, DocumentId};
use crate::error::{StoreError, StoreResult};
use crate::query::{Filter, Sort};
use crate::store::DocumentStore;

type Collections = HashMap<String, BTreeMap<DocumentId, Map<String, Value>>>;

/// Rewrites every string in seeded documents, so seeded text is stored in the
/// same form as text that arrives through the forms.
pub type Sanitizer = fn(&str) -> String;

/// Document store held in process memory.
///
/// Documents within a collection are kept in id order, which for generated ids
/// is insertion order.
pub struct MemoryStore {
    // `None` once closed.
    data: RwLock<Option<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Some(HashMap::new())),
        }
    }

    /// Load documents from a JSON file shaped as
    /// `{ "<collection>": [ { "id": "<uuid>", ... }, ... ], ... }`.
    ///
    /// Returns the number of documents loaded.
    pub async fn seed_from_path(&self, path: &Path, sanitize: Sanitizer) -> StoreResult<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;
        let value: Value = serde_json::from_str(&raw)?;
        self.seed(value, sanitize).await
    }

    /// Load documents from an already parsed seed value.
    pub async fn seed(&self, value: Value, sanitize: Sanitizer) -> StoreResult<usize> {
        let Value::Object(collections) = value else {
            return Err(StoreError::Seed(
                "seed data must be an object of collections".to_string(),
            ));
        };

        let mut guard = self.data.write().await;
        let data = guard.as_mut().ok_or(StoreError::Closed)?;
        let mut loaded = 0;

        for (name, documents) in collections {
            let Value::Array(documents) = documents else {
                return Err(StoreError::Seed(format!(
                    "collection '{name}' must be an array"
                )));
            };

            let collection = data.entry(name.clone()).or_default();
            for document in documents {
                let Value::Object(mut body) = document else {
                    return Err(StoreError::invalid_document(&name, "not an object"));
                };
                let id = body
                    .remove("id")
                    .and_then(|id| id.as_str().and_then(DocumentId::parse))
                    .ok_or_else(|| StoreError::invalid_document(&name, "missing or malformed id"))?;
                let body = body
                    .into_iter()
                    .map(|(field, value)| (field, sanitize_strings(value, sanitize)))
                    .collect();
                collection.insert(id, body);
                loaded += 1;
            }
        }

        Ok(loaded)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_strings(value: Value, sanitize: Sanitizer) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize(&text)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| sanitize_strings(item, sanitize))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(field, value)| (field, sanitize_strings(value, sanitize)))
                .collect(),
        ),
        other => other,
    }
}

fn documents<'a>(
    data: &'a Collections,
    collection: &str,
) -> impl Iterator<Item = Document> + 'a {
    data.get(collection)
        .into_iter()
        .flat_map(|docs| docs.iter())
        .map(|(id, body)| Document::new(*id, body.clone()))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self, collection: &str, sort: &Sort) -> StoreResult<Vec<Document>> {
        let guard = self.data.read().await;
        let data = guard.as_ref().ok_or(StoreError::Closed)?;

        let mut found: Vec<Document> = documents(data, collection).collect();
        // Stable, so ties keep insertion order.
        found.sort_by(|a, b| sort.compare(a, b));
        Ok(found)
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
        let guard = self.data.read().await;
        let data = guard.as_ref().ok_or(StoreError::Closed)?;

        Ok(data
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|body| Document::new(*id, body.clone())))
    }

    async fn find_where(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let guard = self.data.read().await;
        let data = guard.as_ref().ok_or(StoreError::Closed)?;

        Ok(documents(data, collection)
            .filter(|doc| filter.matches(doc))
            .collect())
    }

    async fn find_one_case_insensitive(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Document>> {
        let guard = self.data.read().await;
        let data = guard.as_ref().ok_or(StoreError::Closed)?;
        let wanted = collation::fold(value);

        let found = documents(data, collection).find(|doc| {
            matches!(doc.field(field), Some(Value::String(s)) if collation::fold(&s) == wanted)
        });
        Ok(found)
    }

    async fn insert(&self, collection: &str, body: Map<String, Value>) -> StoreResult<Document> {
        let mut guard = self.data.write().await;
        let data = guard.as_mut().ok_or(StoreError::Closed)?;

        let id = DocumentId::generate();
        data.entry(collection.to_string())
            .or_default()
            .insert(id, body.clone());
        Ok(Document::new(id, body))
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Map<String, Value>,
    ) -> StoreResult<Option<Document>> {
        let mut guard = self.data.write().await;
        let data = guard.as_mut().ok_or(StoreError::Closed)?;

        match data.get_mut(collection).and_then(|docs| docs.get_mut(id)) {
            Some(existing) => {
                *existing = body.clone();
                Ok(Some(Document::new(*id, body)))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<bool> {
        let mut guard = self.data.write().await;
        let data = guard.as_mut().ok_or(StoreError::Closed)?;

        Ok(data
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn count(&self, collection: &str) -> StoreResult<usize> {
        let guard = self.data.read().await;
        let data = guard.as_ref().ok_or(StoreError::Closed)?;

        Ok(data.get(collection).map_or(0, BTreeMap::len))
    }

    async fn close(&self) -> StoreResult<()> {
        let mut guard = self.data.write().await;
        if guard.take().is_some() {
            tracing::info!(target: "catalog-db", "document store closed");
        }
        Ok(())
    }
}
