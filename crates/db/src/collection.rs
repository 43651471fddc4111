//! Typed access to a document collection.

use std::marker::PhantomData;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{Document, DocumentId};
use crate::error::{StoreError, StoreResult};
use crate::query::{Filter, Sort};
use crate::StoreHandle;

/// A catalog type persisted in its own collection.
///
/// The implementing type holds the entity's fields without its id, so the same
/// value serves as the draft written on insert and replace.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Canonical URL of the entity with this id.
    fn url_for(id: &DocumentId) -> String;
}

/// An entity together with its stored id.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<E> {
    pub id: DocumentId,
    pub fields: E,
}

impl<E: Entity> Record<E> {
    pub fn url(&self) -> String {
        E::url_for(&self.id)
    }

    fn decode(doc: Document) -> StoreResult<Self> {
        let fields = serde_json::from_value(Value::Object(doc.body)).map_err(|e| {
            StoreError::invalid_document(E::COLLECTION, format!("{}: {e}", doc.id))
        })?;
        Ok(Self { id: doc.id, fields })
    }
}

impl<E> Deref for Record<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.fields
    }
}

fn encode<E: Entity>(fields: &E) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(fields)? {
        Value::Object(body) => Ok(body),
        _ => Err(StoreError::invalid_document(
            E::COLLECTION,
            "entity did not serialize to an object",
        )),
    }
}

/// Typed view over the collection of `E`.
pub struct Collection<E> {
    store: StoreHandle,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn find_all(&self, sort: &Sort) -> StoreResult<Vec<Record<E>>> {
        self.store
            .find_all(E::COLLECTION, sort)
            .await?
            .into_iter()
            .map(Record::decode)
            .collect()
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> StoreResult<Option<Record<E>>> {
        self.store
            .find_by_id(E::COLLECTION, id)
            .await?
            .map(Record::decode)
            .transpose()
    }

    pub async fn find_where(&self, filter: &Filter) -> StoreResult<Vec<Record<E>>> {
        self.store
            .find_where(E::COLLECTION, filter)
            .await?
            .into_iter()
            .map(Record::decode)
            .collect()
    }

    pub async fn find_one_case_insensitive(
        &self,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Record<E>>> {
        self.store
            .find_one_case_insensitive(E::COLLECTION, field, value)
            .await?
            .map(Record::decode)
            .transpose()
    }

    pub async fn insert(&self, draft: &E) -> StoreResult<Record<E>> {
        let doc = self.store.insert(E::COLLECTION, encode(draft)?).await?;
        Record::decode(doc)
    }

    pub async fn replace_by_id(&self, id: &DocumentId, draft: &E) -> StoreResult<Option<Record<E>>> {
        self.store
            .replace_by_id(E::COLLECTION, id, encode(draft)?)
            .await?
            .map(Record::decode)
            .transpose()
    }

    pub async fn delete_by_id(&self, id: &DocumentId) -> StoreResult<bool> {
        self.store.delete_by_id(E::COLLECTION, id).await
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.store.count(E::COLLECTION).await
    }
}
