//! Pieces shared by every entity's request handlers.

use std::future::Future;

use axum::response::{IntoResponse, Redirect, Response};
use catalog_db::{DocumentId, Record, StoreResult};

/// Read an entity and the records that depend on it at the same time.
/// Both reads must succeed; the first failure is returned.
pub async fn fetch_with_dependents<E, D>(
    entity: impl Future<Output = StoreResult<Option<Record<E>>>>,
    dependents: impl Future<Output = StoreResult<Vec<Record<D>>>>,
) -> StoreResult<(Option<Record<E>>, Vec<Record<D>>)> {
    tokio::try_join!(entity, dependents)
}

/// Id from a URL path segment. Malformed ids name nothing and read as absent.
pub fn parse_id(raw: &str) -> Option<DocumentId> {
    DocumentId::parse(raw)
}

pub fn redirect(url: &str) -> Response {
    Redirect::to(url).into_response()
}
