//! Resource operations.
//!
//! Each submodule owns one resource and exposes the operations the HTTP
//! routes perform, written against `&dyn DocumentStore` so they run the same
//! over any backend.

pub mod meals;
pub mod requests;
pub mod reviews;
pub mod users;

use serde_json::Value;
use thiserror::Error;

use crate::store::{Collection, Document, DocumentStore, Filter, Page, StoreError, StoreResult};

/// Resource errors.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Every document of `collection` in store order, optionally windowed.
pub async fn list(
    store: &dyn DocumentStore,
    collection: Collection,
    page: Option<Page>,
) -> StoreResult<Vec<Document>> {
    store.find(collection, &Filter::all(), page).await
}

/// Number of documents in `collection`.
pub async fn count(store: &dyn DocumentStore, collection: Collection) -> StoreResult<u64> {
    store.count(collection).await
}

/// Reads a required string field from a request body.
pub(crate) fn required_str<'a>(body: &'a Document, field: &str) -> ResourceResult<&'a str> {
    match body.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        _ => Err(ResourceError::Validation(format!(
            "`{field}` must be a non-empty string"
        ))),
    }
}
