//! Document store abstraction.
//!
//! Resources live in named collections of schema-flexible JSON documents,
//! queried by exact-match filters. The store is a long-lived handle shared
//! by every request (`Arc<dyn DocumentStore>`); implementations must be
//! safe to call concurrently.
//!
//! Multi-collection writes are exposed as single units of work
//! ([`DocumentStore::move_one`], [`DocumentStore::insert_one_with_update`],
//! [`DocumentStore::delete_cascade`]) so that either every write lands or
//! none does.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use crate::uuid::new_document_id;

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The collections backing the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Meals,
    UpcomingMeals,
    RequestMeals,
    Reviews,
}

impl Collection {
    /// Every collection, in declaration order.
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Meals,
        Collection::UpcomingMeals,
        Collection::RequestMeals,
        Collection::Reviews,
    ];

    /// Persisted collection name.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Meals => "meals",
            Collection::UpcomingMeals => "upcomingMeals",
            Collection::RequestMeals => "requestMeals",
            Collection::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conjunction of top-level field equalities. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the document with the given `_id`.
    pub fn by_id(id: &str) -> Self {
        Self::eq(ID_FIELD, id)
    }

    /// Matches documents whose `field` equals `value`.
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::default().and(field, value)
    }

    /// Adds another equality to the filter.
    pub fn and(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Whether `document` satisfies every equality.
    pub fn matches(&self, document: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// The filter as a JSON object (usable as a containment pattern).
    pub fn as_document(&self) -> &Document {
        &self.0
    }
}

/// A window over a collection in store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    /// Documents to skip.
    pub skip: u64,
    /// Maximum documents to return; `None` is unbounded.
    pub limit: Option<u64>,
}

impl Page {
    /// Zero-based `page` of `size` documents. A size of zero means "no limit".
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            skip: page.saturating_mul(size),
            limit: (size > 0).then_some(size),
        }
    }

    /// Builds a page from optional query parameters; `None` when neither is given.
    pub fn from_query(page: Option<u64>, size: Option<u64>) -> Option<Self> {
        match (page, size) {
            (None, None) => None,
            (page, size) => Some(Self::new(page.unwrap_or(0), size.unwrap_or(0))),
        }
    }

    /// Applies the window to an iterator.
    pub fn apply<T>(&self, items: impl Iterator<Item = T>) -> Vec<T> {
        let skipped = items.skip(usize::try_from(self.skip).unwrap_or(usize::MAX));
        match self.limit {
            Some(limit) => skipped
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => skipped.collect(),
        }
    }
}

/// Outcome of inserting a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOneResult {
    pub fn new(inserted_id: String) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Outcome of a single-document update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Outcome of a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Outcome of moving a document between collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub acknowledged: bool,
    /// `_id` of the copy in the target collection.
    pub inserted_id: String,
    /// Documents removed from the source collection (always 1).
    pub deleted_count: u64,
}

/// Outcome of deleting a document together with its dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeDeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
    pub dependents_deleted_count: u64,
}

/// Persistence for the application's collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `filter`, in store order, optionally windowed.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        page: Option<Page>,
    ) -> StoreResult<Vec<Document>>;

    /// First document matching `filter`.
    async fn find_one(&self, collection: Collection, filter: &Filter)
    -> StoreResult<Option<Document>>;

    /// Inserts `document` under a freshly generated `_id`.
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreResult<InsertOneResult>;

    /// Inserts `document` unless a document matching `existing` is present.
    ///
    /// The check and the insert are atomic with respect to other calls.
    async fn insert_one_unless_exists(
        &self,
        collection: Collection,
        document: Document,
        existing: &Filter,
    ) -> StoreResult<Option<InsertOneResult>>;

    /// Sets the top-level fields in `set` on the first document matching `filter`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateResult>;

    /// Deletes the first document matching `filter`.
    async fn delete_one(&self, collection: Collection, filter: &Filter)
    -> StoreResult<DeleteResult>;

    /// Deletes every document matching `filter`.
    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<DeleteResult>;

    /// Number of documents in the collection.
    async fn count(&self, collection: Collection) -> StoreResult<u64>;

    /// Copies the first document matching `filter` from `from` into `to` under a
    /// new `_id` and deletes the original. `None` when nothing matched.
    async fn move_one(
        &self,
        from: Collection,
        to: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<MoveResult>>;

    /// Inserts `document` and applies `set` to the first match of `target_filter`
    /// in `target`. Nothing is written, and `None` is returned, when the target
    /// does not exist.
    async fn insert_one_with_update(
        &self,
        collection: Collection,
        document: Document,
        target: Collection,
        target_filter: &Filter,
        set: Document,
    ) -> StoreResult<Option<(InsertOneResult, UpdateResult)>>;

    /// Deletes the document `id` and every document in `dependent` whose
    /// `foreign_key` equals `id`.
    async fn delete_cascade(
        &self,
        collection: Collection,
        id: &str,
        dependent: Collection,
        foreign_key: &str,
    ) -> StoreResult<CascadeDeleteResult>;
}

/// Replaces any client-supplied `_id` with a fresh one.
pub(crate) fn with_fresh_id(mut document: Document) -> (String, Document) {
    let id = new_document_id();
    document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    (id, document)
}

/// Drops `_id` from an update so identifiers stay immutable.
pub(crate) fn without_id(mut set: Document) -> Document {
    set.remove(ID_FIELD);
    set
}

/// Applies a top-level `set`, returning whether anything changed.
pub(crate) fn apply_set(document: &mut Document, set: &Document) -> bool {
    let mut modified = false;
    for (field, value) in set {
        if document.get(field) != Some(value) {
            document.insert(field.clone(), value.clone());
            modified = true;
        }
    }
    modified
}
