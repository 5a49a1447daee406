//! In-process document store.
//!
//! Every operation takes the single store lock, so units of work are
//! trivially atomic. Used for tests and for running without PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    CascadeDeleteResult, Collection, DeleteResult, Document, DocumentStore, Filter,
    InsertOneResult, MoveResult, Page, StoreResult, UpdateResult, apply_set, with_fresh_id,
    without_id,
};

type Collections = HashMap<Collection, Vec<Document>>;

/// A [`DocumentStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert(collections: &mut Collections, collection: Collection, document: Document) -> String {
    let (id, document) = with_fresh_id(document);
    collections.entry(collection).or_default().push(document);
    id
}

fn position(collections: &Collections, collection: Collection, filter: &Filter) -> Option<usize> {
    collections
        .get(&collection)?
        .iter()
        .position(|d| filter.matches(d))
}

fn update(
    collections: &mut Collections,
    collection: Collection,
    filter: &Filter,
    set: &Document,
) -> UpdateResult {
    let Some(idx) = position(collections, collection, filter) else {
        return UpdateResult::new(0, 0);
    };
    let modified = collections
        .get_mut(&collection)
        .and_then(|docs| docs.get_mut(idx))
        .is_some_and(|doc| apply_set(doc, set));
    UpdateResult::new(1, u64::from(modified))
}

fn remove_matching(collections: &mut Collections, collection: Collection, filter: &Filter) -> u64 {
    let Some(docs) = collections.get_mut(&collection) else {
        return 0;
    };
    let before = docs.len();
    docs.retain(|d| !filter.matches(d));
    (before - docs.len()) as u64
}

fn remove_first(
    collections: &mut Collections,
    collection: Collection,
    filter: &Filter,
) -> Option<Document> {
    let idx = position(collections, collection, filter)?;
    collections.get_mut(&collection).map(|docs| docs.remove(idx))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        page: Option<Page>,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let matching = collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|d| filter.matches(d))
            .cloned();
        Ok(match page {
            Some(page) => page.apply(matching),
            None => matching.collect(),
        })
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreResult<InsertOneResult> {
        let mut collections = self.collections.write().await;
        let id = insert(&mut collections, collection, document);
        debug!(%collection, id = %id, "inserted document");
        Ok(InsertOneResult::new(id))
    }

    async fn insert_one_unless_exists(
        &self,
        collection: Collection,
        document: Document,
        existing: &Filter,
    ) -> StoreResult<Option<InsertOneResult>> {
        let mut collections = self.collections.write().await;
        if position(&collections, collection, existing).is_some() {
            return Ok(None);
        }
        let id = insert(&mut collections, collection, document);
        Ok(Some(InsertOneResult::new(id)))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateResult> {
        let mut collections = self.collections.write().await;
        Ok(update(&mut collections, collection, filter, &without_id(set)))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<DeleteResult> {
        let mut collections = self.collections.write().await;
        let removed = remove_first(&mut collections, collection, filter);
        Ok(DeleteResult::new(u64::from(removed.is_some())))
    }

    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<DeleteResult> {
        let mut collections = self.collections.write().await;
        Ok(DeleteResult::new(remove_matching(
            &mut collections,
            collection,
            filter,
        )))
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn move_one(
        &self,
        from: Collection,
        to: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<MoveResult>> {
        let mut collections = self.collections.write().await;
        let Some(document) = remove_first(&mut collections, from, filter) else {
            return Ok(None);
        };
        let inserted_id = insert(&mut collections, to, document);
        Ok(Some(MoveResult {
            acknowledged: true,
            inserted_id,
            deleted_count: 1,
        }))
    }

    async fn insert_one_with_update(
        &self,
        collection: Collection,
        document: Document,
        target: Collection,
        target_filter: &Filter,
        set: Document,
    ) -> StoreResult<Option<(InsertOneResult, UpdateResult)>> {
        let mut collections = self.collections.write().await;
        if position(&collections, target, target_filter).is_none() {
            return Ok(None);
        }
        let id = insert(&mut collections, collection, document);
        let updated = update(&mut collections, target, target_filter, &without_id(set));
        Ok(Some((InsertOneResult::new(id), updated)))
    }

    async fn delete_cascade(
        &self,
        collection: Collection,
        id: &str,
        dependent: Collection,
        foreign_key: &str,
    ) -> StoreResult<CascadeDeleteResult> {
        let mut collections = self.collections.write().await;
        let deleted = remove_first(&mut collections, collection, &Filter::by_id(id));
        let dependents = remove_matching(
            &mut collections,
            dependent,
            &Filter::eq(foreign_key, Value::String(id.to_string())),
        );
        Ok(CascadeDeleteResult {
            acknowledged: true,
            deleted_count: u64::from(deleted.is_some()),
            dependents_deleted_count: dependents,
        })
    }
}
