//! PostgreSQL-backed document store.
//!
//! All collections share one `documents` table; bodies are JSONB and
//! filters are containment patterns (`body @> $filter`). Store order is the
//! insertion sequence. Units of work run in a single transaction.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgExecutor, PgPool};
use tracing::debug;

use super::{
    CascadeDeleteResult, Collection, DeleteResult, Document, DocumentStore, Filter,
    InsertOneResult, MoveResult, Page, StoreError, StoreResult, UpdateResult, with_fresh_id,
    without_id,
};

/// Applies a `$set`-style merge to the first match; yields whether the body changed.
const UPDATE_FIRST_SQL: &str = r#"
    WITH target AS (
        SELECT id, body FROM documents
        WHERE collection = $1 AND body @> $2
        ORDER BY seq
        LIMIT 1
        FOR UPDATE
    )
    UPDATE documents d
    SET body = d.body || $3
    FROM target
    WHERE d.collection = $1 AND d.id = target.id
    RETURNING target.body IS DISTINCT FROM d.body
"#;

/// A [`DocumentStore`] over a PostgreSQL pool.
#[derive(Clone, Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn into_document(body: Value) -> StoreResult<Document> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

fn pattern(filter: &Filter) -> Value {
    Value::Object(filter.as_document().clone())
}

async fn select_bodies<'e, E: PgExecutor<'e>>(
    exec: E,
    collection: Collection,
    filter: &Filter,
    page: Option<Page>,
) -> StoreResult<Vec<Document>> {
    let (offset, limit) = match page {
        Some(page) => (to_i64(page.skip), page.limit.map(to_i64)),
        None => (0, None),
    };
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT body FROM documents \
         WHERE collection = $1 AND body @> $2 \
         ORDER BY seq OFFSET $3 LIMIT $4",
    )
    .bind(collection.name())
    .bind(pattern(filter))
    .bind(offset)
    .bind(limit)
    .fetch_all(exec)
    .await?;
    rows.into_iter().map(into_document).collect()
}

async fn insert_body<'e, E: PgExecutor<'e>>(
    exec: E,
    collection: Collection,
    id: &str,
    body: Document,
) -> StoreResult<()> {
    sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
        .bind(collection.name())
        .bind(id)
        .bind(Value::Object(body))
        .execute(exec)
        .await?;
    Ok(())
}

async fn update_first<'e, E: PgExecutor<'e>>(
    exec: E,
    collection: Collection,
    filter: &Filter,
    set: Document,
) -> StoreResult<UpdateResult> {
    let changed = sqlx::query_scalar::<_, bool>(UPDATE_FIRST_SQL)
        .bind(collection.name())
        .bind(pattern(filter))
        .bind(Value::Object(without_id(set)))
        .fetch_optional(exec)
        .await?;
    Ok(match changed {
        Some(modified) => UpdateResult::new(1, u64::from(modified)),
        None => UpdateResult::new(0, 0),
    })
}

async fn delete_matching<'e, E: PgExecutor<'e>>(
    exec: E,
    collection: Collection,
    filter: &Filter,
) -> StoreResult<u64> {
    let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND body @> $2")
        .bind(collection.name())
        .bind(pattern(filter))
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        page: Option<Page>,
    ) -> StoreResult<Vec<Document>> {
        select_bodies(&self.pool, collection, filter, page).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let mut docs = select_bodies(
            &self.pool,
            collection,
            filter,
            Some(Page {
                skip: 0,
                limit: Some(1),
            }),
        )
        .await?;
        Ok(docs.pop())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreResult<InsertOneResult> {
        let (id, document) = with_fresh_id(document);
        insert_body(&self.pool, collection, &id, document).await?;
        debug!(%collection, id = %id, "inserted document");
        Ok(InsertOneResult::new(id))
    }

    async fn insert_one_unless_exists(
        &self,
        collection: Collection,
        document: Document,
        existing: &Filter,
    ) -> StoreResult<Option<InsertOneResult>> {
        let mut tx = self.pool.begin().await?;

        // Serialise check-then-insert per collection.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(collection.name())
            .execute(&mut *tx)
            .await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM documents WHERE collection = $1 AND body @> $2)",
        )
        .bind(collection.name())
        .bind(pattern(existing))
        .fetch_one(&mut *tx)
        .await?;
        if exists {
            tx.rollback().await?;
            return Ok(None);
        }

        let (id, document) = with_fresh_id(document);
        insert_body(&mut *tx, collection, &id, document).await?;
        tx.commit().await?;
        Ok(Some(InsertOneResult::new(id)))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateResult> {
        update_first(&self.pool, collection, filter, set).await
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<DeleteResult> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND id = ( \
                SELECT id FROM documents \
                WHERE collection = $1 AND body @> $2 \
                ORDER BY seq LIMIT 1 \
             )",
        )
        .bind(collection.name())
        .bind(pattern(filter))
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult::new(result.rows_affected()))
    }

    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<DeleteResult> {
        let deleted = delete_matching(&self.pool, collection, filter).await?;
        Ok(DeleteResult::new(deleted))
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE collection = $1")
                .bind(collection.name())
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn move_one(
        &self,
        from: Collection,
        to: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<MoveResult>> {
        let mut tx = self.pool.begin().await?;

        // Row lock: a concurrent move of the same document waits, then finds nothing.
        let source = sqlx::query_as::<_, (String, Value)>(
            "SELECT id, body FROM documents \
             WHERE collection = $1 AND body @> $2 \
             ORDER BY seq LIMIT 1 \
             FOR UPDATE",
        )
        .bind(from.name())
        .bind(pattern(filter))
        .fetch_optional(&mut *tx)
        .await?;

        let Some((source_id, body)) = source else {
            tx.rollback().await?;
            return Ok(None);
        };

        let (inserted_id, document) = with_fresh_id(into_document(body)?);
        insert_body(&mut *tx, to, &inserted_id, document).await?;

        let deleted = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(from.name())
            .bind(&source_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        debug!(%from, %to, source_id = %source_id, inserted_id = %inserted_id, "moved document");
        Ok(Some(MoveResult {
            acknowledged: true,
            inserted_id,
            deleted_count: deleted,
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
        let mut tx = self.pool.begin().await?;

        let updated = update_first(&mut *tx, target, target_filter, set).await?;
        if updated.matched_count == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let (id, document) = with_fresh_id(document);
        insert_body(&mut *tx, collection, &id, document).await?;
        tx.commit().await?;
        Ok(Some((InsertOneResult::new(id), updated)))
    }

    async fn delete_cascade(
        &self,
        collection: Collection,
        id: &str,
        dependent: Collection,
        foreign_key: &str,
    ) -> StoreResult<CascadeDeleteResult> {
        let mut tx = self.pool.begin().await?;

        let deleted = delete_matching(&mut *tx, collection, &Filter::by_id(id)).await?;
        let dependents = delete_matching(&mut *tx, dependent, &Filter::eq(foreign_key, id)).await?;

        tx.commit().await?;
        Ok(CascadeDeleteResult {
            acknowledged: true,
            deleted_count: deleted,
            dependents_deleted_count: dependents,
        })
    }
}
