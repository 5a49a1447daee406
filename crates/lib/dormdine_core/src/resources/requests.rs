//! Meal request operations.

use super::ResourceResult;
use crate::models::resources::{RequestStatus, fields};
use crate::store::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, StoreResult,
    UpdateResult,
};

/// Requests placed by `email`.
pub async fn by_user_email(store: &dyn DocumentStore, email: &str) -> StoreResult<Vec<Document>> {
    store
        .find(Collection::RequestMeals, &Filter::eq(fields::USER_EMAIL, email), None)
        .await
}

/// Record a meal request. New requests always start as pending.
pub async fn create(store: &dyn DocumentStore, mut body: Document) -> ResourceResult<InsertOneResult> {
    body.insert(fields::STATUS.into(), RequestStatus::Pending.as_str().into());
    Ok(store.insert_one(Collection::RequestMeals, body).await?)
}

/// Mark a request as delivered.
pub async fn mark_delivered(store: &dyn DocumentStore, id: &str) -> StoreResult<UpdateResult> {
    let mut set = Document::new();
    set.insert(fields::STATUS.into(), RequestStatus::Delivered.as_str().into());
    store
        .update_one(Collection::RequestMeals, &Filter::by_id(id), set)
        .await
}

pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<DeleteResult> {
    store
        .delete_one(Collection::RequestMeals, &Filter::by_id(id))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::test_support::{doc, store};

    #[tokio::test]
    async fn request_lifecycle() {
        let store = store();
        let created = create(
            &store,
            doc(json!({"userEmail": "a@x.com", "mealId": "m1", "status": "delivered"})),
        )
        .await
        .unwrap();
        create(&store, doc(json!({"userEmail": "b@x.com"}))).await.unwrap();

        let mine = by_user_email(&store, "a@x.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["status"], "pending");

        let res = mark_delivered(&store, &created.inserted_id).await.unwrap();
        assert_eq!(res, UpdateResult::new(1, 1));
        let again = mark_delivered(&store, &created.inserted_id).await.unwrap();
        assert_eq!(again, UpdateResult::new(1, 0));

        assert_eq!(delete(&store, &created.inserted_id).await.unwrap().deleted_count, 1);
        assert_eq!(delete(&store, &created.inserted_id).await.unwrap().deleted_count, 0);
    }
}
