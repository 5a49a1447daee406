//! Review operations.

use serde_json::Value;
use tracing::debug;

use super::{ResourceError, ResourceResult, required_str};
use crate::models::resources::fields;
use crate::store::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, StoreResult,
    UpdateResult,
};

/// Reviews written by `reviewer_id`.
pub async fn by_reviewer(
    store: &dyn DocumentStore,
    reviewer_id: &str,
) -> StoreResult<Vec<Document>> {
    store
        .find(Collection::Reviews, &Filter::eq(fields::REVIEWER_ID, reviewer_id), None)
        .await
}

/// Post a review and refresh the meal's `reviews` copy in one unit of work.
///
/// Fails with not-found, writing nothing, when `mealId` names no meal.
pub async fn post(store: &dyn DocumentStore, body: Document) -> ResourceResult<InsertOneResult> {
    let meal_id = required_str(&body, fields::MEAL_ID)?.to_string();

    let mut set = Document::new();
    if let Some(reviews) = body.get(fields::REVIEWS) {
        set.insert(fields::REVIEWS.into(), reviews.clone());
    }

    let (inserted, updated) = store
        .insert_one_with_update(
            Collection::Reviews,
            body,
            Collection::Meals,
            &Filter::by_id(&meal_id),
            set,
        )
        .await?
        .ok_or_else(|| ResourceError::NotFound(format!("meal {meal_id}")))?;
    debug!(
        meal_id = %meal_id,
        review_id = %inserted.inserted_id,
        meal_modified = updated.modified_count,
        "review posted"
    );
    Ok(inserted)
}

/// Replace a review's text.
pub async fn update_text(
    store: &dyn DocumentStore,
    id: &str,
    body: &Document,
) -> ResourceResult<UpdateResult> {
    let text = match body.get(fields::REVIEW_TEXT) {
        Some(Value::String(text)) => text.clone(),
        _ => {
            return Err(ResourceError::Validation(
                "`reviewText` must be a string".into(),
            ));
        }
    };
    let mut set = Document::new();
    set.insert(fields::REVIEW_TEXT.into(), text.into());
    Ok(store
        .update_one(Collection::Reviews, &Filter::by_id(id), set)
        .await?)
}

/// Delete a single review. The meal's `reviews` copy is left as is.
pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<DeleteResult> {
    store.delete_one(Collection::Reviews, &Filter::by_id(id)).await
}
