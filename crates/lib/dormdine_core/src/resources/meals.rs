//! Meal and upcoming-meal operations.

use serde_json::Value;
use tracing::info;

use super::{ResourceError, ResourceResult};
use crate::models::resources::{ALL_CATEGORIES, EDITABLE_MEAL_FIELDS, fields};
use crate::store::{
    CascadeDeleteResult, Collection, Document, DocumentStore, Filter, InsertOneResult, MoveResult,
    StoreResult, UpdateResult,
};

/// Meals in `category`; `None` or `"All"` lists every meal.
pub async fn by_category(
    store: &dyn DocumentStore,
    category: Option<&str>,
) -> StoreResult<Vec<Document>> {
    let filter = match category {
        Some(c) if !c.is_empty() && c != ALL_CATEGORIES => Filter::eq(fields::MEAL_CATEGORY, c),
        _ => Filter::all(),
    };
    store.find(Collection::Meals, &filter, None).await
}

/// A meal with its reviews attached as `userReview`.
pub async fn detail(store: &dyn DocumentStore, id: &str) -> ResourceResult<Document> {
    let mut meal = get(store, id).await?;
    let reviews = store
        .find(Collection::Reviews, &Filter::eq(fields::MEAL_ID, id), None)
        .await?;
    meal.insert(
        fields::USER_REVIEW.into(),
        Value::Array(reviews.into_iter().map(Value::Object).collect()),
    );
    Ok(meal)
}

/// A single meal.
pub async fn get(store: &dyn DocumentStore, id: &str) -> ResourceResult<Document> {
    store
        .find_one(Collection::Meals, &Filter::by_id(id))
        .await?
        .ok_or_else(|| ResourceError::NotFound(format!("meal {id}")))
}

/// Published and upcoming meals owned by an admin, published first.
pub async fn by_admin(store: &dyn DocumentStore, admin_id: &str) -> StoreResult<Vec<Document>> {
    let filter = Filter::eq(fields::ADMIN_ID, admin_id);
    let mut meals = store.find(Collection::Meals, &filter, None).await?;
    meals.extend(store.find(Collection::UpcomingMeals, &filter, None).await?);
    Ok(meals)
}

/// Add a meal to `collection` (meals or upcoming meals).
pub async fn add(
    store: &dyn DocumentStore,
    collection: Collection,
    body: Document,
) -> StoreResult<InsertOneResult> {
    store.insert_one(collection, body).await
}

/// Move an upcoming meal into the published meals under a new id.
pub async fn publish(store: &dyn DocumentStore, id: &str) -> ResourceResult<MoveResult> {
    let moved = store
        .move_one(Collection::UpcomingMeals, Collection::Meals, &Filter::by_id(id))
        .await?
        .ok_or_else(|| ResourceError::NotFound(format!("upcoming meal {id}")))?;
    info!(upcoming_id = %id, meal_id = %moved.inserted_id, "meal published");
    Ok(moved)
}

/// Interpret a client-supplied like count: integer, float (truncated) or numeric string.
pub fn parse_likes(value: Option<&Value>) -> ResourceResult<i64> {
    let invalid = || ResourceError::Validation("`likesData` must be a number".into());
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(invalid),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Set the like counter of a meal or upcoming meal.
pub async fn set_likes(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
    likes: i64,
) -> StoreResult<UpdateResult> {
    let mut set = Document::new();
    set.insert(fields::LIKES.into(), likes.into());
    store.update_one(collection, &Filter::by_id(id), set).await
}

/// Update the editable fields present in `body`; anything else is ignored.
pub async fn edit(
    store: &dyn DocumentStore,
    id: &str,
    body: &Document,
) -> StoreResult<UpdateResult> {
    let set: Document = EDITABLE_MEAL_FIELDS
        .iter()
        .filter_map(|field| body.get(*field).map(|v| (field.to_string(), v.clone())))
        .collect();
    store
        .update_one(Collection::Meals, &Filter::by_id(id), set)
        .await
}

/// Delete a meal and every review of it.
pub async fn delete(store: &dyn DocumentStore, id: &str) -> StoreResult<CascadeDeleteResult> {
    let result = store
        .delete_cascade(Collection::Meals, id, Collection::Reviews, fields::MEAL_ID)
        .await?;
    info!(
        meal_id = %id,
        reviews_deleted = result.dependents_deleted_count,
        "meal deleted"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::test_support::{doc, store};

    async fn seed(store: &dyn DocumentStore, collection: Collection, value: Value) -> String {
        store.insert_one(collection, doc(value)).await.unwrap().inserted_id
    }

    #[tokio::test]
    async fn category_filter_treats_all_as_no_filter() {
        let store = store();
        seed(&store, Collection::Meals, json!({"mealCategory": "Lunch"})).await;
        seed(&store, Collection::Meals, json!({"mealCategory": "Dinner"})).await;
        assert_eq!(by_category(&store, Some("Lunch")).await.unwrap().len(), 1);
        assert_eq!(by_category(&store, Some("All")).await.unwrap().len(), 2);
        assert_eq!(by_category(&store, None).await.unwrap().len(), 2);
        assert!(by_category(&store, Some("Brunch")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_attaches_reviews() {
        let store = store();
        let meal = seed(&store, Collection::Meals, json!({"mealTitle": "Soup"})).await;
        seed(&store, Collection::Reviews, json!({"mealId": meal, "reviewText": "ok"})).await;
        seed(&store, Collection::Reviews, json!({"mealId": "other"})).await;

        let detail = detail(&store, &meal).await.unwrap();
        assert_eq!(detail["mealTitle"], "Soup");
        assert_eq!(detail["userReview"].as_array().unwrap().len(), 1);

        let err = super::detail(&store, "missing").await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_profile_concatenates_collections() {
        let store = store();
        seed(&store, Collection::UpcomingMeals, json!({"adminId": "a1", "n": 2})).await;
        seed(&store, Collection::Meals, json!({"adminId": "a1", "n": 1})).await;
        seed(&store, Collection::Meals, json!({"adminId": "a2"})).await;
        let meals = by_admin(&store, "a1").await.unwrap();
        let ns: Vec<_> = meals.iter().map(|m| m["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn publish_moves_with_new_id() {
        let store = store();
        let up = seed(&store, Collection::UpcomingMeals, json!({"mealTitle": "Dal"})).await;
        let moved = publish(&store, &up).await.unwrap();
        assert_ne!(moved.inserted_id, up);
        assert_eq!(moved.deleted_count, 1);
        assert_eq!(store.count(Collection::UpcomingMeals).await.unwrap(), 0);
        assert_eq!(get(&store, &moved.inserted_id).await.unwrap()["mealTitle"], "Dal");

        let again = publish(&store, &up).await.unwrap_err();
        assert!(matches!(again, ResourceError::NotFound(_)));
        assert_eq!(store.count(Collection::Meals).await.unwrap(), 1);
    }

    #[test]
    fn likes_accept_numbers_and_numeric_strings() {
        assert_eq!(parse_likes(Some(&json!(4))).unwrap(), 4);
        assert_eq!(parse_likes(Some(&json!(4.9))).unwrap(), 4);
        assert_eq!(parse_likes(Some(&json!("12"))).unwrap(), 12);
        assert_eq!(parse_likes(Some(&json!(" 7.5 "))).unwrap(), 7);
        for bad in [json!("many"), json!(null), json!([1]), json!(true)] {
            assert!(parse_likes(Some(&bad)).is_err());
        }
        assert!(parse_likes(None).is_err());
    }

    #[tokio::test]
    async fn edit_only_touches_editable_fields() {
        let store = store();
        let id = seed(&store, Collection::Meals, json!({"mealTitle": "Old", "likes": 1})).await;
        let body = doc(json!({"mealTitle": "New", "price": 4.5, "_id": "hijack", "secret": 1}));
        let res = edit(&store, &id, &body).await.unwrap();
        assert_eq!(res, UpdateResult::new(1, 1));

        let meal = get(&store, &id).await.unwrap();
        assert_eq!(meal["mealTitle"], "New");
        assert_eq!(meal["price"], 4.5);
        assert_eq!(meal["likes"], 1);
        assert_eq!(meal["_id"], json!(id));
        assert!(meal.get("secret").is_none());
    }

    #[tokio::test]
    async fn likes_update_reports_zero_for_missing_meal() {
        let store = store();
        let res = set_likes(&store, Collection::Meals, "missing", 3).await.unwrap();
        assert_eq!(res, UpdateResult::new(0, 0));
    }

    #[tokio::test]
    async fn delete_cascades_to_reviews_only() {
        let store = store();
        let meal = seed(&store, Collection::Meals, json!({"mealTitle": "Soup"})).await;
        seed(&store, Collection::Reviews, json!({"mealId": meal})).await;
        seed(&store, Collection::Reviews, json!({"mealId": meal})).await;
        seed(&store, Collection::Reviews, json!({"mealId": "other"})).await;
        seed(&store, Collection::RequestMeals, json!({"mealId": meal})).await;

        let res = delete(&store, &meal).await.unwrap();
        assert_eq!(res.deleted_count, 1);
        assert_eq!(res.dependents_deleted_count, 2);
        assert_eq!(store.count(Collection::Reviews).await.unwrap(), 1);
        assert_eq!(store.count(Collection::RequestMeals).await.unwrap(), 1);
    }
}
