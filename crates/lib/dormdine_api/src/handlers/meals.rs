//! Meal handlers.

use axum::Json;
use axum::extract::State;
use dormdine_core::resources;
use dormdine_core::resources::meals;
use dormdine_core::store::{
    CascadeDeleteResult, Collection, Document, InsertOneResult, UpdateResult,
};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::{CategoryQuery, PageQuery};

/// Body field carrying a new like count.
pub const LIKES_FIELD: &str = "likesData";

/// `GET /api/v1/meals?mealCategory=`: meals, optionally by category.
pub async fn meals_by_category_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CategoryQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let docs = meals::by_category(state.store(), query.meal_category.as_deref()).await?;
    Ok(Json(docs))
}

/// `GET /api/v1/allmeal`: meals, optionally paged.
pub async fn all_meals_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let docs = resources::list(state.store(), Collection::Meals, query.to_page()).await?;
    Ok(Json(docs))
}

/// `GET /api/v1/meals/{id}`: one meal with its reviews.
pub async fn meal_detail_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<Document>> {
    Ok(Json(meals::detail(state.store(), &id).await?))
}

/// `GET /api/v1/editmeal/{id}`: one meal, for the edit form.
pub async fn edit_meal_form_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<Document>> {
    Ok(Json(meals::get(state.store(), &id).await?))
}

/// `GET /api/v1/adminprofile/{id}`: every meal an admin has posted.
pub async fn admin_profile_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<Vec<Document>>> {
    Ok(Json(meals::by_admin(state.store(), &id).await?))
}

/// `POST /api/v1/addMeal`: add a published meal.
pub async fn add_meal_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<InsertOneResult>> {
    Ok(Json(meals::add(state.store(), Collection::Meals, body).await?))
}

/// `PATCH /api/v1/likes/{id}`: set a meal's like count.
pub async fn meal_likes_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<UpdateResult>> {
    let likes = meals::parse_likes(body.get(LIKES_FIELD))?;
    Ok(Json(
        meals::set_likes(state.store(), Collection::Meals, &id, likes).await?,
    ))
}

/// `PATCH /api/v1/editMeal/{id}`: update a meal's editable fields.
pub async fn edit_meal_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(meals::edit(state.store(), &id, &body).await?))
}

/// `DELETE /api/v1/meal/{id}`: delete a meal and its reviews.
pub async fn delete_meal_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<CascadeDeleteResult>> {
    Ok(Json(meals::delete(state.store(), &id).await?))
}
