//! Upcoming meal request handlers.

use axum::Json;
use axum::extract::State;
use dormdine_core::resources;
use dormdine_core::resources::meals;
use dormdine_core::store::{Collection, Document, InsertOneResult, MoveResult, UpdateResult};

use super::meals::LIKES_FIELD;
use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::PageQuery;

/// `GET /api/v1/upcomingmeal`: upcoming meals, optionally paged.
pub async fn all_upcoming_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let docs =
        resources::list(state.store(), Collection::UpcomingMeals, query.to_page()).await?;
    Ok(Json(docs))
}

/// `POST /api/v1/upcomingMeal`: add an upcoming meal.
pub async fn add_upcoming_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<InsertOneResult>> {
    Ok(Json(
        meals::add(state.store(), Collection::UpcomingMeals, body).await?,
    ))
}

/// `POST /api/v1/mealpublish/{id}`: publish an upcoming meal.
pub async fn publish_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<MoveResult>> {
    Ok(Json(meals::publish(state.store(), &id).await?))
}

/// `PATCH /api/v1/updateMealLikes/{id}`: set an upcoming meal's like count.
pub async fn upcoming_likes_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<UpdateResult>> {
    let likes = meals::parse_likes(body.get(LIKES_FIELD))?;
    Ok(Json(
        meals::set_likes(state.store(), Collection::UpcomingMeals, &id, likes).await?,
    ))
}
