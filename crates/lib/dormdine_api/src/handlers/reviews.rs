//! Review request handlers.

use axum::Json;
use axum::extract::State;
use dormdine_core::resources;
use dormdine_core::resources::reviews;
use dormdine_core::store::{Collection, DeleteResult, Document, InsertOneResult, UpdateResult};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::PageQuery;

/// `GET /api/v1/allreview`: reviews, optionally paged.
pub async fn all_reviews_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let docs = resources::list(state.store(), Collection::Reviews, query.to_page()).await?;
    Ok(Json(docs))
}

/// `GET /api/v1/userreview/{id}`: reviews written by one user.
pub async fn user_reviews_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<Vec<Document>>> {
    Ok(Json(reviews::by_reviewer(state.store(), &id).await?))
}

/// `POST /api/v1/review`: post a review and sync the meal's review count.
pub async fn post_review_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<InsertOneResult>> {
    Ok(Json(reviews::post(state.store(), body).await?))
}

/// `PATCH /api/v1/updatereview/{id}`: edit a review's text.
pub async fn update_review_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(reviews::update_text(state.store(), &id, &body).await?))
}

/// `DELETE /api/v1/userreview/{id}` and `DELETE /api/v1/review/{id}`.
pub async fn delete_review_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(reviews::delete(state.store(), &id).await?))
}
