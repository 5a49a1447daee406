//! Meal request handlers.

use axum::Json;
use axum::extract::State;
use dormdine_core::resources;
use dormdine_core::resources::requests;
use dormdine_core::store::{Collection, DeleteResult, Document, InsertOneResult, UpdateResult};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::{PageQuery, UserEmailQuery};

/// `GET /api/v1/serveMeal`: meal requests, optionally paged.
pub async fn all_requests_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let docs = resources::list(state.store(), Collection::RequestMeals, query.to_page()).await?;
    Ok(Json(docs))
}

/// `GET /api/v1/requestmeal?userEmail=`: requests placed by one user.
pub async fn requests_by_user_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserEmailQuery>,
) -> AppResult<Json<Vec<Document>>> {
    Ok(Json(
        requests::by_user_email(state.store(), &query.user_email).await?,
    ))
}

/// `POST /api/v1/mealrequest`: request a meal.
pub async fn create_request_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<InsertOneResult>> {
    Ok(Json(requests::create(state.store(), body).await?))
}

/// `PATCH /api/v1/servestatus/{id}`: mark a request delivered.
pub async fn serve_status_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(requests::mark_delivered(state.store(), &id).await?))
}

/// `DELETE /api/v1/requestmeal/{id}`: withdraw a request.
pub async fn delete_request_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(requests::delete(state.store(), &id).await?))
}
