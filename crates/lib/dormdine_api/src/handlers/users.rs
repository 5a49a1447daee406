//! User request handlers.

use axum::Json;
use axum::extract::State;
use dormdine_core::resources;
use dormdine_core::resources::users::{self, Registration};
use dormdine_core::store::{Collection, Document, UpdateResult};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::{AdminResponse, EmailQuery, MessageResponse, PageQuery, RegisterResponse};

/// `GET /api/v1/user?email=`: users with the given email.
pub async fn user_by_email_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<EmailQuery>,
) -> AppResult<Json<Vec<Document>>> {
    Ok(Json(users::find_by_email(state.store(), &query.email).await?))
}

/// `GET /api/v1/allUser`: users, optionally paged.
pub async fn all_users_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let docs = resources::list(state.store(), Collection::Users, query.to_page()).await?;
    Ok(Json(docs))
}

/// `GET /api/v1/user/admin/{email}`: whether the caller is an admin.
pub async fn admin_status_handler(
    State(state): State<AppState>,
    AppPath(email): AppPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let admin = users::is_admin(state.store(), &email).await?;
    Ok(Json(AdminResponse { admin }))
}

/// `POST /api/v1/user`: register a user once per email.
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<RegisterResponse>> {
    let resp = match users::register(state.store(), body).await? {
        Registration::Created(result) => RegisterResponse::Created(result),
        Registration::AlreadyRegistered => RegisterResponse::AlreadyRegistered(MessageResponse {
            message: "User already registered".into(),
        }),
    };
    Ok(Json(resp))
}

/// `PATCH /api/v1/makeadmin/{id}`: promote a user to admin.
pub async fn make_admin_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(users::make_admin(state.store(), &id).await?))
}

/// `PUT /api/v1/checkout/{id}`: set a user's membership package and badge.
pub async fn checkout_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<Document>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(users::checkout(state.store(), &id, &body).await?))
}
