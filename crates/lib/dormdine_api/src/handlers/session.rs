//! Session request handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use dormdine_core::auth::jwt::SESSION_TOKEN_EXPIRY_SECS;
use dormdine_core::store::Document;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::SuccessResponse;
use crate::services::cookies::{SESSION_COOKIE, clear_session_cookie, session_cookie};
use crate::services::session;

/// `POST /api/v1/jwt`: issue a session cookie for the posted identity claim.
pub async fn issue_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<Document>,
) -> AppResult<(CookieJar, Json<SuccessResponse>)> {
    let (token, _) = session::issue(&state, body)?;
    let jar = jar.add(session_cookie(&token, SESSION_TOKEN_EXPIRY_SECS));
    Ok((jar, Json(SuccessResponse::ok())))
}

/// `POST /api/v1/logout`: revoke the presented session and clear the cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        session::revoke(&state, cookie.value());
    }
    (jar.add(clear_session_cookie()), Json(SuccessResponse::ok()))
}
