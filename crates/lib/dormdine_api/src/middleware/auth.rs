//! Session middleware: cookie extraction, token verification and the
//! self-match check.

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use dormdine_core::models::auth::SessionClaims;

use crate::AppState;
use crate::error::AppError;
use crate::extract::AppPath;
use crate::services::cookies::SESSION_COOKIE;
use crate::services::session;

/// Path parameter compared against the session identity.
pub const SELF_MATCH_PARAM: &str = "email";

/// Key used to store `SessionClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

/// Axum middleware: reads the `token` cookie, verifies it, rejects revoked
/// tokens and injects `AuthenticatedUser` into request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing session cookie".into()))?;

    let claims = session::authenticate(&state, &token)?;
    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

/// Axum middleware: the `{email}` path parameter must equal the session's email.
///
/// Runs inside [`require_session`].
pub async fn require_self_match(
    AppPath(params): AppPath<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("no session on request".into()))?;
    let requested = params
        .get(SELF_MATCH_PARAM)
        .ok_or_else(|| AppError::Internal("self-match route without an email parameter".into()))?;

    if requested != &user.0.email {
        return Err(AppError::Forbidden(format!(
            "{} asked for {requested}",
            user.0.email
        )));
    }
    Ok(next.run(request).await)
}
