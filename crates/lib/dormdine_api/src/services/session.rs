//! Session service: issue, authenticate and revoke session tokens.

use dormdine_core::auth::jwt::{issue_session_token, verify_session_token};
use dormdine_core::models::auth::SessionClaims;
use dormdine_core::store::Document;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Sign a session token for the identity claim in `body`.
///
/// The claim is trusted as sent; nothing is checked against stored users.
pub fn issue(state: &AppState, body: Document) -> AppResult<(String, SessionClaims)> {
    let (token, claims) = issue_session_token(body, state.config.session_secret.as_bytes())?;
    info!(email = %claims.email, jti = %claims.jti, "session issued");
    Ok((token, claims))
}

/// Verify a presented token and make sure it has not been revoked.
pub fn authenticate(state: &AppState, token: &str) -> AppResult<SessionClaims> {
    let claims = verify_session_token(token, state.config.session_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;
    if state.revocations.is_revoked(&claims.jti) {
        return Err(AppError::Unauthorized("token revoked".into()));
    }
    Ok(claims)
}

/// Revoke the presented token if it is still valid. Returns whether anything was revoked.
pub fn revoke(state: &AppState, token: &str) -> bool {
    match verify_session_token(token, state.config.session_secret.as_bytes()) {
        Some(claims) => {
            state.revocations.revoke(&claims.jti, claims.exp);
            info!(email = %claims.email, jti = %claims.jti, "session revoked");
            true
        }
        None => {
            debug!("logout with an invalid or expired token");
            false
        }
    }
}
