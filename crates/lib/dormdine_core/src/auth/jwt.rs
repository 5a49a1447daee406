//! Session token generation and verification.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::AuthError;
use crate::models::auth::{RESERVED_CLAIMS, SessionClaims};
use crate::uuid::uuidv7;

/// Session token lifetime: 1 hour.
pub const SESSION_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Sign a session token (HS256, 1 h expiry) for the given identity claim.
///
/// The claim must carry a string `email`; every other non-reserved field is
/// embedded as-is. No credential check is made here.
pub fn issue_session_token(
    mut claim: Map<String, Value>,
    secret: &[u8],
) -> Result<(String, SessionClaims), AuthError> {
    let email = match claim.get("email") {
        Some(Value::String(email)) if !email.trim().is_empty() => email.clone(),
        _ => {
            return Err(AuthError::ValidationError(
                "identity claim requires an email".into(),
            ));
        }
    };
    for key in RESERVED_CLAIMS {
        claim.remove(key);
    }

    let now = Utc::now();
    let claims = SessionClaims {
        email,
        jti: uuidv7().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(SESSION_TOKEN_EXPIRY_SECS)).timestamp(),
        extra: claim,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))?;
    Ok((token, claims))
}

/// Verify a session token, returning the claims on success.
///
/// `None` covers every rejection: malformed, bad signature, expired.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Option<SessionClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<SessionClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

/// Resolve the signing secret: `ACCESS_TOKEN_SECRET` → `JWT_SECRET` → persisted file.
pub fn resolve_session_secret() -> String {
    for var in ["ACCESS_TOKEN_SECRET", "JWT_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    let secret_path = session_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = std::fs::write(&secret_path, &secret) {
        warn!(path = %secret_path.display(), error = %e, "could not persist session secret");
    } else {
        info!(path = %secret_path.display(), "generated new session secret");
    }
    secret
}

/// Path to the persisted session secret file.
fn session_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dormdine")
        .join("session-secret")
}
