//! Session issuance, verification and revocation.
//!
//! Shared by `dormdine_api`; nothing here touches HTTP.

pub mod jwt;
pub mod revocation;

use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
