//! Session domain models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names a client may not supply: the ones the issuer sets, plus the
/// registered claims the verifier would validate.
pub const RESERVED_CLAIMS: [&str; 8] = ["email", "jti", "iat", "exp", "aud", "nbf", "iss", "sub"];

/// JWT claims embedded in session tokens.
///
/// Anything the client sent alongside `email` is carried in `extra` and
/// round-trips through the token untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity the session was issued for.
    pub email: String,
    /// Token id, the key used for revocation.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
