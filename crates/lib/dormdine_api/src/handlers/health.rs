//! Liveness endpoint.

/// `GET /`: plain-text liveness check.
pub async fn root() -> &'static str {
    "DormDine server is running"
}
