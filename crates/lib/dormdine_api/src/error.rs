//! Application error types.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dormdine_core::auth::AuthError;
use dormdine_core::payments::PaymentError;
use dormdine_core::resources::ResourceError;
use dormdine_core::store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Message sent with every 401.
pub const UNAUTHORIZED_MESSAGE: &str = "UNAUTHORIZED ACCESS";
/// Message sent with every 403.
pub const FORBIDDEN_MESSAGE: &str = "FORBIDDEN ACCESS";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, invalid, expired or revoked session. The reason is logged only.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Payments unavailable: {0}")]
    PaymentUnavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(reason) => {
                tracing::debug!(%reason, "request rejected");
                (StatusCode::UNAUTHORIZED, "unauthorized", UNAUTHORIZED_MESSAGE)
            }
            AppError::Forbidden(reason) => {
                tracing::debug!(%reason, "request forbidden");
                (StatusCode::FORBIDDEN, "forbidden", FORBIDDEN_MESSAGE)
            }
            AppError::PaymentFailed(m) => (StatusCode::BAD_GATEWAY, "payment_failed", m.as_str()),
            AppError::PaymentUnavailable(m) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "payment_unavailable",
                m.as_str(),
            ),
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<ResourceError> for AppError {
    fn from(e: ResourceError) -> Self {
        match e {
            ResourceError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            ResourceError::Validation(msg) => AppError::Validation(msg),
            ResourceError::Store(e) => AppError::from(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::TokenError(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::NotConfigured => AppError::PaymentUnavailable(e.to_string()),
            PaymentError::InvalidAmount(msg) => AppError::Validation(msg),
            PaymentError::Http(_) | PaymentError::Rejected { .. } => {
                error!(error = %e, "payment provider call failed");
                AppError::PaymentFailed("Could not create payment intent".into())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}
