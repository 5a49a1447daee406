//! # dormdine_api
//!
//! HTTP API library for DormDine.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use dormdine_core::auth::revocation::RevocationList;
use dormdine_core::payments::PaymentGateway;
use dormdine_core::store::DocumentStore;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::{Span, warn};

use crate::config::ApiConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document store shared by every request.
    pub store: Arc<dyn DocumentStore>,
    /// Payment provider.
    pub payments: Arc<dyn PaymentGateway>,
    /// Sessions revoked before their expiry.
    pub revocations: Arc<RevocationList>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        payments: Arc<dyn PaymentGateway>,
        config: ApiConfig,
    ) -> Self {
        Self {
            store,
            payments,
            revocations: Arc::new(RevocationList::new()),
            config,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

/// Run embedded database migrations.
///
/// Delegates to `dormdine_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    dormdine_core::migrate::migrate(pool).await
}

/// Credentialed CORS for the configured origins.
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                status = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
            )
        })
        .on_response(
            |response: &axum::http::Response<_>, latency: std::time::Duration, span: &Span| {
                span.record("status", response.status().as_u16());
                span.record("latency_ms", latency.as_millis() as u64);
                DefaultOnResponse::default().on_response(response, latency, span);
            },
        );

    routes::routes(&state)
        .layer(cors_layer(&state.config))
        .layer(trace)
        .with_state(state)
}
