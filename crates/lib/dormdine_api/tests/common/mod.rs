//! Shared helpers for router integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use dormdine_api::config::ApiConfig;
use dormdine_api::{AppState, router};
use dormdine_core::payments::{ChargeIntent, PaymentError, PaymentGateway, UnconfiguredGateway};
use dormdine_core::store::MemoryStore;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

/// Records every intent it is asked for.
#[derive(Default)]
pub struct FakeGateway {
    pub calls: AtomicUsize,
    pub last_amount: std::sync::Mutex<Option<(i64, String)>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_charge_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ChargeIntent, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_amount.lock().unwrap() = Some((amount_minor, currency.to_string()));
        Ok(ChargeIntent {
            id: "pi_fake".into(),
            client_secret: format!("pi_fake_secret_{amount_minor}"),
        })
    }
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: None,
        session_secret: SECRET.into(),
        stripe_secret_key: None,
        allowed_origins: vec!["http://localhost:5173".into()],
        payment_currency: "usd".into(),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub gateway: Arc<FakeGateway>,
}

impl TestApp {
    pub fn new() -> Self {
        let gateway = Arc::new(FakeGateway::default());
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            gateway.clone(),
            test_config(),
        );
        Self {
            router: router(state.clone()),
            state,
            gateway,
        }
    }

    pub fn without_payments() -> Self {
        let gateway = Arc::new(FakeGateway::default());
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(UnconfiguredGateway),
            test_config(),
        );
        Self {
            router: router(state.clone()),
            state,
            gateway,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("request")
    }

    /// Sends a request and parses the JSON body.
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let resp = self.send(request(method, uri, body, token)).await;
        let status = resp.status();
        (status, json_body(resp).await)
    }

    /// Issues a session for `email` and returns the raw token.
    pub async fn login(&self, email: &str) -> String {
        let resp = self
            .send(request(
                "POST",
                "/api/v1/jwt",
                Some(serde_json::json!({ "email": email })),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        session_token(&resp).expect("session cookie")
    }
}

pub fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("token={token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
}

/// The `Set-Cookie` header for the session cookie, if any.
pub fn session_set_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("token="))
        .map(str::to_string)
}

/// Token value from the session `Set-Cookie` header.
pub fn session_token(resp: &Response<Body>) -> Option<String> {
    let cookie = session_set_cookie(resp)?;
    let value = cookie.strip_prefix("token=")?.split(';').next()?;
    (!value.is_empty()).then(|| value.to_string())
}
