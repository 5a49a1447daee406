//! Integration tests: every declared route enforces exactly its declared access.

mod common;

use axum::http::StatusCode;
use common::{TestApp, request};
use dormdine_api::routes::{Access, route_table};
use serde_json::json;

fn concrete(path: &str, email: &str) -> String {
    path.replace("{email}", email).replace("{id}", "some-id")
}

#[tokio::test]
async fn guarded_routes_reject_anonymous_callers() {
    let app = TestApp::new();
    for spec in route_table().into_iter().filter(|s| s.access != Access::Public) {
        let uri = concrete(spec.path, "a@x.com");
        let resp = app
            .send(request(spec.method.as_str(), &uri, Some(json!({})), None))
            .await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "{} {uri}",
            spec.method
        );
    }
}

#[tokio::test]
async fn public_routes_never_ask_for_a_session() {
    let app = TestApp::new();
    for spec in route_table().into_iter().filter(|s| s.access == Access::Public) {
        let uri = concrete(spec.path, "a@x.com");
        let resp = app
            .send(request(spec.method.as_str(), &uri, Some(json!({})), None))
            .await;
        assert_ne!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "{} {uri}",
            spec.method
        );
        assert_ne!(
            resp.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{} {uri}",
            spec.method
        );
    }
}

#[tokio::test]
async fn self_match_routes_forbid_other_identities() {
    let app = TestApp::new();
    let token = app.login("a@x.com").await;
    for spec in route_table()
        .into_iter()
        .filter(|s| s.access == Access::SelfMatch)
    {
        let own = concrete(spec.path, "a@x.com");
        let (status, _) = app.call(spec.method.as_str(), &own, None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK, "{own}");

        let other = concrete(spec.path, "b@x.com");
        let (status, _) = app
            .call(spec.method.as_str(), &other, None, Some(&token))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{other}");
    }
}
