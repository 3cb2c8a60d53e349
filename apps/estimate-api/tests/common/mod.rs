use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use inkquote_api::{build_app_router, AppState, CatalogStore, ServerConfig};

/// The rule tables shipped with the repository.
pub fn bundled_rules() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../rules")
}

/// A `ServerConfig` pointing at `rules_dir`, default tax.
pub fn test_config(rules_dir: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.rules.dir = rules_dir.to_path_buf();
    config
}

/// Builds the production router over `rules_dir`, returning the store so
/// tests can inspect snapshots.
pub fn build_test_app(rules_dir: &Path) -> (Router, Arc<CatalogStore>) {
    let config = test_config(rules_dir);
    let store = Arc::new(CatalogStore::open(rules_dir).unwrap());
    let app = build_app_router(AppState::new(Arc::clone(&store), &config), &config);
    (app, store)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the standard BLOCKED envelope for unreadable input.
pub async fn assert_server_error_envelope(response: Response<Body>) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "BLOCKED");
    assert_eq!(json["clarification_notes"][0], "Server error — check input format");
}
