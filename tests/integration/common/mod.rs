//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests:
//! - Portal gate configuration matching the demo app
//! - Router construction with observable mock verifiers
//! - Request building and response body helpers

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    routing::{get, post},
    Router,
};
use tower::ServiceExt;

use wicket_app::Config;
use wicket_gate::{enforce, GateConfig, MockVerifier, RouteGate};

/// The portal rule set most tests run against: landing and auth pages
/// public, the webhook ignored, everything else protected.
pub fn portal_config() -> GateConfig {
    GateConfig::new()
        .with_public_routes(["/", "/signin", "/signup"])
        .with_ignored_routes(["/api/webhook"])
}

/// Build the full demo app with a mock session for `tok_alice`.
pub fn demo_app() -> Router {
    demo_app_with_gate(
        portal_config()
            .with_session_provider("mock")
            .with_mock_session("tok_alice", "alice"),
    )
}

/// Build the full demo app around an arbitrary gate configuration.
pub fn demo_app_with_gate(gate: GateConfig) -> Router {
    let config = Config {
        gate,
        rust_log: "wicket=debug".to_string(),
        port: 0,
    };
    wicket_app::create_app(config).expect("demo app should build")
}

/// Build a bare gated router around `verifier`, keeping the handle so
/// tests can observe verification attempts.
pub fn gated_router(config: GateConfig, verifier: MockVerifier) -> Router {
    let gate = RouteGate::new(config, Arc::new(verifier)).expect("gate should build");
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/signin", get(|| async { "signin" }))
        .route("/dashboard", get(|| async { "dashboard" }))
        .route("/api/me", get(|| async { "me" }))
        .route("/api/webhook", post(|| async { "hooked" }))
        .layer(axum::middleware::from_fn_with_state(gate, enforce))
}

/// Fire a single request at a clone of `router`.
pub async fn send(router: &Router, method: &str, path: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).expect("request should build");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond")
}

/// Read a response body to a string.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("body should be JSON")
}
