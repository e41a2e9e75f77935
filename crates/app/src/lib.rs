//! Wicket demo portal composition root
//!
//! A small portal wired behind the route gate: public landing and sign-in
//! pages, a protected dashboard and API, and a webhook endpoint the gate
//! ignores entirely.

use axum::{body::Bytes, http::StatusCode, Json, Router};
use serde_json::json;

use wicket_gate::{CurrentUser, MaybeUser, Principal, RouteGate, VerifierFactory};

pub mod config;
pub use config::Config;

/// Create the portal router with the gate enforced in front of it
pub fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    let verifier = VerifierFactory::create(&config.gate)?;
    let gate = RouteGate::new(config.gate, verifier)?;

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(home))
        .route("/signin", axum::routing::get(sign_in_page))
        .route("/signup", axum::routing::get(sign_up_page))
        .route("/dashboard", axum::routing::get(dashboard))
        .route("/api/me", axum::routing::get(me))
        .route("/api/webhook", axum::routing::post(webhook))
        .layer(axum::middleware::from_fn_with_state(
            gate,
            wicket_gate::enforce,
        ));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Landing page, personalized when a session is present
async fn home(MaybeUser(user): MaybeUser) -> String {
    match user {
        Some(principal) => format!("Welcome back, {}", principal.subject),
        None => "Welcome to Wicket".to_string(),
    }
}

async fn sign_in_page() -> &'static str {
    "Sign in"
}

async fn sign_up_page() -> &'static str {
    "Sign up"
}

/// Protected page: the gate guarantees a principal here
async fn dashboard(CurrentUser(principal): CurrentUser) -> String {
    format!("Dashboard for {}", principal.subject)
}

/// Protected API endpoint returning the verified identity
async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}

/// Webhook receiver. The gate never touches this route; the payload is
/// authenticated out of band by the sender's signature scheme.
async fn webhook(body: Bytes) -> (StatusCode, Json<serde_json::Value>) {
    tracing::info!(bytes = body.len(), "Webhook payload received");
    (StatusCode::ACCEPTED, Json(json!({ "received": true })))
}
