//! Session verification seam
//!
//! The gate never inspects credentials itself. Whatever identity provider
//! a deployment uses sits behind [`SessionVerifier`]; the gate only calls
//! `verify` and attaches the resulting [`Principal`] to the request.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::GateConfig;
use crate::error::{GateError, VerifyError};
use crate::mock::MockVerifier;

/// The identity a verified session resolves to.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    /// Stable subject identifier from the identity provider.
    pub subject: String,
    /// Provider-side session identifier, when one exists.
    pub session_id: Option<String>,
    /// Session expiry, when the provider reports one.
    pub expires_at: Option<DateTime<Utc>>,
    /// Provider-specific claims, passed through untouched.
    pub claims: Value,
}

impl Principal {
    /// Create a principal with just a subject
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            session_id: None,
            expires_at: None,
            claims: Value::Null,
        }
    }

    /// Attach a provider session identifier
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach a session expiry
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Attach raw provider claims
    pub fn with_claims(mut self, claims: Value) -> Self {
        self.claims = claims;
        self
    }
}

/// Session verifier trait for different identity providers
#[async_trait::async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify the session credentials carried by `headers`.
    async fn verify(&self, headers: &HeaderMap) -> Result<Principal, VerifyError>;

    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;
}

/// Extract a bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<String, VerifyError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(VerifyError::Unauthenticated)?;
    let header_str = header.to_str().map_err(|_| VerifyError::Unauthenticated)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(VerifyError::Unauthenticated),
    }
}

/// Verifier that rejects every request. The safe choice when no identity
/// provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllVerifier;

#[async_trait::async_trait]
impl SessionVerifier for DenyAllVerifier {
    async fn verify(&self, _headers: &HeaderMap) -> Result<Principal, VerifyError> {
        Err(VerifyError::Unauthenticated)
    }

    fn provider_name(&self) -> &'static str {
        "deny"
    }
}

/// Session verifier factory
pub struct VerifierFactory;

impl VerifierFactory {
    /// Create a built-in verifier based on configuration.
    ///
    /// Real identity providers are wired by handing your own
    /// [`SessionVerifier`] to [`crate::RouteGate::new`]; the factory only
    /// covers the bundled implementations.
    pub fn create(config: &GateConfig) -> Result<Arc<dyn SessionVerifier>, GateError> {
        match config.session_provider.as_str() {
            "mock" => {
                tracing::info!("Creating mock session verifier");
                let verifier = MockVerifier::new();
                for (token, subject) in &config.mock_sessions {
                    verifier.insert(token.clone(), Principal::new(subject.clone()));
                }
                Ok(Arc::new(verifier))
            }
            "deny" => {
                tracing::info!("Creating deny-all session verifier");
                Ok(Arc::new(DenyAllVerifier))
            }
            provider => Err(GateError::Config(format!(
                "Unknown session provider: {}. Supported providers: mock, deny",
                provider
            ))),
        }
    }
}
