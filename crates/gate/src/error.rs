//! Gate and verifier error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors raised while building or applying the route gate.
///
/// `Config` is fatal: it is returned from [`crate::RouteGate::new`] and
/// [`crate::GateConfig::from_env`] so a misconfigured service refuses to
/// start. `InvalidPath` is per-request and recoverable: the middleware
/// catches it and falls back to rejecting the request.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Gate configuration error: {0}")]
    Config(String),

    #[error("Invalid request path: {0}")]
    InvalidPath(String),
}

/// Errors reported by a [`crate::SessionVerifier`].
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("No valid session credentials presented")]
    Unauthenticated,

    #[error("Session has expired")]
    Expired,

    #[error("Session provider error: {0}")]
    Provider(String),
}

impl VerifyError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerifyError::Unauthenticated | VerifyError::Expired => StatusCode::UNAUTHORIZED,
            VerifyError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            VerifyError::Unauthenticated => "UNAUTHENTICATED",
            VerifyError::Expired => "SESSION_EXPIRED",
            VerifyError::Provider(_) => "SESSION_PROVIDER_ERROR",
        }
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log provider failures with full context
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "Session provider error");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
