//! Mock session verifier
//!
//! In-memory verifier for tests and local development. A token table maps
//! bearer tokens to principals, and every verification attempt is recorded
//! so tests can assert when the gate did (or did not) consult the verifier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::VerifyError;
use crate::verifier::{bearer_token, Principal, SessionVerifier};

/// A single verification attempt observed by the mock
#[derive(Debug, Clone)]
pub struct VerifyAttempt {
    /// The bearer token presented, when a well-formed one was
    pub token: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

/// Mock session verifier for testing and local development
#[derive(Debug, Clone, Default)]
pub struct MockVerifier {
    sessions: Arc<Mutex<HashMap<String, Principal>>>,
    attempts: Arc<Mutex<Vec<VerifyAttempt>>>,
}

impl MockVerifier {
    /// Create a mock verifier with no registered sessions
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token resolving to a fresh principal for `subject`
    pub fn allow(self, token: impl Into<String>, subject: impl Into<String>) -> Self {
        let principal =
            Principal::new(subject).with_session_id(format!("mock-{}", Uuid::new_v4()));
        self.insert(token.into(), principal);
        self
    }

    /// Register a token resolving to `principal`
    pub fn insert(&self, token: String, principal: Principal) {
        self.sessions.lock().unwrap().insert(token, principal);
    }

    /// Remove a single registered token
    pub fn revoke(&self, token: &str) {
        self.sessions.lock().unwrap().remove(token);
    }

    /// Drop every registered session so all verifications fail
    pub fn deny_all(&self) {
        self.sessions.lock().unwrap().clear();
    }

    /// Get all verification attempts seen so far
    pub fn attempts(&self) -> Vec<VerifyAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    /// Get count of verification attempts seen so far
    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Clear recorded attempts; registered sessions stay
    pub fn clear_attempts(&self) {
        self.attempts.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl SessionVerifier for MockVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Result<Principal, VerifyError> {
        let token = bearer_token(headers).ok();
        self.attempts.lock().unwrap().push(VerifyAttempt {
            token: token.clone(),
            attempted_at: Utc::now(),
        });

        let token = token.ok_or(VerifyError::Unauthenticated)?;
        let principal = self
            .sessions
            .lock()
            .unwrap()
            .get(&token)
            .cloned()
            .ok_or(VerifyError::Unauthenticated)?;

        if let Some(expires_at) = principal.expires_at {
            if expires_at <= Utc::now() {
                return Err(VerifyError::Expired);
            }
        }

        tracing::debug!(subject = %principal.subject, "Mock verifier accepted session");
        Ok(principal)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
