//! Route-gating middleware for axum services
//!
//! Classifies every request path as bypassed, public, or protected and
//! enforces the decision in front of the router. Session verification is
//! delegated to a pluggable [`SessionVerifier`]; the gate only decides
//! whether to ask and what to do with the answer.

mod classifier;
mod config;
mod error;
mod extractors;
mod middleware;
mod mock;
mod path;
mod pattern;
mod verifier;

pub use classifier::{RouteClass, RouteRule};
pub use config::GateConfig;
pub use error::{GateError, VerifyError};
pub use extractors::{CurrentUser, MaybeUser};
pub use middleware::{enforce, RouteGate};
pub use mock::{MockVerifier, VerifyAttempt};
pub use path::{NormalizePolicy, RequestPath};
pub use verifier::{bearer_token, DenyAllVerifier, Principal, SessionVerifier, VerifierFactory};
