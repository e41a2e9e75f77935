//! Axum extractors for the gate's request identity
//!
//! The gate attaches a [`Principal`] to the request extensions when a
//! session verifies. These extractors read it back out in handlers and
//! need no state bounds.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::VerifyError;
use crate::verifier::Principal;

/// Extractor for handlers that require a verified session.
///
/// Rejects with 401 when no principal is attached. On protected routes the
/// gate guarantees one; on public or bypassed routes this extractor is the
/// handler's own guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = VerifyError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(VerifyError::Unauthenticated)
    }
}

/// Extractor for handlers that serve both signed-in and anonymous users.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Principal>().cloned()))
    }
}
