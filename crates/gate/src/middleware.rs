//! The route gate middleware

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::classifier::{RouteClass, RouteRule};
use crate::config::GateConfig;
use crate::error::{GateError, VerifyError};
use crate::verifier::{SessionVerifier, VerifierFactory};

/// The assembled gate: compiled routing rules plus the session verifier.
///
/// Cheap to clone. Hand it to [`axum::middleware::from_fn_with_state`]
/// together with [`enforce`]:
///
/// ```ignore
/// let gate = RouteGate::new(config, verifier)?;
/// let app = Router::new()
///     .route("/dashboard", get(dashboard))
///     .layer(middleware::from_fn_with_state(gate, enforce));
/// ```
#[derive(Clone)]
pub struct RouteGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    rule: RouteRule,
    sign_in_url: String,
    verifier: Arc<dyn SessionVerifier>,
}

impl fmt::Debug for RouteGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGate")
            .field("rule", &self.inner.rule)
            .field("sign_in_url", &self.inner.sign_in_url)
            .field("provider", &self.inner.verifier.provider_name())
            .finish()
    }
}

impl RouteGate {
    /// Build the gate, compiling patterns and validating configuration.
    ///
    /// Fails with [`GateError::Config`] so a misconfigured service aborts
    /// at startup instead of gating with broken rules.
    pub fn new(config: GateConfig, verifier: Arc<dyn SessionVerifier>) -> Result<Self, GateError> {
        let sign_in_url = config.sign_in_url.trim().to_string();
        if sign_in_url.is_empty() {
            return Err(GateError::Config(
                "sign-in URL must not be empty".to_string(),
            ));
        }

        let rule = RouteRule::from_config(&config)?;
        let (ignored_patterns, public_patterns) = rule.pattern_counts();
        tracing::info!(
            ignored_patterns,
            public_patterns,
            provider = verifier.provider_name(),
            "Route gate initialized"
        );

        Ok(Self {
            inner: Arc::new(GateInner {
                rule,
                sign_in_url,
                verifier,
            }),
        })
    }

    /// Build a gate from environment configuration, with the verifier
    /// picked by [`VerifierFactory`].
    pub fn from_env() -> Result<Self, GateError> {
        let config = GateConfig::from_env()?;
        let verifier = VerifierFactory::create(&config)?;
        Self::new(config, verifier)
    }

    /// The compiled routing rules.
    pub fn rule(&self) -> &RouteRule {
        &self.inner.rule
    }

    /// The verifier consulted for non-bypassed routes.
    pub fn verifier(&self) -> &dyn SessionVerifier {
        self.inner.verifier.as_ref()
    }

    /// Where unauthenticated page requests are redirected.
    pub fn sign_in_url(&self) -> &str {
        &self.inner.sign_in_url
    }

    fn sign_in_redirect(&self, path: &str) -> Response {
        let location = format!(
            "{}?redirect_url={}",
            self.inner.sign_in_url,
            urlencoding::encode(path)
        );
        Redirect::to(&location).into_response()
    }
}

/// Gate middleware: classify the request path and enforce the decision.
///
/// Bypassed routes are forwarded untouched and the verifier is never
/// consulted. Public routes are forwarded in any case, with a [`crate::Principal`]
/// attached when a session verifies. Protected routes require a verified
/// session; without one, API paths get a JSON 401 and page paths a
/// redirect to the sign-in URL carrying the original path in
/// `redirect_url`.
pub async fn enforce(State(gate): State<RouteGate>, mut request: Request, next: Next) -> Response {
    let raw_path = request.uri().path().to_string();

    let path = match gate.rule().parse_path(&raw_path) {
        Ok(path) => path,
        Err(error) => {
            // Unparseable paths get the same treatment as a protected
            // route without a session
            tracing::warn!(path = %raw_path, error = %error, "Rejecting request with invalid path");
            if gate.rule().is_api_raw(&raw_path) {
                return VerifyError::Unauthenticated.into_response();
            }
            return gate.sign_in_redirect(&raw_path);
        }
    };

    match gate.rule().classify(&path) {
        RouteClass::Bypass => {
            tracing::debug!(path = %path, class = %RouteClass::Bypass, "Route bypasses the gate");
            next.run(request).await
        }
        RouteClass::Public => {
            // A signed-in user stays identified on public routes; a failed
            // verification never blocks them
            match gate.verifier().verify(request.headers()).await {
                Ok(principal) => {
                    tracing::debug!(
                        path = %path,
                        subject = %principal.subject,
                        "Public route with verified session"
                    );
                    request.extensions_mut().insert(principal);
                }
                Err(error) => {
                    tracing::debug!(path = %path, error = %error, "Public route without session");
                }
            }
            next.run(request).await
        }
        RouteClass::Protected => match gate.verifier().verify(request.headers()).await {
            Ok(principal) => {
                tracing::debug!(
                    path = %path,
                    subject = %principal.subject,
                    "Protected route authorized"
                );
                request.extensions_mut().insert(principal);
                next.run(request).await
            }
            Err(error) => {
                tracing::info!(path = %path, error = %error, "Protected route rejected");
                if path.is_api() {
                    error.into_response()
                } else {
                    gate.sign_in_redirect(path.as_str())
                }
            }
        },
    }
}
