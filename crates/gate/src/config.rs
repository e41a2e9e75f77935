//! Gate configuration
//!
//! Configuration is plain data: route lists and switches. It is validated
//! when the gate is built, not here, so callers can assemble it freely
//! from code, environment, or both.

use std::env;

use crate::error::GateError;
use crate::path::NormalizePolicy;

/// Configuration for a [`crate::RouteGate`].
///
/// Route patterns are glob-like and must start with `/`. An empty
/// `public_routes` list is valid and means every non-bypassed route
/// requires a session.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Routes reachable without a session. A signed-in user is still
    /// identified on these when credentials are presented.
    pub public_routes: Vec<String>,
    /// Routes the gate skips entirely. Takes precedence over
    /// `public_routes`.
    pub ignored_routes: Vec<String>,
    /// Path prefixes treated as API surface: rejections are JSON instead
    /// of a redirect, and the default bypass rule does not apply.
    pub api_prefixes: Vec<String>,
    /// Where unauthenticated page requests are redirected.
    pub sign_in_url: String,
    /// Apply the built-in bypass rule for asset-like and
    /// underscore-prefixed paths.
    pub default_bypass: bool,
    /// Path normalization switches.
    pub normalize: NormalizePolicy,
    /// Which built-in session verifier [`crate::VerifierFactory`] creates.
    pub session_provider: String,
    /// Token/subject pairs seeded into the mock verifier.
    pub mock_sessions: Vec<(String, String)>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_routes: Vec::new(),
            ignored_routes: Vec::new(),
            api_prefixes: vec!["/api".to_string(), "/trpc".to_string()],
            sign_in_url: "/signin".to_string(),
            default_bypass: true,
            normalize: NormalizePolicy::default(),
            session_provider: "deny".to_string(),
            mock_sessions: Vec::new(),
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables, starting from the
    /// defaults. See [`GateConfig::apply_env`] for the variable names.
    #[mutants::skip] // Delegates to apply_env() which is tested directly
    pub fn from_env() -> Result<Self, GateError> {
        Self::default().apply_env()
    }

    /// Overlay `WICKET_*` environment variables onto this configuration.
    /// Variables that are unset leave the current value in place; set but
    /// unparseable values fail with [`GateError::Config`].
    ///
    /// - `WICKET_PUBLIC_ROUTES`, `WICKET_IGNORED_ROUTES`,
    ///   `WICKET_API_PREFIXES`: comma-separated path lists
    /// - `WICKET_SIGN_IN_URL`: redirect target for unauthenticated pages
    /// - `WICKET_DEFAULT_BYPASS`, `WICKET_TRIM_TRAILING_SLASH`,
    ///   `WICKET_STRIP_QUERY`, `WICKET_CASE_INSENSITIVE`: booleans
    /// - `WICKET_SESSION_PROVIDER`: built-in verifier name
    /// - `WICKET_MOCK_SESSIONS`: comma-separated `token=subject` pairs
    pub fn apply_env(mut self) -> Result<Self, GateError> {
        dotenvy::dotenv().ok();

        if let Ok(value) = env::var("WICKET_PUBLIC_ROUTES") {
            self.public_routes = parse_route_list("WICKET_PUBLIC_ROUTES", &value)?;
        }
        if let Ok(value) = env::var("WICKET_IGNORED_ROUTES") {
            self.ignored_routes = parse_route_list("WICKET_IGNORED_ROUTES", &value)?;
        }
        if let Ok(value) = env::var("WICKET_API_PREFIXES") {
            self.api_prefixes = parse_route_list("WICKET_API_PREFIXES", &value)?;
        }
        if let Ok(value) = env::var("WICKET_SIGN_IN_URL") {
            if value.trim().is_empty() {
                return Err(GateError::Config(
                    "WICKET_SIGN_IN_URL must not be empty".to_string(),
                ));
            }
            self.sign_in_url = value.trim().to_string();
        }
        if let Ok(value) = env::var("WICKET_DEFAULT_BYPASS") {
            self.default_bypass = parse_bool("WICKET_DEFAULT_BYPASS", &value)?;
        }
        if let Ok(value) = env::var("WICKET_TRIM_TRAILING_SLASH") {
            self.normalize.trim_trailing_slash = parse_bool("WICKET_TRIM_TRAILING_SLASH", &value)?;
        }
        if let Ok(value) = env::var("WICKET_STRIP_QUERY") {
            self.normalize.strip_query = parse_bool("WICKET_STRIP_QUERY", &value)?;
        }
        if let Ok(value) = env::var("WICKET_CASE_INSENSITIVE") {
            self.normalize.case_insensitive = parse_bool("WICKET_CASE_INSENSITIVE", &value)?;
        }
        if let Ok(value) = env::var("WICKET_SESSION_PROVIDER") {
            self.session_provider = value.trim().to_lowercase();
        }
        if let Ok(value) = env::var("WICKET_MOCK_SESSIONS") {
            self.mock_sessions = parse_mock_sessions(&value)?;
        }

        Ok(self)
    }

    pub fn with_public_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignored_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_api_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sign_in_url(mut self, url: impl Into<String>) -> Self {
        self.sign_in_url = url.into();
        self
    }

    pub fn with_default_bypass(mut self, enabled: bool) -> Self {
        self.default_bypass = enabled;
        self
    }

    pub fn with_normalize(mut self, policy: NormalizePolicy) -> Self {
        self.normalize = policy;
        self
    }

    pub fn with_session_provider(mut self, provider: impl Into<String>) -> Self {
        self.session_provider = provider.into();
        self
    }

    pub fn with_mock_session(
        mut self,
        token: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        self.mock_sessions.push((token.into(), subject.into()));
        self
    }
}

fn parse_route_list(name: &str, value: &str) -> Result<Vec<String>, GateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        // Explicitly empty clears the list
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                Err(GateError::Config(format!(
                    "{name} contains an empty entry"
                )))
            } else {
                Ok(entry.to_string())
            }
        })
        .collect()
}

fn parse_bool(name: &str, value: &str) -> Result<bool, GateError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(GateError::Config(format!(
            "{name} must be a boolean, got {value:?}"
        ))),
    }
}

fn parse_mock_sessions(value: &str) -> Result<Vec<(String, String)>, GateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match entry.split_once('=') {
                Some((token, subject)) if !token.is_empty() && !subject.is_empty() => {
                    Ok((token.to_string(), subject.to_string()))
                }
                _ => Err(GateError::Config(format!(
                    "WICKET_MOCK_SESSIONS entries must be token=subject, got {entry:?}"
                ))),
            }
        })
        .collect()
}
