//! Route classification core

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::error::GateError;
use crate::path::{has_prefix_at_boundary, NormalizePolicy, RequestPath};
use crate::pattern::{is_default_bypass, PatternSet};

/// The gate's decision for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// The gate does not touch the request: no verification, no session
    /// loading, nothing attached.
    Bypass,
    /// Reachable without a session; a presented session is still honored.
    Public,
    /// Requires a verified session.
    Protected,
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RouteClass::Bypass => "bypass",
            RouteClass::Public => "public",
            RouteClass::Protected => "protected",
        };
        f.write_str(s)
    }
}

/// Compiled, immutable routing rules.
///
/// Built once from a [`GateConfig`] at startup. Classification itself
/// never fails; only normalization of a raw path can.
#[derive(Debug, Clone)]
pub struct RouteRule {
    ignored: PatternSet,
    public: PatternSet,
    api_prefixes: Vec<String>,
    default_bypass: bool,
    normalize: NormalizePolicy,
}

impl RouteRule {
    /// Compile the rule set. Invalid patterns or API prefixes fail with
    /// [`GateError::Config`].
    pub fn from_config(config: &GateConfig) -> Result<Self, GateError> {
        let case_insensitive = config.normalize.case_insensitive;
        let ignored = PatternSet::compile(&config.ignored_routes, case_insensitive)?;
        let public = PatternSet::compile(&config.public_routes, case_insensitive)?;

        let mut api_prefixes = Vec::with_capacity(config.api_prefixes.len());
        for prefix in &config.api_prefixes {
            if !prefix.starts_with('/') || prefix.len() < 2 {
                return Err(GateError::Config(format!(
                    "API prefix must be a non-root path starting with '/': {prefix:?}"
                )));
            }
            if prefix.ends_with('/') {
                return Err(GateError::Config(format!(
                    "API prefix must not end with '/': {prefix:?}"
                )));
            }
            let prefix = if case_insensitive {
                prefix.to_ascii_lowercase()
            } else {
                prefix.clone()
            };
            api_prefixes.push(prefix);
        }

        Ok(Self {
            ignored,
            public,
            api_prefixes,
            default_bypass: config.default_bypass,
            normalize: config.normalize.clone(),
        })
    }

    /// Normalize a raw request path under this rule's policy.
    pub fn parse_path(&self, raw: &str) -> Result<RequestPath, GateError> {
        RequestPath::parse(raw, &self.normalize, &self.api_prefixes)
    }

    /// Classify a normalized path.
    ///
    /// Checked in order: ignored patterns, the default bypass rule (API
    /// paths exempt), public patterns. Anything unmatched is protected.
    pub fn classify(&self, path: &RequestPath) -> RouteClass {
        if let Some(pattern) = self.ignored.matches(path.as_str()) {
            tracing::trace!(path = %path, pattern, "route matched ignored pattern");
            return RouteClass::Bypass;
        }
        if self.default_bypass && !path.is_api() && is_default_bypass(path.as_str()) {
            tracing::trace!(path = %path, "route matched default bypass rule");
            return RouteClass::Bypass;
        }
        if let Some(pattern) = self.public.matches(path.as_str()) {
            tracing::trace!(path = %path, pattern, "route matched public pattern");
            return RouteClass::Public;
        }
        RouteClass::Protected
    }

    /// Normalize and classify in one step.
    pub fn classify_raw(&self, raw: &str) -> Result<RouteClass, GateError> {
        Ok(self.classify(&self.parse_path(raw)?))
    }

    /// Best-effort API check on a raw, possibly malformed path.
    pub(crate) fn is_api_raw(&self, raw: &str) -> bool {
        self.api_prefixes
            .iter()
            .any(|prefix| has_prefix_at_boundary(raw, prefix))
    }

    /// (ignored, public) pattern counts, for startup logging.
    pub(crate) fn pattern_counts(&self) -> (usize, usize) {
        (self.ignored.len(), self.public.len())
    }
}
