//! Request path normalization

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// How raw request paths are normalized before classification.
///
/// The defaults make `/signin/` and `/signin?ref=nav` classify like
/// `/signin` while keeping matching case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizePolicy {
    /// Trim trailing slashes so `/signin/` classifies like `/signin`.
    /// The root path `/` is never trimmed.
    pub trim_trailing_slash: bool,
    /// Strip the query string before matching.
    pub strip_query: bool,
    /// Lowercase paths (and configured patterns) before matching.
    pub case_insensitive: bool,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self {
            trim_trailing_slash: true,
            strip_query: true,
            case_insensitive: false,
        }
    }
}

/// A request path after normalization, tagged with whether it falls under
/// one of the configured API prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    path: String,
    is_api: bool,
}

impl RequestPath {
    /// Normalize `raw` under `policy` and tag it against `api_prefixes`.
    ///
    /// Fails with [`GateError::InvalidPath`] when the path is empty, does
    /// not start with `/`, or contains ASCII control characters.
    pub(crate) fn parse(
        raw: &str,
        policy: &NormalizePolicy,
        api_prefixes: &[String],
    ) -> Result<Self, GateError> {
        if raw.is_empty() {
            return Err(GateError::InvalidPath("empty path".to_string()));
        }
        if !raw.starts_with('/') {
            return Err(GateError::InvalidPath(format!(
                "path does not start with '/': {raw:?}"
            )));
        }

        let mut path = raw;
        if policy.strip_query {
            if let Some(idx) = path.find('?') {
                path = &path[..idx];
            }
        }
        if path.chars().any(|c| c.is_ascii_control()) {
            return Err(GateError::InvalidPath(format!(
                "path contains control characters: {raw:?}"
            )));
        }

        let mut path = path.to_string();
        if policy.trim_trailing_slash {
            while path.len() > 1 && path.ends_with('/') {
                path.pop();
            }
        }
        if policy.case_insensitive {
            path = path.to_ascii_lowercase();
        }

        let is_api = api_prefixes
            .iter()
            .any(|prefix| has_prefix_at_boundary(&path, prefix));

        Ok(Self { path, is_api })
    }

    /// The normalized path, always starting with `/`.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Whether the path sits under a configured API prefix.
    pub fn is_api(&self) -> bool {
        self.is_api
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// True when `path` equals `prefix` or continues it at a segment boundary.
/// `/api` covers `/api` and `/api/users` but not `/apix`.
pub(crate) fn has_prefix_at_boundary(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
