//! Route pattern compilation
//!
//! Patterns are glob-like: `*` matches within one path segment, `**`
//! matches across segments, everything else is literal. Each pattern
//! compiles to an anchored regex once, at gate construction time.

use regex::Regex;

use crate::error::GateError;

/// Regex metacharacters that must be escaped in pattern literals.
const REGEX_META: &str = r".+()[]{}|^$?\";

lazy_static::lazy_static! {
    /// Path whose final segment carries a file extension, e.g. `/logo.png`
    /// or `/assets/site.css`. Requires at least one character between the
    /// leading slash and the dot, so `/.well-known` is not an asset path.
    static ref ASSET_PATH_REGEX: Regex = Regex::new(r"^/.+\.\w+$").unwrap();
}

/// Default bypass rule: static asset paths and underscore-prefixed
/// framework-internal paths (`/_next/...`, `/_vercel/...`) skip the gate.
/// API-prefixed paths are exempted by the caller before this is consulted.
pub(crate) fn is_default_bypass(path: &str) -> bool {
    ASSET_PATH_REGEX.is_match(path) || path.starts_with("/_")
}

/// A single compiled route pattern, keeping its source for trace output.
#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

/// An ordered set of compiled route patterns.
#[derive(Debug, Clone, Default)]
pub(crate) struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile every pattern in `sources`, failing on the first invalid one.
    pub(crate) fn compile(sources: &[String], case_insensitive: bool) -> Result<Self, GateError> {
        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            let source = if case_insensitive {
                source.to_ascii_lowercase()
            } else {
                source.clone()
            };
            let anchored = glob_to_regex(&source)?;
            let regex = Regex::new(&anchored).map_err(|e| {
                GateError::Config(format!("route pattern {source:?} failed to compile: {e}"))
            })?;
            patterns.push(CompiledPattern { source, regex });
        }
        Ok(Self { patterns })
    }

    /// Returns the source of the first pattern matching `path`, if any.
    pub(crate) fn matches(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| pattern.regex.is_match(path))
            .map(|pattern| pattern.source.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Translate a glob-like route pattern into an anchored regex source.
fn glob_to_regex(pattern: &str) -> Result<String, GateError> {
    if pattern.is_empty() {
        return Err(GateError::Config(
            "route pattern must not be empty".to_string(),
        ));
    }
    if !pattern.starts_with('/') {
        return Err(GateError::Config(format!(
            "route pattern must start with '/': {pattern:?}"
        )));
    }

    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    regex.push_str(".*");
                } else {
                    regex.push_str("[^/]*");
                }
            }
            c if REGEX_META.contains(c) => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex.push('$');
    Ok(regex)
}
