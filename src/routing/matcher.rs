//! Path prefix matching.
//!
//! # Responsibilities
//! - Decide whether a route prefix covers a request path
//! - Remove a matched prefix from a path (strip-path)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - `Bytes` mode is a plain `starts_with`: `/api` covers `/apikey`
//! - `Segments` mode additionally requires the prefix to end on a `/`
//!   boundary, or to equal the whole path
//! - No regex to guarantee O(len) matching

use crate::config::MatchMode;

/// A route prefix together with the comparison mode it is matched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    prefix: String,
    mode: MatchMode,
}

impl PathPrefix {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    /// The raw prefix string.
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` falls under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.remainder(path).is_some()
    }

    /// The part of `path` after the prefix, or `None` if the prefix does not
    /// cover `path`.
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        match self.mode {
            MatchMode::Bytes => Some(rest),
            MatchMode::Segments => {
                if rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/') {
                    Some(rest)
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix)
    }
}
