//! Route matching logic.
//!
//! # Responsibilities
//! - Match a request path against a route prefix
//! - Return the part of the path left after the prefix
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Matching is segment-aware: `/api/auth` never matches `/api/authx`
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against a route condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Remainder of `path` after the matched portion, without a leading `/`.
    ///
    /// Returns `None` if the path does not match.
    fn strip<'a>(&self, path: &'a str) -> Option<&'a str>;

    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }
}

/// Matches a path prefix on segment boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    ///
    /// Trailing slashes are dropped, so `/api/tasks/` behaves like `/api/tasks`.
    /// An empty or `/` prefix matches every path.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_catch_all(&self) -> bool {
        self.prefix == "/"
    }
}

impl Matcher for PathPrefixMatcher {
    fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.is_catch_all() {
            return Some(path.strip_prefix('/').unwrap_or(path));
        }

        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }
}
