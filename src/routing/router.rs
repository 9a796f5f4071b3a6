//! Route lookup and upstream URL construction.
//!
//! # Responsibilities
//! - Store the proxy targets, longest prefix first
//! - Look up the target for a request path
//! - Join the unmatched remainder onto the target's base URL
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (three targets in practice)
//! - Exactly one catch-all target, so every path resolves
//! - The table is built from the configured upstreams only
//! - Request path and query bytes are copied, never re-encoded

use thiserror::Error;
use url::{Position, Url};

use crate::config::UpstreamConfig;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("target {name}: invalid base URL {value:?}: {source}")]
    InvalidBase {
        name: String,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("target {name}: base URL must be http:// with a host, got {value:?}")]
    UnsupportedScheme { name: String, value: String },

    #[error("route table has no catch-all target")]
    MissingCatchAll,

    #[error("prefix {0:?} is claimed by more than one target")]
    DuplicatePrefix(String),
}

/// One upstream service and the path prefix it serves.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    name: String,
    base: Url,
    /// `scheme://host[:port]` of the base URL.
    origin: String,
    /// Base path without a trailing slash.
    base_path: String,
    matcher: PathPrefixMatcher,
}

impl ProxyTarget {
    pub fn new(name: &str, prefix: &str, base: &str) -> Result<Self, RouteError> {
        let url = Url::parse(base).map_err(|source| RouteError::InvalidBase {
            name: name.to_string(),
            value: base.to_string(),
            source,
        })?;
        if url.scheme() != "http" || url.host_str().map_or(true, str::is_empty) {
            return Err(RouteError::UnsupportedScheme {
                name: name.to_string(),
                value: base.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            origin: url[..Position::BeforePath].to_string(),
            base_path: url.path().trim_end_matches('/').to_string(),
            base: url,
            matcher: PathPrefixMatcher::new(prefix),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Upstream URL for a path remainder and raw query string.
    fn upstream_url(&self, remainder: &str, query: Option<&str>) -> String {
        let mut url = String::with_capacity(
            self.origin.len() + self.base_path.len() + self.prefix().len() + remainder.len() + 2,
        );
        url.push_str(&self.origin);
        url.push_str(&self.base_path);
        if !self.matcher.is_catch_all() {
            url.push_str(self.matcher.prefix());
        }
        if !remainder.is_empty() || self.matcher.is_catch_all() {
            url.push('/');
            url.push_str(remainder);
        }
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

/// A resolved route: the target and the full upstream URL.
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'a> {
    pub target: &'a ProxyTarget,
    /// Absolute upstream URL; path and query are the inbound bytes.
    pub url: String,
}

/// Ordered, immutable set of proxy targets.
#[derive(Debug, Clone)]
pub struct RouteTable {
    targets: Vec<ProxyTarget>,
    catch_all: usize,
}

impl RouteTable {
    /// Build a table, ordering longer prefixes first.
    pub fn new(mut targets: Vec<ProxyTarget>) -> Result<Self, RouteError> {
        targets.sort_by(|a, b| b.prefix().len().cmp(&a.prefix().len()));

        for (i, target) in targets.iter().enumerate() {
            if targets[..i].iter().any(|seen| seen.prefix() == target.prefix()) {
                return Err(RouteError::DuplicatePrefix(target.prefix().to_string()));
            }
        }
        let catch_all = targets
            .iter()
            .position(|t| t.matcher.is_catch_all())
            .ok_or(RouteError::MissingCatchAll)?;

        Ok(Self { targets, catch_all })
    }

    /// The gateway's table: auth, tasks, and the frontend catch-all.
    pub fn from_config(upstreams: &UpstreamConfig) -> Result<Self, RouteError> {
        Self::new(vec![
            ProxyTarget::new("auth", "/api/auth", &upstreams.auth_url)?,
            ProxyTarget::new("tasks", "/api/tasks", &upstreams.task_url)?,
            ProxyTarget::new("frontend", "/", upstreams.frontend_url())?,
        ])
    }

    pub fn targets(&self) -> &[ProxyTarget] {
        &self.targets
    }

    /// Resolve a request path (and raw query) to its upstream.
    ///
    /// Every table holds a catch-all, so every path resolves.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> ResolvedRoute<'_> {
        let (target, remainder) = self
            .targets
            .iter()
            .find_map(|target| Some((target, target.matcher.strip(path)?)))
            .unwrap_or_else(|| {
                let target = &self.targets[self.catch_all];
                (target, path.trim_start_matches('/'))
            });

        ResolvedRoute {
            target,
            url: target.upstream_url(remainder, query),
        }
    }
}
