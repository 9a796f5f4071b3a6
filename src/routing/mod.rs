//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (route lookup, longest prefix first)
//!     → matcher.rs (segment-aware prefix strip)
//!     → Return: target + upstream URL
//!
//! Route Compilation (at startup):
//!     UpstreamConfig
//!     → ProxyTarget per upstream
//!     → Sort by prefix length, require a catch-all
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, PathPrefixMatcher};
pub use router::{ProxyTarget, ResolvedRoute, RouteError, RouteTable};
