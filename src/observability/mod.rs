//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler and auth guard produce:
//!     → logging.rs (structured log events, request ID as a field)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all log lines of a proxy cycle
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use self::metrics::init_metrics;
