//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce one deadline for the whole exchange)
//!     → On failure: classify as timeout or unavailable
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a non-idempotent request must never be sent twice

pub mod timeouts;

pub use timeouts::{classify, with_deadline};
