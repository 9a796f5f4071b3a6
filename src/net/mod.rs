//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake via axum-server + rustls)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Plain TCP uses `axum::serve`; TLS goes through `axum-server`
//! - TLS is optional and handled transparently

pub mod tls;

pub use tls::load_tls_config;
