//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → proxy.rs (method check, route lookup, upstream exchange)
//!     → request.rs (hop-by-hop filtering, inbound origin)
//!     → response.rs (header filtering, Location rewrite, Set-Cookie relay)
//!     → Send to client
//! ```

pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use error::GatewayError;
pub use proxy::proxy_handler;
pub use request::{filter_request_headers, InboundOrigin, X_REQUEST_ID};
pub use response::{filter_response_headers, rewrite_location};
pub use server::{health_check, AppState, HttpServer};
