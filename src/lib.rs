//! API gateway and token contract for the to-do services.
//!
//! The gateway is the single public entry point: it routes `/api/auth*` to the
//! auth service, `/api/tasks*` to the task service and everything else to the
//! frontend. The `auth` module is the JWT contract every service links against.

// Core subsystems
pub mod auth;
pub mod config;
pub mod http;
pub mod net;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
