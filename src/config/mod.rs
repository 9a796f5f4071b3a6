//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! profile defaults → TOML file (optional) → environment → validation → GatewayConfig
//! ```
//!
//! # Design Decisions
//! - Configuration is read once at startup and never mutated afterwards
//! - All fields have sensible defaults per profile
//! - Validation reports every problem in one pass

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    GatewayConfig, JwtConfig, ListenerConfig, LogFormat, ObservabilityConfig, Profile,
    SecurityConfig, TimeoutConfig, TlsConfig, UpstreamConfig, DEV_JWT_SECRET,
};
pub use validation::{validate_config, ValidationError, MAX_EXPIRY_HOURS};
