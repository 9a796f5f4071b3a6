//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::SigningAlgorithm;

/// Signing secret used when nothing else is configured.
///
/// Accepted in development and testing; rejected by validation in production.
pub const DEV_JWT_SECRET: &str = "gateway-dev-jwt-secret-change-in-production";

/// Deployment profile selecting the built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Testing,
    Production,
}

impl Profile {
    /// Resolve a profile by name. Unknown names fall back to development.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "testing" | "test" => Profile::Testing,
            "production" | "prod" => Profile::Production,
            _ => Profile::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Testing => "testing",
            Profile::Production => "production",
        }
    }
}

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Profile the defaults were taken from.
    pub profile: Profile,

    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Base URLs of the services behind the gateway.
    pub upstreams: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Token signing and verification settings.
    pub jwt: JwtConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

impl GatewayConfig {
    /// Built-in defaults for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        let mut config = Self {
            profile,
            listener: ListenerConfig::default(),
            upstreams: UpstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            jwt: JwtConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
        };

        match profile {
            Profile::Development => {
                config.observability.log_level = "debug".to_string();
            }
            Profile::Testing => {
                // Non-routable hosts so a misconfigured test never reaches a real service.
                config.upstreams.auth_url = "http://auth.test".to_string();
                config.upstreams.task_url = "http://tasks.test".to_string();
                config.timeouts.proxy_secs = 1;
                config.jwt.expiry_hours = 1;
            }
            Profile::Production => {
                config.observability.log_format = LogFormat::Json;
            }
        }

        config
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Upstream service base URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Auth service, receives `/api/auth*`.
    pub auth_url: String,

    /// Task service, receives `/api/tasks*`.
    pub task_url: String,

    /// Frontend (BFF) service for every other path. Falls back to `task_url`.
    pub frontend_url: Option<String>,
}

impl UpstreamConfig {
    /// Base URL the catch-all route forwards to.
    pub fn frontend_url(&self) -> &str {
        self.frontend_url.as_deref().unwrap_or(&self.task_url)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://auth-service:5000".to_string(),
            task_url: "http://task-service:5000".to_string(),
            frontend_url: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one upstream exchange (connect, send, read body) in seconds.
    pub proxy_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { proxy_secs: 10 }
    }
}

/// Token signing and verification configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Algorithm family: `HS256` (shared secret) or `RS256` (key pair).
    pub algorithm: SigningAlgorithm,

    /// Shared secret for HS256.
    pub secret: String,

    /// Inline RSA private key (PEM). Takes precedence over `private_key_path`.
    pub private_key: Option<String>,

    /// Path to an RSA private key (PEM).
    pub private_key_path: Option<PathBuf>,

    /// Inline RSA public key (PEM). Takes precedence over `public_key_path`.
    pub public_key: Option<String>,

    /// Path to an RSA public key (PEM).
    pub public_key_path: Option<PathBuf>,

    /// Seconds a token is still accepted past its `exp`.
    pub leeway_secs: u64,

    /// Lifetime of newly issued tokens.
    pub expiry_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: SigningAlgorithm::Hs256,
            secret: DEV_JWT_SECRET.to_string(),
            private_key: None,
            private_key_path: None,
            public_key: None,
            public_key_path: None,
            leeway_secs: 30,
            expiry_hours: 24,
        }
    }
}

// Key material never reaches the logs.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("private_key_path", &self.private_key_path)
            .field("public_key", &self.public_key.as_ref().map(|_| "<inline>"))
            .field("public_key_path", &self.public_key_path)
            .field("leeway_secs", &self.leeway_secs)
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_profile_uses_non_routable_upstreams() {
        let config = GatewayConfig::for_profile(Profile::Testing);
        assert_eq!(config.upstreams.auth_url, "http://auth.test");
        assert_eq!(config.upstreams.task_url, "http://tasks.test");
        assert_eq!(config.timeouts.proxy_secs, 1);
        assert_eq!(config.jwt.expiry_hours, 1);
    }

    #[test]
    fn frontend_defaults_to_task_service() {
        let mut upstreams = UpstreamConfig::default();
        assert_eq!(upstreams.frontend_url(), "http://task-service:5000");

        upstreams.frontend_url = Some("http://frontend:5000".to_string());
        assert_eq!(upstreams.frontend_url(), "http://frontend:5000");
    }

    #[test]
    fn unknown_profile_name_is_development() {
        assert_eq!(Profile::from_name("staging"), Profile::Development);
        assert_eq!(Profile::from_name("PRODUCTION"), Profile::Production);
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::default());
        assert!(!rendered.contains(DEV_JWT_SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
