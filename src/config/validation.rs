//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate upstream URLs (absolute `http://` with a host)
//! - Validate value ranges (timeouts > 0, expiry within bounds, addresses parse)
//! - Refuse development secrets in production
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::auth::SigningAlgorithm;
use crate::config::schema::{GatewayConfig, Profile, DEV_JWT_SECRET};

/// Longest accepted token lifetime: ten years.
pub const MAX_EXPIRY_HOURS: i64 = 10 * 366 * 24;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("{field} {value:?} is not an absolute http:// URL with a host")]
    UpstreamUrl { field: &'static str, value: String },

    #[error("timeouts.proxy_secs must be greater than zero")]
    ZeroProxyTimeout,

    #[error("jwt.expiry_hours must be greater than zero")]
    NonPositiveExpiry,

    #[error("jwt.expiry_hours must be at most {}, got {}", MAX_EXPIRY_HOURS, .0)]
    ExpiryTooLong(i64),

    #[error("jwt.secret must not be empty for HS256")]
    EmptySecret,

    #[error("jwt.secret is the development default; set JWT_SECRET in production")]
    DevSecretInProduction,

    #[error("RS256 needs a public key (jwt.public_key or jwt.public_key_path)")]
    MissingPublicKey,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let upstreams = [
        ("upstreams.auth_url", Some(&config.upstreams.auth_url)),
        ("upstreams.task_url", Some(&config.upstreams.task_url)),
        ("upstreams.frontend_url", config.upstreams.frontend_url.as_ref()),
    ];
    for (field, value) in upstreams {
        if let Some(value) = value {
            if !is_http_base_url(value) {
                errors.push(ValidationError::UpstreamUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    if config.timeouts.proxy_secs == 0 {
        errors.push(ValidationError::ZeroProxyTimeout);
    }

    if config.jwt.expiry_hours <= 0 {
        errors.push(ValidationError::NonPositiveExpiry);
    } else if config.jwt.expiry_hours > MAX_EXPIRY_HOURS {
        errors.push(ValidationError::ExpiryTooLong(config.jwt.expiry_hours));
    }

    match config.jwt.algorithm {
        SigningAlgorithm::Hs256 => {
            if config.jwt.secret.trim().is_empty() {
                errors.push(ValidationError::EmptySecret);
            } else if config.profile == Profile::Production && config.jwt.secret == DEV_JWT_SECRET {
                errors.push(ValidationError::DevSecretInProduction);
            }
        }
        SigningAlgorithm::Rs256 => {
            let inline = config
                .jwt
                .public_key
                .as_deref()
                .is_some_and(|pem| !pem.trim().is_empty());
            if !inline && config.jwt.public_key_path.is_none() {
                errors.push(ValidationError::MissingPublicKey);
            }
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_base_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.scheme() == "http" && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
        assert_eq!(
            validate_config(&GatewayConfig::for_profile(Profile::Testing)),
            Ok(())
        );
    }

    #[test]
    fn reports_every_problem() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".to_string();
        config.upstreams.auth_url = "auth-service:5000".to_string();
        config.upstreams.frontend_url = Some("https://frontend".to_string());
        config.timeouts.proxy_secs = 0;
        config.jwt.expiry_hours = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroProxyTimeout));
        assert!(errors.contains(&ValidationError::NonPositiveExpiry));
        assert!(errors.contains(&ValidationError::UpstreamUrl {
            field: "upstreams.frontend_url",
            value: "https://frontend".to_string(),
        }));
    }

    #[test]
    fn expiry_is_bounded() {
        let mut config = GatewayConfig::default();
        config.jwt.expiry_hours = MAX_EXPIRY_HOURS;
        assert_eq!(validate_config(&config), Ok(()));

        config.jwt.expiry_hours = i64::MAX / 3600;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ExpiryTooLong(i64::MAX / 3600)])
        );
    }

    #[test]
    fn production_rejects_dev_secret() {
        let mut config = GatewayConfig::for_profile(Profile::Production);
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::DevSecretInProduction])
        );

        config.jwt.secret = "a-real-secret".to_string();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn rs256_requires_public_key() {
        let mut config = GatewayConfig::default();
        config.jwt.algorithm = SigningAlgorithm::Rs256;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MissingPublicKey])
        );

        config.jwt.public_key_path = Some("keys/dev.public.pem".into());
        assert_eq!(validate_config(&config), Ok(()));
    }
}
