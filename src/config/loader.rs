//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, LogFormat, Profile};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not layer defaults: {0}")]
    Defaults(#[from] toml::ser::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from an optional TOML file and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`], reading environment variables through `env`.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = match path {
        Some(path) => Some(fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?),
        None => None,
    };

    let profile = match env("APP_ENV") {
        Some(name) => Profile::from_name(&name),
        None => match content.as_deref() {
            Some(content) => profile_declared_in(content)?,
            None => Profile::default(),
        },
    };

    let mut config = match content.as_deref() {
        Some(content) => parse_layered(profile, content)?,
        None => GatewayConfig::for_profile(profile),
    };

    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(profile = profile.as_str(), file = ?path, "Configuration loaded");
    Ok(config)
}

/// Parse a TOML document on top of the defaults for `profile`.
///
/// Tables are merged key by key, so a file only needs the values it changes.
pub fn parse_layered(profile: Profile, content: &str) -> Result<GatewayConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let mut base = toml::Value::try_from(GatewayConfig::for_profile(profile))?;
    merge(&mut base, overlay);

    let mut config: GatewayConfig = base.try_into()?;
    config.profile = profile;
    Ok(config)
}

fn profile_declared_in(content: &str) -> Result<Profile, ConfigError> {
    let document: toml::Value = toml::from_str(content)?;
    Ok(document
        .get("profile")
        .and_then(toml::Value::as_str)
        .map(Profile::from_name)
        .unwrap_or_default())
}

fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply environment variable overrides on top of file and profile values.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = var("GATEWAY_BIND_ADDRESS") {
        config.listener.bind_address = value;
    }
    if let Some(value) = var("AUTH_SERVICE_URL") {
        config.upstreams.auth_url = value;
    }
    if let Some(value) = var("TASK_SERVICE_URL") {
        config.upstreams.task_url = value;
    }
    if let Some(value) = var("FRONTEND_SERVICE_URL") {
        config.upstreams.frontend_url = Some(value);
    }
    if let Some(value) = var("PROXY_TIMEOUT") {
        config.timeouts.proxy_secs = parse_env("PROXY_TIMEOUT", &value)?;
    }
    if let Some(value) = var("JWT_ALGORITHM") {
        config.jwt.algorithm = parse_env("JWT_ALGORITHM", &value)?;
    }
    if let Some(value) = var("JWT_SECRET") {
        config.jwt.secret = value;
    }
    if let Some(value) = var("JWT_PRIVATE_KEY") {
        config.jwt.private_key = Some(value);
    }
    if let Some(value) = var("JWT_PRIVATE_KEY_PATH") {
        config.jwt.private_key_path = Some(PathBuf::from(value));
    }
    if let Some(value) = var("JWT_PUBLIC_KEY") {
        config.jwt.public_key = Some(value);
    }
    if let Some(value) = var("JWT_PUBLIC_KEY_PATH") {
        config.jwt.public_key_path = Some(PathBuf::from(value));
    }
    if let Some(value) = var("JWT_CLOCK_SKEW_SECONDS") {
        config.jwt.leeway_secs = parse_env("JWT_CLOCK_SKEW_SECONDS", &value)?;
    }
    if let Some(value) = var("JWT_EXPIRY_HOURS") {
        config.jwt.expiry_hours = parse_env("JWT_EXPIRY_HOURS", &value)?;
    }
    if let Some(value) = var("LOG_LEVEL") {
        config.observability.log_level = value;
    }
    if let Some(value) = var("LOG_FORMAT") {
        config.observability.log_format = match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => return Err(ConfigError::Env { var: "LOG_FORMAT", value }),
        };
    }
    if let Some(value) = var("MAX_BODY_SIZE") {
        config.security.max_body_size = parse_env("MAX_BODY_SIZE", &value)?;
    }

    Ok(())
}

fn parse_env<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}
