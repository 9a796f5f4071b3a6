//! Signing and verification key material.
//!
//! # Responsibilities
//! - Name the two supported algorithm families (HS256, RS256)
//! - Load PEM material from inline configuration or from disk
//! - Hold the jsonwebtoken keys as one immutable value
//!
//! # Design Decisions
//! - A `KeySet` is built once at startup and injected into the issuer and verifier
//! - Inline PEM wins over a file path, matching how the services are deployed
//! - A verify-only key set (RS256 public key) has no encoding key at all

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

/// Algorithm family used to sign and verify tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SigningAlgorithm {
    /// HMAC-SHA256 with a shared secret.
    #[default]
    #[serde(rename = "HS256", alias = "hs256")]
    Hs256,
    /// RSA PKCS#1 v1.5 SHA-256 with a key pair.
    #[serde(rename = "RS256", alias = "rs256")]
    Rs256,
}

impl SigningAlgorithm {
    /// The jsonwebtoken algorithm this family signs with.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            SigningAlgorithm::Hs256 => Algorithm::HS256,
            SigningAlgorithm::Rs256 => Algorithm::RS256,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::Hs256 => "HS256",
            SigningAlgorithm::Rs256 => "RS256",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(SigningAlgorithm::Hs256),
            "RS256" => Ok(SigningAlgorithm::Rs256),
            _ => Err(KeyError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Errors raised while assembling key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("no {0} configured")]
    Missing(&'static str),

    #[error("failed to read {what} from {path}: {source}")]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} is not a valid PEM key: {source}")]
    InvalidPem {
        what: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("unsupported signing algorithm {0:?} (expected HS256 or RS256)")]
    UnsupportedAlgorithm(String),
}

/// Resolve PEM content from an inline value or a file path.
///
/// Non-blank inline content takes precedence; `what` names the key in errors.
pub fn load_pem(
    raw: Option<&str>,
    path: Option<&Path>,
    what: &'static str,
) -> Result<String, KeyError> {
    if let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        return Ok(raw.to_string());
    }

    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| KeyError::Read {
            what,
            path: path.to_path_buf(),
            source,
        }),
        None => Err(KeyError::Missing(what)),
    }
}

/// Keys for one algorithm family.
#[derive(Clone)]
pub struct KeySet {
    algorithm: SigningAlgorithm,
    encoding: Option<EncodingKey>,
    decoding: DecodingKey,
}

impl KeySet {
    /// Symmetric keys from a shared secret.
    pub fn hs256(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            algorithm: SigningAlgorithm::Hs256,
            encoding: Some(EncodingKey::from_secret(secret)),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issuer-side RSA keys.
    pub fn rs256(private_pem: &str, public_pem: &str) -> Result<Self, KeyError> {
        let encoding =
            EncodingKey::from_rsa_pem(private_pem.as_bytes()).map_err(|source| {
                KeyError::InvalidPem {
                    what: "RSA private key",
                    source,
                }
            })?;
        let mut keys = Self::rs256_verifier(public_pem)?;
        keys.encoding = Some(encoding);
        Ok(keys)
    }

    /// Verify-only RSA keys.
    pub fn rs256_verifier(public_pem: &str) -> Result<Self, KeyError> {
        let decoding = DecodingKey::from_rsa_pem(public_pem.as_bytes()).map_err(|source| {
            KeyError::InvalidPem {
                what: "RSA public key",
                source,
            }
        })?;
        Ok(Self {
            algorithm: SigningAlgorithm::Rs256,
            encoding: None,
            decoding,
        })
    }

    /// Build the key set selected by `jwt.algorithm`.
    ///
    /// For RS256 the private key is optional; without it the set can only verify.
    pub fn from_config(config: &JwtConfig) -> Result<Self, KeyError> {
        match config.algorithm {
            SigningAlgorithm::Hs256 => {
                if config.secret.trim().is_empty() {
                    return Err(KeyError::Missing("JWT secret"));
                }
                Ok(Self::hs256(config.secret.as_bytes()))
            }
            SigningAlgorithm::Rs256 => {
                let public = load_pem(
                    config.public_key.as_deref(),
                    config.public_key_path.as_deref(),
                    "RSA public key",
                )?;
                match load_pem(
                    config.private_key.as_deref(),
                    config.private_key_path.as_deref(),
                    "RSA private key",
                ) {
                    Ok(private) => Self::rs256(&private, &public),
                    Err(KeyError::Missing(_)) => {
                        tracing::debug!("No RSA private key configured, tokens can only be verified");
                        Self::rs256_verifier(&public)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn encoding_key(&self) -> Option<&EncodingKey> {
        self.encoding.as_ref()
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    pub fn can_sign(&self) -> bool {
        self.encoding.is_some()
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("algorithm", &self.algorithm)
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}
