//! Token verification.
//!
//! # Data Flow
//! ```text
//! token → structural decode → alg allowlist + signature → claim types
//!       → exp + leeway >= now → identity rules → TokenPayload
//! ```
//!
//! # Design Decisions
//! - The accepted algorithms come from configuration, never from the token header
//! - Expiry is checked here against an injected clock so the leeway is testable
//! - Every failure is a `TokenError`; callers decide how much of it to reveal

use chrono::Utc;
use jsonwebtoken::{decode, Validation};

use crate::auth::claims::TokenPayload;
use crate::auth::error::TokenError;
use crate::auth::keys::{KeyError, KeySet, SigningAlgorithm};
use crate::config::JwtConfig;

/// Default tolerance for clock skew between services.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Verifies tokens against one key set.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: KeySet,
    validation: Validation,
    leeway_secs: u64,
}

impl TokenVerifier {
    /// Verifier accepting only the key set's own algorithm.
    pub fn new(keys: KeySet) -> Self {
        let algorithm = keys.algorithm();
        Self::with_algorithms(keys, &[algorithm])
    }

    /// Verifier with an explicit algorithm allowlist.
    ///
    /// jsonwebtoken refuses to verify when an allowed algorithm does not belong
    /// to the key's family, so a mismatched or mixed list rejects every token,
    /// and so does an empty one.
    pub fn with_algorithms(keys: KeySet, algorithms: &[SigningAlgorithm]) -> Self {
        let mut validation = Validation::new(keys.algorithm().algorithm());
        validation.algorithms = algorithms.iter().map(SigningAlgorithm::algorithm).collect();
        // Expiry is enforced in verify_at with the configured leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys,
            validation,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, KeyError> {
        Ok(Self::new(KeySet::from_config(config)?).with_leeway(config.leeway_secs))
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.keys.algorithm()
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenPayload, TokenError> {
        let data = decode::<TokenPayload>(token, self.keys.decoding_key(), &self.validation)
            .map_err(TokenError::from_decode)?;
        let payload = data.claims;

        if payload.is_expired_at(now, self.leeway_secs) {
            return Err(TokenError::Expired);
        }
        payload.validate_identity()?;

        Ok(payload)
    }
}

/// Verify `token` with `keys`, accepting only `algorithms` and allowing
/// `leeway_secs` of clock skew.
pub fn verify_token(
    token: &str,
    keys: &KeySet,
    algorithms: &[SigningAlgorithm],
    leeway_secs: u64,
) -> Result<TokenPayload, TokenError> {
    TokenVerifier::with_algorithms(keys.clone(), algorithms)
        .with_leeway(leeway_secs)
        .verify(token)
}
