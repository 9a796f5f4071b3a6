//! Token issuance.

use chrono::Utc;
use jsonwebtoken::{encode, Header};

use crate::auth::claims::TokenPayload;
use crate::auth::error::TokenError;
use crate::auth::keys::{KeyError, KeySet};
use crate::config::JwtConfig;

const SECONDS_PER_HOUR: i64 = 3600;

/// Issues signed tokens with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: KeySet,
    expiry_hours: i64,
}

impl TokenIssuer {
    pub fn new(keys: KeySet, expiry_hours: i64) -> Self {
        Self { keys, expiry_hours }
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, KeyError> {
        Ok(Self::new(KeySet::from_config(config)?, config.expiry_hours))
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    /// Issue a token for a user, stamped with the current time.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, username, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `issued_at` (Unix seconds).
    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        if user_id <= 0 {
            return Err(TokenError::InvalidInput("user_id must be a positive integer"));
        }
        if username.trim().is_empty() {
            return Err(TokenError::InvalidInput("username must be a non-empty string"));
        }
        let lifetime = self
            .expiry_hours
            .checked_mul(SECONDS_PER_HOUR)
            .filter(|secs| *secs > 0)
            .ok_or(TokenError::InvalidInput("expiry_hours must be a positive integer"))?;

        let payload = TokenPayload::new(user_id, username, issued_at, lifetime)?;
        let token = self.sign(&payload)?;

        tracing::debug!(
            user_id,
            algorithm = %self.keys.algorithm(),
            exp = payload.exp,
            "Issued token"
        );
        Ok(token)
    }

    /// Sign an arbitrary payload with this issuer's key.
    pub fn sign(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let key = self
            .keys
            .encoding_key()
            .ok_or(TokenError::SigningKeyUnavailable)?;
        let header = Header::new(self.keys.algorithm().algorithm());
        encode(&header, payload, key).map_err(TokenError::Signing)
    }
}

/// Issue a token for `user_id`/`username` valid for `expiry_hours`.
pub fn create_token(
    user_id: i64,
    username: &str,
    keys: &KeySet,
    expiry_hours: i64,
) -> Result<String, TokenError> {
    TokenIssuer::new(keys.clone(), expiry_hours).issue(user_id, username)
}
