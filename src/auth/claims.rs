//! The claim set shared by every service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::error::TokenError;

/// Claims every valid token carries.
pub const REQUIRED_CLAIMS: [&str; 4] = ["user_id", "username", "iat", "exp"];

/// Decoded token payload.
///
/// Integer claims must be JSON integers and `username` a JSON string; anything
/// else fails deserialization. Unknown claims are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: i64,
    pub username: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenPayload {
    /// Payload issued at `issued_at`, expiring `lifetime_secs` later.
    ///
    /// Fails when `exp` does not fit in an `i64`.
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        issued_at: i64,
        lifetime_secs: i64,
    ) -> Result<Self, TokenError> {
        let exp = issued_at
            .checked_add(lifetime_secs)
            .ok_or(TokenError::InvalidInput("token lifetime overflows the expiry timestamp"))?;
        Ok(Self {
            user_id,
            username: username.into(),
            iat: issued_at,
            exp,
            extra: Map::new(),
        })
    }

    /// Check the identity claims.
    pub fn validate_identity(&self) -> Result<(), TokenError> {
        if self.user_id <= 0 {
            return Err(TokenError::InvalidClaim("user_id must be a positive integer"));
        }
        if self.username.trim().is_empty() {
            return Err(TokenError::InvalidClaim("username must be a non-empty string"));
        }
        Ok(())
    }

    /// Whether the token is past `exp` by more than `leeway_secs` at `now`.
    pub fn is_expired_at(&self, now: i64, leeway_secs: u64) -> bool {
        let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
        self.exp.saturating_add(leeway) < now
    }
}
