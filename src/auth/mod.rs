//! Token contract shared by the gateway and the services behind it.
//!
//! # Responsibilities
//! - Issue HS256/RS256 tokens carrying `user_id`, `username`, `iat`, `exp`
//! - Verify tokens with a configured algorithm and clock-skew leeway
//! - Guard axum routes with `Authorization: Bearer <token>`

pub mod claims;
pub mod error;
pub mod keys;
pub mod middleware;
pub mod token;
pub mod verify;

pub use claims::{TokenPayload, REQUIRED_CLAIMS};
pub use error::{AuthError, TokenError};
pub use keys::{load_pem, KeyError, KeySet, SigningAlgorithm};
pub use middleware::{authenticate, bearer_token, require_auth, verify_handler, AuthenticatedUser};
pub use token::{create_token, TokenIssuer};
pub use verify::{verify_token, TokenVerifier, DEFAULT_LEEWAY_SECS};
