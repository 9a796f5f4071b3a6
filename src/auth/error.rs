//! Token and authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// Why a token could not be issued or was rejected.
///
/// The variants are for logs and tests. Callers at a trust boundary map every
/// verification failure to [`AuthError::InvalidToken`].
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("key set cannot sign (verification key only)")]
    SigningKeyUnavailable,

    #[error("token is not a well-formed JWT")]
    Malformed,

    #[error("token signature is invalid")]
    Signature,

    #[error("token algorithm is not accepted")]
    Algorithm,

    #[error("token claims are missing or mistyped: {0}")]
    Claims(String),

    #[error("token has expired")]
    Expired,

    #[error("token claim is invalid: {0}")]
    InvalidClaim(&'static str),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Map a jsonwebtoken decoding failure to a rejection reason.
    pub(crate) fn from_decode(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                TokenError::Malformed
            }
            ErrorKind::InvalidSignature => TokenError::Signature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat => TokenError::Algorithm,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::Claims(format!("missing {claim}")),
            ErrorKind::Json(e) => TokenError::Claims(e.to_string()),
            _ => TokenError::Malformed,
        }
    }
}

/// Rejections produced by the bearer guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingHeader,

    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
