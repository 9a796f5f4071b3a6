//! Bearer token guard for axum services.
//!
//! `require_auth` runs as `middleware::from_fn_with_state` with an
//! `Arc<TokenVerifier>`; handlers behind it take [`AuthenticatedUser`].

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::verify::TokenVerifier;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, taken from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's identity from request headers.
pub fn authenticate(
    verifier: &TokenVerifier,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingHeader)?;
    let payload = verifier.verify(token).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected bearer token");
        AuthError::InvalidToken
    })?;

    Ok(AuthenticatedUser {
        user_id: payload.user_id,
        username: payload.username,
    })
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_auth(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(&verifier, request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingHeader)
    }
}

/// `GET /verify`: echo the identity of a valid bearer token.
pub async fn verify_handler(
    State(verifier): State<Arc<TokenVerifier>>,
    headers: HeaderMap,
) -> Result<Json<AuthenticatedUser>, AuthError> {
    authenticate(&verifier, &headers).map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_prefix_is_case_sensitive() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Bearer   abc  ")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
