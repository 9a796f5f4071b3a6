//! Locally generated error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures the gateway answers itself instead of relaying an upstream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Downstream request timed out")]
    UpstreamTimeout,

    #[error("Downstream service unavailable")]
    UpstreamUnavailable,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Could not read request body")]
    InvalidBody,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamTimeout | GatewayError::UpstreamUnavailable => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidBody => StatusCode::BAD_REQUEST,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::UpstreamTimeout => "timeout",
            GatewayError::UpstreamUnavailable => "unavailable",
            GatewayError::MethodNotAllowed => "method_not_allowed",
            GatewayError::PayloadTooLarge => "payload_too_large",
            GatewayError::InvalidBody => "invalid_body",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failures_are_bad_gateway() {
        assert_eq!(GatewayError::UpstreamTimeout.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(GatewayError::UpstreamUnavailable.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            GatewayError::UpstreamTimeout.to_string(),
            "Downstream request timed out"
        );
    }
}
