//! The proxy cycle: route, forward, relay.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → method allowlist (405)
//!     → route lookup → upstream URL
//!     → buffer body under the size limit (413)
//!     → filter request headers
//!     → upstream exchange under one deadline (502 on failure)
//!     → filter response headers, rewrite Location
//!     → relay status and body
//! ```

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{request::Parts, Method, Request, Uri},
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use thiserror::Error;

use crate::http::error::GatewayError;
use crate::http::request::{filter_request_headers, request_id, InboundOrigin};
use crate::http::response::filter_response_headers;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Methods relayed to upstreams; anything else is answered with 405.
pub const FORWARDED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
];

#[derive(Debug, Error)]
enum UpstreamFailure {
    #[error("request failed: {0}")]
    Request(#[source] hyper_util::client::legacy::Error),

    #[error("reading response body failed: {0}")]
    Body(#[source] hyper::Error),
}

/// Main proxy handler.
/// Looks up the route and forwards the request to its upstream.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let method = parts.method.clone();

    let (upstream, outcome) = forward(&state, parts, body, &request_id).await;
    match outcome {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                upstream,
                status = response.status().as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            metrics::record_request(method.as_str(), response.status().as_u16(), upstream, start);
            response
        }
        Err(err) => {
            if matches!(
                err,
                GatewayError::UpstreamTimeout | GatewayError::UpstreamUnavailable
            ) {
                tracing::error!(
                    request_id = %request_id,
                    upstream,
                    error = %err,
                    "Upstream request failed"
                );
                metrics::record_upstream_error(err.kind());
            } else {
                tracing::debug!(request_id = %request_id, error = %err, "Request rejected");
            }
            metrics::record_request(method.as_str(), err.status().as_u16(), upstream, start);
            err.into_response()
        }
    }
}

async fn forward<'s>(
    state: &'s AppState,
    parts: Parts,
    body: Body,
    request_id: &str,
) -> (&'s str, Result<Response, GatewayError>) {
    if !FORWARDED_METHODS.contains(&parts.method) {
        return ("none", Err(GatewayError::MethodNotAllowed));
    }

    let route = state.routes.resolve(parts.uri.path(), parts.uri.query());
    let upstream = route.target.name();

    tracing::info!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        upstream,
        url = %route.url,
        "Proxying request"
    );

    let result = async {
        let body = read_body(body, state.max_body_size).await?;
        let uri: Uri = route.url.parse().map_err(|e| {
            tracing::warn!(request_id = %request_id, url = %route.url, error = %e, "Unusable upstream URL");
            GatewayError::UpstreamUnavailable
        })?;

        let mut outbound = Request::new(Body::from(body));
        *outbound.method_mut() = parts.method.clone();
        *outbound.uri_mut() = uri;
        *outbound.headers_mut() = filter_request_headers(&parts.headers);

        let exchange = async {
            let response = state
                .client
                .request(outbound)
                .await
                .map_err(UpstreamFailure::Request)?;
            let (head, body) = response.into_parts();
            let bytes = body.collect().await.map_err(UpstreamFailure::Body)?.to_bytes();
            Ok::<_, UpstreamFailure>((head, bytes))
        };
        let (head, bytes) = with_deadline(state.proxy_timeout, exchange).await?;

        let origin = InboundOrigin::from_parts(&parts, state.tls);
        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = head.status;
        *response.headers_mut() = filter_response_headers(&head.headers, &origin);
        Ok::<_, GatewayError>(response)
    }
    .await;

    (upstream, result)
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, GatewayError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(GatewayError::PayloadTooLarge)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read request body");
            Err(GatewayError::InvalidBody)
        }
    }
}
