//! Request handling and transformation.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers before forwarding
//! - Capture the inbound scheme and host for `Location` rewriting
//! - Read the correlation ID set by the request-id layer
//!
//! # Design Decisions
//! - `Host` and `Content-Length` are dropped; the client recomputes both
//! - Repeated headers are appended, never collapsed
//! - Original request preserved for logging; filtered copy forwarded

use axum::http::{header, request::Parts, HeaderMap, HeaderName};

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Connection-scoped headers that must not cross the proxy.
pub const HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

// `Trailers` is how the legacy hop-by-hop list spells it; `Trailer` is the RFC name.
const TRAILERS: &str = "trailers";

/// Whether `name` is a hop-by-hop header.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    name.as_str() == TRAILERS || HOP_BY_HOP_HEADERS.contains(name)
}

/// Headers to send upstream.
pub fn filter_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

/// Scheme and host the client used to reach the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundOrigin {
    pub scheme: String,
    pub host: Option<String>,
}

impl InboundOrigin {
    /// Derive the origin from request parts.
    ///
    /// The scheme is `https` when the listener terminates TLS, else the URI's
    /// scheme, else `http`. The host comes from `Host`, else the URI authority.
    pub fn from_parts(parts: &Parts, tls: bool) -> Self {
        let scheme = if tls {
            "https".to_string()
        } else {
            parts
                .uri
                .scheme_str()
                .unwrap_or("http")
                .to_string()
        };

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_string()));

        Self { scheme, host }
    }
}

/// The request's correlation ID, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};

    #[test]
    fn strips_hop_by_hop_host_and_length() {
        let mut headers = HeaderMap::new();
        for name in [
            "connection",
            "keep-alive",
            "proxy-authenticate",
            "proxy-authorization",
            "te",
            "trailers",
            "transfer-encoding",
            "upgrade",
            "host",
            "content-length",
        ] {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static("x"),
            );
        }
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        let forwarded = filter_request_headers(&headers);
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[header::AUTHORIZATION], "Bearer t");
    }

    #[test]
    fn repeated_headers_survive_in_order() {
        let mut headers = HeaderMap::new();
        headers.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(header::ACCEPT, HeaderValue::from_static("application/json"));

        let forwarded = filter_request_headers(&headers);
        let values: Vec<_> = forwarded.get_all(header::ACCEPT).iter().collect();
        assert_eq!(values, ["text/html", "application/json"]);
    }

    #[test]
    fn origin_prefers_host_header() {
        let (parts, _) = Request::builder()
            .uri("http://internal:8080/x")
            .header(header::HOST, "gateway.example")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        assert_eq!(
            InboundOrigin::from_parts(&parts, false),
            InboundOrigin {
                scheme: "http".to_string(),
                host: Some("gateway.example".to_string()),
            }
        );
        assert_eq!(InboundOrigin::from_parts(&parts, true).scheme, "https");
    }

    #[test]
    fn origin_falls_back_to_authority() {
        let (parts, _) = Request::builder()
            .uri("http://internal:8080/x")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        assert_eq!(
            InboundOrigin::from_parts(&parts, false).host.as_deref(),
            Some("internal:8080")
        );

        let (parts, _) = Request::builder()
            .uri("/x")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        assert_eq!(InboundOrigin::from_parts(&parts, false).host, None);
    }
}
