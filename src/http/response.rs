//! Response handling and transformation.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers from upstream responses
//! - Rewrite absolute `Location` headers to the gateway's own origin
//! - Relay every `Set-Cookie` value individually
//!
//! # Design Decisions
//! - `Content-Length` is dropped; the body is re-framed by the server
//! - Relative or unparseable `Location` values pass through untouched

use axum::http::{header, HeaderMap, HeaderValue};
use url::Url;

use crate::http::request::{is_hop_by_hop, InboundOrigin};

/// Rewrite an absolute `Location` so it points at the inbound origin.
///
/// Path, query and fragment are kept byte for byte. Values that are not
/// absolute URLs with a host, or requests without a known host, are returned
/// unchanged.
pub fn rewrite_location(location: &str, origin: &InboundOrigin) -> String {
    let Some(host) = origin.host.as_deref() else {
        return location.to_string();
    };
    match after_authority(location) {
        Some(rest) => format!("{}://{}{}", origin.scheme, host, rest),
        None => location.to_string(),
    }
}

/// Everything after `scheme://authority` in an absolute URL with a host.
///
/// The URL parser only decides whether the value qualifies; the returned
/// slice is taken from the raw string.
fn after_authority(location: &str) -> Option<&str> {
    let url = Url::parse(location).ok()?;
    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    let (scheme, rest) = location.split_once("://")?;
    if !scheme.eq_ignore_ascii_case(url.scheme()) {
        return None;
    }
    let end = rest.find(['/', '?', '#', '\\']).unwrap_or(rest.len());
    Some(&rest[end..])
}

/// Headers to send back to the client.
pub fn filter_response_headers(headers: &HeaderMap, origin: &InboundOrigin) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        if is_hop_by_hop(name)
            || name == header::CONTENT_LENGTH
            || name == header::LOCATION
            || name == header::SET_COOKIE
        {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }

    if let Some(location) = headers.get(header::LOCATION) {
        let rewritten = location
            .to_str()
            .ok()
            .map(|raw| rewrite_location(raw, origin))
            .and_then(|raw| HeaderValue::from_str(&raw).ok())
            .unwrap_or_else(|| location.clone());
        relayed.insert(header::LOCATION, rewritten);
    }

    for cookie in headers.get_all(header::SET_COOKIE) {
        relayed.append(header::SET_COOKIE, cookie.clone());
    }

    relayed
}
