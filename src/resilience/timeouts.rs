//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream exchanges with a single deadline
//! - Tell timeouts apart from other transport failures
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - One deadline covers connect, send and reading the full response body
//! - Timed-out exchanges return 502 like any other upstream failure, with their own message

use std::error::Error;
use std::future::Future;
use std::io;
use std::time::Duration;

use crate::http::error::GatewayError;

/// Run `exchange` under `deadline`, translating failures into gateway errors.
pub async fn with_deadline<T, E, F>(deadline: Duration, exchange: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    match tokio::time::timeout(deadline, exchange).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            let classified = classify(&e);
            tracing::warn!(error = %e, kind = classified.kind(), "Upstream exchange failed");
            Err(classified)
        }
        Err(_) => {
            tracing::warn!(deadline = ?deadline, "Upstream exchange timed out");
            Err(GatewayError::UpstreamTimeout)
        }
    }
}

/// Classify a transport error by walking its source chain.
pub fn classify(err: &(dyn Error + 'static)) -> GatewayError {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::TimedOut {
                return GatewayError::UpstreamTimeout;
            }
        }
        current = e.source();
    }
    GatewayError::UpstreamUnavailable
}
