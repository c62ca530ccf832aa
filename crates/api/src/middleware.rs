use std::time::{Duration, Instant};

use axum::{
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::context::RequestContext;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assign a request id, run the request inside a span, and log the outcome.
pub async fn request_context(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::new();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    req.extensions_mut().insert(ctx);

    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id(),
        method = %method,
        path = %path,
    );

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;
    let latency_ms = elapsed_millis(started.elapsed());

    span.in_scope(|| {
        let status = response.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), latency_ms, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), latency_ms, "request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_is_whole_milliseconds() {
        assert_eq!(elapsed_millis(Duration::from_micros(2_999)), 2);
    }

    #[test]
    fn latency_saturates_instead_of_wrapping() {
        assert_eq!(elapsed_millis(Duration::MAX), u64::MAX);
    }
}
