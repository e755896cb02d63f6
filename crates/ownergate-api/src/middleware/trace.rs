//! Per-request span and access log.
//!
//! Every request runs inside an `http_request` span carrying the method,
//! path, matched route and request id. Inside it one line is logged when
//! the request starts and one when it finishes; 5xx responses finish at
//! WARN. Query strings are never logged.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, field::Empty, info, info_span, warn, Instrument, Span};

use super::request_id;

/// Log target of the access log lines.
pub const ACCESS_LOG_TARGET: &str = "ownergate::http";

/// Wraps the request in a span and logs its outcome.
///
/// Install with `axum::middleware::from_fn(trace_requests)`, inside the
/// request id layer so the id is already set.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_default();
    let request_id = request_id(&request).unwrap_or_default();

    let span = info_span!(
        "http_request",
        %method,
        %path,
        %route,
        %request_id,
        status = Empty,
    );

    async move {
        debug!(target: ACCESS_LOG_TARGET, "request started");
        let started = Instant::now();

        let response = next.run(request).await;

        let status = response.status().as_u16();
        let duration_ms = whole_millis(started.elapsed());
        Span::current().record("status", status);

        if response.status().is_server_error() {
            warn!(target: ACCESS_LOG_TARGET, status, duration_ms, "request failed");
        } else {
            info!(target: ACCESS_LOG_TARGET, status, duration_ms, "request completed");
        }
        response
    }
    .instrument(span)
    .await
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn whole_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
