//! API middleware.
//!
//! Includes:
//! - Request id generation and propagation
//! - Per-request span with access log
//! - Request metrics
//! - CORS

mod metrics;
mod request_id;
mod trace;

pub use metrics::{MetricsLayer, RequestMetrics, StatusClass};
pub use request_id::{RequestIdLayer, MAX_REQUEST_ID_LEN, REQUEST_ID_HEADER};
pub use trace::{trace_requests, ACCESS_LOG_TARGET};

use tower_http::cors::{Any, CorsLayer};

/// Creates a CORS layer that accepts any origin.
///
/// The identity header is set by a trusted upstream, never by browsers, so
/// cross-origin requests cannot impersonate a user through CORS.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any)
}

/// Reads the request id set by [`RequestIdLayer`], if any.
fn request_id<B>(request: &axum::http::Request<B>) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
