//! Prometheus metrics infrastructure.
//!
//! # Metrics Exposed
//!
//! - `ownergate_http_requests_total` - HTTP requests by method, route, status class
//! - `ownergate_http_request_duration_seconds` - Request duration histogram
//! - `ownergate_access_decisions_total` - Authorizer outcomes by action and decision

use std::sync::Arc;

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use ownergate_server::handlers::ACCESS_DECISIONS_TOTAL;

pub const HTTP_REQUESTS_TOTAL: &str = "ownergate_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "ownergate_http_request_duration_seconds";

/// Shared state containing the Prometheus handle for metrics rendering.
#[derive(Clone)]
pub struct MetricsState {
    handle: Arc<PrometheusHandle>,
}

impl MetricsState {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Renders the current metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Error type for metrics initialization.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus recorder: recorder already installed")]
    AlreadyInstalled,
}

/// Installs the global Prometheus recorder.
///
/// Call once at startup, before anything records a metric.
pub fn init_metrics() -> Result<MetricsState, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|_| MetricsError::AlreadyInstalled)?;

    describe_metrics();

    Ok(MetricsState::new(handle))
}

fn describe_metrics() {
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        ACCESS_DECISIONS_TOTAL,
        "Access decisions by action and outcome"
    );
}

/// Prometheus exposition format content type.
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Handler for the `/metrics` endpoint.
pub async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], state.render())
}
