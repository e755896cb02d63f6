//! Observability infrastructure.
//!
//! This module provides:
//! - Structured logging configuration
//! - Prometheus metrics recorder and endpoint

mod logging;
mod metrics;

pub use logging::{init_logging, parse_log_level, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, MetricsError, MetricsState, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION_SECONDS,
};
