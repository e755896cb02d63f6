//! ownergate-api: HTTP API layer
//!
//! This crate provides the API layer including:
//! - HTTP endpoints for the news, notes and accounts pages via Axum
//! - Translation of access decisions into redirects and 404s
//! - Middleware (request ids, logging, metrics, tracing)
//! - Observability setup (structured logging, Prometheus)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               ownergate-api                  │
//! ├─────────────────────────────────────────────┤
//! │  http/          - Routes, identity, errors  │
//! │  middleware/    - Request id, metrics, logs │
//! │  observability/ - Logging and Prometheus    │
//! └─────────────────────────────────────────────┘
//! ```

pub mod http;
pub mod middleware;
pub mod observability;
