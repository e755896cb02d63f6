//! ownergate-server: Request handlers and configuration
//!
//! This crate contains the application layer including:
//! - News handler (public news, owned comments)
//! - Notes handler (private notes)
//! - Accounts handler (sign-up and auth pages)
//! - Configuration management
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              ownergate-server                │
//! ├─────────────────────────────────────────────┤
//! │  config.rs   - Configuration management     │
//! │  handlers/   - Request handlers             │
//! │    news.rs     - News and comments          │
//! │    notes.rs    - Personal notes             │
//! │    accounts.rs - Sign-up and auth pages     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every handler operation looks the target up, asks
//! [`ownergate_domain::authorize`] for a decision and only touches storage
//! again when the answer is `Allow`.

pub mod config;
pub mod handlers;

// Re-exports for convenience
pub use config::{ConfigLoadError, ServerConfig};
pub use handlers::{AccountsHandler, HandlerError, HandlerResult, NewsHandler, NotesHandler};
