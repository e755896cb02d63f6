//! Application state for HTTP handlers.

use std::sync::Arc;

use ownergate_server::config::{AuthSettings, ServerConfig};
use ownergate_server::{AccountsHandler, NewsHandler, NotesHandler};
use ownergate_storage::DataStore;

/// Application state shared across all HTTP handlers.
///
/// # Type Parameters
///
/// * `S` - The storage backend implementing `DataStore`
pub struct AppState<S: DataStore> {
    /// The storage backend.
    pub storage: Arc<S>,
    /// News and comment pages.
    pub news: NewsHandler<S>,
    /// Personal note pages.
    pub notes: NotesHandler<S>,
    /// Account pages.
    pub accounts: AccountsHandler<S>,
    /// Identity header and login page.
    pub auth: AuthSettings,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl<S: DataStore> AppState<S> {
    /// Creates a new application state with default configuration.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_config(storage, &ServerConfig::default())
    }

    /// Creates a new application state from server configuration.
    pub fn with_config(storage: Arc<S>, config: &ServerConfig) -> Self {
        Self {
            news: NewsHandler::new(Arc::clone(&storage), config.content.news_per_page),
            notes: NotesHandler::new(Arc::clone(&storage)),
            accounts: AccountsHandler::new(Arc::clone(&storage)),
            storage,
            auth: config.auth.clone(),
            body_limit: config.server.body_limit_bytes,
        }
    }
}
