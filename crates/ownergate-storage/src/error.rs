//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Username already registered.
    #[error("user already exists: {username}")]
    UserAlreadyExists { username: String },

    /// Another note already uses this slug.
    #[error("slug already exists: {slug}")]
    SlugAlreadyExists { slug: String },

    /// News item referenced by a write does not exist.
    #[error("news not found: {news_id}")]
    NewsNotFound { news_id: u64 },

    /// Comment vanished between lookup and write.
    #[error("comment not found: {comment_id}")]
    CommentNotFound { comment_id: u64 },

    /// Note vanished between lookup and write.
    #[error("note not found: {note_id}")]
    NoteNotFound { note_id: u64 },

    /// Backend connection error.
    #[error("storage connection error: {message}")]
    ConnectionError { message: String },

    /// Backend operation exceeded its deadline.
    #[error("storage operation timed out after {timeout_ms}ms: {operation}")]
    QueryTimeout { operation: String, timeout_ms: u64 },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    InternalError { message: String },
}

impl StorageError {
    /// Returns true when the backend itself is failing, as opposed to the
    /// request conflicting with stored data.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            StorageError::ConnectionError { .. }
                | StorageError::QueryTimeout { .. }
                | StorageError::InternalError { .. }
        )
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
