//! Domain error types for access-control operations.

use thiserror::Error;

/// Domain-specific errors.
///
/// Absence of a resource is deliberately not an error here: it is carried
/// by [`crate::AccessDecision::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Request is missing a required part or carries an unusable one.
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// User identifier is empty or has surrounding whitespace.
    #[error("invalid user id: {value:?}")]
    InvalidUserId { value: String },

    /// Numeric resource identifier could not be parsed.
    #[error("invalid resource id: {value:?}")]
    InvalidResourceId { value: String },

    /// Slug outside the allowed character set or length.
    #[error("invalid slug: {value:?}")]
    InvalidSlug { value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
