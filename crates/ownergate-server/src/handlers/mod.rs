//! Request handlers.
//!
//! Handlers are transport-agnostic: they take the requester's
//! [`Identity`] and raw path parameters, and return either a view value or a
//! [`HandlerError`] describing the outward result (login redirect, not found,
//! form errors, storage failure). The HTTP layer maps both onto responses.

pub mod accounts;
pub mod news;
pub mod notes;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use ownergate_domain::validation::FormErrors;
use ownergate_domain::{authorize, AccessDecision, Action, DomainError, Guarded, Identity};
use ownergate_storage::StorageError;

pub use accounts::AccountsHandler;
pub use news::NewsHandler;
pub use notes::NotesHandler;

/// Metric counting authorization outcomes by action and decision.
pub const ACCESS_DECISIONS_TOTAL: &str = "ownergate_access_decisions_total";

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The requester must sign in first.
    #[error("login required")]
    LoginRequired,

    /// The target does not exist or is not visible to the requester.
    #[error("not found")]
    NotFound,

    /// Submitted form failed validation.
    #[error("form invalid")]
    Form(FormErrors),

    /// The request conflicts with stored data.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Malformed identifier or identity.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage backend failure.
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for HandlerError {
    fn from(err: StorageError) -> Self {
        match err {
            // A row removed between the authorization lookup and the write
            // looks the same as one that never existed.
            StorageError::NewsNotFound { .. }
            | StorageError::CommentNotFound { .. }
            | StorageError::NoteNotFound { .. } => HandlerError::NotFound,
            StorageError::UserAlreadyExists { username } => HandlerError::Conflict {
                message: format!("user already exists: {username}"),
            },
            other => HandlerError::Storage(other),
        }
    }
}

impl From<FormErrors> for HandlerError {
    fn from(errors: FormErrors) -> Self {
        HandlerError::Form(errors)
    }
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// A form as presented to the client: the fields it renders and their
/// current values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView<T> {
    pub fields: &'static [&'static str],
    pub values: T,
}

/// A page with no data of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub page: &'static str,
}

/// Runs the authorizer and turns anything but `Allow` into an error.
pub(crate) fn enforce<R: Guarded>(
    identity: &Identity,
    resource: Option<&R>,
    action: Action,
) -> HandlerResult<()> {
    let decision = authorize(identity, resource, action);

    metrics::counter!(
        ACCESS_DECISIONS_TOTAL,
        "action" => action.as_str(),
        "decision" => decision.as_str()
    )
    .increment(1);
    debug!(%identity, %action, %decision, "access decision");

    match decision {
        AccessDecision::Allow => Ok(()),
        AccessDecision::RedirectToLogin => Err(HandlerError::LoginRequired),
        AccessDecision::NotFound => Err(HandlerError::NotFound),
    }
}
