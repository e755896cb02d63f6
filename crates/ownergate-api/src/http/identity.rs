//! Requester identity extraction.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use ownergate_domain::{Identity, LoginRedirect};
use ownergate_server::HandlerError;
use ownergate_storage::DataStore;

use super::routes::{ApiError, PageError};
use super::state::AppState;

/// The requester of the current request.
///
/// Built from the configured identity header: a missing header means
/// [`Identity::Anonymous`], a blank or non-text one is a malformed request.
/// Also remembers the requested path so a login redirect can send the
/// requester back.
#[derive(Debug, Clone)]
pub struct Requester {
    pub identity: Identity,
    login: LoginRedirect,
}

impl Requester {
    pub fn new(identity: Identity, login: LoginRedirect) -> Self {
        Self { identity, login }
    }

    /// The login redirect for this request.
    pub fn login_redirect(&self) -> &LoginRedirect {
        &self.login
    }

    /// Turns a handler error into the response for this requester.
    ///
    /// A required login becomes a redirect back to the requested path.
    pub(crate) fn reject(&self, err: HandlerError) -> PageError {
        let api = match err {
            HandlerError::LoginRequired => return PageError::Login(self.login.clone()),
            HandlerError::NotFound => ApiError::not_found(),
            HandlerError::Form(errors) => ApiError::form_invalid(errors),
            HandlerError::Conflict { message } => ApiError::conflict(message),
            HandlerError::Domain(err) => err.into(),
            HandlerError::Storage(err) => err.into(),
        };
        PageError::Api(api)
    }
}

#[async_trait]
impl<S: DataStore> FromRequestParts<Arc<AppState<S>>> for Requester {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let identity = match parts.headers.get(state.auth.identity_header.as_str()) {
            None => Identity::Anonymous,
            Some(value) => {
                let value = value.to_str().map_err(|_| {
                    ApiError::validation_error(format!(
                        "{} header must be visible ASCII",
                        state.auth.identity_header
                    ))
                })?;
                Identity::user(value.trim())?
            }
        };

        Ok(Requester::new(
            identity,
            LoginRedirect::new(state.auth.login_path.clone(), parts.uri.path()),
        ))
    }
}
