//! Account pages and sign-up.

use std::sync::Arc;

use tracing::info;

use ownergate_domain::validation::SignupForm;
use ownergate_domain::User;
use ownergate_storage::DataStore;

use super::{HandlerResult, PageView};

/// Handler for the public account pages.
pub struct AccountsHandler<S: DataStore> {
    store: Arc<S>,
}

impl<S: DataStore> AccountsHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn login_page(&self) -> PageView {
        PageView { page: "users:login" }
    }

    pub fn logout_page(&self) -> PageView {
        PageView { page: "users:logout" }
    }

    pub fn signup_page(&self) -> PageView {
        PageView { page: "users:signup" }
    }

    /// Registers a new username.
    pub async fn signup(&self, form: &SignupForm) -> HandlerResult<User> {
        let username = form.validate()?;
        let user = self.store.create_user(&username).await?;

        info!(username = %user.username, "user registered");
        Ok(user)
    }
}
