//! Ownership-scoped access decisions.
//!
//! [`authorize`] is the single gate in front of storage. It answers one of
//! three outward results for every request:
//!
//! | Requester | Public read | Create / list own | Write, delete, private read |
//! |-----------|-------------|-------------------|-----------------------------|
//! | Anonymous | Allow | RedirectToLogin | RedirectToLogin |
//! | Owner | Allow | Allow | Allow |
//! | Other user | Allow | Allow | NotFound |
//! | Any user, resource absent | Allow | Allow | NotFound |
//!
//! Non-owners get `NotFound` rather than a "forbidden" answer so that a
//! resource they do not own is indistinguishable from one that does not
//! exist. The anonymous check runs before the presence check for the same
//! reason: an anonymous requester is redirected whether or not the target
//! exists.

mod redirect;

#[cfg(test)]
mod decision_proptest;

use std::fmt;

use crate::model::{Comment, Identity, News, Note, UserId};

pub use redirect::LoginRedirect;

/// Who may read a kind of resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Shared content anyone may read.
    Public,
    /// Readable by its owner only.
    Private,
}

/// The operation a request wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List shared content (home pages).
    ReadPublicList,
    /// Read a single resource.
    Read,
    /// Add a new resource.
    Create,
    /// List the requester's own resources, or view a page that only makes
    /// sense for a signed-in user.
    ListOwn,
    /// Modify an existing resource.
    Write,
    /// Remove an existing resource.
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ReadPublicList => "read_public_list",
            Action::Read => "read",
            Action::Create => "create",
            Action::ListOwn => "list_own",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    /// Proceed with the action.
    Allow,
    /// Send the requester to the login page, remembering where they were.
    RedirectToLogin,
    /// Answer as if the resource did not exist.
    NotFound,
}

impl AccessDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::RedirectToLogin => "redirect_to_login",
            AccessDecision::NotFound => "not_found",
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource kind that sits behind the authorizer.
///
/// Visibility is a property of the kind rather than of a value, so it is
/// known even when the requested resource does not exist.
pub trait Guarded {
    /// Who may read resources of this kind.
    const VISIBILITY: Visibility;

    /// The user that created the resource, if it has one.
    fn owner_id(&self) -> Option<&UserId>;

    /// Returns true if `user_id` owns this resource.
    fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id() == Some(user_id)
    }
}

impl Guarded for News {
    const VISIBILITY: Visibility = Visibility::Public;

    fn owner_id(&self) -> Option<&UserId> {
        None
    }
}

impl Guarded for Comment {
    const VISIBILITY: Visibility = Visibility::Public;

    fn owner_id(&self) -> Option<&UserId> {
        Some(&self.author)
    }
}

impl Guarded for Note {
    const VISIBILITY: Visibility = Visibility::Private;

    fn owner_id(&self) -> Option<&UserId> {
        Some(&self.author)
    }
}

/// Decides whether `identity` may perform `action` on `resource`.
///
/// `resource` is `None` when the requested resource does not exist. The
/// function is pure: identical inputs always give identical decisions.
pub fn authorize<R: Guarded>(
    identity: &Identity,
    resource: Option<&R>,
    action: Action,
) -> AccessDecision {
    match action {
        Action::ReadPublicList => AccessDecision::Allow,
        Action::Read if R::VISIBILITY == Visibility::Public => AccessDecision::Allow,
        Action::Create | Action::ListOwn => match identity {
            Identity::Anonymous => AccessDecision::RedirectToLogin,
            Identity::Authenticated(_) => AccessDecision::Allow,
        },
        Action::Read | Action::Write | Action::Delete => {
            let user_id = match identity {
                Identity::Anonymous => return AccessDecision::RedirectToLogin,
                Identity::Authenticated(user_id) => user_id,
            };
            match resource {
                Some(resource) if resource.is_owned_by(user_id) => AccessDecision::Allow,
                _ => AccessDecision::NotFound,
            }
        }
    }
}
