//! Core type definitions for identities and resources.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// An authenticated user's identifier (e.g., "alice").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, rejecting empty values and surrounding whitespace.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() || value.trim() != value {
            return Err(DomainError::InvalidUserId { value });
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// The requester of a single request.
///
/// Resolved by the transport layer before any decision is made and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Anonymous,
    Authenticated(UserId),
}

impl Identity {
    /// Convenience constructor for an authenticated identity.
    pub fn user(value: impl Into<String>) -> DomainResult<Self> {
        UserId::new(value).map(Identity::Authenticated)
    }

    /// Returns the user id when authenticated.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(id) => Some(id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Anonymous => f.write_str("anonymous"),
            Identity::Authenticated(id) => write!(f, "user:{id}"),
        }
    }
}

/// Parses a numeric resource identifier taken from a request path.
pub fn parse_resource_id(value: &str) -> DomainResult<u64> {
    value
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| DomainError::InvalidResourceId {
            value: value.to_string(),
        })
}

/// A news item. Public and unowned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

/// A comment left on a news item by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub news_id: u64,
    pub author: UserId,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A private note. Addressed by its unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: UserId,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_empty_and_padded_values() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new(" alice").is_err());
        assert!(UserId::new("alice ").is_err());
        assert_eq!(UserId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_user_id_deserialization_is_validated() {
        let ok: Result<UserId, _> = serde_json::from_str(r#""bob""#);
        assert_eq!(ok.unwrap().as_str(), "bob");

        let bad: Result<UserId, _> = serde_json::from_str(r#""""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_identity_accessors() {
        let anon = Identity::Anonymous;
        assert!(!anon.is_authenticated());
        assert!(anon.user_id().is_none());
        assert_eq!(anon.to_string(), "anonymous");

        let alice = Identity::user("alice").unwrap();
        assert!(alice.is_authenticated());
        assert_eq!(alice.user_id().map(UserId::as_str), Some("alice"));
        assert_eq!(alice.to_string(), "user:alice");
    }

    #[test]
    fn test_parse_resource_id() {
        assert_eq!(parse_resource_id("42"), Ok(42));
        assert!(parse_resource_id("0").is_err());
        assert!(parse_resource_id("-1").is_err());
        assert!(parse_resource_id("abc").is_err());
        assert!(parse_resource_id("").is_err());
    }
}
