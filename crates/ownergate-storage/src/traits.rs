//! DataStore trait definition.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use ownergate_domain::validation::NoteDraft;
use ownergate_domain::{Comment, News, Note, User, UserId};

use crate::error::StorageResult;

/// A news item to insert.
#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub text: String,
    /// Publication date; today when not given.
    pub date: Option<NaiveDate>,
}

impl NewNews {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// A comment to insert.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub news_id: u64,
    pub author: UserId,
    pub text: String,
    /// Creation time; now when not given.
    pub created: Option<DateTime<Utc>>,
}

impl NewComment {
    pub fn new(news_id: u64, author: UserId, text: impl Into<String>) -> Self {
        Self {
            news_id,
            author,
            text: text.into(),
            created: None,
        }
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Result of a storage health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub backend: &'static str,
    pub message: Option<String>,
}

/// Abstract storage interface for users, news, comments and notes.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations. Single-row lookups return `Ok(None)` when the row
/// does not exist.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    // User operations

    /// Registers a user. Fails if the username is taken.
    async fn create_user(&self, username: &UserId) -> StorageResult<User>;

    /// Gets a user by username.
    async fn get_user(&self, username: &UserId) -> StorageResult<Option<User>>;

    // News operations

    /// Inserts a news item.
    async fn create_news(&self, news: NewNews) -> StorageResult<News>;

    /// Gets a news item by ID.
    async fn get_news(&self, id: u64) -> StorageResult<Option<News>>;

    /// Lists at most `limit` news items, newest date first.
    async fn list_news(&self, limit: usize) -> StorageResult<Vec<News>>;

    // Comment operations

    /// Inserts a comment. Fails if the news item does not exist.
    async fn create_comment(&self, comment: NewComment) -> StorageResult<Comment>;

    /// Gets a comment by ID.
    async fn get_comment(&self, id: u64) -> StorageResult<Option<Comment>>;

    /// Lists the comments of a news item, oldest first.
    async fn list_comments(&self, news_id: u64) -> StorageResult<Vec<Comment>>;

    /// Replaces a comment's text. Author and timestamps are unchanged.
    async fn update_comment(&self, id: u64, text: &str) -> StorageResult<Comment>;

    /// Deletes a comment.
    async fn delete_comment(&self, id: u64) -> StorageResult<()>;

    // Note operations

    /// Inserts a note owned by `author`. Fails if the slug is taken.
    async fn create_note(&self, author: &UserId, draft: NoteDraft) -> StorageResult<Note>;

    /// Gets a note by slug.
    async fn get_note_by_slug(&self, slug: &str) -> StorageResult<Option<Note>>;

    /// Lists the notes of one author in creation order.
    async fn list_notes_by_author(&self, author: &UserId) -> StorageResult<Vec<Note>>;

    /// Replaces a note's title, text and slug. The author is unchanged.
    /// Fails if the new slug belongs to a different note.
    async fn update_note(&self, id: u64, draft: NoteDraft) -> StorageResult<Note>;

    /// Deletes a note and releases its slug.
    async fn delete_note(&self, id: u64) -> StorageResult<()>;

    /// Reports whether the backend can serve requests.
    async fn health_check(&self) -> StorageResult<HealthStatus>;
}
