//! Shared test utilities for ownergate API tests.
//!
//! Fixtures follow the news and notes pages: two users (`author` and
//! `reader`), news items with comments, and one note owned by `author`.

// Allow dead_code because helpers are used across different test files,
// but each test file is compiled independently and can't see cross-file usage.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use chrono::{Duration, NaiveDate, Utc};

use ownergate_api::http::{create_router, AppState};
use ownergate_domain::validation::NoteDraft;
use ownergate_domain::{Comment, News, Note, User, UserId};
use ownergate_storage::{
    DataStore, HealthStatus, MemoryDataStore, NewComment, NewNews, StorageError, StorageResult,
};

// =============================================================================
// Test Constants
// =============================================================================

/// Header carrying the authenticated username, as configured by default.
pub const IDENTITY_HEADER: &str = "x-authenticated-user";

pub const AUTHOR: &str = "author";
pub const READER: &str = "reader";

pub const NOTE_SLUG: &str = "zagolovok";

/// News items on the home page, as configured by default.
pub const NEWS_PER_PAGE: usize = 10;

// =============================================================================
// Apps and fixtures
// =============================================================================

/// Create a test app over `storage`.
///
/// Each call creates a fresh `AppState` wrapping the shared storage,
/// which is the correct pattern for Axum's `oneshot` testing.
pub fn create_test_app<S: DataStore>(storage: &Arc<S>) -> axum::Router {
    create_router(AppState::new(Arc::clone(storage)))
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

/// One news item with no comments.
pub async fn create_news(storage: &MemoryDataStore) -> News {
    storage
        .create_news(NewNews::new("Заголовок", "Текст"))
        .await
        .unwrap()
}

/// One more news item than fits on the home page, one day apart.
pub async fn create_news_archive(storage: &MemoryDataStore) -> Vec<News> {
    let today = Utc::now().date_naive();
    let mut created = Vec::new();
    for index in 0..=NEWS_PER_PAGE {
        let date: NaiveDate = today - Duration::days(index as i64);
        let news = storage
            .create_news(NewNews::new(format!("Новость {index}"), "Просто текст.").with_date(date))
            .await
            .unwrap();
        created.push(news);
    }
    created
}

/// A comment by `author` on `news`.
pub async fn create_comment(storage: &MemoryDataStore, news: &News, author: &str) -> Comment {
    storage
        .create_comment(NewComment::new(news.id, user(author), "Текст комментария"))
        .await
        .unwrap()
}

/// Ten comments by `author` on `news`, created one day apart.
pub async fn create_comment_thread(storage: &MemoryDataStore, news: &News) -> Vec<Comment> {
    let now = Utc::now();
    let mut created = Vec::new();
    for index in 0..10 {
        let comment = storage
            .create_comment(
                NewComment::new(news.id, user(AUTHOR), format!("Текст {index}"))
                    .created_at(now + Duration::days(index)),
            )
            .await
            .unwrap();
        created.push(comment);
    }
    created
}

/// A note owned by `author` with slug [`NOTE_SLUG`].
pub async fn create_note(storage: &MemoryDataStore) -> Note {
    storage
        .create_note(
            &user(AUTHOR),
            NoteDraft {
                title: "Заголовок".to_string(),
                text: "Текст".to_string(),
                slug: NOTE_SLUG.to_string(),
            },
        )
        .await
        .unwrap()
}

// =============================================================================
// Requests
// =============================================================================

/// GET `uri`, as `user` when given.
pub fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST a JSON body to `uri`, as `user` when given.
pub fn post_json(uri: &str, user: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// POST with no body, as `user` when given.
pub fn post_empty(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST an HTML-style form body to `uri`, as `user` when given.
pub fn post_form(uri: &str, user: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Expected login redirect for `path`.
pub fn login_redirect(path: &str) -> String {
    format!("/auth/login/?next={path}")
}

// =============================================================================
// Failing storage
// =============================================================================

/// A storage backend whose every operation fails with a connection error.
pub struct FailingDataStore;

fn unavailable<T>() -> StorageResult<T> {
    Err(StorageError::ConnectionError {
        message: "connection refused".to_string(),
    })
}

#[async_trait]
impl DataStore for FailingDataStore {
    async fn create_user(&self, _username: &UserId) -> StorageResult<User> {
        unavailable()
    }

    async fn get_user(&self, _username: &UserId) -> StorageResult<Option<User>> {
        unavailable()
    }

    async fn create_news(&self, _news: NewNews) -> StorageResult<News> {
        unavailable()
    }

    async fn get_news(&self, _id: u64) -> StorageResult<Option<News>> {
        unavailable()
    }

    async fn list_news(&self, _limit: usize) -> StorageResult<Vec<News>> {
        unavailable()
    }

    async fn create_comment(&self, _comment: NewComment) -> StorageResult<Comment> {
        unavailable()
    }

    async fn get_comment(&self, _id: u64) -> StorageResult<Option<Comment>> {
        unavailable()
    }

    async fn list_comments(&self, _news_id: u64) -> StorageResult<Vec<Comment>> {
        unavailable()
    }

    async fn update_comment(&self, _id: u64, _text: &str) -> StorageResult<Comment> {
        unavailable()
    }

    async fn delete_comment(&self, _id: u64) -> StorageResult<()> {
        unavailable()
    }

    async fn create_note(&self, _author: &UserId, _draft: NoteDraft) -> StorageResult<Note> {
        unavailable()
    }

    async fn get_note_by_slug(&self, _slug: &str) -> StorageResult<Option<Note>> {
        unavailable()
    }

    async fn list_notes_by_author(&self, _author: &UserId) -> StorageResult<Vec<Note>> {
        unavailable()
    }

    async fn update_note(&self, _id: u64, _draft: NoteDraft) -> StorageResult<Note> {
        unavailable()
    }

    async fn delete_note(&self, _id: u64) -> StorageResult<()> {
        unavailable()
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        unavailable()
    }
}
