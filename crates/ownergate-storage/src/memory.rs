//! In-memory storage implementation.
//!
//! Rows live in `DashMap`s keyed by id; identifiers come from per-table
//! atomic counters starting at 1. Note slugs are indexed in a separate map
//! whose entry API makes "check then claim" a single atomic step.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, instrument};

use ownergate_domain::validation::NoteDraft;
use ownergate_domain::{Comment, News, Note, User, UserId};

use crate::error::{StorageError, StorageResult};
use crate::traits::{DataStore, HealthStatus, NewComment, NewNews};

/// In-memory implementation of DataStore.
///
/// # Performance Characteristics
///
/// - **Get by id / slug**: O(1) average
/// - **Insert / update / delete**: O(1) average
/// - **List news, comments, notes**: O(N log N) scan and sort of the table
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    users: DashMap<UserId, User>,
    news: DashMap<u64, News>,
    comments: DashMap<u64, Comment>,
    notes: DashMap<u64, Note>,
    /// Slug to owning note id.
    slugs: DashMap<String, u64>,
    news_seq: AtomicU64,
    comment_seq: AtomicU64,
    note_seq: AtomicU64,
}

impl MemoryDataStore {
    /// Creates a new in-memory data store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory data store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn next_id(seq: &AtomicU64) -> u64 {
        seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Claims `slug` for `note_id`, failing if another note holds it.
    fn claim_slug(&self, slug: &str, note_id: u64) -> StorageResult<()> {
        match self.slugs.entry(slug.to_string()) {
            Entry::Occupied(entry) if *entry.get() != note_id => {
                Err(StorageError::SlugAlreadyExists {
                    slug: slug.to_string(),
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(note_id);
                Ok(())
            }
        }
    }

    /// Releases `slug` if `note_id` still holds it.
    fn release_slug(&self, slug: &str, note_id: u64) {
        self.slugs.remove_if(slug, |_, owner| *owner == note_id);
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn create_user(&self, username: &UserId) -> StorageResult<User> {
        match self.users.entry(username.clone()) {
            Entry::Occupied(_) => Err(StorageError::UserAlreadyExists {
                username: username.to_string(),
            }),
            Entry::Vacant(entry) => {
                let user = User {
                    username: username.clone(),
                    joined_at: chrono::Utc::now(),
                };
                entry.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn get_user(&self, username: &UserId) -> StorageResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn create_news(&self, news: NewNews) -> StorageResult<News> {
        if news.title.trim().is_empty() {
            return Err(StorageError::InvalidInput {
                message: "news title cannot be empty".to_string(),
            });
        }

        let item = News {
            id: Self::next_id(&self.news_seq),
            title: news.title,
            text: news.text,
            date: news
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        };
        self.news.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_news(&self, id: u64) -> StorageResult<Option<News>> {
        Ok(self.news.get(&id).map(|n| n.value().clone()))
    }

    async fn list_news(&self, limit: usize) -> StorageResult<Vec<News>> {
        let mut items: Vec<News> = self.news.iter().map(|n| n.value().clone()).collect();
        items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        items.truncate(limit);
        Ok(items)
    }

    #[instrument(skip(self, comment), fields(news_id = comment.news_id, author = %comment.author))]
    async fn create_comment(&self, comment: NewComment) -> StorageResult<Comment> {
        if !self.news.contains_key(&comment.news_id) {
            return Err(StorageError::NewsNotFound {
                news_id: comment.news_id,
            });
        }

        let item = Comment {
            id: Self::next_id(&self.comment_seq),
            news_id: comment.news_id,
            author: comment.author,
            text: comment.text,
            created: comment.created.unwrap_or_else(chrono::Utc::now),
        };
        self.comments.insert(item.id, item.clone());
        debug!(comment_id = item.id, "comment stored");
        Ok(item)
    }

    async fn get_comment(&self, id: u64) -> StorageResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.value().clone()))
    }

    async fn list_comments(&self, news_id: u64) -> StorageResult<Vec<Comment>> {
        let mut items: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.news_id == news_id)
            .map(|c| c.value().clone())
            .collect();
        items.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    #[instrument(skip(self, text))]
    async fn update_comment(&self, id: u64, text: &str) -> StorageResult<Comment> {
        let mut entry = self
            .comments
            .get_mut(&id)
            .ok_or(StorageError::CommentNotFound { comment_id: id })?;
        entry.text = text.to_string();
        Ok(entry.clone())
    }

    #[instrument(skip(self))]
    async fn delete_comment(&self, id: u64) -> StorageResult<()> {
        self.comments
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::CommentNotFound { comment_id: id })
    }

    #[instrument(skip(self, draft), fields(author = %author, slug = %draft.slug))]
    async fn create_note(&self, author: &UserId, draft: NoteDraft) -> StorageResult<Note> {
        let id = Self::next_id(&self.note_seq);
        self.claim_slug(&draft.slug, id)?;

        let note = Note {
            id,
            title: draft.title,
            text: draft.text,
            slug: draft.slug,
            author: author.clone(),
        };
        self.notes.insert(id, note.clone());
        debug!(note_id = id, "note stored");
        Ok(note)
    }

    async fn get_note_by_slug(&self, slug: &str) -> StorageResult<Option<Note>> {
        let id = match self.slugs.get(slug) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.notes.get(&id).map(|n| n.value().clone()))
    }

    async fn list_notes_by_author(&self, author: &UserId) -> StorageResult<Vec<Note>> {
        let mut items: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| &n.author == author)
            .map(|n| n.value().clone())
            .collect();
        items.sort_by_key(|n| n.id);
        Ok(items)
    }

    #[instrument(skip(self, draft), fields(slug = %draft.slug))]
    async fn update_note(&self, id: u64, draft: NoteDraft) -> StorageResult<Note> {
        let old_slug = self
            .notes
            .get(&id)
            .map(|n| n.slug.clone())
            .ok_or(StorageError::NoteNotFound { note_id: id })?;

        self.claim_slug(&draft.slug, id)?;

        let updated = match self.notes.get_mut(&id) {
            Some(mut note) => {
                note.title = draft.title;
                note.text = draft.text;
                note.slug = draft.slug;
                note.clone()
            }
            None => {
                self.release_slug(&draft.slug, id);
                return Err(StorageError::NoteNotFound { note_id: id });
            }
        };

        if old_slug != updated.slug {
            self.release_slug(&old_slug, id);
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_note(&self, id: u64) -> StorageResult<()> {
        let (_, note) = self
            .notes
            .remove(&id)
            .ok_or(StorageError::NoteNotFound { note_id: id })?;
        self.release_slug(&note.slug, id);
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        // In-memory storage has no external dependency to probe.
        Ok(HealthStatus {
            healthy: true,
            backend: "memory",
            message: None,
        })
    }
}
