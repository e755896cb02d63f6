//! Personal notes handler.
//!
//! Every notes page except the home page requires a signed-in user, and a
//! note is visible only to its author.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use ownergate_domain::slug::parse_slug;
use ownergate_domain::validation::{slug_taken_message, FormErrors, NoteDraft, NoteForm};
use ownergate_domain::{Action, Identity, Note};
use ownergate_storage::{DataStore, StorageError};

use super::{enforce, FormView, HandlerError, HandlerResult, PageView};

/// The requester's notes.
#[derive(Debug, Clone, Serialize)]
pub struct NoteList {
    pub notes: Vec<Note>,
}

/// Handler for note pages and note operations.
pub struct NotesHandler<S: DataStore> {
    store: Arc<S>,
}

impl<S: DataStore> NotesHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The notes home page; open to everyone.
    pub fn home(&self, identity: &Identity) -> HandlerResult<PageView> {
        enforce::<Note>(identity, None, Action::ReadPublicList)?;
        Ok(PageView { page: "notes:home" })
    }

    /// Lists the requester's own notes.
    pub async fn list(&self, identity: &Identity) -> HandlerResult<NoteList> {
        enforce::<Note>(identity, None, Action::ListOwn)?;
        let author = identity.user_id().ok_or(HandlerError::LoginRequired)?;
        let notes = self.store.list_notes_by_author(author).await?;
        Ok(NoteList { notes })
    }

    /// The empty note form.
    pub fn add_page(&self, identity: &Identity) -> HandlerResult<FormView<NoteForm>> {
        enforce::<Note>(identity, None, Action::Create)?;
        Ok(FormView {
            fields: NoteForm::FIELDS,
            values: NoteForm::default(),
        })
    }

    /// Creates a note owned by the requester.
    pub async fn create(&self, identity: &Identity, form: &NoteForm) -> HandlerResult<Note> {
        enforce::<Note>(identity, None, Action::Create)?;
        let author = identity.user_id().ok_or(HandlerError::LoginRequired)?;
        let draft = form.validate()?;

        let note = self
            .store
            .create_note(author, draft)
            .await
            .map_err(slug_conflict)?;

        info!(note_id = note.id, slug = %note.slug, author = %author, "note created");
        Ok(note)
    }

    /// The page shown after a successful add, edit or delete.
    pub fn done(&self, identity: &Identity) -> HandlerResult<PageView> {
        enforce::<Note>(identity, None, Action::ListOwn)?;
        Ok(PageView { page: "notes:success" })
    }

    /// Shows one of the requester's notes.
    pub async fn detail(&self, identity: &Identity, slug: &str) -> HandlerResult<Note> {
        self.owned_note(identity, slug, Action::Read).await
    }

    /// The note form filled with the current values.
    pub async fn edit_page(
        &self,
        identity: &Identity,
        slug: &str,
    ) -> HandlerResult<FormView<NoteForm>> {
        let note = self.owned_note(identity, slug, Action::Write).await?;
        Ok(FormView {
            fields: NoteForm::FIELDS,
            values: NoteForm {
                title: note.title,
                text: note.text,
                slug: Some(note.slug),
            },
        })
    }

    /// Replaces title, text and slug of one of the requester's notes.
    pub async fn update(&self, identity: &Identity, slug: &str, form: &NoteForm) -> HandlerResult<Note> {
        let note = self.owned_note(identity, slug, Action::Write).await?;
        let draft: NoteDraft = form.validate()?;

        let updated = self
            .store
            .update_note(note.id, draft)
            .await
            .map_err(slug_conflict)?;

        info!(note_id = updated.id, slug = %updated.slug, "note updated");
        Ok(updated)
    }

    /// Shows a note for delete confirmation.
    pub async fn delete_page(&self, identity: &Identity, slug: &str) -> HandlerResult<Note> {
        self.owned_note(identity, slug, Action::Delete).await
    }

    /// Deletes one of the requester's notes.
    pub async fn delete(&self, identity: &Identity, slug: &str) -> HandlerResult<Note> {
        let note = self.owned_note(identity, slug, Action::Delete).await?;
        self.store.delete_note(note.id).await?;

        info!(note_id = note.id, slug = %note.slug, "note deleted");
        Ok(note)
    }

    async fn owned_note(&self, identity: &Identity, slug: &str, action: Action) -> HandlerResult<Note> {
        let slug = parse_slug(slug)?;
        let note = self.store.get_note_by_slug(slug).await?;
        enforce(identity, note.as_ref(), action)?;
        note.ok_or(HandlerError::NotFound)
    }
}

/// A taken slug is reported on the form rather than as a conflict.
fn slug_conflict(err: StorageError) -> HandlerError {
    match err {
        StorageError::SlugAlreadyExists { slug } => {
            HandlerError::Form(FormErrors::single("slug", slug_taken_message(&slug)))
        }
        other => other.into(),
    }
}
