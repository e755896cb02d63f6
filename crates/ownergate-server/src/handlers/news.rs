//! News and comment handler.
//!
//! News items are public and unowned. Comments are public to read; adding
//! one requires a signed-in user and only the author may edit or delete it.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use ownergate_domain::model::parse_resource_id;
use ownergate_domain::validation::CommentForm;
use ownergate_domain::{Action, Comment, Identity, News};
use ownergate_storage::{DataStore, NewComment};

use super::{enforce, FormView, HandlerError, HandlerResult};

/// The news home page.
#[derive(Debug, Clone, Serialize)]
pub struct NewsList {
    pub news: Vec<News>,
}

/// A news item with its comments.
#[derive(Debug, Clone, Serialize)]
pub struct NewsDetail {
    pub news: News,
    pub comments: Vec<Comment>,
    /// Present only for signed-in requesters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_form: Option<FormView<CommentForm>>,
}

/// The edit page of a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentEdit {
    pub comment: Comment,
    pub form: FormView<CommentForm>,
}

/// Handler for news pages and comment operations.
pub struct NewsHandler<S: DataStore> {
    store: Arc<S>,
    news_per_page: usize,
}

impl<S: DataStore> NewsHandler<S> {
    /// Creates a handler showing at most `news_per_page` items on the home page.
    pub fn new(store: Arc<S>, news_per_page: usize) -> Self {
        Self {
            store,
            news_per_page,
        }
    }

    /// Lists the newest news items.
    pub async fn home(&self, identity: &Identity) -> HandlerResult<NewsList> {
        enforce::<News>(identity, None, Action::ReadPublicList)?;
        let news = self.store.list_news(self.news_per_page).await?;
        Ok(NewsList { news })
    }

    /// Shows one news item with its comments, oldest first.
    pub async fn detail(&self, identity: &Identity, news_id: &str) -> HandlerResult<NewsDetail> {
        let news_id = parse_resource_id(news_id)?;
        let news = self.store.get_news(news_id).await?;
        enforce(identity, news.as_ref(), Action::Read)?;
        let news = news.ok_or(HandlerError::NotFound)?;

        let comments = self.store.list_comments(news.id).await?;
        let comment_form = identity.is_authenticated().then(|| FormView {
            fields: CommentForm::FIELDS,
            values: CommentForm::default(),
        });

        Ok(NewsDetail {
            news,
            comments,
            comment_form,
        })
    }

    /// Adds a comment by the requester to a news item.
    pub async fn add_comment(
        &self,
        identity: &Identity,
        news_id: &str,
        form: &CommentForm,
    ) -> HandlerResult<Comment> {
        let news_id = parse_resource_id(news_id)?;
        let news = self.store.get_news(news_id).await?;
        enforce(identity, news.as_ref(), Action::Create)?;
        let author = identity.user_id().ok_or(HandlerError::LoginRequired)?;
        let news = news.ok_or(HandlerError::NotFound)?;

        let text = form.validate()?;
        let comment = self
            .store
            .create_comment(NewComment::new(news.id, author.clone(), text))
            .await?;

        info!(comment_id = comment.id, news_id = news.id, author = %author, "comment created");
        Ok(comment)
    }

    /// Shows the edit form of a comment to its author.
    pub async fn edit_page(&self, identity: &Identity, comment_id: &str) -> HandlerResult<CommentEdit> {
        let comment = self.owned_comment(identity, comment_id, Action::Write).await?;
        let form = FormView {
            fields: CommentForm::FIELDS,
            values: CommentForm::new(comment.text.clone()),
        };
        Ok(CommentEdit { comment, form })
    }

    /// Replaces the text of a comment owned by the requester.
    pub async fn edit_comment(
        &self,
        identity: &Identity,
        comment_id: &str,
        form: &CommentForm,
    ) -> HandlerResult<Comment> {
        let comment = self.owned_comment(identity, comment_id, Action::Write).await?;
        let text = form.validate()?;
        let updated = self.store.update_comment(comment.id, &text).await?;

        info!(comment_id = updated.id, "comment updated");
        Ok(updated)
    }

    /// Shows a comment for delete confirmation to its author.
    pub async fn delete_page(&self, identity: &Identity, comment_id: &str) -> HandlerResult<Comment> {
        self.owned_comment(identity, comment_id, Action::Delete).await
    }

    /// Deletes a comment owned by the requester and returns it.
    pub async fn delete_comment(&self, identity: &Identity, comment_id: &str) -> HandlerResult<Comment> {
        let comment = self.owned_comment(identity, comment_id, Action::Delete).await?;
        self.store.delete_comment(comment.id).await?;

        info!(comment_id = comment.id, news_id = comment.news_id, "comment deleted");
        Ok(comment)
    }

    async fn owned_comment(
        &self,
        identity: &Identity,
        comment_id: &str,
        action: Action,
    ) -> HandlerResult<Comment> {
        let comment_id = parse_resource_id(comment_id)?;
        let comment = self.store.get_comment(comment_id).await?;
        enforce(identity, comment.as_ref(), action)?;
        comment.ok_or(HandlerError::NotFound)
    }
}
