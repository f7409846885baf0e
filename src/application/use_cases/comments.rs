use tracing::info;

use super::load_visible_video;
use crate::application::dto::{ContentRequest, PageQuery, required_text};
use crate::domain::entities::Comment;
use crate::domain::policy::ensure_owner;
use crate::domain::read_models::{CommentView, Page};
use crate::domain::repositories::Store;
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::error::AppError;

#[derive(Clone)]
pub struct CommentUseCases {
    store: Store,
}

impl CommentUseCases {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Comments on a video, oldest first
    pub async fn list(
        &self,
        caller: ObjectId,
        video: ObjectId,
        page: PageQuery,
    ) -> Result<Page<CommentView>, AppError> {
        let page = page.to_page_request()?;
        load_visible_video(&self.store, video, caller).await?;
        Ok(self.store.comments.list_for_video(video, page).await?)
    }

    pub async fn add(
        &self,
        caller: ObjectId,
        video: ObjectId,
        request: ContentRequest,
    ) -> Result<Comment, AppError> {
        let content = required_text("Content", request.content.as_deref())?;
        load_visible_video(&self.store, video, caller).await?;

        let comment = Comment::new(video, caller, content);
        self.store.comments.insert(&comment).await?;

        info!(comment_id = %comment.id, video_id = %video, "Comment added");
        Ok(comment)
    }

    pub async fn update(
        &self,
        caller: ObjectId,
        id: ObjectId,
        request: ContentRequest,
    ) -> Result<Comment, AppError> {
        let content = required_text("Content", request.content.as_deref())?;
        let mut comment = self.load(id).await?;
        ensure_owner(&comment, caller, "edit this comment")?;

        comment.edit(content);
        if !self.store.comments.update(&comment).await? {
            return Err(AppError::not_found("Comment"));
        }
        Ok(comment)
    }

    pub async fn delete(&self, caller: ObjectId, id: ObjectId) -> Result<(), AppError> {
        let comment = self.load(id).await?;
        ensure_owner(&comment, caller, "delete this comment")?;

        if !self.store.comments.delete(id).await? {
            return Err(AppError::not_found("Comment"));
        }

        info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    async fn load(&self, id: ObjectId) -> Result<Comment, AppError> {
        self.store.comments.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Comment"))
    }
}
