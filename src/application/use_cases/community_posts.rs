use tracing::info;

use super::load_user;
use crate::application::dto::{ContentRequest, required_text};
use crate::domain::entities::CommunityPost;
use crate::domain::policy::ensure_owner;
use crate::domain::repositories::Store;
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::error::AppError;

#[derive(Clone)]
pub struct CommunityPostUseCases {
    store: Store,
}

impl CommunityPostUseCases {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: ObjectId,
        request: ContentRequest,
    ) -> Result<CommunityPost, AppError> {
        let content = required_text("Content", request.content.as_deref())?;
        let post = CommunityPost::new(caller, content);
        self.store.community_posts.insert(&post).await?;

        info!(post_id = %post.id, owner = %caller, "Community post created");
        Ok(post)
    }

    /// Posts of an existing user, newest first
    pub async fn list_for_user(&self, user: ObjectId) -> Result<Vec<CommunityPost>, AppError> {
        load_user(&self.store, user).await?;
        Ok(self.store.community_posts.list_for_owner(user).await?)
    }

    pub async fn update(
        &self,
        caller: ObjectId,
        id: ObjectId,
        request: ContentRequest,
    ) -> Result<CommunityPost, AppError> {
        let content = required_text("Content", request.content.as_deref())?;
        let mut post = self.load(id).await?;
        ensure_owner(&post, caller, "edit this community post")?;

        post.edit(content);
        if !self.store.community_posts.update(&post).await? {
            return Err(AppError::not_found("Community post"));
        }
        Ok(post)
    }

    pub async fn delete(&self, caller: ObjectId, id: ObjectId) -> Result<(), AppError> {
        let post = self.load(id).await?;
        ensure_owner(&post, caller, "delete this community post")?;

        if !self.store.community_posts.delete(id).await? {
            return Err(AppError::not_found("Community post"));
        }

        info!(post_id = %id, "Community post deleted");
        Ok(())
    }

    async fn load(&self, id: ObjectId) -> Result<CommunityPost, AppError> {
        self.store
            .community_posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Community post"))
    }
}
