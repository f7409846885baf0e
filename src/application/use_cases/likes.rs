use tracing::info;

use super::load_visible_video;
use crate::domain::entities::Like;
use crate::domain::read_models::LikedVideo;
use crate::domain::repositories::{Store, ToggleOutcome};
use crate::domain::value_objects::{LikeTarget, ObjectId};
use crate::presentation::middleware::error::AppError;

/// Like toggles on videos, comments and community posts
#[derive(Clone)]
pub struct LikeUseCases {
    store: Store,
}

impl LikeUseCases {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn toggle_video(
        &self,
        caller: ObjectId,
        video: ObjectId,
    ) -> Result<ToggleOutcome<Like>, AppError> {
        load_visible_video(&self.store, video, caller).await?;
        self.toggle(caller, LikeTarget::Video(video)).await
    }

    pub async fn toggle_comment(
        &self,
        caller: ObjectId,
        comment: ObjectId,
    ) -> Result<ToggleOutcome<Like>, AppError> {
        if self.store.comments.find_by_id(comment).await?.is_none() {
            return Err(AppError::not_found("Comment"));
        }
        self.toggle(caller, LikeTarget::Comment(comment)).await
    }

    pub async fn toggle_community_post(
        &self,
        caller: ObjectId,
        post: ObjectId,
    ) -> Result<ToggleOutcome<Like>, AppError> {
        if self.store.community_posts.find_by_id(post).await?.is_none() {
            return Err(AppError::not_found("Community post"));
        }
        self.toggle(caller, LikeTarget::CommunityPost(post)).await
    }

    /// Videos the caller liked, newest like first
    pub async fn liked_videos(&self, caller: ObjectId) -> Result<Vec<LikedVideo>, AppError> {
        Ok(self.store.likes.liked_videos(caller).await?)
    }

    async fn toggle(
        &self,
        caller: ObjectId,
        target: LikeTarget,
    ) -> Result<ToggleOutcome<Like>, AppError> {
        let outcome = self.store.likes.toggle(caller, target).await?;
        info!(
            user_id = %caller,
            target = target.kind().as_str(),
            target_id = %target.id(),
            liked = outcome.is_created(),
            "Like toggled"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{harness, seed_user, seed_video};
    use crate::domain::entities::{Comment, CommunityPost};
    use crate::domain::value_objects::LikeTargetKind;

    #[tokio::test]
    async fn test_toggle_video_like_twice_round_trips() {
        let h = harness();
        let user = seed_user(&h.store, "alice").await;
        let video = seed_video(&h.store, &user, "Intro").await;
        let likes = LikeUseCases::new(h.store.clone());

        let created = likes.toggle_video(user.id, video.id).await.unwrap();
        let ToggleOutcome::Created(like) = created else { panic!("expected a like record") };
        assert_eq!(like.target, LikeTarget::Video(video.id));
        assert_eq!(likes.liked_videos(user.id).await.unwrap().len(), 1);

        let removed = likes.toggle_video(user.id, video.id).await.unwrap();
        assert_eq!(removed, ToggleOutcome::Removed {});
        assert_eq!(serde_json::to_value(&removed).unwrap(), serde_json::json!({}));
        assert!(likes.liked_videos(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_like_targets_the_comment() {
        let h = harness();
        let user = seed_user(&h.store, "alice").await;
        let video = seed_video(&h.store, &user, "Intro").await;
        let comment = Comment::new(video.id, user.id, "nice".into());
        h.store.comments.insert(&comment).await.unwrap();
        let likes = LikeUseCases::new(h.store.clone());

        let ToggleOutcome::Created(like) = likes.toggle_comment(user.id, comment.id).await.unwrap()
        else {
            panic!("expected a like record");
        };

        assert_eq!(like.target.kind(), LikeTargetKind::Comment);
        assert_eq!(like.target.id(), comment.id);
        assert!(likes.liked_videos(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_requires_existing_target() {
        let h = harness();
        let user = seed_user(&h.store, "alice").await;
        let likes = LikeUseCases::new(h.store.clone());

        for result in [
            likes.toggle_video(user.id, ObjectId::new()).await,
            likes.toggle_comment(user.id, ObjectId::new()).await,
            likes.toggle_community_post(user.id, ObjectId::new()).await,
        ] {
            assert!(matches!(result, Err(AppError::NotFound { .. })));
        }

        let post = CommunityPost::new(user.id, "hello".into());
        h.store.community_posts.insert(&post).await.unwrap();
        assert!(likes.toggle_community_post(user.id, post.id).await.unwrap().is_created());
    }
}
