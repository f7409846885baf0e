use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Comment, CommunityPost, Like, Playlist, Subscription, User, Video};
use crate::domain::read_models::{
    CommentView, LikedVideo, Page, PageRequest, PlaylistDetail, PlaylistSummary,
    SubscriptionEntry, VideoDetail, VideoSummary,
};
use crate::domain::value_objects::{LikeTarget, ObjectId, SortDirection, VideoSortField};

/// Storage-level failures shared by every repository implementation
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} with this {field} already exists")]
    Duplicate { entity: String, field: String },

    #[error("referenced {entity} does not exist")]
    MissingReference { entity: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Result of flipping a relation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToggleOutcome<T> {
    /// The relation did not exist and was created
    Created(T),
    /// The relation existed and was deleted; serializes as `{}`
    Removed {},
}

impl<T> ToggleOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Published-video text search
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSearch {
    /// Lower-cased, de-duplicated search terms; never empty
    pub terms: Vec<String>,
    pub sort_by: VideoSortField,
    pub sort_type: SortDirection,
    pub page: PageRequest,
}

impl VideoSearch {
    /// Split a raw query into search terms.
    ///
    /// Terms are alphanumeric runs, lower-cased, in first-seen order.
    pub fn terms_of(query: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for term in query.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; duplicate username or email fails with [`RepositoryError::Duplicate`]
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError>;

    /// Find by username or email (both stored lower-cased)
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepositoryError>;

    /// Replace the stored refresh token; returns `false` when the user is gone
    async fn set_refresh_token(
        &self,
        id: ObjectId,
        token: Option<&str>,
    ) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn insert(&self, video: &Video) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Video>, RepositoryError>;

    /// Persist the mutable fields; returns `false` when the video is gone
    async fn update(&self, video: &Video) -> Result<bool, RepositoryError>;

    /// Delete the video with its comments, the likes on both, and playlist entries
    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError>;

    /// Published videos matching any search term, ranked then sorted and paginated
    async fn search_published(
        &self,
        search: &VideoSearch,
    ) -> Result<Page<VideoSummary>, RepositoryError>;

    /// Video with owner channel data and like/subscription flags for `viewer`
    async fn find_detail(
        &self,
        id: ObjectId,
        viewer: ObjectId,
    ) -> Result<Option<VideoDetail>, RepositoryError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Comment>, RepositoryError>;

    async fn update(&self, comment: &Comment) -> Result<bool, RepositoryError>;

    /// Delete the comment and the likes on it
    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError>;

    /// Comments on a video, oldest first
    async fn list_for_video(
        &self,
        video: ObjectId,
        page: PageRequest,
    ) -> Result<Page<CommentView>, RepositoryError>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Delete the caller's like on `target` if present, otherwise create it.
    ///
    /// Runs as one unit; at most one like exists per (actor, target).
    async fn toggle(
        &self,
        actor: ObjectId,
        target: LikeTarget,
    ) -> Result<ToggleOutcome<Like>, RepositoryError>;

    /// Videos liked by `user` that are published or owned by `user`, newest like first
    async fn liked_videos(&self, user: ObjectId) -> Result<Vec<LikedVideo>, RepositoryError>;
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn insert(&self, playlist: &Playlist) -> Result<(), RepositoryError>;

    /// Playlist with its video ids in order
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Playlist>, RepositoryError>;

    /// Persist name, description and privacy
    async fn update(&self, playlist: &Playlist) -> Result<bool, RepositoryError>;

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError>;

    /// Append a video; returns `false` when it is already in the playlist
    async fn add_video(&self, playlist: ObjectId, video: ObjectId) -> Result<bool, RepositoryError>;

    /// Returns `false` when the video was not in the playlist
    async fn remove_video(
        &self,
        playlist: ObjectId,
        video: ObjectId,
    ) -> Result<bool, RepositoryError>;

    /// Playlists of `owner`, newest first; private ones only when `include_private`
    async fn list_for_owner(
        &self,
        owner: ObjectId,
        include_private: bool,
    ) -> Result<Vec<PlaylistSummary>, RepositoryError>;

    /// Playlist with owner data and its published videos in playlist order
    async fn find_detail(&self, id: ObjectId) -> Result<Option<PlaylistDetail>, RepositoryError>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Unsubscribe if subscribed, otherwise subscribe
    async fn toggle(
        &self,
        subscription: Subscription,
    ) -> Result<ToggleOutcome<Subscription>, RepositoryError>;

    /// Users subscribed to `channel`, newest first
    async fn subscribers_of(
        &self,
        channel: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError>;

    /// Channels `subscriber` follows, newest first
    async fn channels_of(
        &self,
        subscriber: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError>;
}

#[async_trait]
pub trait CommunityPostRepository: Send + Sync {
    async fn insert(&self, post: &CommunityPost) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CommunityPost>, RepositoryError>;

    async fn update(&self, post: &CommunityPost) -> Result<bool, RepositoryError>;

    /// Delete the post and the likes on it
    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError>;

    /// Posts of `owner`, newest first
    async fn list_for_owner(&self, owner: ObjectId)
    -> Result<Vec<CommunityPost>, RepositoryError>;
}

/// Connectivity probe for readiness checks
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Handle to every repository, cloned into each request's state
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub videos: Arc<dyn VideoRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub community_posts: Arc<dyn CommunityPostRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_of_splits_and_dedupes() {
        assert_eq!(VideoSearch::terms_of("Rust, rust & Tokio!"), vec!["rust", "tokio"]);
        assert!(VideoSearch::terms_of("  ?! ").is_empty());
    }

    #[test]
    fn test_removed_toggle_serializes_as_empty_object() {
        let removed: ToggleOutcome<u8> = ToggleOutcome::Removed {};
        assert_eq!(serde_json::to_string(&removed).unwrap(), "{}");
        assert!(ToggleOutcome::Created(1).is_created());
    }
}
