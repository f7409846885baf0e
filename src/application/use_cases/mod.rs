mod comments;
mod community_posts;
mod likes;
mod playlists;
mod subscriptions;
mod users;
mod videos;

pub use comments::CommentUseCases;
pub use community_posts::CommunityPostUseCases;
pub use likes::LikeUseCases;
pub use playlists::PlaylistUseCases;
pub use subscriptions::SubscriptionUseCases;
pub use users::UserUseCases;
pub use videos::VideoUseCases;

use tracing::warn;

use crate::domain::entities::{User, Video};
use crate::domain::repositories::Store;
use crate::domain::value_objects::ObjectId;
use crate::infrastructure::storage::MediaStorage;
use crate::presentation::middleware::error::AppError;

/// Best-effort removal of assets whose database write never happened
async fn discard_uploads(media: &dyn MediaStorage, urls: &[&str]) {
    for url in urls.iter().filter(|url| !url.is_empty()) {
        match media.delete(url).await {
            Ok(_) => {}
            Err(e) => warn!(url = %url, error = %e, "Failed to discard uploaded asset"),
        }
    }
}

async fn load_user(store: &Store, id: ObjectId) -> Result<User, AppError> {
    store.users.find_by_id(id).await?.ok_or_else(|| AppError::not_found("User"))
}

/// A video the caller may see: published, or owned by the caller
async fn load_visible_video(
    store: &Store,
    id: ObjectId,
    caller: ObjectId,
) -> Result<Video, AppError> {
    store
        .videos
        .find_by_id(id)
        .await?
        .filter(|video| video.is_published || video.owner == caller)
        .ok_or_else(|| AppError::not_found("Video"))
}
