//! Shared column lists and row mappers for the `PostgreSQL` repositories

use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::domain::entities::{Comment, CommunityPost, Playlist, User, Video};
use crate::domain::read_models::{OwnerSummary, SubscriptionEntry, VideoSummary};
use crate::domain::repositories::RepositoryError;

pub(super) const USER_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, \
     password_hash, refresh_token, created_at, updated_at";

pub(super) const VIDEO_COLUMNS: &str = "v.id, v.video_file, v.thumbnail, v.title, v.description, \
     v.duration, v.views, v.is_published, v.owner_id, v.created_at, v.updated_at";

/// Owner columns joined as `u`
pub(super) const OWNER_COLUMNS: &str =
    "u.id AS owner_user_id, u.username AS owner_username, u.full_name AS owner_full_name, \
     u.avatar AS owner_avatar";

pub(super) fn map_row_to_user(row: &PgRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        avatar: row.try_get("avatar")?,
        cover_image: row.try_get("cover_image")?,
        password_hash: row.try_get("password_hash")?,
        refresh_token: row.try_get("refresh_token")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(super) fn map_row_to_video(row: &PgRow) -> Result<Video, RepositoryError> {
    Ok(Video {
        id: row.try_get("id")?,
        video_file: row.try_get("video_file")?,
        thumbnail: row.try_get("thumbnail")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        duration: row.try_get("duration")?,
        views: row.try_get("views")?,
        is_published: row.try_get("is_published")?,
        owner: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(super) fn map_row_to_owner(row: &PgRow) -> Result<OwnerSummary, RepositoryError> {
    Ok(OwnerSummary {
        id: row.try_get("owner_user_id")?,
        username: row.try_get("owner_username")?,
        full_name: row.try_get("owner_full_name")?,
        avatar: row.try_get("owner_avatar")?,
    })
}

/// Row selected with [`VIDEO_COLUMNS`] and [`OWNER_COLUMNS`]
pub(super) fn map_row_to_video_summary(row: &PgRow) -> Result<VideoSummary, RepositoryError> {
    let video = map_row_to_video(row)?;
    Ok(VideoSummary::new(&video, map_row_to_owner(row)?))
}

pub(super) fn map_row_to_comment(row: &PgRow) -> Result<Comment, RepositoryError> {
    Ok(Comment {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        video: row.try_get("video_id")?,
        owner: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(super) fn map_row_to_community_post(row: &PgRow) -> Result<CommunityPost, RepositoryError> {
    Ok(CommunityPost {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        owner: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Playlist row without its videos
pub(super) fn map_row_to_playlist(row: &PgRow) -> Result<Playlist, RepositoryError> {
    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        owner: row.try_get("owner_id")?,
        is_private: row.try_get("is_private")?,
        videos: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(super) fn map_row_to_subscription_entry(
    row: &PgRow,
) -> Result<SubscriptionEntry, RepositoryError> {
    Ok(SubscriptionEntry {
        id: row.try_get("id")?,
        user: map_row_to_owner(row)?,
        subscribed_at: row.try_get("created_at")?,
    })
}

/// Non-negative count column as `u64`
pub(super) fn count(row: &PgRow, column: &str) -> Result<u64, RepositoryError> {
    let value: i64 = row.try_get(column)?;
    u64::try_from(value).map_err(|_| RepositoryError::Corrupt(format!("negative {column}")))
}
