use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use super::{ApiPath, AppState};
use crate::domain::entities::Like;
use crate::domain::read_models::LikedVideo;
use crate::domain::repositories::ToggleOutcome;
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::{AppError, CurrentUser};
use crate::presentation::response::ApiResponse;

fn toggled(outcome: ToggleOutcome<Like>, target: &str) -> ApiResponse<ToggleOutcome<Like>> {
    let message = if outcome.is_created() {
        format!("{target} liked")
    } else {
        format!("{target} unliked")
    };
    ApiResponse::ok(outcome, message)
}

/// `POST /likes/toggle/v/{videoId}`
pub async fn toggle_video_like(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(video), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<ToggleOutcome<Like>>, AppError> {
    let outcome = state.likes.toggle_video(user.id, video).await?;
    Ok(toggled(outcome, "Video"))
}

/// `POST /likes/toggle/c/{commentId}`
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(comment), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<ToggleOutcome<Like>>, AppError> {
    let outcome = state.likes.toggle_comment(user.id, comment).await?;
    Ok(toggled(outcome, "Comment"))
}

/// `POST /likes/toggle/p/{communityPostId}`
pub async fn toggle_community_post_like(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(post), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<ToggleOutcome<Like>>, AppError> {
    let outcome = state.likes.toggle_community_post(user.id, post).await?;
    Ok(toggled(outcome, "Community post"))
}

/// `GET /likes/videos`
pub async fn liked_videos(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<ApiResponse<Vec<LikedVideo>>, AppError> {
    let videos = state.likes.liked_videos(user.id).await?;
    let message =
        if videos.is_empty() { "User has no liked videos" } else { "Liked videos fetched successfully" };
    Ok(ApiResponse::ok(videos, message))
}
