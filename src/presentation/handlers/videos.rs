use axum::extract::{Path, Query, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::multipart::FormData;
use super::{ApiMultipart, ApiPath, ApiQuery, AppState};
use crate::application::dto::{PublishStatus, PublishVideoInput, UpdateVideoInput, VideoListQuery};
use crate::domain::entities::Video;
use crate::domain::read_models::{Page, VideoDetail, VideoSummary};
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::{AppError, CurrentUser};
use crate::presentation::response::ApiResponse;

/// `GET /videos?query=&page=&limit=&sortBy=&sortType=`
pub async fn list_videos(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<VideoListQuery>,
) -> Result<ApiResponse<Page<VideoSummary>>, AppError> {
    let page = state.videos.search(&query).await?;
    let message = if page.is_empty() { "No videos found" } else { "Videos fetched successfully" };
    Ok(ApiResponse::ok(page, message))
}

/// `POST /videos/publish/video` (multipart: title, description, videoFile, thumbnail)
pub async fn publish_video(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(multipart, _): ApiMultipart,
) -> Result<ApiResponse<Video>, AppError> {
    let mut form = FormData::read(multipart).await?;
    let input = PublishVideoInput {
        title: form.text("title"),
        description: form.text("description"),
        video_file: form.file("videoFile"),
        thumbnail: form.file("thumbnail"),
    };

    let video = state.videos.publish(user.id, input).await?;
    Ok(ApiResponse::created(video, "Video published successfully"))
}

/// `GET /videos/v/{videoId}`
pub async fn get_video(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<VideoDetail>, AppError> {
    let video = state.videos.get(user.id, id).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// `PATCH /videos/update/video/{videoId}` (multipart: title?, description?, thumbnail?)
pub async fn update_video(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
    WithRejection(multipart, _): ApiMultipart,
) -> Result<ApiResponse<Video>, AppError> {
    let mut form = FormData::read(multipart).await?;
    let input = UpdateVideoInput {
        title: form.text("title"),
        description: form.text("description"),
        thumbnail: form.file("thumbnail"),
    };

    let video = state.videos.update(user.id, id, input).await?;
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

/// `DELETE /videos/del/video/{videoId}`
pub async fn delete_video(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Value>, AppError> {
    state.videos.delete(user.id, id).await?;
    Ok(ApiResponse::ok(json!({}), "Video deleted successfully"))
}

/// `PATCH /videos/toggle/publish/{videoId}`
pub async fn toggle_publish_status(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<PublishStatus>, AppError> {
    let is_published = state.videos.toggle_publish(user.id, id).await?;
    Ok(ApiResponse::ok(PublishStatus { is_published }, "Publish status toggled"))
}
