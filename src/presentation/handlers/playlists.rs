use axum::extract::{Json, Path, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::{ApiJson, ApiPath, AppState};
use crate::application::dto::{CreatePlaylistRequest, UpdatePlaylistRequest};
use crate::domain::entities::Playlist;
use crate::domain::read_models::{PlaylistDetail, PlaylistSummary};
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::{AppError, CurrentUser};
use crate::presentation::response::ApiResponse;

/// `POST /playlists`
pub async fn create_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(request), _): ApiJson<CreatePlaylistRequest>,
) -> Result<ApiResponse<Playlist>, AppError> {
    let playlist = state.playlists.create(user.id, request).await?;
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// `GET /playlists/user/{userId}`
pub async fn user_playlists(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(owner), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Vec<PlaylistSummary>>, AppError> {
    let playlists = state.playlists.list_for_user(user.id, owner).await?;
    let message =
        if playlists.is_empty() { "User has no playlists" } else { "Playlists fetched successfully" };
    Ok(ApiResponse::ok(playlists, message))
}

/// `GET /playlists/{playlistId}`
pub async fn get_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<PlaylistDetail>, AppError> {
    let playlist = state.playlists.get(user.id, id).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

/// `PATCH /playlists/{playlistId}`
pub async fn update_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
    WithRejection(Json(request), _): ApiJson<UpdatePlaylistRequest>,
) -> Result<ApiResponse<Playlist>, AppError> {
    let playlist = state.playlists.update(user.id, id, request).await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

/// `DELETE /playlists/{playlistId}`
pub async fn delete_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Value>, AppError> {
    state.playlists.delete(user.id, id).await?;
    Ok(ApiResponse::ok(json!({}), "Playlist deleted successfully"))
}

/// `PATCH /playlists/add/{videoId}/{playlistId}`
pub async fn add_video_to_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path((video, playlist)), _): ApiPath<(ObjectId, ObjectId)>,
) -> Result<ApiResponse<Playlist>, AppError> {
    let playlist = state.playlists.add_video(user.id, video, playlist).await?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist"))
}

/// `PATCH /playlists/remove/{videoId}/{playlistId}`
pub async fn remove_video_from_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path((video, playlist)), _): ApiPath<(ObjectId, ObjectId)>,
) -> Result<ApiResponse<Playlist>, AppError> {
    let playlist = state.playlists.remove_video(user.id, video, playlist).await?;
    Ok(ApiResponse::ok(playlist, "Video removed from playlist"))
}
