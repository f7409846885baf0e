use axum::extract::{Json, Path, Query, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::{ApiJson, ApiPath, ApiQuery, AppState};
use crate::application::dto::{ContentRequest, PageQuery};
use crate::domain::entities::Comment;
use crate::domain::read_models::{CommentView, Page};
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::{AppError, CurrentUser};
use crate::presentation::response::ApiResponse;

/// `GET /comments/{videoId}?page=&limit=`
pub async fn list_comments(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(video), _): ApiPath<ObjectId>,
    WithRejection(Query(page), _): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Page<CommentView>>, AppError> {
    let comments = state.comments.list(user.id, video, page).await?;
    let message =
        if comments.is_empty() { "No comments found" } else { "Comments fetched successfully" };
    Ok(ApiResponse::ok(comments, message))
}

/// `POST /comments/{videoId}`
pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(video), _): ApiPath<ObjectId>,
    WithRejection(Json(request), _): ApiJson<ContentRequest>,
) -> Result<ApiResponse<Comment>, AppError> {
    let comment = state.comments.add(user.id, video, request).await?;
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// `PATCH /comments/{commentId}`
pub async fn update_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
    WithRejection(Json(request), _): ApiJson<ContentRequest>,
) -> Result<ApiResponse<Comment>, AppError> {
    let comment = state.comments.update(user.id, id, request).await?;
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

/// `DELETE /comments/{commentId}`
pub async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Value>, AppError> {
    state.comments.delete(user.id, id).await?;
    Ok(ApiResponse::ok(json!({}), "Comment deleted successfully"))
}
