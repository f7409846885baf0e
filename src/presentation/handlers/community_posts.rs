use axum::extract::{Json, Path, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::{ApiJson, ApiPath, AppState};
use crate::application::dto::ContentRequest;
use crate::domain::entities::CommunityPost;
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::{AppError, CurrentUser};
use crate::presentation::response::ApiResponse;

/// `POST /community-posts`
pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(request), _): ApiJson<ContentRequest>,
) -> Result<ApiResponse<CommunityPost>, AppError> {
    let post = state.community_posts.create(user.id, request).await?;
    Ok(ApiResponse::created(post, "Community post created successfully"))
}

/// `GET /community-posts/user/{userId}`
pub async fn user_posts(
    State(state): State<AppState>,
    _user: CurrentUser,
    WithRejection(Path(owner), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Vec<CommunityPost>>, AppError> {
    let posts = state.community_posts.list_for_user(owner).await?;
    let message = if posts.is_empty() {
        "User has no community posts"
    } else {
        "Community posts fetched successfully"
    };
    Ok(ApiResponse::ok(posts, message))
}

/// `PATCH /community-posts/{communityPostId}`
pub async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
    WithRejection(Json(request), _): ApiJson<ContentRequest>,
) -> Result<ApiResponse<CommunityPost>, AppError> {
    let post = state.community_posts.update(user.id, id, request).await?;
    Ok(ApiResponse::ok(post, "Community post updated successfully"))
}

/// `DELETE /community-posts/{communityPostId}`
pub async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(id), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Value>, AppError> {
    state.community_posts.delete(user.id, id).await?;
    Ok(ApiResponse::ok(json!({}), "Community post deleted successfully"))
}
