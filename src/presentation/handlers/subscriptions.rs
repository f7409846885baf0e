use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;

use super::{ApiPath, AppState};
use crate::domain::entities::Subscription;
use crate::domain::read_models::SubscriptionEntry;
use crate::domain::repositories::ToggleOutcome;
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::{AppError, CurrentUser};
use crate::presentation::response::ApiResponse;

/// `POST /subscriptions/ch/{channelId}`
pub async fn toggle_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(channel), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<ToggleOutcome<Subscription>>, AppError> {
    let outcome = state.subscriptions.toggle(user.id, channel).await?;
    let message = if outcome.is_created() { "Subscribed" } else { "Unsubscribed" };
    Ok(ApiResponse::ok(outcome, message))
}

/// `GET /subscriptions/ch/{channelId}`
pub async fn channel_subscribers(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(channel), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Vec<SubscriptionEntry>>, AppError> {
    let subscribers = state.subscriptions.subscribers(user.id, channel).await?;
    let message = if subscribers.is_empty() {
        "No subscribers found"
    } else {
        "Subscribers fetched successfully"
    };
    Ok(ApiResponse::ok(subscribers, message))
}

/// `GET /subscriptions/u/{subscriberId}`
pub async fn subscribed_channels(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Path(subscriber), _): ApiPath<ObjectId>,
) -> Result<ApiResponse<Vec<SubscriptionEntry>>, AppError> {
    let channels = state.subscriptions.subscribed_channels(user.id, subscriber).await?;
    let message = if channels.is_empty() {
        "No subscribed channels found"
    } else {
        "Subscribed channels fetched successfully"
    };
    Ok(ApiResponse::ok(channels, message))
}
