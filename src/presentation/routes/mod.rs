use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::presentation::handlers::{
    AppState, comments, community_posts, health, likes, playlists, subscriptions, users, videos,
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes())
        .with_state(app_state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/videos", video_routes())
        .nest("/comments", comment_routes())
        .nest("/likes", like_routes())
        .nest("/playlists", playlist_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/community-posts", community_post_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh-token", post(users::refresh_token))
        .route("/logout", post(users::logout))
        .route("/current-user", get(users::current_user))
}

fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos))
        .route("/publish/video", post(videos::publish_video))
        .route("/v/{video_id}", get(videos::get_video))
        .route("/update/video/{video_id}", patch(videos::update_video))
        .route("/del/video/{video_id}", axum::routing::delete(videos::delete_video))
        .route("/toggle/publish/{video_id}", patch(videos::toggle_publish_status))
}

/// GET/POST take a video id, PATCH/DELETE a comment id
fn comment_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(comments::list_comments)
            .post(comments::add_comment)
            .patch(comments::update_comment)
            .delete(comments::delete_comment),
    )
}

fn like_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle/v/{video_id}", post(likes::toggle_video_like))
        .route("/toggle/c/{comment_id}", post(likes::toggle_comment_like))
        .route("/toggle/p/{community_post_id}", post(likes::toggle_community_post_like))
        .route("/videos", get(likes::liked_videos))
}

fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(playlists::create_playlist))
        .route("/user/{user_id}", get(playlists::user_playlists))
        .route(
            "/{playlist_id}",
            get(playlists::get_playlist)
                .patch(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route("/add/{video_id}/{playlist_id}", patch(playlists::add_video_to_playlist))
        .route("/remove/{video_id}/{playlist_id}", patch(playlists::remove_video_from_playlist))
}

fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ch/{channel_id}",
            post(subscriptions::toggle_subscription).get(subscriptions::channel_subscribers),
        )
        .route("/u/{subscriber_id}", get(subscriptions::subscribed_channels))
}

fn community_post_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(community_posts::create_post))
        .route("/user/{user_id}", get(community_posts::user_posts))
        .route(
            "/{community_post_id}",
            patch(community_posts::update_post).delete(community_posts::delete_post),
        )
}
