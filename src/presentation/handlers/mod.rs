use std::sync::Arc;

use axum::extract::{FromRef, Json, Multipart, Path, Query};
use axum_extra::extract::WithRejection;

use crate::application::use_cases::{
    CommentUseCases, CommunityPostUseCases, LikeUseCases, PlaylistUseCases, SubscriptionUseCases,
    UserUseCases, VideoUseCases,
};
use crate::domain::repositories::Store;
use crate::infrastructure::config::AuthConfig;
use crate::infrastructure::storage::MediaStorage;
use crate::presentation::middleware::{AppError, JwtService};

pub mod comments;
pub mod community_posts;
pub mod health;
pub mod likes;
mod multipart;
pub mod playlists;
pub mod subscriptions;
pub mod users;
pub mod videos;

/// Extractors whose rejections render the failure envelope
pub type ApiPath<T> = WithRejection<Path<T>, AppError>;
pub type ApiJson<T> = WithRejection<Json<T>, AppError>;
pub type ApiQuery<T> = WithRejection<Query<T>, AppError>;
pub type ApiMultipart = WithRejection<Multipart, AppError>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserUseCases,
    pub videos: VideoUseCases,
    pub comments: CommentUseCases,
    pub likes: LikeUseCases,
    pub playlists: PlaylistUseCases,
    pub subscriptions: SubscriptionUseCases,
    pub community_posts: CommunityPostUseCases,
    pub jwt: JwtService,
    pub store: Store,
    pub media: Arc<dyn MediaStorage>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(store: Store, media: Arc<dyn MediaStorage>, auth: &AuthConfig) -> Self {
        let jwt = JwtService::new(auth);
        Self {
            users: UserUseCases::new(store.clone(), Arc::clone(&media), jwt.clone()),
            videos: VideoUseCases::new(store.clone(), Arc::clone(&media)),
            comments: CommentUseCases::new(store.clone()),
            likes: LikeUseCases::new(store.clone()),
            playlists: PlaylistUseCases::new(store.clone()),
            subscriptions: SubscriptionUseCases::new(store.clone()),
            community_posts: CommunityPostUseCases::new(store.clone()),
            jwt,
            store,
            media,
            secure_cookies: auth.secure_cookies,
        }
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
