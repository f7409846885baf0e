//! Video Platform Service
//!
//! Backend for a video sharing platform: accounts and sessions, video
//! publishing and search, comments, likes, playlists, channel subscriptions
//! and community posts, served as a JSON API over axum.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
