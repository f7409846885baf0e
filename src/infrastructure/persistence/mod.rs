mod codecs;
pub mod comment_repository;
pub mod community_post_repository;
pub mod connection;
pub mod like_repository;
pub mod memory;
pub mod playlist_repository;
mod rows;
pub mod subscription_repository;
pub mod user_repository;
pub mod video_repository;

use std::sync::Arc;

pub use comment_repository::PostgreSqlCommentRepository;
pub use community_post_repository::PostgreSqlCommunityPostRepository;
pub use connection::Database;
pub use like_repository::PostgreSqlLikeRepository;
pub use memory::InMemoryStore;
pub use playlist_repository::PostgreSqlPlaylistRepository;
pub use subscription_repository::PostgreSqlSubscriptionRepository;
pub use user_repository::PostgreSqlUserRepository;
pub use video_repository::PostgreSqlVideoRepository;

use crate::domain::repositories::{RepositoryError, Store};

/// Every repository backed by one `PostgreSQL` pool
pub fn postgres_store(database: &Database) -> Store {
    let pool = database.pool().clone();
    Store {
        users: Arc::new(PostgreSqlUserRepository::new(pool.clone())),
        videos: Arc::new(PostgreSqlVideoRepository::new(pool.clone())),
        comments: Arc::new(PostgreSqlCommentRepository::new(pool.clone())),
        likes: Arc::new(PostgreSqlLikeRepository::new(pool.clone())),
        playlists: Arc::new(PostgreSqlPlaylistRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgreSqlSubscriptionRepository::new(pool.clone())),
        community_posts: Arc::new(PostgreSqlCommunityPostRepository::new(pool)),
        health: Arc::new(database.clone()),
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                let constraint = db.constraint().unwrap_or_default();
                match db.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => {
                        let (entity, field) = unique_key(constraint);
                        RepositoryError::Duplicate {
                            entity: entity.to_string(),
                            field: field.to_string(),
                        }
                    }
                    Some(FOREIGN_KEY_VIOLATION) => RepositoryError::MissingReference {
                        entity: referenced_entity(constraint).to_string(),
                    },
                    _ => RepositoryError::Query(err.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => RepositoryError::Unavailable(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Corrupt(err.to_string())
            }
            _ => RepositoryError::Query(err.to_string()),
        }
    }
}

/// Entity and field named by a unique constraint
fn unique_key(constraint: &str) -> (&'static str, &'static str) {
    match constraint {
        "users_username_key" => ("User", "username"),
        "users_email_key" => ("User", "email"),
        "likes_actor_target_key" => ("Like", "target"),
        "playlist_videos_pkey" => ("Playlist entry", "video"),
        "subscriptions_pair_key" => ("Subscription", "channel"),
        _ => ("Record", "key"),
    }
}

fn referenced_entity(constraint: &str) -> &'static str {
    if constraint.contains("video_id") {
        "Video"
    } else if constraint.contains("playlist_id") {
        "Playlist"
    } else {
        "User"
    }
}
