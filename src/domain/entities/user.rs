use chrono::{DateTime, Utc};

use crate::domain::value_objects::ObjectId;

/// Registered account; also acts as a channel other users subscribe to
///
/// Deliberately not `Serialize`: responses go through
/// [`PublicUser`](crate::domain::read_models::PublicUser), which omits the
/// password hash and refresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account. Username and email are stored lower-cased.
    #[must_use]
    pub fn new(
        username: &str,
        email: &str,
        full_name: String,
        avatar: String,
        cover_image: Option<String>,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            username: username.trim().to_lowercase(),
            email: email.trim().to_lowercase(),
            full_name,
            avatar,
            cover_image: cover_image.unwrap_or_default(),
            password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }
}
