use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::{discard_uploads, load_user};
use crate::application::dto::{LoginRequest, LoginResponse, RegisterUserInput, required_text};
use crate::domain::entities::User;
use crate::domain::read_models::PublicUser;
use crate::domain::repositories::Store;
use crate::domain::value_objects::ObjectId;
use crate::infrastructure::password::{hash_password, verify_password};
use crate::infrastructure::storage::{MediaStorage, ResourceKind};
use crate::presentation::middleware::auth::{JwtError, JwtService, TokenPair, TokenType};
use crate::presentation::middleware::error::AppError;

/// Registration, sessions and profile lookups
#[derive(Clone)]
pub struct UserUseCases {
    store: Store,
    media: Arc<dyn MediaStorage>,
    jwt: JwtService,
}

impl UserUseCases {
    pub fn new(store: Store, media: Arc<dyn MediaStorage>, jwt: JwtService) -> Self {
        Self { store, media, jwt }
    }

    /// Create an account with an avatar and optional cover image
    pub async fn register(&self, mut input: RegisterUserInput) -> Result<PublicUser, AppError> {
        input.full_name = input.full_name.trim().to_string();
        input.email = input.email.trim().to_lowercase();
        input.username = input.username.trim().to_lowercase();
        input.validate()?;

        let avatar =
            input.avatar.take().ok_or_else(|| AppError::validation("Avatar file is required"))?;

        for login in [&input.username, &input.email] {
            if self.store.users.find_by_login(login).await?.is_some() {
                return Err(AppError::Conflict {
                    message: "User with this email or username already exists".to_string(),
                });
            }
        }

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))??;

        let avatar = self.media.upload(avatar, ResourceKind::Image).await?;
        let cover_image = match input.cover_image {
            Some(file) => match self.media.upload(file, ResourceKind::Image).await {
                Ok(asset) => Some(asset.url),
                Err(e) => {
                    discard_uploads(self.media.as_ref(), &[avatar.url.as_str()]).await;
                    return Err(e.into());
                }
            },
            None => None,
        };

        let user = User::new(
            &input.username,
            &input.email,
            input.full_name,
            avatar.url,
            cover_image,
            password_hash,
        );

        if let Err(e) = self.store.users.insert(&user).await {
            let uploaded = [user.avatar.as_str(), user.cover_image.as_str()];
            discard_uploads(self.media.as_ref(), &uploaded).await;
            return Err(e.into());
        }

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(PublicUser::from(&user))
    }

    /// Check credentials, then issue and persist a fresh token pair
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let login = request.login()?;
        let password = required_text("Password", request.password.as_deref())?;

        let user = self
            .store
            .users
            .find_by_login(&login)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let password_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("password check task failed: {e}")))??;
        if !matches {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AppError::unauthenticated("Invalid user credentials"));
        }

        let tokens = self.rotate_tokens(&user).await?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            user: PublicUser::from(&user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Forget the stored refresh token
    pub async fn logout(&self, caller: ObjectId) -> Result<(), AppError> {
        self.store.users.set_refresh_token(caller, None).await?;
        info!(user_id = %caller, "User logged out");
        Ok(())
    }

    /// Exchange a valid refresh token for a new pair; the old one stops working
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<TokenPair, AppError> {
        let token = refresh_token.filter(|token| !token.is_empty()).ok_or(JwtError::Missing)?;
        let claims = self.jwt.verify(token, TokenType::Refresh)?;
        let id = ObjectId::parse(&claims.sub).map_err(|_| JwtError::InvalidToken)?;

        let user = self
            .store
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid refresh token"))?;

        if user.refresh_token.as_deref() != Some(token) {
            warn!(user_id = %user.id, "Refresh token reuse or stale token");
            return Err(AppError::unauthenticated("Refresh token is expired or used"));
        }

        self.rotate_tokens(&user).await
    }

    pub async fn current_user(&self, caller: ObjectId) -> Result<PublicUser, AppError> {
        Ok(PublicUser::from(&load_user(&self.store, caller).await?))
    }

    async fn rotate_tokens(&self, user: &User) -> Result<TokenPair, AppError> {
        let tokens = self.jwt.issue_pair(user)?;
        if !self.store.users.set_refresh_token(user.id, Some(&tokens.refresh_token)).await? {
            return Err(AppError::not_found("User"));
        }
        Ok(tokens)
    }
}
