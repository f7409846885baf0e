use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::read_models::{PageRequest, PublicUser};
use crate::domain::repositories::VideoSearch;
use crate::domain::value_objects::{SortDirection, VideoSortField};
use crate::infrastructure::storage::UploadedFile;
use crate::presentation::middleware::error::AppError;

/// Trimmed value of a required text field
pub fn required_text(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

/// Trimmed value of an optional text field; blank counts as absent
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}

/// `?page=&limit=`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn to_page_request(self) -> Result<PageRequest, AppError> {
        Ok(PageRequest::new(self.page, self.limit)?)
    }
}

/// `GET /videos` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
}

impl VideoListQuery {
    pub fn to_search(&self) -> Result<VideoSearch, AppError> {
        let raw = required_text("Search query", self.query.as_deref())?;
        let terms = VideoSearch::terms_of(&raw);
        if terms.is_empty() {
            return Err(AppError::validation("Search query must contain letters or digits"));
        }

        let sort_by = match self.sort_by.as_deref() {
            Some(field) => field.parse::<VideoSortField>().map_err(AppError::validation)?,
            None => VideoSortField::default(),
        };
        let sort_type = match self.sort_type.as_deref() {
            Some(direction) => direction.parse::<SortDirection>().map_err(AppError::validation)?,
            None => SortDirection::default(),
        };

        Ok(VideoSearch {
            terms,
            sort_by,
            sort_type,
            page: PageRequest::new(self.page, self.limit)?,
        })
    }
}

/// Multipart form of `POST /users/register`
#[derive(Debug, Default, Validate)]
pub struct RegisterUserInput {
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub avatar: Option<UploadedFile>,
    pub cover_image: Option<UploadedFile>,
}

/// Login by username or email
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// The identifier to look the account up by; username wins when both are given
    pub fn login(&self) -> Result<String, AppError> {
        optional_text(self.username.as_deref())
            .or_else(|| optional_text(self.email.as_deref()))
            .ok_or_else(|| AppError::validation("Username or email is required"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Multipart form of `POST /videos/publish/video`
#[derive(Debug, Default)]
pub struct PublishVideoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_file: Option<UploadedFile>,
    pub thumbnail: Option<UploadedFile>,
}

/// Multipart form of `PATCH /videos/update/video/{videoId}`
#[derive(Debug, Default)]
pub struct UpdateVideoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<UploadedFile>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishStatus {
    pub is_published: bool,
}

/// Body of comment and community post writes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRequest {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

impl UpdatePlaylistRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_private.is_none()
    }
}
