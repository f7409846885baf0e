use std::any::Any;

use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::entities::SelfSubscription;
use crate::domain::policy::Forbidden;
use crate::domain::read_models::PageRequestError;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::ObjectIdError;
use crate::infrastructure::password::PasswordError;
use crate::infrastructure::storage::StorageError;

const INTERNAL_MESSAGE: &str = "Something went wrong while processing the request";

/// Application error types that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    Authorization { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    PayloadTooLarge { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), errors: Vec::new() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Authentication { message: message.into() }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database { .. } | AppError::Storage { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation",
            AppError::Authentication { .. } => "authentication",
            AppError::Authorization { .. } => "authorization",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::PayloadTooLarge { .. } => "payload_too_large",
            AppError::Database { .. } => "database",
            AppError::Storage { .. } => "storage",
            AppError::Internal { .. } => "internal",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(
            self,
            AppError::Database { .. } | AppError::Storage { .. } | AppError::Internal { .. }
        )
    }

    /// Failure envelope; server-side details never reach the client
    pub fn to_error_response(&self) -> ErrorResponse {
        let status = self.status_code();
        let message =
            if status.is_server_error() { INTERNAL_MESSAGE.to_string() } else { self.to_string() };
        let errors = match self {
            AppError::Validation { errors, .. } => errors.clone(),
            _ => Vec::new(),
        };

        ErrorResponse { status_code: status.as_u16(), message, success: false, errors }
    }
}

/// `{statusCode, message, success: false, errors}`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();
        let error_id = Uuid::new_v4();

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                error_id = %error_id,
                "Application error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                error_id = %error_id,
                "Application warning: {}",
                self
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// Router fallback for unknown paths
pub async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Panic handler for `CatchPanicLayer`
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    AppError::internal(format!("handler panicked: {detail}")).into_response()
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            duplicate @ RepositoryError::Duplicate { .. } => {
                AppError::Conflict { message: duplicate.to_string() }
            }
            RepositoryError::MissingReference { entity } => AppError::NotFound { resource: entity },
            RepositoryError::Unavailable(message) | RepositoryError::Query(message) => {
                AppError::Database { message }
            }
            RepositoryError::Corrupt(message) => AppError::Internal { message },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileTooLarge { .. } => {
                AppError::PayloadTooLarge { message: err.to_string() }
            }
            StorageError::EmptyFile | StorageError::ContentTypeMismatch { .. } => {
                AppError::validation(err.to_string())
            }
            StorageError::Io(_) | StorageError::InvalidUrl(_) => {
                AppError::Storage { message: err.to_string() }
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal { message: err.to_string() }
    }
}

impl From<ObjectIdError> for AppError {
    fn from(err: ObjectIdError) -> Self {
        AppError::validation(format!("Invalid identifier: {err}"))
    }
}

impl From<Forbidden> for AppError {
    fn from(err: Forbidden) -> Self {
        AppError::Authorization { message: err.to_string() }
    }
}

impl From<SelfSubscription> for AppError {
    fn from(err: SelfSubscription) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<PageRequestError> for AppError {
    fn from(err: PageRequestError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| match &failure.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", failure.code),
                })
            })
            .collect();
        errors.sort();

        AppError::Validation { message: "Validation failed".to_string(), errors }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge { message: rejection.body_text() };
        }
        AppError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            return AppError::internal(rejection.body_text());
        }
        AppError::validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge { message: err.body_text() };
        }
        AppError::validation(err.body_text())
    }
}
