use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

mod filesystem_storage;
pub mod utils;

pub use filesystem_storage::FilesystemStorage;
pub use utils::*;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("File size {size} bytes exceeds maximum allowed size of {max_size} bytes")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Expected {expected} file, got {actual}")]
    ContentTypeMismatch { expected: ResourceKind, actual: String },

    #[error("URL does not point into this storage: {0}")]
    InvalidUrl(String),
}

/// What kind of asset an upload must be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    Raw,
}

impl ResourceKind {
    /// Whether a detected MIME type is acceptable for this kind
    pub fn accepts(self, content_type: &str) -> bool {
        match self {
            Self::Image => content_type.starts_with("image/"),
            Self::Video => content_type.starts_with("video/"),
            Self::Raw => true,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// A file received from a multipart form, fully buffered
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Where an upload ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAsset {
    pub url: String,
    pub public_id: String,
    pub size: u64,
    pub content_type: String,
    /// Playback length in seconds; 0 when it cannot be probed
    pub duration: f64,
}

/// Media host for avatars, cover images, thumbnails and video files
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `file`, rejecting content that does not match `kind`
    async fn upload(
        &self,
        file: UploadedFile,
        kind: ResourceKind,
    ) -> Result<StoredAsset, StorageError>;

    /// Delete the asset behind a URL returned by [`MediaStorage::upload`].
    /// Returns `false` when nothing was stored there.
    async fn delete(&self, url: &str) -> Result<bool, StorageError>;

    async fn health_check(&self) -> Result<(), StorageError>;
}
