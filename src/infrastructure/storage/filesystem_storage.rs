use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::{
    MediaStorage, ResourceKind, StorageError, StoredAsset, UploadedFile,
    utils::{
        content_hash, detect_content_type, extension_for, probe_mp4_duration, upload_path,
        validate_file_size,
    },
};

/// Filesystem-based storage; files are sharded by content hash with one file per upload
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    base_path: PathBuf,
    public_base_url: String,
    max_file_size: u64,
}

impl FilesystemStorage {
    /// Create a new filesystem storage instance
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        max_file_size: u64,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_file_size,
        }
    }

    fn url_for(&self, relative: &str) -> String {
        format!("{}/{relative}", self.public_base_url)
    }

    /// Map a public URL back to a file under the base path
    fn path_for_url(&self, url: &str) -> Result<PathBuf, StorageError> {
        let relative = url
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| StorageError::InvalidUrl(url.to_string()))?;

        let relative = Path::new(relative);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(StorageError::InvalidUrl(url.to_string()));
        }

        Ok(self.base_path.join(relative))
    }

    async fn ensure_directory(&self, file_path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Remove empty directories up to the base path (best effort)
    async fn cleanup_empty_directories(&self, mut dir_path: &Path) {
        while dir_path != self.base_path && dir_path.starts_with(&self.base_path) {
            match fs::read_dir(dir_path).await {
                Ok(mut entries) => {
                    if entries.next_entry().await.unwrap_or(None).is_some() {
                        break;
                    }
                    if fs::remove_dir(dir_path).await.is_err() {
                        break;
                    }
                    tracing::debug!("Cleaned up empty directory: {}", dir_path.display());
                }
                Err(_) => break,
            }

            match dir_path.parent() {
                Some(parent) => dir_path = parent,
                None => break,
            }
        }
    }
}

#[async_trait]
impl MediaStorage for FilesystemStorage {
    async fn upload(
        &self,
        file: UploadedFile,
        kind: ResourceKind,
    ) -> Result<StoredAsset, StorageError> {
        let size = file.bytes.len() as u64;
        if size == 0 {
            return Err(StorageError::EmptyFile);
        }
        validate_file_size(size, self.max_file_size)?;

        let content_type = detect_content_type(&file.bytes, file.file_name.as_deref());
        if !kind.accepts(&content_type) {
            return Err(StorageError::ContentTypeMismatch { expected: kind, actual: content_type });
        }

        let hash = content_hash(&file.bytes);
        let upload_id = Uuid::new_v4().simple().to_string();
        let relative = upload_path(&hash, &upload_id, extension_for(&content_type));
        let file_path = self.base_path.join(&relative);
        self.ensure_directory(&file_path).await?;

        // Write to a temp file then rename so readers never see partial content
        let temp_path = file_path.with_extension("tmp");
        {
            let mut out = fs::File::create(&temp_path).await?;
            out.write_all(&file.bytes).await?;
            out.flush().await?;
        }
        fs::rename(&temp_path, &file_path).await?;

        tracing::info!(
            path = %file_path.display(),
            size,
            content_type = %content_type,
            "Stored media file"
        );

        let duration = if kind == ResourceKind::Video {
            probe_mp4_duration(&file.bytes).unwrap_or(0.0)
        } else {
            0.0
        };

        Ok(StoredAsset {
            url: self.url_for(&relative),
            public_id: relative,
            size,
            content_type,
            duration,
        })
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let file_path = self.path_for_url(url)?;

        if !fs::try_exists(&file_path).await? {
            return Ok(false);
        }

        fs::remove_file(&file_path).await?;

        if let Some(parent) = file_path.parent() {
            self.cleanup_empty_directories(parent).await;
        }

        tracing::info!("Deleted file at path: {}", file_path.display());
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let metadata = fs::metadata(&self.base_path).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("{} is not a directory", self.base_path.display()),
            )))
        }
    }
}
