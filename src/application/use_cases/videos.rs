use std::sync::Arc;

use tracing::{info, warn};

use super::discard_uploads;
use crate::application::dto::{
    PublishVideoInput, UpdateVideoInput, VideoListQuery, optional_text, required_text,
};
use crate::domain::entities::Video;
use crate::domain::policy::ensure_owner;
use crate::domain::read_models::{Page, VideoDetail, VideoSummary};
use crate::domain::repositories::Store;
use crate::domain::value_objects::ObjectId;
use crate::infrastructure::storage::{MediaStorage, ResourceKind};
use crate::presentation::middleware::error::AppError;

/// Video search, publishing and owner-only edits
#[derive(Clone)]
pub struct VideoUseCases {
    store: Store,
    media: Arc<dyn MediaStorage>,
}

impl VideoUseCases {
    pub fn new(store: Store, media: Arc<dyn MediaStorage>) -> Self {
        Self { store, media }
    }

    /// Published videos matching the text query
    pub async fn search(&self, query: &VideoListQuery) -> Result<Page<VideoSummary>, AppError> {
        let search = query.to_search()?;
        Ok(self.store.videos.search_published(&search).await?)
    }

    /// Upload the video file and thumbnail, then record the video
    pub async fn publish(
        &self,
        caller: ObjectId,
        input: PublishVideoInput,
    ) -> Result<Video, AppError> {
        let title = required_text("Title", input.title.as_deref())?;
        let description = required_text("Description", input.description.as_deref())?;
        let video_file =
            input.video_file.ok_or_else(|| AppError::validation("Video file is required"))?;
        let thumbnail =
            input.thumbnail.ok_or_else(|| AppError::validation("Thumbnail is required"))?;

        let video_asset = self.media.upload(video_file, ResourceKind::Video).await?;
        let thumbnail_asset = match self.media.upload(thumbnail, ResourceKind::Image).await {
            Ok(asset) => asset,
            Err(e) => {
                discard_uploads(self.media.as_ref(), &[video_asset.url.as_str()]).await;
                return Err(e.into());
            }
        };

        let video = Video::new(
            caller,
            video_asset.url,
            thumbnail_asset.url,
            title,
            description,
            video_asset.duration,
        );

        if let Err(e) = self.store.videos.insert(&video).await {
            let uploaded = [video.video_file.as_str(), video.thumbnail.as_str()];
            discard_uploads(self.media.as_ref(), &uploaded).await;
            return Err(e.into());
        }

        info!(video_id = %video.id, owner = %caller, "Video published");
        Ok(video)
    }

    /// Video with channel data; unpublished videos are only visible to their owner
    pub async fn get(&self, caller: ObjectId, id: ObjectId) -> Result<VideoDetail, AppError> {
        self.store
            .videos
            .find_detail(id, caller)
            .await?
            .filter(|detail| detail.is_published || detail.owner.id == caller)
            .ok_or_else(|| AppError::not_found("Video"))
    }

    /// Change title, description or thumbnail; at least one is required
    pub async fn update(
        &self,
        caller: ObjectId,
        id: ObjectId,
        input: UpdateVideoInput,
    ) -> Result<Video, AppError> {
        let title = optional_text(input.title.as_deref());
        let description = optional_text(input.description.as_deref());
        if title.is_none() && description.is_none() && input.thumbnail.is_none() {
            return Err(AppError::validation(
                "At least one of title, description or thumbnail is required",
            ));
        }

        let mut video = self.load(id).await?;
        ensure_owner(&video, caller, "update this video")?;

        let previous_thumbnail = video.thumbnail.clone();
        let new_thumbnail = match input.thumbnail {
            Some(file) => Some(self.media.upload(file, ResourceKind::Image).await?.url),
            None => None,
        };

        if let Some(title) = title {
            video.title = title;
        }
        if let Some(description) = description {
            video.description = description;
        }
        if let Some(url) = &new_thumbnail {
            video.thumbnail.clone_from(url);
        }
        video.touch();

        let saved = match self.store.videos.update(&video).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(url) = &new_thumbnail {
                    discard_uploads(self.media.as_ref(), &[url.as_str()]).await;
                }
                return Err(e.into());
            }
        };
        if !saved {
            return Err(AppError::not_found("Video"));
        }

        if new_thumbnail.is_some() && previous_thumbnail != video.thumbnail {
            self.remove_asset(&previous_thumbnail).await;
        }

        info!(video_id = %id, "Video updated");
        Ok(video)
    }

    /// Delete the video record with everything referencing it, then its files
    pub async fn delete(&self, caller: ObjectId, id: ObjectId) -> Result<(), AppError> {
        let video = self.load(id).await?;
        ensure_owner(&video, caller, "delete this video")?;

        if !self.store.videos.delete(id).await? {
            return Err(AppError::not_found("Video"));
        }

        self.remove_asset(&video.video_file).await;
        self.remove_asset(&video.thumbnail).await;

        info!(video_id = %id, "Video deleted");
        Ok(())
    }

    /// Flip the publication flag and return the new value
    pub async fn toggle_publish(&self, caller: ObjectId, id: ObjectId) -> Result<bool, AppError> {
        let mut video = self.load(id).await?;
        ensure_owner(&video, caller, "change the publish status of this video")?;

        let is_published = video.toggle_published();
        if !self.store.videos.update(&video).await? {
            return Err(AppError::not_found("Video"));
        }

        info!(video_id = %id, is_published, "Video publish status toggled");
        Ok(is_published)
    }

    async fn load(&self, id: ObjectId) -> Result<Video, AppError> {
        self.store.videos.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Video"))
    }

    async fn remove_asset(&self, url: &str) {
        match self.media.delete(url).await {
            Ok(true) => {}
            Ok(false) => warn!(url = %url, "Media asset was already gone"),
            Err(e) => warn!(url = %url, error = %e, "Failed to delete media asset"),
        }
    }
}
