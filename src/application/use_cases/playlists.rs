use tracing::info;

use super::{load_user, load_visible_video};
use crate::application::dto::{
    CreatePlaylistRequest, UpdatePlaylistRequest, optional_text, required_text,
};
use crate::domain::entities::Playlist;
use crate::domain::policy::ensure_owner;
use crate::domain::read_models::{PlaylistDetail, PlaylistSummary};
use crate::domain::repositories::Store;
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::error::AppError;

/// Playlist management; private playlists exist only for their owner
#[derive(Clone)]
pub struct PlaylistUseCases {
    store: Store,
}

impl PlaylistUseCases {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: ObjectId,
        request: CreatePlaylistRequest,
    ) -> Result<Playlist, AppError> {
        let name = required_text("Name", request.name.as_deref())?;
        let description = optional_text(request.description.as_deref()).unwrap_or_default();

        let playlist =
            Playlist::new(caller, name, description, request.is_private.unwrap_or(false));
        self.store.playlists.insert(&playlist).await?;

        info!(playlist_id = %playlist.id, owner = %caller, "Playlist created");
        Ok(playlist)
    }

    /// A user's playlists; private ones are included only for the owner
    pub async fn list_for_user(
        &self,
        caller: ObjectId,
        user: ObjectId,
    ) -> Result<Vec<PlaylistSummary>, AppError> {
        load_user(&self.store, user).await?;
        Ok(self.store.playlists.list_for_owner(user, caller == user).await?)
    }

    pub async fn get(&self, caller: ObjectId, id: ObjectId) -> Result<PlaylistDetail, AppError> {
        self.store
            .playlists
            .find_detail(id)
            .await?
            .filter(|detail| !detail.is_private || detail.owner.id == caller)
            .ok_or_else(|| AppError::not_found("Playlist"))
    }

    pub async fn add_video(
        &self,
        caller: ObjectId,
        video: ObjectId,
        playlist: ObjectId,
    ) -> Result<Playlist, AppError> {
        let mut stored = self.load_owned(caller, playlist, "add videos to this playlist").await?;
        load_visible_video(&self.store, video, caller).await?;

        if stored.contains(video) || !self.store.playlists.add_video(playlist, video).await? {
            return Err(AppError::validation("Video already exists in playlist"));
        }
        stored.add_video(video);

        info!(playlist_id = %playlist, video_id = %video, "Video added to playlist");
        Ok(stored)
    }

    pub async fn remove_video(
        &self,
        caller: ObjectId,
        video: ObjectId,
        playlist: ObjectId,
    ) -> Result<Playlist, AppError> {
        let mut stored =
            self.load_owned(caller, playlist, "remove videos from this playlist").await?;

        if !stored.contains(video) || !self.store.playlists.remove_video(playlist, video).await? {
            return Err(AppError::validation("Video is not in this playlist"));
        }
        stored.remove_video(video);

        info!(playlist_id = %playlist, video_id = %video, "Video removed from playlist");
        Ok(stored)
    }

    /// Change name, description or privacy; at least one is required
    pub async fn update(
        &self,
        caller: ObjectId,
        id: ObjectId,
        request: UpdatePlaylistRequest,
    ) -> Result<Playlist, AppError> {
        if request.is_empty() {
            return Err(AppError::validation(
                "At least one of name, description or isPrivate is required",
            ));
        }
        let name = match request.name.as_deref() {
            Some(name) => Some(required_text("Name", Some(name))?),
            None => None,
        };

        let mut playlist = self.load_owned(caller, id, "update this playlist").await?;
        if let Some(name) = name {
            playlist.name = name;
        }
        if let Some(description) = request.description {
            playlist.description = description.trim().to_string();
        }
        if let Some(is_private) = request.is_private {
            playlist.is_private = is_private;
        }
        playlist.updated_at = chrono::Utc::now();

        if !self.store.playlists.update(&playlist).await? {
            return Err(AppError::not_found("Playlist"));
        }
        Ok(playlist)
    }

    pub async fn delete(&self, caller: ObjectId, id: ObjectId) -> Result<(), AppError> {
        self.load_owned(caller, id, "delete this playlist").await?;

        if !self.store.playlists.delete(id).await? {
            return Err(AppError::not_found("Playlist"));
        }

        info!(playlist_id = %id, "Playlist deleted");
        Ok(())
    }

    /// Load a playlist the caller must own; private playlists of others are 404
    async fn load_owned(
        &self,
        caller: ObjectId,
        id: ObjectId,
        action: &'static str,
    ) -> Result<Playlist, AppError> {
        let playlist = self
            .store
            .playlists
            .find_by_id(id)
            .await?
            .filter(|playlist| playlist.is_visible_to(caller))
            .ok_or_else(|| AppError::not_found("Playlist"))?;
        ensure_owner(&playlist, caller, action)?;
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{harness, seed_user, seed_video};

    fn named(name: &str, is_private: bool) -> CreatePlaylistRequest {
        CreatePlaylistRequest {
            name: Some(name.to_string()),
            description: None,
            is_private: Some(is_private),
        }
    }

    #[tokio::test]
    async fn test_duplicate_video_is_rejected_and_playlist_unchanged() {
        let h = harness();
        let owner = seed_user(&h.store, "alice").await;
        let video = seed_video(&h.store, &owner, "Intro").await;
        let playlists = PlaylistUseCases::new(h.store.clone());
        let playlist = playlists.create(owner.id, named("Mix", false)).await.unwrap();

        let added = playlists.add_video(owner.id, video.id, playlist.id).await.unwrap();
        assert_eq!(added.videos, vec![video.id]);

        let err = playlists.add_video(owner.id, video.id, playlist.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let stored = h.store.playlists.find_by_id(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.videos, vec![video.id]);
    }

    #[tokio::test]
    async fn test_private_playlist_hidden_from_others() {
        let h = harness();
        let owner = seed_user(&h.store, "alice").await;
        let viewer = seed_user(&h.store, "bob").await;
        let playlists = PlaylistUseCases::new(h.store.clone());
        let secret = playlists.create(owner.id, named("Secret", true)).await.unwrap();
        playlists.create(owner.id, named("Public", false)).await.unwrap();

        assert!(playlists.get(owner.id, secret.id).await.is_ok());
        assert!(matches!(
            playlists.get(viewer.id, secret.id).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            playlists.delete(viewer.id, secret.id).await,
            Err(AppError::NotFound { .. })
        ));

        assert_eq!(playlists.list_for_user(owner.id, owner.id).await.unwrap().len(), 2);
        let visible = playlists.list_for_user(viewer.id, owner.id).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Public");
    }

    #[tokio::test]
    async fn test_stranger_cannot_edit_public_playlist() {
        let h = harness();
        let owner = seed_user(&h.store, "alice").await;
        let stranger = seed_user(&h.store, "mallory").await;
        let playlists = PlaylistUseCases::new(h.store.clone());
        let playlist = playlists.create(owner.id, named("Mix", false)).await.unwrap();

        let rename = UpdatePlaylistRequest { name: Some("Mine".into()), ..Default::default() };
        let err = playlists.update(stranger.id, playlist.id, rename).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization { .. }));

        let stored = h.store.playlists.find_by_id(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Mix");
    }

    #[tokio::test]
    async fn test_detail_lists_published_videos_in_order() {
        let h = harness();
        let owner = seed_user(&h.store, "alice").await;
        let first = seed_video(&h.store, &owner, "First").await;
        let second = seed_video(&h.store, &owner, "Second").await;
        let playlists = PlaylistUseCases::new(h.store.clone());
        let playlist = playlists.create(owner.id, named("Mix", false)).await.unwrap();
        playlists.add_video(owner.id, second.id, playlist.id).await.unwrap();
        playlists.add_video(owner.id, first.id, playlist.id).await.unwrap();

        let detail = playlists.get(owner.id, playlist.id).await.unwrap();
        let titles: Vec<&str> = detail.videos.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);

        playlists.remove_video(owner.id, second.id, playlist.id).await.unwrap();
        let err = playlists.remove_video(owner.id, second.id, playlist.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
