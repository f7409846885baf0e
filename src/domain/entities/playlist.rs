use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::policy::Owned;
use crate::domain::value_objects::ObjectId;

/// Ordered, duplicate-free collection of videos owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub owner: ObjectId,
    pub is_private: bool,
    pub videos: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    #[must_use]
    pub fn new(owner: ObjectId, name: String, description: String, is_private: bool) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name,
            description,
            owner,
            is_private,
            videos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn contains(&self, video: ObjectId) -> bool {
        self.videos.contains(&video)
    }

    /// Append a video; returns `false` when it is already present
    pub fn add_video(&mut self, video: ObjectId) -> bool {
        if self.contains(video) {
            return false;
        }
        self.videos.push(video);
        self.updated_at = Utc::now();
        true
    }

    /// Remove a video; returns `false` when it was not present
    pub fn remove_video(&mut self, video: ObjectId) -> bool {
        let before = self.videos.len();
        self.videos.retain(|v| *v != video);
        let removed = self.videos.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Whether `viewer` may see this playlist
    #[must_use]
    pub fn is_visible_to(&self, viewer: ObjectId) -> bool {
        !self.is_private || self.owner == viewer
    }
}

impl Owned for Playlist {
    fn owner(&self) -> ObjectId {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_video_rejects_duplicates_and_keeps_order() {
        let mut playlist = Playlist::new(ObjectId::new(), "Mix".into(), String::new(), false);
        let (a, b) = (ObjectId::new(), ObjectId::new());

        assert!(playlist.add_video(a));
        assert!(playlist.add_video(b));
        assert!(!playlist.add_video(a));
        assert_eq!(playlist.videos, vec![a, b]);
    }

    #[test]
    fn test_remove_video_reports_absence() {
        let mut playlist = Playlist::new(ObjectId::new(), "Mix".into(), String::new(), false);
        let video = ObjectId::new();

        assert!(!playlist.remove_video(video));
        playlist.add_video(video);
        assert!(playlist.remove_video(video));
        assert!(playlist.videos.is_empty());
    }

    #[test]
    fn test_private_playlist_visible_to_owner_only() {
        let owner = ObjectId::new();
        let playlist = Playlist::new(owner, "Secret".into(), String::new(), true);

        assert!(playlist.is_visible_to(owner));
        assert!(!playlist.is_visible_to(ObjectId::new()));
    }
}
