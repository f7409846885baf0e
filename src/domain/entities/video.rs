use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::policy::Owned;
use crate::domain::value_objects::ObjectId;

/// Uploaded video and its publication state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: ObjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Create a published video with zero views
    #[must_use]
    pub fn new(
        owner: ObjectId,
        video_file: String,
        thumbnail: String,
        title: String,
        description: String,
        duration: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            video_file,
            thumbnail,
            title,
            description,
            duration,
            views: 0,
            is_published: true,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip the publication flag and return the new value
    pub fn toggle_published(&mut self) -> bool {
        self.is_published = !self.is_published;
        self.touch();
        self.is_published
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Owned for Video {
    fn owner(&self) -> ObjectId {
        self.owner
    }
}
