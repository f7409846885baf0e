use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{LikeTarget, ObjectId};

/// A user's like on a video, comment or community post.
///
/// Existence means "liked"; at most one like exists per (`liked_by`, `target`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub liked_by: ObjectId,
    pub target: LikeTarget,
    pub created_at: DateTime<Utc>,
}

impl Like {
    #[must_use]
    pub fn new(liked_by: ObjectId, target: LikeTarget) -> Self {
        Self { id: ObjectId::new(), liked_by, target, created_at: Utc::now() }
    }
}
