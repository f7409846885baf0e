use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::policy::Owned;
use crate::domain::value_objects::ObjectId;

/// Short text post on a user's channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub owner: ObjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityPost {
    #[must_use]
    pub fn new(owner: ObjectId, content: String) -> Self {
        let now = Utc::now();
        Self { id: ObjectId::new(), content, owner, created_at: now, updated_at: now }
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}

impl Owned for CommunityPost {
    fn owner(&self) -> ObjectId {
        self.owner
    }
}
