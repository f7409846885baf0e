use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::policy::Owned;
use crate::domain::value_objects::ObjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub video: ObjectId,
    pub owner: ObjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    #[must_use]
    pub fn new(video: ObjectId, owner: ObjectId, content: String) -> Self {
        let now = Utc::now();
        Self { id: ObjectId::new(), content, video, owner, created_at: now, updated_at: now }
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}

impl Owned for Comment {
    fn owner(&self) -> ObjectId {
        self.owner
    }
}
