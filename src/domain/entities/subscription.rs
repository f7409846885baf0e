use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ObjectId;

/// `subscriber` follows the channel owned by `channel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub subscriber: ObjectId,
    pub channel: ObjectId,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// # Errors
    /// Returns [`SelfSubscription`] when subscriber and channel are the same user
    pub fn new(subscriber: ObjectId, channel: ObjectId) -> Result<Self, SelfSubscription> {
        if subscriber == channel {
            return Err(SelfSubscription);
        }
        Ok(Self { id: ObjectId::new(), subscriber, channel, created_at: Utc::now() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot subscribe to your own channel")]
pub struct SelfSubscription;
