use serde::{Deserialize, Serialize};
use std::fmt;

use super::ObjectId;

/// The entity a like points at; exactly one target per like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum LikeTarget {
    Video(ObjectId),
    Comment(ObjectId),
    CommunityPost(ObjectId),
}

impl LikeTarget {
    #[must_use]
    pub fn kind(&self) -> LikeTargetKind {
        match self {
            Self::Video(_) => LikeTargetKind::Video,
            Self::Comment(_) => LikeTargetKind::Comment,
            Self::CommunityPost(_) => LikeTargetKind::CommunityPost,
        }
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Video(id) | Self::Comment(id) | Self::CommunityPost(id) => *id,
        }
    }

    /// Rebuild a target from its stored parts
    #[cfg(test)]
    pub fn from_parts(kind: LikeTargetKind, id: ObjectId) -> Self {
        match kind {
            LikeTargetKind::Video => Self::Video(id),
            LikeTargetKind::Comment => Self::Comment(id),
            LikeTargetKind::CommunityPost => Self::CommunityPost(id),
        }
    }
}

/// Discriminant of [`LikeTarget`], persisted as a short string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTargetKind {
    Video,
    Comment,
    CommunityPost,
}

impl LikeTargetKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Comment => "comment",
            Self::CommunityPost => "community_post",
        }
    }
}

impl fmt::Display for LikeTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LikeTargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "comment" => Ok(Self::Comment),
            "community_post" => Ok(Self::CommunityPost),
            _ => Err(format!("Unknown like target kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_round_trips_through_parts() {
        let id = ObjectId::new();
        for target in [LikeTarget::Video(id), LikeTarget::Comment(id), LikeTarget::CommunityPost(id)]
        {
            let kind: LikeTargetKind = target.kind().as_str().parse().unwrap();
            assert_eq!(LikeTarget::from_parts(kind, target.id()), target);
        }
    }

    #[test]
    fn test_serializes_as_tagged_variant() {
        let id = ObjectId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let json = serde_json::to_value(LikeTarget::CommunityPost(id)).unwrap();

        assert_eq!(json["kind"], "communityPost");
        assert_eq!(json["id"], "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!("playlist".parse::<LikeTargetKind>().is_err());
    }
}
