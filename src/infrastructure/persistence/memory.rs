//! Process-local store used for tests and for local runs without a database.
//!
//! Every repository trait is implemented over one set of tables behind a
//! single mutex, so each call observes and mutates a consistent snapshot.
//! Listing operations apply the same filter, ordering and tiebreaks as the
//! `PostgreSQL` queries.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{
    Comment, CommunityPost, Like, Playlist, Subscription, User, Video,
};
use crate::domain::read_models::{
    ChannelSummary, CommentView, LikedVideo, OwnerSummary, Page, PageRequest, PlaylistDetail,
    PlaylistSummary, SubscriptionEntry, VideoDetail, VideoSummary,
};
use crate::domain::repositories::{
    CommentRepository, CommunityPostRepository, LikeRepository, PlaylistRepository,
    RepositoryError, Store, StoreHealth, SubscriptionRepository, ToggleOutcome, UserRepository,
    VideoRepository, VideoSearch,
};
use crate::domain::value_objects::{LikeTarget, LikeTargetKind, ObjectId, VideoSortField};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<ObjectId, User>,
    videos: HashMap<ObjectId, Video>,
    comments: HashMap<ObjectId, Comment>,
    likes: Vec<Like>,
    playlists: HashMap<ObjectId, Playlist>,
    subscriptions: Vec<Subscription>,
    community_posts: HashMap<ObjectId, CommunityPost>,
}

impl Tables {
    fn owner_summary(&self, owner: ObjectId) -> Result<OwnerSummary, RepositoryError> {
        self.users
            .get(&owner)
            .map(OwnerSummary::from)
            .ok_or_else(|| RepositoryError::Corrupt(format!("missing user {owner}")))
    }

    fn video_summary(&self, video: &Video) -> Result<VideoSummary, RepositoryError> {
        Ok(VideoSummary::new(video, self.owner_summary(video.owner)?))
    }

    fn remove_likes_on(&mut self, kind: LikeTargetKind, ids: &HashSet<ObjectId>) {
        self.likes.retain(|like| !(like.target.kind() == kind && ids.contains(&like.target.id())));
    }

    fn subscription_entries(
        &self,
        matches: impl Fn(&Subscription) -> bool,
        listed_user: impl Fn(&Subscription) -> ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError> {
        let mut subscriptions: Vec<&Subscription> =
            self.subscriptions.iter().filter(|s| matches(s)).collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        subscriptions
            .into_iter()
            .map(|subscription| {
                Ok(SubscriptionEntry {
                    id: subscription.id,
                    user: self.owner_summary(listed_user(subscription))?,
                    subscribed_at: subscription.created_at,
                })
            })
            .collect()
    }
}

/// Lower-cased alphanumeric words of a text
fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Number of distinct search terms found in the video's title or description
fn match_score(video: &Video, terms: &[String]) -> usize {
    let mut vocabulary = words(&video.title);
    vocabulary.extend(words(&video.description));
    terms.iter().filter(|term| vocabulary.contains(term.as_str())).count()
}

fn compare_by_field(a: &Video, b: &Video, field: VideoSortField) -> Ordering {
    match field {
        VideoSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        VideoSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        VideoSortField::Views => a.views.cmp(&b.views),
        VideoSortField::Duration => a.duration.total_cmp(&b.duration),
        VideoSortField::Title => a.title.cmp(&b.title),
    }
}

/// In-memory implementation of every repository trait
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    operations: Arc<AtomicUsize>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`Store`] whose repositories all share this instance's tables
    #[must_use]
    pub fn store(&self) -> Store {
        Store {
            users: Arc::new(self.clone()),
            videos: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
            likes: Arc::new(self.clone()),
            playlists: Arc::new(self.clone()),
            subscriptions: Arc::new(self.clone()),
            community_posts: Arc::new(self.clone()),
            health: Arc::new(self.clone()),
        }
    }

    /// Number of repository calls served so far
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operations.load(AtomicOrdering::SeqCst)
    }

    fn with_tables<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, RepositoryError>,
    ) -> Result<R, RepositoryError> {
        self.operations.fetch_add(1, AtomicOrdering::SeqCst);
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".into()))?;
        f(&mut tables)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            for existing in tables.users.values() {
                if existing.username == user.username {
                    return Err(RepositoryError::Duplicate {
                        entity: "User".into(),
                        field: "username".into(),
                    });
                }
                if existing.email == user.email {
                    return Err(RepositoryError::Duplicate {
                        entity: "User".into(),
                        field: "email".into(),
                    });
                }
            }
            tables.users.insert(user.id, user.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError> {
        self.with_tables(|tables| Ok(tables.users.get(&id).cloned()))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepositoryError> {
        let login = login.trim().to_lowercase();
        self.with_tables(|tables| {
            Ok(tables
                .users
                .values()
                .find(|user| user.username == login || user.email == login)
                .cloned())
        })
    }

    async fn set_refresh_token(
        &self,
        id: ObjectId,
        token: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            let Some(user) = tables.users.get_mut(&id) else {
                return Ok(false);
            };
            user.refresh_token = token.map(str::to_string);
            user.updated_at = Utc::now();
            Ok(true)
        })
    }
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn insert(&self, video: &Video) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            if !tables.users.contains_key(&video.owner) {
                return Err(RepositoryError::MissingReference { entity: "User".into() });
            }
            tables.videos.insert(video.id, video.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Video>, RepositoryError> {
        self.with_tables(|tables| Ok(tables.videos.get(&id).cloned()))
    }

    async fn update(&self, video: &Video) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            let Some(stored) = tables.videos.get_mut(&video.id) else {
                return Ok(false);
            };
            stored.title.clone_from(&video.title);
            stored.description.clone_from(&video.description);
            stored.thumbnail.clone_from(&video.thumbnail);
            stored.is_published = video.is_published;
            stored.updated_at = video.updated_at;
            Ok(true)
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            if tables.videos.remove(&id).is_none() {
                return Ok(false);
            }

            let comment_ids: HashSet<ObjectId> = tables
                .comments
                .values()
                .filter(|comment| comment.video == id)
                .map(|comment| comment.id)
                .collect();
            tables.comments.retain(|comment_id, _| !comment_ids.contains(comment_id));
            tables.remove_likes_on(LikeTargetKind::Comment, &comment_ids);
            tables.remove_likes_on(LikeTargetKind::Video, &HashSet::from([id]));

            for playlist in tables.playlists.values_mut() {
                playlist.videos.retain(|video| *video != id);
            }
            Ok(true)
        })
    }

    async fn search_published(
        &self,
        search: &VideoSearch,
    ) -> Result<Page<VideoSummary>, RepositoryError> {
        self.with_tables(|tables| {
            let mut scored: Vec<(usize, &Video)> = tables
                .videos
                .values()
                .filter(|video| video.is_published)
                .map(|video| (match_score(video, &search.terms), video))
                .filter(|(score, _)| *score > 0)
                .collect();

            scored.sort_by(|(score_a, a), (score_b, b)| {
                score_b.cmp(score_a).then_with(|| {
                    search
                        .sort_type
                        .apply(compare_by_field(a, b, search.sort_by).then(a.id.cmp(&b.id)))
                })
            });

            let summaries = scored
                .into_iter()
                .map(|(score, video)| {
                    let score = u16::try_from(score).unwrap_or(u16::MAX);
                    Ok(tables.video_summary(video)?.with_score(f32::from(score)))
                })
                .collect::<Result<Vec<_>, RepositoryError>>()?;

            Ok(search.page.slice(summaries))
        })
    }

    async fn find_detail(
        &self,
        id: ObjectId,
        viewer: ObjectId,
    ) -> Result<Option<VideoDetail>, RepositoryError> {
        self.with_tables(|tables| {
            let Some(video) = tables.videos.get(&id) else {
                return Ok(None);
            };

            let owner = tables.owner_summary(video.owner)?;
            let channel_subscriptions =
                tables.subscriptions.iter().filter(|s| s.channel == video.owner);
            let subscriber_count = channel_subscriptions.clone().count() as u64;
            let is_subscribed = channel_subscriptions.clone().any(|s| s.subscriber == viewer);

            let video_likes = tables.likes.iter().filter(|like| like.target == LikeTarget::Video(id));
            let total_likes = video_likes.clone().count() as u64;
            let is_liked = video_likes.clone().any(|like| like.liked_by == viewer);

            Ok(Some(VideoDetail::new(
                video,
                ChannelSummary::new(owner, subscriber_count, is_subscribed),
                total_likes,
                is_liked,
            )))
        })
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            if !tables.videos.contains_key(&comment.video) {
                return Err(RepositoryError::MissingReference { entity: "Video".into() });
            }
            tables.comments.insert(comment.id, comment.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Comment>, RepositoryError> {
        self.with_tables(|tables| Ok(tables.comments.get(&id).cloned()))
    }

    async fn update(&self, comment: &Comment) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            let Some(stored) = tables.comments.get_mut(&comment.id) else {
                return Ok(false);
            };
            stored.content.clone_from(&comment.content);
            stored.updated_at = comment.updated_at;
            Ok(true)
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            if tables.comments.remove(&id).is_none() {
                return Ok(false);
            }
            tables.remove_likes_on(LikeTargetKind::Comment, &HashSet::from([id]));
            Ok(true)
        })
    }

    async fn list_for_video(
        &self,
        video: ObjectId,
        page: PageRequest,
    ) -> Result<Page<CommentView>, RepositoryError> {
        self.with_tables(|tables| {
            let mut comments: Vec<&Comment> =
                tables.comments.values().filter(|comment| comment.video == video).collect();
            comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

            let views = comments
                .into_iter()
                .map(|comment| {
                    Ok(CommentView {
                        id: comment.id,
                        content: comment.content.clone(),
                        owner: tables.owner_summary(comment.owner)?,
                        created_at: comment.created_at,
                    })
                })
                .collect::<Result<Vec<_>, RepositoryError>>()?;

            Ok(page.slice(views))
        })
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn toggle(
        &self,
        actor: ObjectId,
        target: LikeTarget,
    ) -> Result<ToggleOutcome<Like>, RepositoryError> {
        self.with_tables(|tables| {
            if let Some(position) =
                tables.likes.iter().position(|like| like.liked_by == actor && like.target == target)
            {
                tables.likes.remove(position);
                return Ok(ToggleOutcome::Removed {});
            }

            let like = Like::new(actor, target);
            tables.likes.push(like.clone());
            Ok(ToggleOutcome::Created(like))
        })
    }

    async fn liked_videos(&self, user: ObjectId) -> Result<Vec<LikedVideo>, RepositoryError> {
        self.with_tables(|tables| {
            let mut likes: Vec<(&Like, &Video)> = tables
                .likes
                .iter()
                .filter(|like| like.liked_by == user)
                .filter_map(|like| match like.target {
                    LikeTarget::Video(id) => tables.videos.get(&id).map(|video| (like, video)),
                    _ => None,
                })
                .filter(|(_, video)| video.is_published || video.owner == user)
                .collect();
            likes.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            likes
                .into_iter()
                .map(|(like, video)| {
                    Ok(LikedVideo {
                        id: like.id,
                        liked_at: like.created_at,
                        video: tables.video_summary(video)?,
                    })
                })
                .collect()
        })
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryStore {
    async fn insert(&self, playlist: &Playlist) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            if !tables.users.contains_key(&playlist.owner) {
                return Err(RepositoryError::MissingReference { entity: "User".into() });
            }
            tables.playlists.insert(playlist.id, playlist.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Playlist>, RepositoryError> {
        self.with_tables(|tables| Ok(tables.playlists.get(&id).cloned()))
    }

    async fn update(&self, playlist: &Playlist) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            let Some(stored) = tables.playlists.get_mut(&playlist.id) else {
                return Ok(false);
            };
            stored.name.clone_from(&playlist.name);
            stored.description.clone_from(&playlist.description);
            stored.is_private = playlist.is_private;
            stored.updated_at = playlist.updated_at;
            Ok(true)
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| Ok(tables.playlists.remove(&id).is_some()))
    }

    async fn add_video(&self, playlist: ObjectId, video: ObjectId) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            if !tables.videos.contains_key(&video) {
                return Err(RepositoryError::MissingReference { entity: "Video".into() });
            }
            let stored = tables
                .playlists
                .get_mut(&playlist)
                .ok_or_else(|| RepositoryError::MissingReference { entity: "Playlist".into() })?;
            Ok(stored.add_video(video))
        })
    }

    async fn remove_video(
        &self,
        playlist: ObjectId,
        video: ObjectId,
    ) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            Ok(tables.playlists.get_mut(&playlist).is_some_and(|stored| stored.remove_video(video)))
        })
    }

    async fn list_for_owner(
        &self,
        owner: ObjectId,
        include_private: bool,
    ) -> Result<Vec<PlaylistSummary>, RepositoryError> {
        self.with_tables(|tables| {
            let mut playlists: Vec<&Playlist> = tables
                .playlists
                .values()
                .filter(|playlist| playlist.owner == owner)
                .filter(|playlist| include_private || !playlist.is_private)
                .collect();
            playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            Ok(playlists.into_iter().map(PlaylistSummary::from).collect())
        })
    }

    async fn find_detail(&self, id: ObjectId) -> Result<Option<PlaylistDetail>, RepositoryError> {
        self.with_tables(|tables| {
            let Some(playlist) = tables.playlists.get(&id) else {
                return Ok(None);
            };

            let videos = playlist
                .videos
                .iter()
                .filter_map(|video_id| tables.videos.get(video_id))
                .filter(|video| video.is_published)
                .map(|video| tables.video_summary(video))
                .collect::<Result<Vec<_>, RepositoryError>>()?;

            Ok(Some(PlaylistDetail::new(playlist, tables.owner_summary(playlist.owner)?, videos)))
        })
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn toggle(
        &self,
        subscription: Subscription,
    ) -> Result<ToggleOutcome<Subscription>, RepositoryError> {
        self.with_tables(|tables| {
            if !tables.users.contains_key(&subscription.channel) {
                return Err(RepositoryError::MissingReference { entity: "User".into() });
            }
            if let Some(position) = tables.subscriptions.iter().position(|existing| {
                existing.subscriber == subscription.subscriber
                    && existing.channel == subscription.channel
            }) {
                tables.subscriptions.remove(position);
                return Ok(ToggleOutcome::Removed {});
            }

            tables.subscriptions.push(subscription.clone());
            Ok(ToggleOutcome::Created(subscription))
        })
    }

    async fn subscribers_of(
        &self,
        channel: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError> {
        self.with_tables(|tables| {
            tables.subscription_entries(|s| s.channel == channel, |s| s.subscriber)
        })
    }

    async fn channels_of(
        &self,
        subscriber: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError> {
        self.with_tables(|tables| {
            tables.subscription_entries(|s| s.subscriber == subscriber, |s| s.channel)
        })
    }
}

#[async_trait]
impl CommunityPostRepository for InMemoryStore {
    async fn insert(&self, post: &CommunityPost) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            if !tables.users.contains_key(&post.owner) {
                return Err(RepositoryError::MissingReference { entity: "User".into() });
            }
            tables.community_posts.insert(post.id, post.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CommunityPost>, RepositoryError> {
        self.with_tables(|tables| Ok(tables.community_posts.get(&id).cloned()))
    }

    async fn update(&self, post: &CommunityPost) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            let Some(stored) = tables.community_posts.get_mut(&post.id) else {
                return Ok(false);
            };
            stored.content.clone_from(&post.content);
            stored.updated_at = post.updated_at;
            Ok(true)
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        self.with_tables(|tables| {
            if tables.community_posts.remove(&id).is_none() {
                return Ok(false);
            }
            tables.remove_likes_on(LikeTargetKind::CommunityPost, &HashSet::from([id]));
            Ok(true)
        })
    }

    async fn list_for_owner(
        &self,
        owner: ObjectId,
    ) -> Result<Vec<CommunityPost>, RepositoryError> {
        self.with_tables(|tables| {
            let mut posts: Vec<CommunityPost> =
                tables.community_posts.values().filter(|post| post.owner == owner).cloned().collect();
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(posts)
        })
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        self.with_tables(|_| Ok(()))
    }
}
