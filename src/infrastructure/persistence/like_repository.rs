use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::rows::{OWNER_COLUMNS, VIDEO_COLUMNS, map_row_to_video_summary};
use crate::domain::entities::Like;
use crate::domain::read_models::LikedVideo;
use crate::domain::repositories::{LikeRepository, RepositoryError, ToggleOutcome};
use crate::domain::value_objects::{LikeTarget, ObjectId};

/// `PostgreSQL` implementation of `LikeRepository`
#[derive(Clone)]
pub struct PostgreSqlLikeRepository {
    pool: PgPool,
}

impl PostgreSqlLikeRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgreSqlLikeRepository {
    async fn toggle(
        &self,
        actor: ObjectId,
        target: LikeTarget,
    ) -> Result<ToggleOutcome<Like>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            r"
            DELETE FROM likes
            WHERE liked_by = $1 AND target_kind = $2 AND target_id = $3
            RETURNING id
            ",
        )
        .bind(actor)
        .bind(target.kind())
        .bind(target.id())
        .fetch_optional(&mut *tx)
        .await?;

        if removed.is_some() {
            tx.commit().await?;
            return Ok(ToggleOutcome::Removed {});
        }

        let like = Like::new(actor, target);
        let inserted = sqlx::query(
            r"
            INSERT INTO likes (id, liked_by, target_kind, target_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (liked_by, target_kind, target_id) DO NOTHING
            RETURNING id
            ",
        )
        .bind(like.id)
        .bind(like.liked_by)
        .bind(target.kind())
        .bind(target.id())
        .bind(like.created_at)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = if inserted.is_some() {
            ToggleOutcome::Created(like)
        } else {
            // A concurrent toggle created it first; report the stored record
            let row = sqlx::query(
                r"
                SELECT id, created_at FROM likes
                WHERE liked_by = $1 AND target_kind = $2 AND target_id = $3
                ",
            )
            .bind(actor)
            .bind(target.kind())
            .bind(target.id())
            .fetch_one(&mut *tx)
            .await?;

            ToggleOutcome::Created(Like {
                id: row.try_get("id")?,
                liked_by: actor,
                target,
                created_at: row.try_get("created_at")?,
            })
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn liked_videos(&self, user: ObjectId) -> Result<Vec<LikedVideo>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r"
            SELECT l.id AS like_id, l.created_at AS liked_at, {VIDEO_COLUMNS}, {OWNER_COLUMNS}
            FROM likes l
            JOIN videos v ON l.target_kind = 'video' AND v.id = l.target_id
            JOIN users u ON u.id = v.owner_id
            WHERE l.liked_by = $1 AND (v.is_published OR v.owner_id = $1)
            ORDER BY l.created_at DESC, l.id DESC
            "
        ))
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(LikedVideo {
                    id: row.try_get("like_id")?,
                    liked_at: row.try_get("liked_at")?,
                    video: map_row_to_video_summary(row)?,
                })
            })
            .collect()
    }
}
