use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::rows::{
    OWNER_COLUMNS, VIDEO_COLUMNS, map_row_to_owner, map_row_to_playlist, map_row_to_video_summary,
};
use crate::domain::entities::Playlist;
use crate::domain::read_models::{PlaylistDetail, PlaylistSummary};
use crate::domain::repositories::{PlaylistRepository, RepositoryError};
use crate::domain::value_objects::ObjectId;

const PLAYLIST_COLUMNS: &str = "p.id, p.name, p.description, p.owner_id, p.is_private, \
     p.created_at, p.updated_at";

/// `PostgreSQL` implementation of `PlaylistRepository`
#[derive(Clone)]
pub struct PostgreSqlPlaylistRepository {
    pool: PgPool,
}

impl PostgreSqlPlaylistRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn video_ids(&self, playlist: ObjectId) -> Result<Vec<ObjectId>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT video_id FROM playlist_videos WHERE playlist_id = $1 ORDER BY position ASC",
        )
        .bind(playlist)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<ObjectId, _>("video_id").map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl PlaylistRepository for PostgreSqlPlaylistRepository {
    async fn insert(&self, playlist: &Playlist) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO playlists (id, name, description, owner_id, is_private, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.owner)
        .bind(playlist.is_private)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Playlist>, RepositoryError> {
        let row =
            sqlx::query(&format!("SELECT {PLAYLIST_COLUMNS} FROM playlists p WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut playlist = map_row_to_playlist(&row)?;
        playlist.videos = self.video_ids(id).await?;
        Ok(Some(playlist))
    }

    async fn update(&self, playlist: &Playlist) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE playlists
            SET name = $2, description = $3, is_private = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.is_private)
        .bind(playlist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        // playlist_videos cascade
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_video(&self, playlist: ObjectId, video: ObjectId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO playlist_videos (playlist_id, video_id, position)
            SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
            FROM playlist_videos
            WHERE playlist_id = $1
            ON CONFLICT (playlist_id, video_id) DO NOTHING
            ",
        )
        .bind(playlist)
        .bind(video)
        .execute(&mut *tx)
        .await?;

        let added = result.rows_affected() > 0;
        if added {
            sqlx::query("UPDATE playlists SET updated_at = NOW() WHERE id = $1")
                .bind(playlist)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(added)
    }

    async fn remove_video(
        &self,
        playlist: ObjectId,
        video: ObjectId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
                .bind(playlist)
                .bind(video)
                .execute(&mut *tx)
                .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            sqlx::query("UPDATE playlists SET updated_at = NOW() WHERE id = $1")
                .bind(playlist)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn list_for_owner(
        &self,
        owner: ObjectId,
        include_private: bool,
    ) -> Result<Vec<PlaylistSummary>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {PLAYLIST_COLUMNS}
            FROM playlists p
            WHERE p.owner_id = $1 AND (NOT p.is_private OR $2)
            ORDER BY p.created_at DESC, p.id DESC
            "
        ))
        .bind(owner)
        .bind(include_private)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(PlaylistSummary::from(&map_row_to_playlist(row)?)))
            .collect()
    }

    async fn find_detail(&self, id: ObjectId) -> Result<Option<PlaylistDetail>, RepositoryError> {
        let row = sqlx::query(&format!(
            r"
            SELECT {PLAYLIST_COLUMNS}, {OWNER_COLUMNS}
            FROM playlists p
            JOIN users u ON u.id = p.owner_id
            WHERE p.id = $1
            "
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut playlist = map_row_to_playlist(&row)?;
        let owner = map_row_to_owner(&row)?;

        let video_rows = sqlx::query(&format!(
            r"
            SELECT pv.video_id AS entry_video_id, {VIDEO_COLUMNS}, {OWNER_COLUMNS}
            FROM playlist_videos pv
            JOIN videos v ON v.id = pv.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE pv.playlist_id = $1
            ORDER BY pv.position ASC
            "
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut videos = Vec::with_capacity(video_rows.len());
        for video_row in &video_rows {
            playlist.videos.push(video_row.try_get("entry_video_id")?);
            let is_published: bool = video_row.try_get("is_published")?;
            if is_published {
                videos.push(map_row_to_video_summary(video_row)?);
            }
        }

        Ok(Some(PlaylistDetail::new(&playlist, owner, videos)))
    }
}
