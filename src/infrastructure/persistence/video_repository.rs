use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use super::rows::{
    OWNER_COLUMNS, VIDEO_COLUMNS, count, map_row_to_owner, map_row_to_video,
    map_row_to_video_summary,
};
use crate::domain::entities::Video;
use crate::domain::read_models::{ChannelSummary, Page, VideoDetail, VideoSummary};
use crate::domain::repositories::{RepositoryError, VideoRepository, VideoSearch};
use crate::domain::value_objects::ObjectId;

/// `PostgreSQL` implementation of `VideoRepository`
#[derive(Clone)]
pub struct PostgreSqlVideoRepository {
    pool: PgPool,
}

impl PostgreSqlVideoRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `to_tsquery` input matching any of the terms
fn any_term_query(terms: &[String]) -> String {
    terms
        .iter()
        .map(|term| term.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// FROM/WHERE shared by the count and page queries of a search
fn push_search_source(builder: &mut QueryBuilder<'_, Postgres>, tsquery: String) {
    builder
        .push(" FROM videos v JOIN users u ON u.id = v.owner_id")
        .push(", to_tsquery('english', ")
        .push_bind(tsquery)
        .push(") AS q")
        .push(" WHERE v.is_published AND v.search_vector @@ q");
}

#[async_trait]
impl VideoRepository for PostgreSqlVideoRepository {
    async fn insert(&self, video: &Video) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO videos
            (id, video_file, thumbnail, title, description, duration, views, is_published, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(video.id)
        .bind(&video.video_file)
        .bind(&video.thumbnail)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.duration)
        .bind(video.views)
        .bind(video.is_published)
        .bind(video.owner)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Video>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_video).transpose()
    }

    async fn update(&self, video: &Video) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE videos
            SET title = $2, description = $3, thumbnail = $4, is_published = $5, updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail)
        .bind(video.is_published)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Likes have no foreign key to their target, so clear them first
        sqlx::query(
            r"
            DELETE FROM likes
            WHERE (target_kind = 'video' AND target_id = $1)
               OR (target_kind = 'comment'
                   AND target_id IN (SELECT id FROM comments WHERE video_id = $1))
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // comments and playlist entries cascade
        let result = sqlx::query("DELETE FROM videos WHERE id = $1").bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_published(
        &self,
        search: &VideoSearch,
    ) -> Result<Page<VideoSummary>, RepositoryError> {
        let tsquery = any_term_query(&search.terms);
        if tsquery.is_empty() {
            return Ok(search.page.slice(Vec::new()));
        }

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS total");
        push_search_source(&mut count_query, tsquery.clone());
        let total = count(&count_query.build().fetch_one(&self.pool).await?, "total")?;

        let direction = search.sort_type.as_sql();
        let mut page_query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {VIDEO_COLUMNS}, {OWNER_COLUMNS}, ts_rank(v.search_vector, q) AS score"
        ));
        push_search_source(&mut page_query, tsquery);
        page_query
            .push(format!(
                " ORDER BY score DESC, v.{} {direction}, v.id {direction}",
                search.sort_by.column()
            ))
            .push(" LIMIT ")
            .push_bind(i64::from(search.page.limit()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(search.page.offset()).unwrap_or(i64::MAX));

        tracing::debug!(sql = page_query.sql(), "Searching published videos");

        let rows = page_query.build().fetch_all(&self.pool).await?;
        let docs = rows
            .iter()
            .map(|row| {
                let score: f32 = row.try_get("score")?;
                Ok(map_row_to_video_summary(row)?.with_score(score))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Page::new(docs, total, search.page))
    }

    async fn find_detail(
        &self,
        id: ObjectId,
        viewer: ObjectId,
    ) -> Result<Option<VideoDetail>, RepositoryError> {
        let row = sqlx::query(&format!(
            r"
            SELECT {VIDEO_COLUMNS}, {OWNER_COLUMNS},
                (SELECT COUNT(*) FROM likes l
                  WHERE l.target_kind = 'video' AND l.target_id = v.id) AS total_likes,
                EXISTS(SELECT 1 FROM likes l
                  WHERE l.target_kind = 'video' AND l.target_id = v.id AND l.liked_by = $2) AS is_liked,
                (SELECT COUNT(*) FROM subscriptions s
                  WHERE s.channel_id = u.id) AS subscriber_count,
                EXISTS(SELECT 1 FROM subscriptions s
                  WHERE s.channel_id = u.id AND s.subscriber_id = $2) AS is_subscribed
            FROM videos v
            JOIN users u ON u.id = v.owner_id
            WHERE v.id = $1
            "
        ))
        .bind(id)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let video = map_row_to_video(&row)?;
        let channel = ChannelSummary::new(
            map_row_to_owner(&row)?,
            count(&row, "subscriber_count")?,
            row.try_get("is_subscribed")?,
        );

        Ok(Some(VideoDetail::new(
            &video,
            channel,
            count(&row, "total_likes")?,
            row.try_get("is_liked")?,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_term_query_joins_with_or() {
        let terms = vec!["rust".to_string(), "tokio".to_string()];
        assert_eq!(any_term_query(&terms), "rust | tokio");
    }

    #[test]
    fn test_any_term_query_strips_operators() {
        let terms = vec!["a&b".to_string(), "!".to_string()];
        assert_eq!(any_term_query(&terms), "ab");
    }
}
