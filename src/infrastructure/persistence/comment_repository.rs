use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::rows::{OWNER_COLUMNS, count, map_row_to_comment, map_row_to_owner};
use crate::domain::entities::Comment;
use crate::domain::read_models::{CommentView, Page, PageRequest};
use crate::domain::repositories::{CommentRepository, RepositoryError};
use crate::domain::value_objects::ObjectId;

/// `PostgreSQL` implementation of `CommentRepository`
#[derive(Clone)]
pub struct PostgreSqlCommentRepository {
    pool: PgPool,
}

impl PostgreSqlCommentRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgreSqlCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO comments (id, content, video_id, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.video)
        .bind(comment.owner)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Comment>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, content, video_id, owner_id, created_at, updated_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_comment).transpose()
    }

    async fn update(&self, comment: &Comment) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE comments SET content = $2, updated_at = $3 WHERE id = $1")
                .bind(comment.id)
                .bind(&comment.content)
                .bind(comment.updated_at)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM likes WHERE target_kind = 'comment' AND target_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result =
            sqlx::query("DELETE FROM comments WHERE id = $1").bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_video(
        &self,
        video: ObjectId,
        page: PageRequest,
    ) -> Result<Page<CommentView>, RepositoryError> {
        let total_row = sqlx::query("SELECT COUNT(*) AS total FROM comments WHERE video_id = $1")
            .bind(video)
            .fetch_one(&self.pool)
            .await?;
        let total = count(&total_row, "total")?;

        let rows = sqlx::query(&format!(
            r"
            SELECT c.id, c.content, c.created_at, {OWNER_COLUMNS}
            FROM comments c
            JOIN users u ON u.id = c.owner_id
            WHERE c.video_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(video)
        .bind(i64::from(page.limit()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let docs = rows
            .iter()
            .map(|row| {
                Ok(CommentView {
                    id: row.try_get("id")?,
                    content: row.try_get("content")?,
                    owner: map_row_to_owner(row)?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Page::new(docs, total, page))
    }
}
