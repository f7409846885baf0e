use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::map_row_to_community_post;
use crate::domain::entities::CommunityPost;
use crate::domain::repositories::{CommunityPostRepository, RepositoryError};
use crate::domain::value_objects::ObjectId;

/// `PostgreSQL` implementation of `CommunityPostRepository`
#[derive(Clone)]
pub struct PostgreSqlCommunityPostRepository {
    pool: PgPool,
}

impl PostgreSqlCommunityPostRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityPostRepository for PostgreSqlCommunityPostRepository {
    async fn insert(&self, post: &CommunityPost) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO community_posts (id, content, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(post.owner)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CommunityPost>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, content, owner_id, created_at, updated_at FROM community_posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_community_post).transpose()
    }

    async fn update(&self, post: &CommunityPost) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE community_posts SET content = $2, updated_at = $3 WHERE id = $1")
                .bind(post.id)
                .bind(&post.content)
                .bind(post.updated_at)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM likes WHERE target_kind = 'community_post' AND target_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM community_posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_owner(
        &self,
        owner: ObjectId,
    ) -> Result<Vec<CommunityPost>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, content, owner_id, created_at, updated_at
            FROM community_posts
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_community_post).collect()
    }
}
