use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::rows::{OWNER_COLUMNS, map_row_to_subscription_entry};
use crate::domain::entities::Subscription;
use crate::domain::read_models::SubscriptionEntry;
use crate::domain::repositories::{RepositoryError, SubscriptionRepository, ToggleOutcome};
use crate::domain::value_objects::ObjectId;

/// `PostgreSQL` implementation of `SubscriptionRepository`
#[derive(Clone)]
pub struct PostgreSqlSubscriptionRepository {
    pool: PgPool,
}

impl PostgreSqlSubscriptionRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgreSqlSubscriptionRepository {
    async fn toggle(
        &self,
        subscription: Subscription,
    ) -> Result<ToggleOutcome<Subscription>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            r"
            DELETE FROM subscriptions
            WHERE subscriber_id = $1 AND channel_id = $2
            RETURNING id
            ",
        )
        .bind(subscription.subscriber)
        .bind(subscription.channel)
        .fetch_optional(&mut *tx)
        .await?;

        if removed.is_some() {
            tx.commit().await?;
            return Ok(ToggleOutcome::Removed {});
        }

        let inserted = sqlx::query(
            r"
            INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subscriber_id, channel_id) DO NOTHING
            RETURNING id
            ",
        )
        .bind(subscription.id)
        .bind(subscription.subscriber)
        .bind(subscription.channel)
        .bind(subscription.created_at)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = if inserted.is_some() {
            ToggleOutcome::Created(subscription)
        } else {
            let row = sqlx::query(
                "SELECT id, created_at FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2",
            )
            .bind(subscription.subscriber)
            .bind(subscription.channel)
            .fetch_one(&mut *tx)
            .await?;

            ToggleOutcome::Created(Subscription {
                id: row.try_get("id")?,
                created_at: row.try_get("created_at")?,
                ..subscription
            })
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn subscribers_of(
        &self,
        channel: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r"
            SELECT s.id, s.created_at, {OWNER_COLUMNS}
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            "
        ))
        .bind(channel)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_subscription_entry).collect()
    }

    async fn channels_of(
        &self,
        subscriber: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r"
            SELECT s.id, s.created_at, {OWNER_COLUMNS}
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            "
        ))
        .bind(subscriber)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_subscription_entry).collect()
    }
}
