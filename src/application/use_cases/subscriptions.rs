use tracing::info;

use super::load_user;
use crate::domain::entities::Subscription;
use crate::domain::policy::ensure_self;
use crate::domain::read_models::SubscriptionEntry;
use crate::domain::repositories::{Store, ToggleOutcome};
use crate::domain::value_objects::ObjectId;
use crate::presentation::middleware::error::AppError;

#[derive(Clone)]
pub struct SubscriptionUseCases {
    store: Store,
}

impl SubscriptionUseCases {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Subscribe to `channel`, or unsubscribe when already subscribed
    pub async fn toggle(
        &self,
        caller: ObjectId,
        channel: ObjectId,
    ) -> Result<ToggleOutcome<Subscription>, AppError> {
        let subscription = Subscription::new(caller, channel)?;
        load_user(&self.store, channel).await?;

        let outcome = self.store.subscriptions.toggle(subscription).await?;
        info!(
            subscriber = %caller,
            channel = %channel,
            subscribed = outcome.is_created(),
            "Subscription toggled"
        );
        Ok(outcome)
    }

    /// Subscribers of the caller's own channel
    pub async fn subscribers(
        &self,
        caller: ObjectId,
        channel: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, AppError> {
        ensure_self(channel, caller, "view subscribers of another channel")?;
        Ok(self.store.subscriptions.subscribers_of(channel).await?)
    }

    /// Channels the caller follows
    pub async fn subscribed_channels(
        &self,
        caller: ObjectId,
        subscriber: ObjectId,
    ) -> Result<Vec<SubscriptionEntry>, AppError> {
        ensure_self(subscriber, caller, "view subscriptions of another user")?;
        Ok(self.store.subscriptions.channels_of(subscriber).await?)
    }
}
