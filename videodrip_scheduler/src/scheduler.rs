use async_trait::async_trait;

use videodrip_models::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDelivery {
    pub user_id: UserId,
}

impl ScheduledDelivery {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Per-user repeating delivery tasks, at most one live task per user.
#[async_trait]
pub trait DeliveryScheduler: Send + Sync + 'static {
    /// Arms the repeating task for `user_id`. Returns the running task instead of
    /// starting a second one when it is already armed.
    async fn schedule(&self, user_id: &UserId) -> anyhow::Result<ScheduledDelivery>;

    async fn cancel(&self, scheduled_delivery: &ScheduledDelivery) -> anyhow::Result<()>;

    async fn is_scheduled(&self, user_id: &UserId) -> bool;
}
