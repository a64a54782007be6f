use async_trait::async_trait;

use videodrip_models::user::UserId;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DeliveryMessage {
    /// Catalog item at zero-based `index`.
    Video { index: usize, url: String },
    RatingPrompt,
}

#[async_trait]
pub trait VideoDeliveryChannel: Send + Sync + 'static {
    async fn deliver(&self, user_id: &UserId, message: &DeliveryMessage) -> anyhow::Result<()>;
}
