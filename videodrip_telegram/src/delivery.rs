use async_trait::async_trait;
use teloxide::prelude::*;
use thiserror::Error;
use videodrip_models::user::UserId;
use videodrip_scheduler::delivery::{DeliveryMessage, VideoDeliveryChannel};

use crate::{messages, rating::rating_keyboard};

#[derive(Debug, Error)]
pub enum TelegramDeliveryChannelError {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),

    #[error("UserId is not a Telegram chat id {0}")]
    InvalidUser(UserId),
}

pub struct TelegramDeliveryChannel {
    bot: Bot,
}

impl TelegramDeliveryChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send(
        &self,
        chat_id: ChatId,
        message: &DeliveryMessage,
    ) -> Result<(), TelegramDeliveryChannelError> {
        match message {
            DeliveryMessage::Video { index, url } => {
                self.bot
                    .send_message(chat_id, messages::video_sent(index + 1))
                    .await?;
                self.bot.send_message(chat_id, url.as_str()).await?;
            }
            DeliveryMessage::RatingPrompt => {
                self.bot
                    .send_message(chat_id, messages::RATING_PROMPT)
                    .reply_markup(rating_keyboard())
                    .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl VideoDeliveryChannel for TelegramDeliveryChannel {
    async fn deliver(&self, user_id: &UserId, message: &DeliveryMessage) -> anyhow::Result<()> {
        let chat_id = chat_id_of(user_id)?;
        self.send(chat_id, message).await?;

        Ok(())
    }
}

fn chat_id_of(user_id: &UserId) -> Result<ChatId, TelegramDeliveryChannelError> {
    user_id
        .as_str()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| TelegramDeliveryChannelError::InvalidUser(user_id.clone()))
}
