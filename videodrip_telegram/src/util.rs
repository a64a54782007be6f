use teloxide::types::{CallbackQuery, ChatId, MaybeInaccessibleMessage, Message};
use videodrip_models::user::UserId;

pub fn session_user(chat_id: ChatId) -> UserId {
    UserId::from(chat_id.0)
}

pub fn try_get_message_from_query(query: &CallbackQuery) -> Option<&Message> {
    query.message.as_ref().and_then(|msg| match msg {
        MaybeInaccessibleMessage::Inaccessible(_) => None,
        MaybeInaccessibleMessage::Regular(message) => Some(message.as_ref()),
    })
}
