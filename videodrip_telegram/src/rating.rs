use std::sync::Arc;

use teloxide::{
    dispatching::{UpdateHandler, dialogue::GetChatId},
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};
use videodrip_models::session::Rating;
use videodrip_scheduler::{RateOutcome, SessionManager};

use crate::{
    HandlerResult, messages,
    util::{session_user, try_get_message_from_query},
};

const CALLBACK_PREFIX: &str = "rating_";
const BUTTONS_PER_ROW: usize = 5;

pub fn callback_data(rating: Rating) -> String {
    format!("{CALLBACK_PREFIX}{rating}")
}

pub fn parse_callback_data(data: &str) -> Option<Rating> {
    data.strip_prefix(CALLBACK_PREFIX)?.parse().ok()
}

/// Scores 1-5 on the first row and 6-10 on the second.
pub fn rating_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<_> = Rating::all()
        .map(|rating| InlineKeyboardButton::callback(rating.to_string(), callback_data(rating)))
        .collect();

    InlineKeyboardMarkup::new(buttons.chunks(BUTTONS_PER_ROW).map(|row| row.to_vec()))
}

async fn handle_rating(
    bot: Bot,
    query: CallbackQuery,
    rating: Rating,
    manager: Arc<SessionManager>,
) -> HandlerResult {
    bot.answer_callback_query(query.id.clone()).await?;

    let chat_id = query
        .chat_id()
        .unwrap_or_else(|| ChatId::from(query.from.id));

    match manager.rate(&session_user(chat_id), rating).await? {
        RateOutcome::Recorded(rating) => {
            let text = messages::rating_thanks(rating);
            match try_get_message_from_query(&query) {
                Some(message) => {
                    bot.edit_message_text(message.chat.id, message.id, text)
                        .await?;
                }
                None => {
                    bot.send_message(chat_id, text).await?;
                }
            }
        }
        RateOutcome::NotFinished => {
            bot.send_message(chat_id, messages::RATING_TOO_EARLY)
                .await?;
        }
        RateOutcome::NotStarted => {
            bot.send_message(chat_id, messages::NOT_STARTED).await?;
        }
    }

    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::filter_map(|query: CallbackQuery| {
        query.data.as_deref().and_then(parse_callback_data)
    })
    .endpoint(handle_rating)
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;

    #[test]
    fn parses_every_score() {
        for value in 1..=10u8 {
            let rating = Rating::new(value).unwrap();
            assert_eq!(parse_callback_data(&callback_data(rating)), Some(rating));
        }
    }

    #[test]
    fn rejects_foreign_or_out_of_range_data() {
        for data in ["rating_0", "rating_11", "rating_", "rating_x", "7", "feedback", ""] {
            assert_eq!(parse_callback_data(data), None, "{data:?}");
        }
    }

    #[test]
    fn keyboard_has_two_rows_of_five() {
        let keyboard = rating_keyboard();

        let rows: Vec<Vec<(String, String)>> = keyboard
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => {
                            (button.text.clone(), data.clone())
                        }
                        other => panic!("Unexpected button kind {other:?}"),
                    })
                    .collect()
            })
            .collect();

        let expected_row = |range: std::ops::RangeInclusive<u8>| -> Vec<(String, String)> {
            range
                .map(|i| (i.to_string(), format!("rating_{i}")))
                .collect()
        };
        assert_eq!(rows, vec![expected_row(1..=5), expected_row(6..=10)]);
    }
}
