use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};
use videodrip_scheduler::{PauseOutcome, ResumeOutcome, SessionManager, StartOutcome};

use crate::{GlobalCommand, HandlerResult, messages, util::session_user};

pub(super) async fn start(bot: Bot, msg: Message, manager: Arc<SessionManager>) -> HandlerResult {
    let user_id = session_user(msg.chat.id);
    log::info!("Received /start command from user {user_id}");

    let outcome = manager.start(&user_id).await?;
    let text = match outcome {
        StartOutcome::Created => messages::intro(&GlobalCommand::descriptions().to_string()),
        StartOutcome::Resumed => messages::RESUMED_START.to_string(),
        StartOutcome::AwaitingRating => messages::AWAITING_RATING_START.to_string(),
        StartOutcome::AlreadyFinished => messages::ALREADY_FINISHED.to_string(),
    };
    bot.send_message(msg.chat.id, text).await?;

    if outcome.needs_delivery() {
        manager.ensure_delivery(&user_id).await?;
        log::info!("Started video sending for user {user_id}");
    }

    Ok(())
}

pub(super) async fn pause(bot: Bot, msg: Message, manager: Arc<SessionManager>) -> HandlerResult {
    let text = match manager.pause(&session_user(msg.chat.id)).await? {
        PauseOutcome::Paused => messages::PAUSED,
        PauseOutcome::AlreadyPaused => messages::ALREADY_PAUSED,
        PauseOutcome::Finished => messages::NOTHING_LEFT,
        PauseOutcome::NotStarted => messages::NOT_STARTED,
    };
    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}

pub(super) async fn resume(bot: Bot, msg: Message, manager: Arc<SessionManager>) -> HandlerResult {
    let text = match manager.resume(&session_user(msg.chat.id)).await? {
        ResumeOutcome::Resumed => messages::RESUMED,
        ResumeOutcome::NotPaused => messages::NOT_PAUSED,
        ResumeOutcome::Finished => messages::NOTHING_LEFT,
        ResumeOutcome::NotStarted => messages::NOT_STARTED,
    };
    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}

pub(super) async fn status(bot: Bot, msg: Message, manager: Arc<SessionManager>) -> HandlerResult {
    let text = match manager.status(&session_user(msg.chat.id)).await? {
        Some(status) => messages::status(&status),
        None => messages::NOT_STARTED.to_string(),
    };
    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}

pub(super) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GlobalCommand::descriptions().to_string())
        .await?;

    Ok(())
}
