mod commands;
mod delivery;
mod messages;
mod rating;
mod util;


pub use delivery::{TelegramDeliveryChannel, TelegramDeliveryChannelError};
pub use teloxide;

use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler, dptree::case, prelude::*, utils::command::BotCommands,
};
use videodrip_scheduler::SessionManager;

type HandlerResult = anyhow::Result<()>;

pub struct TelegramInteractionInterface;

impl TelegramInteractionInterface {
    pub async fn start(bot: Bot, manager: Arc<SessionManager>) {
        log::info!("Starting Telegram interaction interface");

        if let Err(e) = bot.set_my_commands(GlobalCommand::bot_commands()).await {
            log::error!("Failed to register bot commands: {e}");
        }

        Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![manager])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

fn schema() -> UpdateHandler<anyhow::Error> {
    let command_handler = teloxide::filter_command::<GlobalCommand, _>()
        .branch(case![GlobalCommand::Start].endpoint(commands::start))
        .branch(case![GlobalCommand::Pause].endpoint(commands::pause))
        .branch(case![GlobalCommand::Resume].endpoint(commands::resume))
        .branch(case![GlobalCommand::Status].endpoint(commands::status))
        .branch(case![GlobalCommand::Help].endpoint(commands::help));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(invalid_message));

    let callback_handler = Update::filter_callback_query()
        .branch(rating::schema())
        .branch(dptree::endpoint(invalid_query));

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

async fn invalid_message(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, messages::UNKNOWN_MESSAGE)
        .await?;
    Ok(())
}

async fn invalid_query(bot: Bot, query: CallbackQuery) -> HandlerResult {
    log::warn!(
        "Ignoring unexpected callback data {:?} from user {}",
        query.data,
        query.from.id
    );
    bot.answer_callback_query(query.id).await?;

    Ok(())
}

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum GlobalCommand {
    #[command(description = "start or continue sending videos")]
    Start,
    #[command(description = "pause sending videos")]
    Pause,
    #[command(description = "resume sending videos")]
    Resume,
    #[command(description = "show your progress")]
    Status,
    #[command(description = "show this message")]
    Help,
}
