mod appsettings;

use std::sync::Arc;

use videodrip_scheduler::{DeliveryTiming, IntervalDeliveryScheduler, SessionManager};
use videodrip_storage::json::JsonFileSessionStore;
use videodrip_telegram::{
    TelegramDeliveryChannel, TelegramInteractionInterface, teloxide::Bot,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::load()?;
    let catalog = settings.catalog.catalog();
    log::info!(
        "Loaded {} videos, sending one every {:?}",
        catalog.len(),
        settings.delivery.interval()
    );

    let bot = Bot::new(settings.telegram.token.clone());
    let store = Arc::new(JsonFileSessionStore::new(settings.storage.path.clone()));
    let delivery_channel = Arc::new(TelegramDeliveryChannel::new(bot.clone()));
    let scheduler = Arc::new(IntervalDeliveryScheduler::new(
        store.clone(),
        delivery_channel,
        catalog.clone(),
        DeliveryTiming {
            interval: settings.delivery.interval(),
            first_delay: settings.delivery.first_delay(),
            cleanup_interval: settings.delivery.cleanup_interval(),
        },
    ));
    let manager = Arc::new(SessionManager::new(store, scheduler.clone(), catalog));

    if settings.delivery.restore_on_startup {
        manager.restore().await?;
    }

    TelegramInteractionInterface::start(bot, manager).await;

    log::info!("Shutting down");
    scheduler.shutdown().await;

    Ok(())
}
