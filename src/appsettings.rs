use anyhow::ensure;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use videodrip_models::settings::Settings;

/// Reads `appsettings.toml`, then the optional `appsettings.local.toml`, then
/// `APP_`-prefixed environment variables such as `APP_TELEGRAM__TOKEN`.
pub fn load() -> anyhow::Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name("appsettings").required(true))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    build(builder)
}

fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;

    ensure!(
        !settings.telegram.token.trim().is_empty(),
        "Telegram bot token is not configured, set APP_TELEGRAM__TOKEN"
    );
    ensure!(
        !settings.catalog.videos.is_empty(),
        "Video catalog must contain at least one video"
    );

    Ok(settings)
}
