use helpmenus::{config, discord};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), discord::Error> {
    // Initialize the logging
    let logging_config = config::get_logging_config();

    // Set up the tracing subscriber here
    let subscriber = FmtSubscriber::builder()
        .with_max_level(logging_config)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting helpmenus...");
    info!(
        "Help overview shows {} categories per page",
        config::get_help_config().per_page
    );

    // Finally begin working on Discord bot
    // immediately async the bot onto it's own task
    let bot_handle = tokio::spawn(async { discord::start_discord_bot().await });

    if let Err(e) = bot_handle.await? {
        error!("Discord bot stopped: {}", e);
        return Err(e);
    }

    Ok(())
}
