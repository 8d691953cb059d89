use crate::{commands, config};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

// Types used by all command functions
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

// Custom user data passed to all command functions
pub struct Data {
    pub started_at: DateTime<Utc>,
}

fn owners(config: &config::Discord) -> HashSet<serenity::UserId> {
    config
        .owners
        .iter()
        .filter_map(|id_str| id_str.parse::<u64>().ok())
        .filter(|id| *id != 0)
        .map(serenity::UserId::new)
        .collect()
}

pub fn framework_options() -> poise::FrameworkOptions<Data, Error> {
    let config = config::get_config();

    poise::FrameworkOptions {
        commands: commands::all(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.discord.prefix.clone()),
            mention_as_prefix: true,
            ..Default::default()
        },
        owners: owners(&config.discord),
        on_error: |error| Box::pin(on_error(error)),
        pre_command: |ctx| {
            Box::pin(async move {
                debug!(
                    "{} invoked {}",
                    ctx.author().name,
                    ctx.command().qualified_name
                );
            })
        },
        event_handler: |ctx, event, framework, data| Box::pin(event_handler(ctx, event, framework, data)),
        ..Default::default()
    }
}

pub async fn start_discord_bot() -> Result<(), Error> {
    // get the config
    let config = config::get_config();

    // Get the Discord token
    let token = &config.discord.bot_token;

    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data {
                    started_at: Utc::now(),
                })
            })
        })
        .options(framework_options())
        .build();

    // Create a new instance of the Client
    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await?;

    // Start the client
    if let Err(e) = client.start().await {
        error!("Client error: {:?}", e);
        return Err(Box::new(e));
    }

    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Error in command {}: {}",
                ctx.command().qualified_name,
                error
            );
            if let Err(e) = ctx.say("Something went wrong while running that command.").await {
                error!("Failed to report command error: {:?}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {:?}", e);
            }
        }
    }
}

async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::Resume { .. } => {
            warn!("Gateway session resumed");
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_skip_invalid_snowflakes() {
        let discord = config::Discord {
            owners: vec![
                "1234".to_string(),
                "".to_string(),
                "abc".to_string(),
                "0".to_string(),
            ],
            ..Default::default()
        };

        let owners = owners(&discord);
        assert_eq!(owners.len(), 1);
        assert!(owners.contains(&serenity::UserId::new(1234)));
    }
}
