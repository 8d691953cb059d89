use crate::discord;
use chrono::Utc;
use poise::serenity_prelude as serenity;
use std::time::Instant;

/// Check that the bot is responding
#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn ping(ctx: discord::Context<'_>) -> Result<(), discord::Error> {
    let start = Instant::now();
    let reply = ctx.say("Pong!").await?;

    reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .content(format!("Pong! ({} ms)", start.elapsed().as_millis())),
        )
        .await?;
    Ok(())
}

/// Show how long the bot has been running
#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn about(ctx: discord::Context<'_>) -> Result<(), discord::Error> {
    let started_at = ctx.data().started_at;
    let uptime = Utc::now() - started_at;

    let response = format!(
        "**Started**: <t:{}:R>\n**Uptime**: {}h {}m\n**Commands**: {}",
        started_at.timestamp(),
        uptime.num_hours(),
        uptime.num_minutes() % 60,
        ctx.framework().options().commands.len()
    );

    ctx.say(response).await?;
    Ok(())
}

/// Show when a Discord account was created and how old it is
#[poise::command(context_menu_command = "User information", slash_command, category = "General")]
pub async fn user_info(
    ctx: discord::Context<'_>,
    #[description = "Discord profile to look up"] user: serenity::User,
) -> Result<(), discord::Error> {
    let created = user.created_at().unix_timestamp();
    let age_days = account_age_days(created, Utc::now().timestamp());

    let mut response = format!(
        "**Name**: {}\n**Created**: <t:{}:D> ({} days ago)",
        user.name, created, age_days
    );
    if user.bot {
        response.push_str("\n**Bot account**");
    }

    ctx.say(response).await?;
    Ok(())
}

fn account_age_days(created_unix: i64, now_unix: i64) -> i64 {
    (now_unix - created_unix).max(0) / 86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_age_rounds_down_to_whole_days() {
        assert_eq!(account_age_days(0, 86_399), 0);
        assert_eq!(account_age_days(0, 3 * 86_400 + 5), 3);
        assert_eq!(account_age_days(100, 50), 0);
    }
}
