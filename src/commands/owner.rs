use crate::discord;

/// Register or unregister the slash commands
#[poise::command(prefix_command, owners_only, hide_in_help, category = "Owner")]
pub async fn register(ctx: discord::Context<'_>) -> Result<(), discord::Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;
    Ok(())
}
