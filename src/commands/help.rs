use crate::help::PaginatedHelpCommand;
use crate::{config, discord};
use tracing::debug;

/// Show this help menu
#[poise::command(prefix_command, track_edits, slash_command)]
pub async fn help(
    ctx: discord::Context<'_>,
    #[description = "Command or category to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    #[rest]
    command: Option<String>,
) -> Result<(), discord::Error> {
    debug!("help requested for {:?}", command);

    PaginatedHelpCommand::new(ctx, config::get_help_config())?
        .command_callback(command.as_deref())
        .await?;
    Ok(())
}
