use crate::discord;

/// Small text utilities
///
/// Pick one of the subcommands, for example `tools echo hello`.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Tools",
    subcommands("echo", "reverse", "count"),
    subcommand_required
)]
pub async fn tools(_ctx: discord::Context<'_>) -> Result<(), discord::Error> {
    Ok(())
}

/// Repeat the given text
#[poise::command(prefix_command, slash_command)]
pub async fn echo(
    ctx: discord::Context<'_>,
    #[description = "Text to repeat"]
    #[rest]
    text: String,
) -> Result<(), discord::Error> {
    ctx.say(text).await?;
    Ok(())
}

/// Reverse the given text
#[poise::command(prefix_command, slash_command)]
pub async fn reverse(
    ctx: discord::Context<'_>,
    #[description = "Text to reverse"]
    #[rest]
    text: String,
) -> Result<(), discord::Error> {
    ctx.say(text.chars().rev().collect::<String>()).await?;
    Ok(())
}

/// Count the words and characters in the given text
#[poise::command(prefix_command, slash_command)]
pub async fn count(
    ctx: discord::Context<'_>,
    #[description = "Text to count"]
    #[rest]
    text: String,
) -> Result<(), discord::Error> {
    let (words, chars) = word_and_char_count(&text);
    ctx.say(format!("{} words, {} characters", words, chars))
        .await?;
    Ok(())
}

fn word_and_char_count(text: &str) -> (usize, usize) {
    (text.split_whitespace().count(), text.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_and_chars() {
        assert_eq!(word_and_char_count("héllo  world"), (2, 12));
        assert_eq!(word_and_char_count(""), (0, 0));
    }

    #[test]
    fn group_carries_its_subcommands() {
        let group = tools();
        let names: Vec<_> = group.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["echo", "reverse", "count"]);
        assert_eq!(group.category.as_deref(), Some("Tools"));
    }
}
