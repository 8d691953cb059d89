use tracing::{debug, info};

use super::metadata::{self, Cog, Command, CommandInfo, Invoker, Lookup};
use super::page::PageView;
use crate::config::Help;
use crate::discord::Context;
use crate::error::HelpError;

/// Fails when the help command was built without the button menus.
pub fn require_menus(class: &'static str, available: bool) -> Result<(), HelpError> {
    if available {
        Ok(())
    } else {
        Err(HelpError::MissingDependency {
            class,
            dependency: "menus",
            feature: "menus",
        })
    }
}

/// Replaces a mention prefix with a readable `@name `. The mention may
/// come with or without its trailing whitespace.
pub fn clean_prefix(prefix: &str, bot_id: u64, bot_name: &str) -> String {
    let mention = format!("<@{}>", bot_id);
    let nick_mention = format!("<@!{}>", bot_id);

    match prefix
        .strip_prefix(&mention)
        .or_else(|| prefix.strip_prefix(&nick_mention))
    {
        Some(rest) if rest.trim().is_empty() => format!("@{} ", bot_name),
        Some(rest) => format!("@{}{}", bot_name, rest),
        None => prefix.to_string(),
    }
}

/// Turns command metadata into help pages. Holds everything that depends on
/// the invocation except the Discord context itself.
pub struct HelpFormatter<'a> {
    clean_prefix: String,
    invoked_with: String,
    settings: &'a Help,
}

impl<'a> HelpFormatter<'a> {
    pub fn new(clean_prefix: impl Into<String>, invoked_with: impl Into<String>, settings: &'a Help) -> Self {
        Self {
            clean_prefix: clean_prefix.into(),
            invoked_with: invoked_with.into(),
            settings,
        }
    }

    /// Retrieves the signature portion of the help page.
    pub fn get_command_signature(&self, command: &CommandInfo) -> String {
        format!(
            "{}{} {}",
            self.clean_prefix, command.qualified_name, command.signature
        )
        .trim_end()
        .to_string()
    }

    /// Title, colour and usage hint shared by every overview page.
    pub fn overview_page(&self) -> PageView {
        PageView::new("Bot Commands", self.settings.colour).description(format!(
            "Use \"{0}{1} command\" for more info on a command.\n\
             Use \"{0}{1} category\" for more info on a category.",
            self.clean_prefix, self.invoked_with
        ))
    }

    /// One (category, command list) pair for each category that still has
    /// visible commands.
    pub fn bot_help_fields(&self, mapping: &[(Option<Cog>, Vec<CommandInfo>)]) -> Vec<(String, String)> {
        mapping
            .iter()
            .filter(|(_, commands)| !commands.is_empty())
            .map(|(cog, commands)| {
                let name = match cog {
                    Some(cog) => cog.qualified_name.clone(),
                    None => self.settings.no_category.clone(),
                };

                // \u{2002} = en space
                let listing = commands
                    .iter()
                    .map(|c| format!("`{}{}`", self.clean_prefix, c.name))
                    .collect::<Vec<_>>()
                    .join("\u{2002}");

                let value = match cog.as_ref().and_then(|cog| cog.description.as_ref()) {
                    Some(description) => format!("{}\n{}", description, listing),
                    None => listing,
                };

                (name, value)
            })
            .collect()
    }

    fn command_fields(&self, view: PageView, commands: &[CommandInfo]) -> PageView {
        commands.iter().fold(view, |view, command| {
            view.field(
                self.get_command_signature(command),
                command.short_doc().unwrap_or("..."),
                false,
            )
        })
    }

    pub fn cog_help_page(&self, cog: &Cog, commands: &[CommandInfo]) -> PageView {
        let mut view = PageView::new(format!("{} Commands", cog.qualified_name), self.settings.colour);
        if let Some(description) = &cog.description {
            view = view.description(description);
        }

        self.command_fields(view, commands).footer(format!(
            "Use {}help [command] for more info on a command.",
            self.clean_prefix
        ))
    }

    /// Used for both groups and plain commands; `subcommands` is empty for
    /// the latter.
    pub fn group_help_page(&self, group: &CommandInfo, subcommands: &[CommandInfo]) -> PageView {
        let mut view = PageView::new(&group.qualified_name, self.settings.colour);
        if let Some(help) = group.help() {
            view = view.description(help);
        }

        self.command_fields(view, subcommands)
    }

    pub fn command_not_found(&self, name: &str) -> String {
        format!("No command called \"{}\" found.", name)
    }

    pub fn subcommand_not_found(&self, qualified_name: &str, has_subcommands: bool, name: &str) -> String {
        if has_subcommands {
            format!("Command \"{}\" has no subcommand named {}", qualified_name, name)
        } else {
            format!("Command \"{}\" has no subcommands.", qualified_name)
        }
    }
}

/// Help command override using embeds and button pagination.
pub struct PaginatedHelpCommand<'a> {
    ctx: Context<'a>,
    settings: &'a Help,
    formatter: HelpFormatter<'a>,
}

impl<'a> PaginatedHelpCommand<'a> {
    pub const NAME: &'static str = "PaginatedHelpCommand";

    pub fn new(ctx: Context<'a>, settings: &'a Help) -> Result<Self, HelpError> {
        require_menus(Self::NAME, cfg!(feature = "menus"))?;

        let (bot_id, bot_name) = {
            let bot = ctx.cache().current_user();
            (bot.id.get(), bot.name.clone())
        };
        let prefix = clean_prefix(ctx.prefix(), bot_id, &bot_name);

        Ok(Self {
            ctx,
            settings,
            formatter: HelpFormatter::new(prefix, ctx.invoked_command_name(), settings),
        })
    }

    pub fn get_command_signature(&self, command: &Command) -> String {
        self.formatter
            .get_command_signature(&CommandInfo::new(command, None))
    }

    /// Entry point: picks bot, cog, group or command help for `query`.
    pub async fn command_callback(&self, query: Option<&str>) -> Result<(), HelpError> {
        let commands = &self.ctx.framework().options().commands;

        let query = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => query,
            None => {
                return self
                    .send_bot_help(metadata::bot_mapping(commands, self.settings))
                    .await
            }
        };

        if let Some((cog, cog_commands)) = metadata::find_cog(commands, self.settings, query) {
            return self.send_cog_help(&cog, cog_commands).await;
        }

        match metadata::resolve(commands, query) {
            Lookup::Found(command) if !command.subcommands.is_empty() => {
                self.send_group_help(command).await
            }
            Lookup::Found(command) => self.send_command_help(command).await,
            Lookup::CommandNotFound(name) => {
                self.send_error_message(self.formatter.command_not_found(&name))
                    .await
            }
            Lookup::SubcommandNotFound {
                qualified_name,
                has_subcommands,
                name,
            } => {
                self.send_error_message(self.formatter.subcommand_not_found(
                    &qualified_name,
                    has_subcommands,
                    &name,
                ))
                .await
            }
        }
    }

    /// Removes the commands the invoking user should not see.
    pub async fn filter_commands<'c>(&self, commands: impl IntoIterator<Item = &'c Command>, sort: bool) -> Vec<&'c Command> {
        let ctx = self.ctx;
        let invoker = Invoker {
            author: ctx.author().id,
            owners: &ctx.framework().options().owners,
            in_guild: ctx.guild_id().is_some(),
        };
        let visible = metadata::filter_visible(commands, self.settings, invoker, sort);

        if !self.settings.verify_checks {
            return visible;
        }

        let mut runnable = Vec::with_capacity(visible.len());
        for command in visible {
            if self.passes_custom_checks(command).await {
                runnable.push(command);
            }
        }
        runnable
    }

    async fn passes_custom_checks(&self, command: &Command) -> bool {
        for check in &command.checks {
            match check(self.ctx).await {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    debug!("Check for {} failed while building help: {}", command.name, e);
                    return false;
                }
            }
        }

        true
    }

    fn infos(commands: &[&Command], parent: Option<&str>) -> Vec<CommandInfo> {
        commands
            .iter()
            .map(|command| CommandInfo::new(command, parent))
            .collect()
    }

    pub async fn send_bot_help(&self, mapping: Vec<(Option<Cog>, Vec<&Command>)>) -> Result<(), HelpError> {
        let mut filtered_mapping = Vec::with_capacity(mapping.len());
        for (cog, commands) in mapping {
            let filtered = self
                .filter_commands(commands, self.settings.sort_commands)
                .await;
            filtered_mapping.push((cog, Self::infos(&filtered, None)));
        }

        let fields = self.formatter.bot_help_fields(&filtered_mapping);
        info!(
            "Sending bot help to {} with {} categories",
            self.ctx.author().name,
            fields.len()
        );

        self.paginate(fields).await
    }

    #[cfg(feature = "menus")]
    async fn paginate(&self, fields: Vec<(String, String)>) -> Result<(), HelpError> {
        use super::menu::HelpButtonMenuPages;
        use super::page_source::HelpPageSource;

        let source = HelpPageSource::new(self.formatter.overview_page(), fields, self.settings.per_page);

        HelpButtonMenuPages::new(self.ctx.author().id, source)
            .disable_buttons_after(self.settings.disable_buttons_after)
            .timeout(std::time::Duration::from_secs(self.settings.timeout_secs))
            .start(self.ctx)
            .await
    }

    #[cfg(not(feature = "menus"))]
    async fn paginate(&self, _fields: Vec<(String, String)>) -> Result<(), HelpError> {
        require_menus(Self::NAME, false)
    }

    pub async fn send_cog_help(&self, cog: &Cog, commands: Vec<&Command>) -> Result<(), HelpError> {
        let filtered = self
            .filter_commands(commands, self.settings.sort_commands)
            .await;
        let page = self
            .formatter
            .cog_help_page(cog, &Self::infos(&filtered, None));

        self.send_page(page).await
    }

    pub async fn send_group_help(&self, group: &Command) -> Result<(), HelpError> {
        let info = CommandInfo::new(group, None);

        let filtered = self
            .filter_commands(&group.subcommands, self.settings.sort_commands)
            .await;
        let page = self
            .formatter
            .group_help_page(&info, &Self::infos(&filtered, Some(&info.qualified_name)));

        self.send_page(page).await
    }

    // Use the same function as group help for command help
    pub async fn send_command_help(&self, command: &Command) -> Result<(), HelpError> {
        self.send_group_help(command).await
    }

    pub async fn send_error_message(&self, message: String) -> Result<(), HelpError> {
        debug!("Help lookup failed: {}", message);
        self.ctx.say(message).await?;
        Ok(())
    }

    async fn send_page(&self, page: PageView) -> Result<(), HelpError> {
        self.ctx
            .send(poise::CreateReply::default().embed(page.to_embed()))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Help {
        Help::default()
    }

    fn info(name: &str, signature: &str, description: Option<&str>) -> CommandInfo {
        CommandInfo {
            name: name.to_string(),
            qualified_name: name.to_string(),
            signature: signature.to_string(),
            description: description.map(str::to_string),
            help_text: None,
            hidden: false,
            subcommands: Vec::new(),
        }
    }

    #[test]
    fn missing_menus_fails_construction() {
        let err = require_menus(PaginatedHelpCommand::NAME, false).unwrap_err();
        assert!(matches!(
            err,
            HelpError::MissingDependency {
                class: "PaginatedHelpCommand",
                dependency: "menus",
                ..
            }
        ));
        assert!(require_menus(PaginatedHelpCommand::NAME, true).is_ok());
    }

    #[test]
    fn construction_check_follows_the_menus_feature() {
        let built = require_menus(PaginatedHelpCommand::NAME, cfg!(feature = "menus"));
        assert_eq!(built.is_ok(), cfg!(feature = "menus"));
    }

    #[test]
    fn mention_prefix_is_cleaned() {
        assert_eq!(clean_prefix("<@123> ", 123, "helper"), "@helper ");
        assert_eq!(clean_prefix("<@!123> ", 123, "helper"), "@helper ");
        assert_eq!(clean_prefix("<@123>", 123, "helper"), "@helper ");
        assert_eq!(clean_prefix("<@!123>", 123, "helper"), "@helper ");
        assert_eq!(clean_prefix("!", 123, "helper"), "!");
    }

    #[test]
    fn signature_joins_prefix_name_and_parameters() {
        let settings = settings();
        let formatter = HelpFormatter::new("!", "help", &settings);

        let mut echo = info("echo", "<text>", None);
        echo.qualified_name = "tools echo".to_string();
        assert_eq!(formatter.get_command_signature(&echo), "!tools echo <text>");
        assert_eq!(formatter.get_command_signature(&info("ping", "", None)), "!ping");
    }

    #[test]
    fn subcommand_signature_uses_framework_qualified_name() {
        let settings = settings();
        let formatter = HelpFormatter::new("!", "help", &settings);
        let mut group = crate::commands::tools::tools();
        for sub in &mut group.subcommands {
            sub.qualified_name = format!("tools {}", sub.name);
        }
        let echo = group
            .subcommands
            .iter()
            .find(|s| s.name == "echo")
            .unwrap();

        assert_eq!(
            formatter.get_command_signature(&CommandInfo::new(echo, None)),
            "!tools echo <text>"
        );
    }

    #[test]
    fn bot_fields_match_mapping() {
        let settings = settings();
        let formatter = HelpFormatter::new("!", "help", &settings);
        let mapping = vec![
            (
                Some(Cog::new("General", Some("Everyday commands".to_string()))),
                vec![info("about", "", None), info("ping", "", None)],
            ),
            (Some(Cog::new("Owner", None)), Vec::new()),
            (Some(Cog::new("Tools", None)), vec![info("tools", "", None)]),
            (None, vec![info("help", "[command]", None)]),
        ];

        assert_eq!(
            formatter.bot_help_fields(&mapping),
            vec![
                (
                    "General".to_string(),
                    "Everyday commands\n`!about`\u{2002}`!ping`".to_string()
                ),
                ("Tools".to_string(), "`!tools`".to_string()),
                ("No Category".to_string(), "`!help`".to_string()),
            ]
        );
    }

    #[test]
    fn overview_explains_usage() {
        let settings = settings();
        let view = HelpFormatter::new("?", "commands", &settings).overview_page();

        assert_eq!(view.title, "Bot Commands");
        assert_eq!(view.colour, 0x5865F2);
        assert_eq!(
            view.description.as_deref(),
            Some(
                "Use \"?commands command\" for more info on a command.\n\
                 Use \"?commands category\" for more info on a category."
            )
        );
    }

    #[test]
    fn cog_page_lists_signatures_with_placeholder_docs() {
        let settings = settings();
        let formatter = HelpFormatter::new("!", "help", &settings);
        let cog = Cog::new("Tools", Some("Small text utilities".to_string()));

        let view = formatter.cog_help_page(
            &cog,
            &[
                info("count", "<text>", Some("Count the words")),
                info("reverse", "<text>", None),
            ],
        );

        assert_eq!(view.title, "Tools Commands");
        assert_eq!(view.description.as_deref(), Some("Small text utilities"));
        assert_eq!(
            view.fields,
            vec![
                ("!count <text>".to_string(), "Count the words".to_string(), false),
                ("!reverse <text>".to_string(), "...".to_string(), false),
            ]
        );
        assert_eq!(
            view.footer.as_deref(),
            Some("Use !help [command] for more info on a command.")
        );
    }

    #[test]
    fn group_page_uses_full_help() {
        let settings = settings();
        let formatter = HelpFormatter::new("!", "help", &settings);
        let mut group = info("tools", "", Some("Text tools"));
        group.help_text = Some("Pick one of the subcommands.".to_string());
        let mut echo = info("echo", "<text>", Some("Repeat text"));
        echo.qualified_name = "tools echo".to_string();

        let view = formatter.group_help_page(&group, &[echo]);

        assert_eq!(view.title, "tools");
        assert_eq!(
            view.description.as_deref(),
            Some("Text tools\n\nPick one of the subcommands.")
        );
        assert_eq!(
            view.fields,
            vec![("!tools echo <text>".to_string(), "Repeat text".to_string(), false)]
        );
        assert_eq!(view.footer, None);

        let plain = formatter.group_help_page(&info("ping", "", None), &[]);
        assert_eq!(plain.description, None);
        assert!(plain.fields.is_empty());
    }

    #[test]
    fn lookup_messages() {
        let settings = settings();
        let formatter = HelpFormatter::new("!", "help", &settings);

        assert_eq!(formatter.command_not_found("pong"), "No command called \"pong\" found.");
        assert_eq!(
            formatter.subcommand_not_found("tools", true, "nope"),
            "Command \"tools\" has no subcommand named nope"
        );
        assert_eq!(
            formatter.subcommand_not_found("ping", false, "nope"),
            "Command \"ping\" has no subcommands."
        );
    }
}
