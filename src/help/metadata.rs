//! Command metadata harvested from the poise framework.

use poise::serenity_prelude as serenity;
use std::collections::HashSet;

use crate::config::Help;
use crate::discord::{Data, Error};

pub type Command = poise::Command<Data, Error>;

/// A named grouping of commands, backed by a poise command category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cog {
    pub qualified_name: String,
    pub description: Option<String>,
}

impl Cog {
    pub fn new(qualified_name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            description: description.filter(|d| !d.trim().is_empty()),
        }
    }

    fn from_settings(name: &str, settings: &Help) -> Self {
        Self::new(name, settings.categories.get(name).cloned())
    }
}

/// Display data for a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub qualified_name: String,
    /// Parameter list, e.g. `<text> [count]`
    pub signature: String,
    pub description: Option<String>,
    pub help_text: Option<String>,
    pub hidden: bool,
    pub subcommands: Vec<CommandInfo>,
}

impl CommandInfo {
    /// Builds the info for a command. `parent` is the qualified name of the
    /// group it belongs to; without one the name poise assigned is used.
    pub fn new(command: &Command, parent: Option<&str>) -> Self {
        let qualified_name = match parent {
            Some(parent) => format!("{} {}", parent, command.name),
            None => qualified_name(command),
        };

        let subcommands = command
            .subcommands
            .iter()
            .map(|sub| CommandInfo::new(sub, Some(&qualified_name)))
            .collect();

        Self {
            name: command.name.clone(),
            signature: signature(command),
            description: non_empty(command.description.as_deref()),
            help_text: non_empty(command.help_text.as_deref()),
            hidden: command.hide_in_help,
            subcommands,
            qualified_name,
        }
    }

    /// First line of the description, falling back to the help text.
    pub fn short_doc(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.help_text.as_deref())
            .and_then(|doc| doc.lines().map(str::trim).find(|line| !line.is_empty()))
    }

    /// The full documentation of the command.
    pub fn help(&self) -> Option<String> {
        match (&self.description, &self.help_text) {
            (Some(description), Some(help_text)) => Some(format!("{}\n\n{}", description, help_text)),
            (Some(doc), None) | (None, Some(doc)) => Some(doc.clone()),
            (None, None) => None,
        }
    }
}

/// poise fills in qualified names when the framework is built; commands
/// outside a framework only carry their own name.
pub fn qualified_name(command: &Command) -> String {
    if command.qualified_name.is_empty() {
        command.name.clone()
    } else {
        command.qualified_name.clone()
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Renders the parameters of a command, `<required>` and `[optional]`.
pub fn signature(command: &Command) -> String {
    command
        .parameters
        .iter()
        .map(|param| {
            if param.required {
                format!("<{}>", param.name)
            } else {
                format!("[{}]", param.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Top level commands grouped by category. Named categories keep the order
/// in which they first appear; uncategorised commands come last.
pub fn bot_mapping<'a>(commands: &'a [Command], settings: &Help) -> Vec<(Option<Cog>, Vec<&'a Command>)> {
    let mut mapping: Vec<(Option<Cog>, Vec<&'a Command>)> = Vec::new();
    let mut uncategorised = Vec::new();

    for command in commands {
        let Some(category) = command.category.as_deref() else {
            uncategorised.push(command);
            continue;
        };

        let existing = mapping.iter_mut().find(|(cog, _)| {
            cog.as_ref()
                .is_some_and(|cog| cog.qualified_name == category)
        });

        match existing {
            Some((_, cmds)) => cmds.push(command),
            None => mapping.push((Some(Cog::from_settings(category, settings)), vec![command])),
        }
    }

    if !uncategorised.is_empty() {
        mapping.push((None, uncategorised));
    }

    mapping
}

/// Finds the category called `name` and its top level commands.
pub fn find_cog<'a>(commands: &'a [Command], settings: &Help, name: &str) -> Option<(Cog, Vec<&'a Command>)> {
    let cmds: Vec<&Command> = commands
        .iter()
        .filter(|c| c.category.as_deref() == Some(name))
        .collect();

    if cmds.is_empty() {
        return None;
    }

    Some((Cog::from_settings(name, settings), cmds))
}

#[derive(Debug)]
pub enum Lookup<'a> {
    Found(&'a Command),
    CommandNotFound(String),
    SubcommandNotFound {
        qualified_name: String,
        has_subcommands: bool,
        name: String,
    },
}

fn matches(command: &Command, word: &str) -> bool {
    command.name == word || command.aliases.iter().any(|alias| alias == word)
}

/// Walks a space separated command path such as `tools echo`.
pub fn resolve<'a>(commands: &'a [Command], query: &str) -> Lookup<'a> {
    let mut words = query.split_whitespace();

    let Some(first) = words.next() else {
        return Lookup::CommandNotFound(String::new());
    };

    let Some(mut command) = commands.iter().find(|c| matches(c, first)) else {
        return Lookup::CommandNotFound(first.to_string());
    };
    let mut qualified_name = command.name.clone();

    for word in words {
        match command.subcommands.iter().find(|c| matches(c, word)) {
            Some(sub) => {
                qualified_name = format!("{} {}", qualified_name, sub.name);
                command = sub;
            }
            None => {
                return Lookup::SubcommandNotFound {
                    qualified_name,
                    has_subcommands: !command.subcommands.is_empty(),
                    name: word.to_string(),
                }
            }
        }
    }

    Lookup::Found(command)
}

/// Drops hidden commands (unless `show_hidden`) and commands that cannot be
/// invoked by name.
pub fn visible_commands<'a>(commands: impl IntoIterator<Item = &'a Command>, show_hidden: bool) -> Vec<&'a Command> {
    commands
        .into_iter()
        .filter(|c| show_hidden || !c.hide_in_help)
        .filter(|c| c.prefix_action.is_some() || c.slash_action.is_some() || !c.subcommands.is_empty())
        .collect()
}

/// The framework level restrictions of a command: owners only, guild only
/// and DM only. Custom checks need a live context and are run separately.
pub fn passes_builtin_checks(
    command: &Command,
    author: serenity::UserId,
    owners: &HashSet<serenity::UserId>,
    in_guild: bool,
) -> bool {
    if command.owners_only && !owners.contains(&author) {
        return false;
    }
    if command.guild_only && !in_guild {
        return false;
    }
    if command.dm_only && in_guild {
        return false;
    }
    true
}

pub fn sort_by_name(commands: &mut [&Command]) {
    commands.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Who is asking for help, as far as the built-in checks care.
#[derive(Debug, Clone, Copy)]
pub struct Invoker<'a> {
    pub author: serenity::UserId,
    pub owners: &'a HashSet<serenity::UserId>,
    pub in_guild: bool,
}

/// Everything [`filter_commands`](crate::help::PaginatedHelpCommand::filter_commands)
/// decides without running custom checks: hidden commands, built-in checks
/// when `verify_checks` is on, and ordering.
pub fn filter_visible<'a>(
    commands: impl IntoIterator<Item = &'a Command>,
    settings: &Help,
    invoker: Invoker<'_>,
    sort: bool,
) -> Vec<&'a Command> {
    let mut visible = visible_commands(commands, settings.show_hidden);

    if settings.verify_checks {
        visible.retain(|command| {
            passes_builtin_checks(command, invoker.author, invoker.owners, invoker.in_guild)
        });
    }

    if sort {
        sort_by_name(&mut visible);
    }

    visible
}
