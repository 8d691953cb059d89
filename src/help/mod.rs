//! Embed based help command with button pagination for the bot overview.

mod command;
mod metadata;
mod page;

#[cfg(feature = "menus")]
mod menu;
#[cfg(feature = "menus")]
mod page_source;

pub use command::{clean_prefix, require_menus, HelpFormatter, PaginatedHelpCommand};
pub use metadata::{
    bot_mapping, filter_visible, find_cog, passes_builtin_checks, qualified_name, resolve, signature,
    sort_by_name, visible_commands, Cog, Command, CommandInfo, Invoker, Lookup,
};
pub use page::PageView;

#[cfg(feature = "menus")]
pub use menu::{HelpButtonMenuPages, MenuAction};
#[cfg(feature = "menus")]
pub use page_source::HelpPageSource;
