use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::{debug, info};

use super::page_source::HelpPageSource;
use crate::discord::Context;
use crate::error::HelpError;

/// Buttons shown under a paginated help page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    First,
    Previous,
    Next,
    Last,
    Stop,
}

impl MenuAction {
    const ALL: [MenuAction; 5] = [
        MenuAction::First,
        MenuAction::Previous,
        MenuAction::Next,
        MenuAction::Last,
        MenuAction::Stop,
    ];

    fn suffix(self) -> &'static str {
        match self {
            MenuAction::First => "first",
            MenuAction::Previous => "prev",
            MenuAction::Next => "next",
            MenuAction::Last => "last",
            MenuAction::Stop => "stop",
        }
    }

    fn emoji(self) -> char {
        match self {
            MenuAction::First => '⏮',
            MenuAction::Previous => '◀',
            MenuAction::Next => '▶',
            MenuAction::Last => '⏭',
            MenuAction::Stop => '⏹',
        }
    }

    /// Button ids are prefixed with the invocation id so two menus in the
    /// same channel never react to each other's buttons.
    pub fn custom_id(self, menu_id: u64) -> String {
        format!("{}{}", menu_id, self.suffix())
    }

    pub fn from_custom_id(menu_id: u64, custom_id: &str) -> Option<Self> {
        let suffix = custom_id.strip_prefix(&menu_id.to_string())?;
        Self::ALL.into_iter().find(|action| action.suffix() == suffix)
    }

    /// The page to show after pressing this button, if it changes anything.
    pub fn target_page(self, current: usize, max_pages: usize) -> Option<usize> {
        let last = max_pages.saturating_sub(1);
        let target = match self {
            MenuAction::First => 0,
            MenuAction::Previous => current.checked_sub(1)?,
            MenuAction::Next if current < last => current + 1,
            MenuAction::Next => return None,
            MenuAction::Last => last,
            MenuAction::Stop => return None,
        };

        (target != current).then_some(target)
    }
}

/// Button driven pager over a [`HelpPageSource`]. Only the user who invoked
/// help may turn the pages.
pub struct HelpButtonMenuPages {
    author: serenity::UserId,
    source: HelpPageSource,
    current_page: usize,
    disable_buttons_after: bool,
    timeout: Duration,
}

impl HelpButtonMenuPages {
    pub fn new(author: serenity::UserId, source: HelpPageSource) -> Self {
        Self {
            author,
            source,
            current_page: 0,
            disable_buttons_after: false,
            timeout: Duration::from_secs(180),
        }
    }

    pub fn disable_buttons_after(mut self, disable: bool) -> Self {
        self.disable_buttons_after = disable;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Ensure that the user of the button is the one who called the help command
    pub fn interaction_check(&self, user: serenity::UserId) -> bool {
        self.author == user
    }

    /// First and last are left out when there are two pages or fewer.
    pub fn actions(&self) -> Vec<MenuAction> {
        let skip_double = self.source.get_max_pages() <= 2;
        MenuAction::ALL
            .into_iter()
            .filter(|action| {
                !(skip_double && matches!(action, MenuAction::First | MenuAction::Last))
            })
            .collect()
    }

    /// Applies a button press, returning whether the page changed.
    pub fn press(&mut self, action: MenuAction) -> bool {
        match action.target_page(self.current_page, self.source.get_max_pages()) {
            Some(page) => {
                self.current_page = page;
                true
            }
            None => false,
        }
    }

    fn components(&self, menu_id: u64, disabled: bool) -> Vec<serenity::CreateActionRow> {
        let buttons = self
            .actions()
            .into_iter()
            .map(|action| {
                serenity::CreateButton::new(action.custom_id(menu_id))
                    .style(serenity::ButtonStyle::Secondary)
                    .emoji(action.emoji())
                    .disabled(disabled)
            })
            .collect();

        vec![serenity::CreateActionRow::Buttons(buttons)]
    }

    fn current_embed(&self) -> serenity::CreateEmbed {
        self.source.format_page(self.current_page).to_embed()
    }

    pub async fn start(mut self, ctx: Context<'_>) -> Result<(), HelpError> {
        let menu_id = ctx.id();

        if !self.source.is_paginating() {
            ctx.send(poise::CreateReply::default().embed(self.current_embed()))
                .await?;
            return Ok(());
        }

        let reply = ctx
            .send(
                poise::CreateReply::default()
                    .embed(self.current_embed())
                    .components(self.components(menu_id, false)),
            )
            .await?;
        let message_id = reply.message().await?.id;

        debug!(
            "Help menu {} started with {} pages",
            menu_id,
            self.source.get_max_pages()
        );

        loop {
            let prefix = menu_id.to_string();
            let press = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
                .message_id(message_id)
                .filter(move |press| press.data.custom_id.starts_with(&prefix))
                .timeout(self.timeout)
                .await;

            let Some(press) = press else {
                debug!("Help menu {} timed out", menu_id);
                break;
            };

            if !self.interaction_check(press.user.id) {
                debug!(
                    "Ignoring help menu press from {} on menu owned by {}",
                    press.user.id, self.author
                );
                continue;
            }

            let Some(action) = MenuAction::from_custom_id(menu_id, &press.data.custom_id) else {
                continue;
            };

            if action == MenuAction::Stop {
                let components = if self.disable_buttons_after {
                    self.components(menu_id, true)
                } else {
                    Vec::new()
                };
                press
                    .create_response(
                        ctx.serenity_context(),
                        serenity::CreateInteractionResponse::UpdateMessage(
                            serenity::CreateInteractionResponseMessage::new()
                                .embed(self.current_embed())
                                .components(components),
                        ),
                    )
                    .await?;
                info!("Help menu {} stopped by {}", menu_id, press.user.name);
                return Ok(());
            }

            let response = if self.press(action) {
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(self.current_embed())
                        .components(self.components(menu_id, false)),
                )
            } else {
                serenity::CreateInteractionResponse::Acknowledge
            };

            press.create_response(ctx.serenity_context(), response).await?;
        }

        if self.disable_buttons_after {
            reply
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .embed(self.current_embed())
                        .components(self.components(menu_id, true)),
                )
                .await?;
        }

        Ok(())
    }
}
