use crate::discord::{Data, Error};

pub mod general;
pub mod help;
pub mod owner;
pub mod tools;

/// Every command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        help::help(),
        general::ping(),
        general::about(),
        general::user_info(),
        tools::tools(),
        owner::register(),
    ]
}
