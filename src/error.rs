//! Error types for the help command

use poise::serenity_prelude as serenity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelpError {
    #[error("{class} requires the `{dependency}` component, rebuild with `--features {feature}`")]
    MissingDependency {
        class: &'static str,
        dependency: &'static str,
        feature: &'static str,
    },

    #[error("Discord error: {0}")]
    Serenity(#[from] serenity::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_names_class_and_dependency() {
        let err = HelpError::MissingDependency {
            class: "PaginatedHelpCommand",
            dependency: "menus",
            feature: "menus",
        };

        let message = err.to_string();
        assert!(message.starts_with("PaginatedHelpCommand requires the `menus` component"));
        assert!(message.ends_with("`--features menus`"));
    }
}
