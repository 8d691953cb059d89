use colored::Colorize;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::{fs, io, str::FromStr};
use toml::Value;
use tracing::Level;

pub const CONFIG_PATH: &str = "config.toml";

//expect root Table and configure subtables
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub discord: Discord,
    #[serde(default)]
    pub help: Help,
}

// This is a struct for the logging level
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Logging {
    #[serde(default = "default_logging_level")]
    pub level: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Discord {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Snowflake IDs of the bot owners
    #[serde(default)]
    pub owners: Vec<String>,
}

/// Settings for the paginated help command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Help {
    /// Number of categories shown on each page of the overview
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// Seconds without a button press before the menu stops listening
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub disable_buttons_after: bool,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "default_true")]
    pub verify_checks: bool,
    #[serde(default = "default_true")]
    pub sort_commands: bool,
    #[serde(default = "default_no_category")]
    pub no_category: String,
    #[serde(default = "default_colour")]
    pub colour: u32,
    /// Category name to description
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

// Default values for the config for the deserializer
// These do not declare the default values in the file
// just the values if the data isnt capable of being deseriazed properly
fn default_logging_level() -> String {
    "Info".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_per_page() -> usize {
    2
}

fn default_timeout() -> u64 {
    180
}

fn default_true() -> bool {
    true
}

fn default_no_category() -> String {
    "No Category".to_string()
}

// blurple
fn default_colour() -> u32 {
    0x5865F2
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
        }
    }
}

impl Default for Discord {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            prefix: default_prefix(),
            owners: Vec::new(),
        }
    }
}

impl Default for Help {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            timeout_secs: default_timeout(),
            disable_buttons_after: true,
            show_hidden: false,
            verify_checks: true,
            sort_commands: true,
            no_category: default_no_category(),
            colour: default_colour(),
            categories: BTreeMap::new(),
        }
    }
}

// This is the default config data that will be written to the file.
const DEFAULT_CONFIG: &str = r#"[logging]
# Log level: Error, Warn, Info, Debug or Trace
# default: "Info"
level = "Info"

[discord]
# This is required for the bot to function
# default: ""
bot_token = ""
# Prefix for text commands
# default: "!"
prefix = "!"
# Snowflake IDs of the users allowed to run owner commands
# default: []
owners = []

[help]
# How many categories the overview shows per page
# default: 2
per_page = 2
# Seconds the page buttons stay active after the last press
# default: 180
timeout_secs = 180
# Grey out the page buttons once the menu stops
# default: true
disable_buttons_after = true
# List commands marked as hidden
# default: false
show_hidden = false
# Only list commands the caller passes the checks for
# default: true
verify_checks = true
# default: true
sort_commands = true
# Heading for commands without a category
# default: "No Category"
no_category = "No Category"
# Embed colour as an integer (blurple)
# default: 5793266
colour = 5793266

[help.categories]
# Descriptions shown under each category heading
General = "Everyday commands"
Tools = "Small text utilities"
"#;

// Make CONFIG a public static so it's accessible from other modules
pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config(Path::new(CONFIG_PATH)).unwrap_or_else(|e| {
        println!(
            "{}{}{}",
            "ERROR:".red().bold(),
            "Failed to load config, using defaults: ",
            e
        );
        Config::default()
    })
});

pub fn get_config() -> &'static Config {
    &CONFIG
}

pub fn get_help_config() -> &'static Help {
    &CONFIG.help
}

pub fn parse_config(config_str: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}

/// Reads the config at `path`, creating it when missing and repairing it
/// when it does not parse.
pub fn load_config(path: &Path) -> io::Result<Config> {
    let config_str = match fs::read_to_string(path) {
        Ok(config_str) => config_str,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            create_config(path)?;
            DEFAULT_CONFIG.to_string()
        }
        Err(e) => return Err(e),
    };

    let config = match parse_config(&config_str) {
        Ok(config) => config,
        Err(e) => {
            println!("{}{}{}", "Warn:".yellow().bold(), "Failed to parse config: ", e);
            repair_config(path, &config_str)?
        }
    };

    for warning in verify_config(&config) {
        println!("{}{}", "Warn:".yellow().bold(), warning);
    }

    Ok(config)
}

fn create_config(path: &Path) -> io::Result<()> {
    println!("{}{}", "Info:".green().bold(), "Creating a new config file...");
    fs::write(path, DEFAULT_CONFIG)
}

// generate the logging level for the tracing subscriber
pub fn get_logging_config() -> Level {
    let log_level_str = &CONFIG.logging.level;

    let level = Level::from_str(log_level_str).unwrap_or_else(|_| {
        println!(
            "{}{}{}{}",
            "Warn:".yellow().bold(),
            "Unable to parse log level from config: ",
            log_level_str,
            ". Defaulting to 'Info'"
        );
        Level::INFO
    });

    println!("{}{}{:?}", "Info:".green().bold(), "Logging level: ", level);
    level
}

pub fn verify_config(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if Level::from_str(&config.logging.level).is_err() {
        warnings.push(format!(
            "Invalid log level '{}' found in config, 'Info' will be used.",
            config.logging.level
        ));
    }

    if config.discord.bot_token.is_empty() {
        warnings.push(
            "Empty discord token found in config\n This means the bot will not work.".to_string(),
        );
    }

    if config.discord.prefix.is_empty() {
        warnings.push("Empty prefix found in config\n Text commands will not respond.".to_string());
    }

    for owner in &config.discord.owners {
        if owner.parse::<u64>().is_err() {
            warnings.push(format!(
                "Owner '{}' is not a valid snowflake ID and will be ignored.",
                owner
            ));
        }
    }

    if config.help.per_page == 0 {
        warnings.push("help.per_page must be at least 1, 1 will be used.".to_string());
    }

    if config.help.timeout_secs == 0 {
        warnings.push(
            "help.timeout_secs is 0\n The page buttons will stop responding immediately."
                .to_string(),
        );
    }

    if config.help.colour > 0xFF_FFFF {
        warnings.push(format!(
            "help.colour {} is larger than 0xFFFFFF and will be truncated.",
            config.help.colour
        ));
    }

    warnings
}

// Keeps every section that still deserializes and falls back to defaults
// for the rest, then rewrites the file
fn repair_config(path: &Path, config_str: &str) -> io::Result<Config> {
    println!("{}{}", "Warn:".yellow().bold(), "Repairing the Config file...");

    let table = config_str
        .parse::<toml::Table>()
        .unwrap_or_default();

    let rebuilt_config = Config {
        logging: section(&table, "logging"),
        discord: section(&table, "discord"),
        help: section(&table, "help"),
    };

    let rebuilt = toml::to_string(&rebuilt_config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, rebuilt)?;

    Ok(rebuilt_config)
}

fn section<T>(table: &toml::Table, key: &str) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    table
        .get(key)
        .cloned()
        .and_then(|value: Value| value.try_into().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_to_defaults_with_descriptions() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.logging, Logging::default());
        assert_eq!(config.discord, Discord::default());
        assert_eq!(config.help.per_page, 2);
        assert_eq!(config.help.colour, 0x5865F2);
        assert_eq!(
            config.help.categories.get("General").map(String::as_str),
            Some("Everyday commands")
        );
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = parse_config("[help]\nper_page = 5\n").unwrap();

        assert_eq!(config.help.per_page, 5);
        assert!(config.help.disable_buttons_after);
        assert_eq!(config.help.no_category, "No Category");
        assert_eq!(config.discord.prefix, "!");
    }

    #[test]
    fn verify_flags_bad_values() {
        let mut config = Config::default();
        config.discord.bot_token = "token".to_string();
        assert!(verify_config(&config).is_empty());

        config.help.per_page = 0;
        config.discord.owners = vec!["nope".to_string()];
        config.logging.level = "loud".to_string();
        assert_eq!(verify_config(&config).len(), 3);
    }

    #[test]
    fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_config(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.help, parse_config(DEFAULT_CONFIG).unwrap().help);
    }

    #[test]
    fn load_repairs_broken_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[discord]\nprefix = \"?\"\n\n[help]\nper_page = \"three\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.discord.prefix, "?");
        assert_eq!(config.help, Help::default());
        let rewritten = parse_config(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten, config);
    }
}
