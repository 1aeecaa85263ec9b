//! Configuration management
//!
//! Locates the intents corpus and customizes the chat surface (greeting,
//! farewell, exit commands) and learning behavior.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Corpus storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat surface settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Learning behavior settings
    #[serde(default)]
    pub learning: LearningConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Corpus location. Defaults to `intents.json` in the platform data dir.
    pub intents_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Printed when a session starts
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Printed when a session ends
    #[serde(default = "default_farewell")]
    pub farewell: String,
    /// Printed when no intent matches, before soliciting an answer
    #[serde(default = "default_unknown_prompt")]
    pub unknown_prompt: String,
    /// Printed after a new answer has been learned
    #[serde(default = "default_learned_ack")]
    pub learned_ack: String,
    /// Inputs that end the session (compared ignoring case)
    #[serde(default = "default_exit_commands")]
    pub exit_commands: Vec<String>,
}

fn default_greeting() -> String {
    "Hello! How can I help you today?".to_string()
}

fn default_farewell() -> String {
    "Goodbye! See you soon!".to_string()
}

fn default_unknown_prompt() -> String {
    "I don't know the answer to that. What should I reply?".to_string()
}

fn default_learned_ack() -> String {
    "Thanks! I've learned something new.".to_string()
}

fn default_exit_commands() -> Vec<String> {
    vec!["exit".to_string(), "quit".to_string(), "bye".to_string()]
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            farewell: default_farewell(),
            unknown_prompt: default_unknown_prompt(),
            learned_ack: default_learned_ack(),
            exit_commands: default_exit_commands(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Tag recorded on intents learned during chat
    #[serde(default = "default_tag")]
    pub default_tag: String,
    /// Store learned questions regex-escaped so metacharacters in user input
    /// match literally instead of becoming live regex syntax
    #[serde(default)]
    pub escape_patterns: bool,
}

fn default_tag() -> String {
    crate::knowledge::DEFAULT_TAG.to_string()
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            default_tag: default_tag(),
            escape_patterns: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Resolved corpus location: the configured path, or the default under
    /// the platform data directory.
    pub fn intents_path(&self) -> Result<PathBuf> {
        match &self.storage.intents_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("intents.json")),
        }
    }

    /// True if `input` is one of the configured exit commands.
    pub fn is_exit_command(&self, input: &str) -> bool {
        let lower = input.to_lowercase();
        self.chat.exit_commands.iter().any(|c| c.to_lowercase() == lower)
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "knowbot", "knowbot")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "knowbot", "knowbot")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Configuration ({})", config_path()?.display());
    println!("  intents_path:    {}", config.intents_path()?.display());
    println!("  greeting:        {}", config.chat.greeting);
    println!("  farewell:        {}", config.chat.farewell);
    println!("  unknown_prompt:  {}", config.chat.unknown_prompt);
    println!("  learned_ack:     {}", config.chat.learned_ack);
    println!("  exit_commands:   {}", config.chat.exit_commands.join(", "));
    println!("  default_tag:     {}", config.learning.default_tag);
    println!("  escape_patterns: {}", config.learning.escape_patterns);

    Ok(())
}

/// Reset configuration to defaults
pub fn reset_config() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults.");
    Ok(())
}

/// Set the corpus location
pub fn set_intents_path(path: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.storage.intents_path = Some(PathBuf::from(path));
    config.save()?;
    println!("Intents path set to: {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.learning.default_tag, "new");
        assert!(!config.learning.escape_patterns);
        assert!(config.storage.intents_path.is_none());
        assert!(config.chat.exit_commands.contains(&"quit".to_string()));
    }

    #[test]
    fn test_exit_commands_ignore_case() {
        let config = Config::default();
        assert!(config.is_exit_command("EXIT"));
        assert!(config.is_exit_command("Bye"));
        assert!(!config.is_exit_command("hello"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.storage.intents_path = Some(PathBuf::from("/tmp/corpus.json"));
        config.learning.escape_patterns = true;

        let toml = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&toml).unwrap();
        assert_eq!(back.storage.intents_path, config.storage.intents_path);
        assert!(back.learning.escape_patterns);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[chat]\ngreeting = \"Hola!\"\n").unwrap();
        assert_eq!(config.chat.greeting, "Hola!");
        assert_eq!(config.chat.farewell, default_farewell());
        assert_eq!(config.learning.default_tag, "new");
    }
}
