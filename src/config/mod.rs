//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod types;

pub use types::{KeyboardConfig, LoggingConfig, ReplayConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Keyboard layout defaults
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Replay device configuration
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Result<Self> {
        Ok(Config {
            keyboard: KeyboardConfig::default(),
            logging: LoggingConfig::default(),
            replay: ReplayConfig::default(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Rules and layout are required for keymap compilation
        if self.keyboard.rules.is_empty() {
            anyhow::bail!("Invalid keyboard config: rules must not be empty");
        }
        if self.keyboard.layout.is_empty() {
            anyhow::bail!("Invalid keyboard config: layout must not be empty");
        }
        self.keyboard
            .to_layout()
            .validate()
            .context("Invalid keyboard config")?;

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level {
            self.logging.level = level;
        }
        if let Some(format) = format {
            self.logging.format = format;
        }

        self
    }
}
