//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::input::{KeyboardLayout, LocalLockState};

/// Default keyboard layout, used for names the client leaves empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// XKB rules ("evdev")
    #[serde(default = "default_rules")]
    pub rules: String,

    /// Keyboard model ("pc104")
    #[serde(default = "default_model")]
    pub model: String,

    /// Layout ("us")
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Layout variant (empty = none)
    #[serde(default)]
    pub variant: String,

    /// XKB options (empty = none)
    #[serde(default)]
    pub options: String,
}

fn default_rules() -> String {
    KeyboardLayout::default().rules
}

fn default_model() -> String {
    KeyboardLayout::default().model
}

fn default_layout() -> String {
    KeyboardLayout::default().layout
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self::from(KeyboardLayout::default())
    }
}

impl From<KeyboardLayout> for KeyboardConfig {
    fn from(layout: KeyboardLayout) -> Self {
        Self {
            rules: layout.rules,
            model: layout.model,
            layout: layout.layout,
            variant: layout.variant,
            options: layout.options,
        }
    }
}

impl KeyboardConfig {
    /// Layout defaults handed to the dispatcher
    pub fn to_layout(&self) -> KeyboardLayout {
        KeyboardLayout {
            rules: self.rules.clone(),
            model: self.model.clone(),
            layout: self.layout.clone(),
            variant: self.variant.clone(),
            options: self.options.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format ("pretty", "compact", "json")
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Also write logs to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_file: None,
        }
    }
}

/// Initial state of the simulated device used for replay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Caps Lock on at start
    #[serde(default)]
    pub caps_lock: bool,

    /// Num Lock on at start
    #[serde(default)]
    pub num_lock: bool,
}

impl ReplayConfig {
    /// Initial lock state of the device
    pub fn initial_locks(&self) -> LocalLockState {
        LocalLockState {
            caps_lock: self.caps_lock,
            num_lock: self.num_lock,
        }
    }
}
