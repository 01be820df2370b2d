//! Keyboard Layout Selection
//!
//! Layouts are named by XKB rules/model/layout/variant/options (RMLVO). The
//! client announces its preferred names when it connects; whatever it leaves
//! empty falls back to the configured defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::error::{InputError, Result};

/// XKB rules, model, layout, variant and options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardLayout {
    /// Rules file (e.g. "evdev")
    pub rules: String,
    /// Keyboard model (e.g. "pc104")
    pub model: String,
    /// Layout (e.g. "us", "de")
    pub layout: String,
    /// Layout variant (e.g. "nodeadkeys")
    pub variant: String,
    /// Comma separated XKB options
    pub options: String,
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self {
            rules: "evdev".to_string(),
            model: "pc104".to_string(),
            layout: "us".to_string(),
            variant: String::new(),
            options: String::new(),
        }
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rules={} model={} layout={} variant={} options={}",
            self.rules, self.model, self.layout, self.variant, self.options
        )
    }
}

/// Layout information announced by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientLayoutInfo {
    /// Windows keyboard layout identifier (informational only)
    pub keylayout: u32,
    /// Requested model, empty for default
    pub model: String,
    /// Requested variant, empty for default
    pub variant: String,
    /// Requested layout, empty for default
    pub layout: String,
    /// Requested options, empty for default
    pub options: String,
}

fn pick(client: &str, default: &str) -> String {
    if client.is_empty() {
        default.to_string()
    } else {
        client.to_string()
    }
}

impl KeyboardLayout {
    /// Resolve the layout to load for a client
    ///
    /// Rules always come from `defaults`.
    pub fn resolve(defaults: &KeyboardLayout, client: &ClientLayoutInfo) -> KeyboardLayout {
        KeyboardLayout {
            rules: defaults.rules.clone(),
            model: pick(&client.model, &defaults.model),
            layout: pick(&client.layout, &defaults.layout),
            variant: pick(&client.variant, &defaults.variant),
            options: pick(&client.options, &defaults.options),
        }
    }

    /// Check that the names can be handed to a keymap compiler
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(InputError::LayoutError("rules must not be empty".to_string()));
        }
        if self.layout.is_empty() {
            return Err(InputError::LayoutError("layout must not be empty".to_string()));
        }
        let fields = [
            &self.rules,
            &self.model,
            &self.layout,
            &self.variant,
            &self.options,
        ];
        if let Some(bad) = fields
            .iter()
            .find(|name| name.chars().any(|c| c.is_control() || c.is_whitespace()))
        {
            return Err(InputError::LayoutError(format!(
                "invalid layout name {:?}",
                bad
            )));
        }
        Ok(())
    }
}

/// Loads a keymap into the local keyboard
pub trait LayoutLoader {
    /// Replace the active keymap with `layout`
    fn load_layout(&mut self, layout: &KeyboardLayout) -> Result<()>;
}

impl<T: LayoutLoader + ?Sized> LayoutLoader for &mut T {
    fn load_layout(&mut self, layout: &KeyboardLayout) -> Result<()> {
        (**self).load_layout(layout)
    }
}
