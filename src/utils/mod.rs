//! Utility Functions
//!
//! User-friendly error formatting for the command-line front end.
//!
//! ## Error Formatting
//!
//! The [`errors`] module turns an `anyhow::Error` into a boxed report with
//! troubleshooting hints:
//!
//! ```rust
//! use rdpkeyb::utils::format_user_error;
//!
//! let error = anyhow::anyhow!("XKB error: failed to compile keymap");
//! let report = format_user_error(&error);
//! assert!(report.contains("Keyboard Layout Error"));
//! ```
//!
//! Error categories with context-aware help:
//! - Layout errors → layout names, XKB data installation
//! - Config errors → TOML syntax, accepted values
//! - Input errors → replay stream format

pub mod errors;

pub use errors::format_user_error;
