//! # rdpkeyb
//!
//! RDP keyboard input for a local keyboard device.
//!
//! Remote clients send scancodes with extended/special flags. This crate
//! turns them into local XKB keycode transitions, reproducing the press and
//! release sequences a local keyboard expects, and keeps caps/num/scroll
//! lock in step between client and local keyboard.
//!
//! # Architecture
//!
//! ```text
//! rdpkeyb
//!   ├─> Input Dispatcher (decodes key/sync/layout messages)
//!   ├─> Keyboard Session (per-session state, sink, lock source)
//!   │     ├─> Scancode Translator (mapping rules, compensated emission)
//!   │     └─> Lock-State Synchronizer (caps → num → scroll)
//!   ├─> Layout selection (client names over configured defaults)
//!   └─> Local keyboard (simulated device, or xkbcommon with `xkb`)
//! ```
//!
//! # Data Flow
//!
//! **Key Path:** Client → Dispatcher → Translator → KeyEventSink
//!
//! **Sync Path:** Client → Dispatcher → Synchronizer → Translator → KeyEventSink
//!
//! **Layout Path:** Client → Dispatcher → LayoutLoader

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Replay tool configuration
pub mod config;

/// Keyboard translation, lock synchronization and dispatch
pub mod input;

/// Utility functions
pub mod utils;
