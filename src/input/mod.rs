//! RDP Keyboard Input
//!
//! Translates RDP keyboard events (scancode plus extended/special flags) into
//! local XKB keycode transitions and keeps the lock keys of both sides in
//! step.
//!
//! # Architecture
//!
//! ```text
//! raw message (type, param1..param4)
//!       ↓
//! ┌─────────────────────────┐
//! │  InputDispatcher        │ → LayoutLoader (layout reload)
//! └─────────────────────────┘
//!       ↓
//! ┌─────────────────────────┐
//! │  RdpKeyboard            │
//! │  - handle_key_event     │
//! │  - handle_sync_event ───┼──→ synchronize (reads LockStateSource)
//! └─────────────────────────┘        │
//!       ↓                            │ synthesized down/up
//! ┌─────────────────────────┐        │
//! │  ScancodeTranslator     │ ←──────┘
//! │  + KeyboardState        │
//! └─────────────────────────┘
//!       ↓
//! KeyEventSink (keycode, pressed)
//! ```
//!
//! # Usage Example
//!
//! ```rust
//! use rdpkeyb::input::{KeyFlags, KeyTransition, LockKey, RdpKeyboard, SimulatedDevice};
//!
//! let device = SimulatedDevice::new();
//! let mut keyboard = RdpKeyboard::new(device.clone(), device.clone());
//!
//! // 'A' pressed and released
//! keyboard.handle_key_event(true, 0x1E, KeyFlags::empty());
//! keyboard.handle_key_event(false, 0x1E, KeyFlags::empty());
//!
//! // Client has caps lock on
//! keyboard.handle_sync_event(LockKey::CapsLock.into());
//!
//! assert_eq!(
//!     device.transitions(),
//!     vec![
//!         KeyTransition::release(38),
//!         KeyTransition::press(38),
//!         KeyTransition::release(38),
//!         KeyTransition::press(66),
//!         KeyTransition::release(66),
//!     ]
//! );
//! ```

pub mod device;
pub mod dispatcher;
pub mod error;
pub mod flags;
pub mod keyboard;
pub mod keycodes;
pub mod layout;
pub mod scancodes;
pub mod state;
pub mod sync;
pub mod translator;
#[cfg(feature = "xkb")]
pub mod xkb;

pub use device::{
    KeyEventSink, KeyTransition, LocalLockState, LockStateSource, SimulatedDevice,
};
pub use dispatcher::{InputDispatcher, InputMessage};
pub use error::{InputError, Result};
pub use flags::{KeyFlag, KeyFlags, LockFlags, LockKey};
pub use keyboard::RdpKeyboard;
pub use layout::{ClientLayoutInfo, KeyboardLayout, LayoutLoader};
pub use state::KeyboardState;
pub use sync::{synchronize, SyncReport};
pub use translator::ScancodeTranslator;
#[cfg(feature = "xkb")]
pub use xkb::XkbKeyboard;
