//! Keyboard event and synchronize flags
//!
//! Bit assignments follow the RDP slow-path keyboard event (`KBDFLAGS_*`)
//! and the synchronize event toggle flags (`TS_SYNC_*`).

use enumflags2::{bitflags, BitFlags};

/// Per-key flags carried with an RDP key event
#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFlag {
    /// Key belongs to the extended block (E0 prefix)
    Extended = 0x0100,
    /// Marks the control press the client sends ahead of Pause
    Special = 0x0200,
}

/// Set of [`KeyFlag`]s
pub type KeyFlags = BitFlags<KeyFlag>;

/// Lock keys reported by a synchronize event
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// Scroll Lock (`TS_SYNC_SCROLL_LOCK`)
    ScrollLock = 0x01,
    /// Num Lock (`TS_SYNC_NUM_LOCK`)
    NumLock = 0x02,
    /// Caps Lock (`TS_SYNC_CAPS_LOCK`)
    CapsLock = 0x04,
}

impl LockKey {
    /// Order in which lock keys are reconciled
    pub const SYNC_ORDER: [LockKey; 3] = [LockKey::CapsLock, LockKey::NumLock, LockKey::ScrollLock];

    /// RDP scancode of the key that toggles this lock
    pub fn scancode(self) -> u16 {
        use crate::input::scancodes;

        match self {
            LockKey::ScrollLock => scancodes::SCROLL_LOCK,
            LockKey::NumLock => scancodes::NUM_LOCK,
            LockKey::CapsLock => scancodes::CAPS_LOCK,
        }
    }

    /// Human-readable name used in logs
    pub fn name(self) -> &'static str {
        match self {
            LockKey::ScrollLock => "scroll lock",
            LockKey::NumLock => "num lock",
            LockKey::CapsLock => "caps lock",
        }
    }
}

/// Set of [`LockKey`]s
pub type LockFlags = BitFlags<LockKey>;

/// Decode key flags from the raw flags word, ignoring unrelated bits
/// (down/release state and anything else the client sets)
pub fn key_flags_from_bits(bits: u16) -> KeyFlags {
    KeyFlags::from_bits_truncate(bits)
}

/// Decode a synchronize lock mask, ignoring bits beyond the three lock keys
pub fn lock_flags_from_bits(bits: u32) -> LockFlags {
    LockFlags::from_bits_truncate((bits & 0xFF) as u8)
}
