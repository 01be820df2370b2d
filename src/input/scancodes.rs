//! RDP scancodes
//!
//! Set 1 make codes as carried in RDP keyboard events. Extended keys share
//! the base code and are told apart by the `KBDFLAGS_EXTENDED` flag.

#![allow(missing_docs)]

pub const TAB: u16 = 0x0F;
pub const ENTER: u16 = 0x1C;
pub const CONTROL: u16 = 0x1D;
pub const LEFT_SHIFT: u16 = 0x2A;
pub const SLASH: u16 = 0x35;
pub const RIGHT_SHIFT: u16 = 0x36;
/// Keypad `*`, or Print Screen when extended
pub const KP_MULTIPLY: u16 = 0x37;
pub const ALT: u16 = 0x38;
pub const CAPS_LOCK: u16 = 0x3A;
/// Num Lock, also the second half of the Pause sequence
pub const NUM_LOCK: u16 = 0x45;
pub const SCROLL_LOCK: u16 = 0x46;

pub const KP_7: u16 = 0x47;
pub const KP_8: u16 = 0x48;
pub const KP_9: u16 = 0x49;
pub const KP_4: u16 = 0x4B;
pub const KP_6: u16 = 0x4D;
pub const KP_1: u16 = 0x4F;
pub const KP_2: u16 = 0x50;
pub const KP_3: u16 = 0x51;
pub const KP_0: u16 = 0x52;
pub const KP_DECIMAL: u16 = 0x53;

pub const LEFT_META: u16 = 0x59;
pub const RIGHT_META: u16 = 0x5A;
pub const LEFT_WIN: u16 = 0x5B;
pub const RIGHT_WIN: u16 = 0x5C;
pub const MENU: u16 = 0x5D;

/// `/ ?` key on ABNT2 (Brazilian) keyboards
pub const ABNT_C1: u16 = 0x73;
/// Keypad `.` on ABNT2 (Brazilian) keyboards
pub const ABNT_C2: u16 = 0x7E;

/// Media and browser keys, only meaningful with the extended flag
pub mod media {
    pub const PREV_TRACK: u16 = 0x10;
    pub const NEXT_TRACK: u16 = 0x19;
    pub const MUTE: u16 = 0x20;
    pub const PLAY_PAUSE: u16 = 0x22;
    pub const STOP: u16 = 0x24;
    pub const VOLUME_DOWN: u16 = 0x2E;
    pub const VOLUME_UP: u16 = 0x30;
    pub const BROWSER_HOME: u16 = 0x32;
    pub const BROWSER_SEARCH: u16 = 0x65;
    pub const BROWSER_FAVORITES: u16 = 0x66;
    pub const BROWSER_REFRESH: u16 = 0x67;
    pub const BROWSER_STOP: u16 = 0x68;
    pub const BROWSER_FORWARD: u16 = 0x69;
    pub const BROWSER_BACK: u16 = 0x6A;
    pub const LAUNCH_MAIL: u16 = 0x6C;
    pub const LAUNCH_MEDIA: u16 = 0x6D;
    pub const LAUNCH_APP1: u16 = 0x6E;
    pub const LAUNCH_APP2: u16 = 0x6F;
}
