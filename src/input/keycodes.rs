//! Local keycodes
//!
//! Keycodes in the XKB keycode space posted to the local keyboard device.
//! Names follow the Linux evdev `KEY_*` constants; values are the evdev code
//! plus [`MIN_KEY_CODE`], which is how the `evdev` XKB rules number keys.

#![allow(missing_docs)]

/// Lowest keycode the local keyboard accepts, and the offset between RDP
/// scancodes and XKB keycodes for the plain (non-extended) key block.
pub const MIN_KEY_CODE: u32 = 8;

/// Highest keycode the local keyboard accepts.
pub const MAX_KEY_CODE: u32 = 255;

/// Returns `true` if `keycode` can be posted to the local keyboard.
pub fn is_valid_keycode(keycode: u32) -> bool {
    (MIN_KEY_CODE..=MAX_KEY_CODE).contains(&keycode)
}

// Main block
pub const KEY_TAB: u32 = 23;
pub const KEY_ENTER: u32 = 36;
pub const KEY_LEFTCTRL: u32 = 37;
pub const KEY_LEFTSHIFT: u32 = 50;
pub const KEY_SLASH: u32 = 61;
pub const KEY_RIGHTSHIFT: u32 = 62;
pub const KEY_LEFTALT: u32 = 64;
pub const KEY_CAPSLOCK: u32 = 66;
pub const KEY_NUMLOCK: u32 = 77;
pub const KEY_SCROLLLOCK: u32 = 78;

// Numeric keypad
pub const KEY_KPASTERISK: u32 = 63;
pub const KEY_KP7: u32 = 79;
pub const KEY_KP8: u32 = 80;
pub const KEY_KP9: u32 = 81;
pub const KEY_KP4: u32 = 83;
pub const KEY_KP6: u32 = 85;
pub const KEY_KP1: u32 = 87;
pub const KEY_KP2: u32 = 88;
pub const KEY_KP3: u32 = 89;
pub const KEY_KP0: u32 = 90;
pub const KEY_KPDOT: u32 = 91;
pub const KEY_KPENTER: u32 = 104;
pub const KEY_KPSLASH: u32 = 106;
pub const KEY_KPCOMMA: u32 = 129;

// Right-hand modifiers and navigation cluster
pub const KEY_RIGHTCTRL: u32 = 105;
pub const KEY_SYSRQ: u32 = 107;
pub const KEY_RIGHTALT: u32 = 108;
pub const KEY_HOME: u32 = 110;
pub const KEY_UP: u32 = 111;
pub const KEY_PAGEUP: u32 = 112;
pub const KEY_LEFT: u32 = 113;
pub const KEY_RIGHT: u32 = 114;
pub const KEY_END: u32 = 115;
pub const KEY_DOWN: u32 = 116;
pub const KEY_PAGEDOWN: u32 = 117;
pub const KEY_INSERT: u32 = 118;
pub const KEY_DELETE: u32 = 119;
pub const KEY_PAUSE: u32 = 127;

// Windows, menu and meta keys
pub const KEY_LEFTMETA: u32 = 133;
pub const KEY_RIGHTMETA: u32 = 134;
pub const KEY_COMPOSE: u32 = 135;
pub const KEY_META: u32 = 205;

// Media and browser keys
pub const KEY_MUTE: u32 = 121;
pub const KEY_VOLUMEDOWN: u32 = 122;
pub const KEY_VOLUMEUP: u32 = 123;
pub const KEY_CANCEL: u32 = 136;
pub const KEY_PROG1: u32 = 156;
pub const KEY_PROG2: u32 = 157;
pub const KEY_MAIL: u32 = 163;
pub const KEY_BOOKMARKS: u32 = 164;
pub const KEY_BACK: u32 = 166;
pub const KEY_FORWARD: u32 = 167;
pub const KEY_NEXTSONG: u32 = 171;
pub const KEY_PLAYPAUSE: u32 = 172;
pub const KEY_PREVIOUSSONG: u32 = 173;
pub const KEY_STOPCD: u32 = 174;
pub const KEY_HOMEPAGE: u32 = 180;
pub const KEY_REFRESH: u32 = 181;
pub const KEY_SEARCH: u32 = 225;
pub const KEY_MEDIA: u32 = 234;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycode_range() {
        assert!(!is_valid_keycode(0));
        assert!(!is_valid_keycode(7));
        assert!(is_valid_keycode(MIN_KEY_CODE));
        assert!(is_valid_keycode(MAX_KEY_CODE));
        assert!(!is_valid_keycode(MAX_KEY_CODE + 1));
    }

    #[test]
    fn test_evdev_offset() {
        // evdev KEY_TAB = 15, KEY_CAPSLOCK = 58, KEY_NUMLOCK = 69
        assert_eq!(KEY_TAB, 15 + MIN_KEY_CODE);
        assert_eq!(KEY_CAPSLOCK, 58 + MIN_KEY_CODE);
        assert_eq!(KEY_NUMLOCK, 69 + MIN_KEY_CODE);
    }
}
