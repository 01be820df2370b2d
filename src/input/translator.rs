//! Scancode Translator
//!
//! Turns RDP key events into local keycode transitions while tracking the
//! small amount of state needed to reproduce the sequences the local
//! keyboard expects.
//!
//! # Emission
//!
//! Most keys use *compensated* emission: a press is posted as release +
//! press, a release as a single release. RDP clients repeat key-down without
//! an intervening key-up, while the local keyboard only honours a repeated
//! press after a release.
//!
//! Modifiers, lock keys, Windows/menu keys and media keys are posted as a
//! single transition matching the event.
//!
//! # Special cases
//!
//! - Tab: a release without a preceding press releases every latched
//!   modifier instead of posting anything for tab.
//! - Control with the special flag: the client prefixes Pause with such a
//!   control press. It is swallowed and marks a Pause as pending.
//! - Pause / Num Lock share scancode `0x45`. It is Pause while a Pause is
//!   pending or a control key is latched, Num Lock otherwise.

use tracing::{debug, trace};

use crate::input::device::KeyEventSink;
use crate::input::flags::{KeyFlag, KeyFlags};
use crate::input::keycodes::{
    is_valid_keycode, KEY_BACK, KEY_BOOKMARKS, KEY_CANCEL, KEY_COMPOSE, KEY_DELETE, KEY_DOWN,
    KEY_END, KEY_ENTER, KEY_FORWARD, KEY_HOME, KEY_HOMEPAGE, KEY_INSERT, KEY_KP0, KEY_KP1,
    KEY_KP2, KEY_KP3, KEY_KP4, KEY_KP6, KEY_KP7, KEY_KP8, KEY_KP9, KEY_KPASTERISK, KEY_KPCOMMA,
    KEY_KPDOT, KEY_KPENTER, KEY_KPSLASH, KEY_LEFT, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTMETA,
    KEY_MAIL, KEY_MEDIA, KEY_META, KEY_MUTE, KEY_NEXTSONG, KEY_NUMLOCK, KEY_PAGEDOWN, KEY_PAGEUP,
    KEY_PAUSE, KEY_PLAYPAUSE, KEY_PREVIOUSSONG, KEY_PROG1, KEY_PROG2, KEY_REFRESH, KEY_RIGHT,
    KEY_RIGHTALT, KEY_RIGHTCTRL, KEY_RIGHTMETA, KEY_SEARCH, KEY_SLASH, KEY_STOPCD, KEY_SYSRQ,
    KEY_TAB, KEY_UP, KEY_VOLUMEDOWN, KEY_VOLUMEUP, MIN_KEY_CODE,
};
use crate::input::scancodes::{self, media};
use crate::input::state::KeyboardState;

/// Extended media and browser keys
const MEDIA_KEYS: [(u16, u32); 18] = [
    (media::PREV_TRACK, KEY_PREVIOUSSONG),
    (media::NEXT_TRACK, KEY_NEXTSONG),
    (media::MUTE, KEY_MUTE),
    (media::PLAY_PAUSE, KEY_PLAYPAUSE),
    (media::STOP, KEY_STOPCD),
    (media::VOLUME_DOWN, KEY_VOLUMEDOWN),
    (media::VOLUME_UP, KEY_VOLUMEUP),
    (media::BROWSER_HOME, KEY_HOMEPAGE),
    (media::BROWSER_SEARCH, KEY_SEARCH),
    (media::BROWSER_FAVORITES, KEY_BOOKMARKS),
    (media::BROWSER_REFRESH, KEY_REFRESH),
    (media::BROWSER_STOP, KEY_CANCEL),
    (media::BROWSER_FORWARD, KEY_FORWARD),
    (media::BROWSER_BACK, KEY_BACK),
    (media::LAUNCH_MAIL, KEY_MAIL),
    (media::LAUNCH_MEDIA, KEY_MEDIA),
    (media::LAUNCH_APP1, KEY_PROG1),
    (media::LAUNCH_APP2, KEY_PROG2),
];

/// Keys whose meaning depends on the extended flag:
/// (scancode, extended keycode, plain keycode)
const DUAL_KEYS: [(u16, u32, u32); 13] = [
    (scancodes::ENTER, KEY_KPENTER, KEY_ENTER),
    (scancodes::SLASH, KEY_KPSLASH, KEY_SLASH),
    (scancodes::KP_MULTIPLY, KEY_SYSRQ, KEY_KPASTERISK),
    (scancodes::KP_7, KEY_HOME, KEY_KP7),
    (scancodes::KP_8, KEY_UP, KEY_KP8),
    (scancodes::KP_9, KEY_PAGEUP, KEY_KP9),
    (scancodes::KP_4, KEY_LEFT, KEY_KP4),
    (scancodes::KP_6, KEY_RIGHT, KEY_KP6),
    (scancodes::KP_1, KEY_END, KEY_KP1),
    (scancodes::KP_2, KEY_DOWN, KEY_KP2),
    (scancodes::KP_3, KEY_PAGEDOWN, KEY_KP3),
    (scancodes::KP_0, KEY_INSERT, KEY_KP0),
    (scancodes::KP_DECIMAL, KEY_DELETE, KEY_KPDOT),
];

/// Look up an extended media key
pub fn media_keycode(scancode: u16) -> Option<u32> {
    MEDIA_KEYS
        .iter()
        .find(|(code, _)| *code == scancode)
        .map(|&(_, keycode)| keycode)
}

/// Look up a keypad/navigation key
fn dual_keycode(scancode: u16, extended: bool) -> Option<u32> {
    DUAL_KEYS
        .iter()
        .find(|(code, ..)| *code == scancode)
        .map(|&(_, ext, plain)| if extended { ext } else { plain })
}

/// Scancodes handled by a dedicated rule (when not extended-media)
#[cfg(test)]
const SPECIAL_SCANCODES: [u16; 28] = [
    scancodes::CAPS_LOCK,
    scancodes::LEFT_SHIFT,
    scancodes::RIGHT_SHIFT,
    scancodes::SCROLL_LOCK,
    scancodes::ALT,
    scancodes::TAB,
    scancodes::CONTROL,
    scancodes::NUM_LOCK,
    scancodes::ENTER,
    scancodes::SLASH,
    scancodes::KP_MULTIPLY,
    scancodes::KP_7,
    scancodes::KP_8,
    scancodes::KP_9,
    scancodes::KP_4,
    scancodes::KP_6,
    scancodes::KP_1,
    scancodes::KP_2,
    scancodes::KP_3,
    scancodes::KP_0,
    scancodes::KP_DECIMAL,
    scancodes::LEFT_WIN,
    scancodes::RIGHT_WIN,
    scancodes::MENU,
    scancodes::LEFT_META,
    scancodes::RIGHT_META,
    scancodes::ABNT_C1,
    scancodes::ABNT_C2,
];

/// Post one transition, dropping keycodes the local keyboard cannot take
fn post<S: KeyEventSink + ?Sized>(sink: &mut S, keycode: u32, pressed: bool) {
    if !is_valid_keycode(keycode) {
        trace!("Dropping out-of-range keycode {}", keycode);
        return;
    }
    trace!("Posting keycode {} pressed={}", keycode, pressed);
    sink.post_key(keycode, pressed);
}

/// Compensated emission: release + press for a press, release for a release
fn post_down_up<S: KeyEventSink + ?Sized>(sink: &mut S, keycode: u32, down: bool) {
    if !is_valid_keycode(keycode) {
        trace!("Dropping out-of-range keycode {}", keycode);
        return;
    }
    post(sink, keycode, false);
    if down {
        post(sink, keycode, true);
    }
}

/// Scancode translator owning the keyboard state of one session
#[derive(Debug, Clone, Default)]
pub struct ScancodeTranslator {
    state: KeyboardState,
}

impl ScancodeTranslator {
    /// Create a translator with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current keyboard state
    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    /// Translate one RDP key event and post the resulting transitions
    pub fn handle_key<S: KeyEventSink + ?Sized>(
        &mut self,
        sink: &mut S,
        down: bool,
        scancode: u16,
        flags: KeyFlags,
    ) {
        let extended = flags.contains(KeyFlag::Extended);
        let special = flags.contains(KeyFlag::Special);

        debug!(
            "Key {}: scancode=0x{:02X}, extended={}, special={}",
            if down { "down" } else { "up" },
            scancode,
            extended,
            special
        );

        if extended {
            if let Some(keycode) = media_keycode(scancode) {
                post(sink, keycode, down);
                return;
            }
        }

        match scancode {
            scancodes::CAPS_LOCK
            | scancodes::LEFT_SHIFT
            | scancodes::RIGHT_SHIFT
            | scancodes::SCROLL_LOCK => {
                if scancode == scancodes::SCROLL_LOCK {
                    // Toggle on the released -> pressed edge only
                    if down && !self.state.scroll_lock_held {
                        self.state.scroll_lock_down = !self.state.scroll_lock_down;
                    }
                    self.state.scroll_lock_held = down;
                }
                post(sink, u32::from(scancode) + MIN_KEY_CODE, down);
            }

            scancodes::ALT => {
                let keycode = if extended { KEY_RIGHTALT } else { KEY_LEFTALT };
                post(sink, keycode, down);
            }

            scancodes::TAB => {
                if !down && !self.state.tab_down {
                    debug!("Tab release without press, releasing latched modifiers");
                    self.reset_modifiers(sink);
                } else {
                    post_down_up(sink, KEY_TAB, down);
                }
                self.state.tab_down = down;
            }

            scancodes::CONTROL => {
                if special {
                    if down {
                        self.state.pause_special_pending = true;
                    }
                } else {
                    let keycode = if extended { KEY_RIGHTCTRL } else { KEY_LEFTCTRL };
                    self.state.ctrl_down = down.then_some(keycode);
                    post(sink, keycode, down);
                }
            }

            scancodes::NUM_LOCK => {
                let keycode = if self.state.pause_special_pending {
                    if !down {
                        self.state.pause_special_pending = false;
                    }
                    KEY_PAUSE
                } else if self.state.ctrl_down.is_some() {
                    KEY_PAUSE
                } else {
                    KEY_NUMLOCK
                };
                post_down_up(sink, keycode, down);
            }

            scancodes::LEFT_WIN => post(sink, KEY_LEFTMETA, down),
            scancodes::RIGHT_WIN => post(sink, KEY_RIGHTMETA, down),
            scancodes::MENU => post(sink, KEY_COMPOSE, down),
            // Both meta keys share one keycode
            scancodes::LEFT_META | scancodes::RIGHT_META => post(sink, KEY_META, down),

            scancodes::ABNT_C1 => post_down_up(sink, KEY_KPSLASH, down),
            scancodes::ABNT_C2 => post_down_up(sink, KEY_KPCOMMA, down),

            _ => {
                let keycode = dual_keycode(scancode, extended)
                    .unwrap_or_else(|| u32::from(scancode) + MIN_KEY_CODE);
                post_down_up(sink, keycode, down);
            }
        }
    }

    /// Release every latched modifier
    ///
    /// Recovers from a key-down the remote side never followed with a key-up.
    pub fn reset_modifiers<S: KeyEventSink + ?Sized>(&mut self, sink: &mut S) {
        let latched = [
            self.state.ctrl_down.take(),
            self.state.alt_down.take(),
            self.state.shift_down.take(),
        ];
        for keycode in latched.into_iter().flatten() {
            post(sink, keycode, false);
        }
    }
}
