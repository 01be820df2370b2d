//! XKB-backed local keyboard
//!
//! Keeps an `xkbcommon` keymap and state in step with the translated key
//! transitions. Lock state is read from the locked modifiers, so a caps-lock
//! press/release pair flips `Lock` exactly as it would on the local seat.

use tracing::{debug, trace};
use xkbcommon::xkb;

use crate::input::device::{KeyEventSink, LocalLockState, LockStateSource};
use crate::input::error::{InputError, Result};
use crate::input::layout::{KeyboardLayout, LayoutLoader};

/// Local keyboard backed by an XKB keymap and state
pub struct XkbKeyboard {
    context: xkb::Context,
    keymap: xkb::Keymap,
    state: xkb::State,
    layout: KeyboardLayout,
}

fn compile_keymap(context: &xkb::Context, layout: &KeyboardLayout) -> Result<xkb::Keymap> {
    let options = if layout.options.is_empty() {
        None
    } else {
        Some(layout.options.clone())
    };

    xkb::Keymap::new_from_names(
        context,
        &layout.rules,
        &layout.model,
        &layout.layout,
        &layout.variant,
        options,
        xkb::KEYMAP_COMPILE_NO_FLAGS,
    )
    .ok_or_else(|| InputError::XkbError(format!("failed to compile keymap ({})", layout)))
}

impl XkbKeyboard {
    /// Compile `layout` and create a keyboard with no keys held
    pub fn new(layout: &KeyboardLayout) -> Result<Self> {
        layout.validate()?;
        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = compile_keymap(&context, layout)?;
        let state = xkb::State::new(&keymap);

        debug!("XKB keyboard created with {}", layout);

        Ok(Self {
            context,
            keymap,
            state,
            layout: layout.clone(),
        })
    }

    /// Active layout names
    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Active keymap as XKB text
    pub fn keymap_string(&self) -> String {
        self.keymap.get_as_string(xkb::KEYMAP_FORMAT_TEXT_V1)
    }

    /// UTF-8 text the key would currently produce
    pub fn key_utf8(&self, keycode: u32) -> String {
        self.state.key_get_utf8(keycode.into())
    }
}

impl std::fmt::Debug for XkbKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XkbKeyboard")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl KeyEventSink for XkbKeyboard {
    fn post_key(&mut self, keycode: u32, pressed: bool) {
        let direction = if pressed {
            xkb::KeyDirection::Down
        } else {
            xkb::KeyDirection::Up
        };
        let changed = self.state.update_key(keycode.into(), direction);
        trace!(
            "XKB key {} {} (state change mask 0x{:X})",
            keycode,
            if pressed { "down" } else { "up" },
            changed
        );
    }
}

impl LockStateSource for XkbKeyboard {
    fn lock_state(&self) -> LocalLockState {
        LocalLockState {
            caps_lock: self
                .state
                .mod_name_is_active(xkb::MOD_NAME_CAPS, xkb::STATE_MODS_LOCKED),
            num_lock: self
                .state
                .mod_name_is_active(xkb::MOD_NAME_NUM, xkb::STATE_MODS_LOCKED),
        }
    }
}

impl LayoutLoader for XkbKeyboard {
    /// Recompile the keymap. Held keys and locks are reset; the previous
    /// keymap stays active if compilation fails.
    fn load_layout(&mut self, layout: &KeyboardLayout) -> Result<()> {
        let keymap = compile_keymap(&self.context, layout)?;
        self.state = xkb::State::new(&keymap);
        self.keymap = keymap;
        self.layout = layout.clone();
        debug!("XKB keymap reloaded: {}", layout);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::flags::LockKey;
    use crate::input::keyboard::RdpKeyboard;

    #[test]
    #[ignore] // Requires xkeyboard-config data
    fn test_caps_lock_sync_through_xkb() {
        let mut sink = XkbKeyboard::new(&KeyboardLayout::default()).unwrap();
        assert!(!sink.lock_state().caps_lock);

        sink.post_key(crate::input::keycodes::KEY_CAPSLOCK, true);
        sink.post_key(crate::input::keycodes::KEY_CAPSLOCK, false);
        assert!(sink.lock_state().caps_lock);

        let mut keyboard = RdpKeyboard::new(Vec::<crate::input::device::KeyTransition>::new(), sink);
        let report = keyboard.handle_sync_event(LockKey::CapsLock.into());
        assert!(report.is_empty());
    }

    #[test]
    #[ignore] // Requires xkeyboard-config data
    fn test_layout_reload() {
        let mut keyboard = XkbKeyboard::new(&KeyboardLayout::default()).unwrap();
        // 'Y' position on a US keyboard
        assert_eq!(keyboard.key_utf8(29), "y");

        let german = KeyboardLayout {
            layout: "de".to_string(),
            ..KeyboardLayout::default()
        };
        keyboard.load_layout(&german).unwrap();
        assert_eq!(keyboard.layout().layout, "de");
        assert_eq!(keyboard.key_utf8(29), "z");
    }
}
