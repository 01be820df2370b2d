//! Local Keyboard Device Interfaces
//!
//! The translation core talks to the local input subsystem through two narrow
//! interfaces: [`KeyEventSink`] to enqueue key transitions and
//! [`LockStateSource`] to read the current lock-key state.
//!
//! [`SimulatedDevice`] implements both on top of a shared in-memory record.
//! It backs the replay binary and the test suites.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::error::Result;
use crate::input::keycodes::{KEY_CAPSLOCK, KEY_NUMLOCK};
use crate::input::layout::{KeyboardLayout, LayoutLoader};

/// A single key transition posted to the local keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyTransition {
    /// Local (XKB) keycode
    pub keycode: u32,
    /// `true` for press, `false` for release
    pub pressed: bool,
}

impl KeyTransition {
    /// Press of `keycode`
    pub const fn press(keycode: u32) -> Self {
        Self {
            keycode,
            pressed: true,
        }
    }

    /// Release of `keycode`
    pub const fn release(keycode: u32) -> Self {
        Self {
            keycode,
            pressed: false,
        }
    }
}

/// Receives key transitions in the exact order they are produced
///
/// Implementations must neither reorder nor drop transitions.
pub trait KeyEventSink {
    /// Enqueue a press or release of a local keycode
    fn post_key(&mut self, keycode: u32, pressed: bool);
}

impl<S: KeyEventSink + ?Sized> KeyEventSink for &mut S {
    fn post_key(&mut self, keycode: u32, pressed: bool) {
        (**self).post_key(keycode, pressed);
    }
}

impl KeyEventSink for Vec<KeyTransition> {
    fn post_key(&mut self, keycode: u32, pressed: bool) {
        self.push(KeyTransition { keycode, pressed });
    }
}

/// Lock-key state as observed by the local input subsystem
///
/// Scroll lock is absent: it is not a modifier locally and is tracked by the
/// keyboard session itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalLockState {
    /// Caps Lock is active
    pub caps_lock: bool,
    /// Num Lock is active
    pub num_lock: bool,
}

/// Read access to the local lock-key state, queried fresh on every sync
#[cfg_attr(test, mockall::automock)]
pub trait LockStateSource {
    /// Current caps/num lock state
    fn lock_state(&self) -> LocalLockState;
}

#[derive(Debug, Default)]
struct DeviceState {
    transitions: Vec<KeyTransition>,
    pressed: HashSet<u32>,
    locks: LocalLockState,
    layout: Option<KeyboardLayout>,
    layout_reloads: usize,
}

/// In-memory keyboard device
///
/// Records every posted transition and toggles caps/num lock when the
/// corresponding key goes from released to pressed, like a local keymap with
/// `LockMods` actions would. Repeated presses of a held key toggle nothing.
/// Clones share the same device, so one handle can act as sink while another
/// acts as lock source.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDevice {
    inner: Arc<Mutex<DeviceState>>,
}

impl SimulatedDevice {
    /// Create a device with all locks off
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a device with the given initial lock state
    pub fn with_locks(locks: LocalLockState) -> Self {
        let device = Self::default();
        device.inner.lock().locks = locks;
        device
    }

    /// All transitions posted so far
    pub fn transitions(&self) -> Vec<KeyTransition> {
        self.inner.lock().transitions.clone()
    }

    /// Remove and return the transitions posted so far
    pub fn take_transitions(&self) -> Vec<KeyTransition> {
        std::mem::take(&mut self.inner.lock().transitions)
    }

    /// Check if a key is currently held down
    pub fn is_pressed(&self, keycode: u32) -> bool {
        self.inner.lock().pressed.contains(&keycode)
    }

    /// Currently held keys
    pub fn pressed_keys(&self) -> Vec<u32> {
        let mut keys: Vec<u32> = self.inner.lock().pressed.iter().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Layout most recently loaded into this device
    pub fn layout(&self) -> Option<KeyboardLayout> {
        self.inner.lock().layout.clone()
    }

    /// Number of layout reloads performed
    pub fn layout_reloads(&self) -> usize {
        self.inner.lock().layout_reloads
    }
}

impl KeyEventSink for SimulatedDevice {
    fn post_key(&mut self, keycode: u32, pressed: bool) {
        let mut inner = self.inner.lock();
        inner.transitions.push(KeyTransition { keycode, pressed });

        if pressed {
            // A press of a key already held is a repeat and toggles nothing
            if inner.pressed.insert(keycode) {
                match keycode {
                    KEY_CAPSLOCK => inner.locks.caps_lock = !inner.locks.caps_lock,
                    KEY_NUMLOCK => inner.locks.num_lock = !inner.locks.num_lock,
                    _ => {}
                }
            }
        } else {
            inner.pressed.remove(&keycode);
        }
    }
}

impl LockStateSource for SimulatedDevice {
    fn lock_state(&self) -> LocalLockState {
        self.inner.lock().locks
    }
}

impl LayoutLoader for SimulatedDevice {
    fn load_layout(&mut self, layout: &KeyboardLayout) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.layout = Some(layout.clone());
        inner.layout_reloads += 1;
        debug!("Simulated device loaded layout {}", layout);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut sink: Vec<KeyTransition> = Vec::new();
        sink.post_key(30, false);
        sink.post_key(30, true);

        assert_eq!(sink, vec![KeyTransition::release(30), KeyTransition::press(30)]);
    }

    #[test]
    fn test_simulated_device_lock_toggles() {
        let mut device = SimulatedDevice::new();
        assert_eq!(device.lock_state(), LocalLockState::default());

        device.post_key(KEY_CAPSLOCK, true);
        device.post_key(KEY_CAPSLOCK, false);
        assert!(device.lock_state().caps_lock);
        assert!(!device.lock_state().num_lock);

        // Releases never toggle
        device.post_key(KEY_NUMLOCK, false);
        assert!(!device.lock_state().num_lock);

        device.post_key(KEY_NUMLOCK, true);
        assert!(device.lock_state().num_lock);

        device.post_key(KEY_CAPSLOCK, true);
        assert!(!device.lock_state().caps_lock);
    }

    #[test]
    fn test_simulated_device_repeated_press_toggles_once() {
        let mut device = SimulatedDevice::new();

        device.post_key(KEY_CAPSLOCK, true);
        device.post_key(KEY_CAPSLOCK, true);
        device.post_key(KEY_CAPSLOCK, true);
        assert!(device.lock_state().caps_lock);

        device.post_key(KEY_CAPSLOCK, false);
        assert!(device.lock_state().caps_lock);

        device.post_key(KEY_NUMLOCK, true);
        device.post_key(KEY_NUMLOCK, true);
        device.post_key(KEY_NUMLOCK, false);
        assert!(device.lock_state().num_lock);
        assert_eq!(device.transitions().len(), 7);
    }

    #[test]
    fn test_simulated_device_clones_share_state() {
        let device = SimulatedDevice::new();
        let mut sink = device.clone();

        sink.post_key(38, true);
        assert!(device.is_pressed(38));
        assert_eq!(device.pressed_keys(), vec![38]);

        sink.post_key(38, false);
        assert!(!device.is_pressed(38));
        assert_eq!(device.take_transitions().len(), 2);
        assert!(device.transitions().is_empty());
    }

    #[test]
    fn test_simulated_device_initial_locks() {
        let device = SimulatedDevice::with_locks(LocalLockState {
            caps_lock: true,
            num_lock: false,
        });
        assert!(device.lock_state().caps_lock);
    }

    #[test]
    fn test_simulated_device_layout_reload() {
        let mut device = SimulatedDevice::new();
        assert!(device.layout().is_none());

        device.load_layout(&KeyboardLayout::default()).unwrap();
        assert_eq!(device.layout(), Some(KeyboardLayout::default()));
        assert_eq!(device.layout_reloads(), 1);
    }
}
