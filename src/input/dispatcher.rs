//! Input Message Dispatcher
//!
//! The RDP session layer hands keyboard input over as tagged messages: a
//! message type plus four integer parameters. The dispatcher decodes them
//! and routes each to the keyboard session, or to the layout loader for a
//! layout reload.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::input::device::{KeyEventSink, LockStateSource};
use crate::input::error::{InputError, Result};
use crate::input::flags::{key_flags_from_bits, lock_flags_from_bits, KeyFlags, LockFlags};
use crate::input::keyboard::RdpKeyboard;
use crate::input::layout::{ClientLayoutInfo, KeyboardLayout, LayoutLoader};

/// Key down message
pub const MSG_KEY_DOWN: i32 = 15;
/// Key up message
pub const MSG_KEY_UP: i32 = 16;
/// Synchronize message
pub const MSG_SYNCHRONIZE: i32 = 17;
/// Layout reload message
pub const MSG_LOAD_LAYOUT: i32 = 18;

/// A decoded keyboard input message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMessage {
    /// Key pressed
    KeyDown {
        /// RDP scancode
        scancode: u16,
        /// Extended/special flags
        flags: KeyFlags,
    },
    /// Key released
    KeyUp {
        /// RDP scancode
        scancode: u16,
        /// Extended/special flags
        flags: KeyFlags,
    },
    /// Lock state as seen by the client
    Synchronize {
        /// Remote lock mask
        locks: LockFlags,
    },
    /// Client announced (new) layout names
    LayoutReload(ClientLayoutInfo),
}

impl InputMessage {
    /// Decode a raw message
    ///
    /// Key events carry the scancode in `param3` and flags in `param4`.
    /// Synchronize carries the lock mask in `param1`. A layout reload cannot
    /// be decoded from integers and yields [`InputError::MissingPayload`].
    pub fn decode(msg: i32, param1: i64, _param2: i64, param3: i64, param4: i64) -> Result<Self> {
        match msg {
            MSG_KEY_DOWN | MSG_KEY_UP => {
                let scancode =
                    u16::try_from(param3).map_err(|_| InputError::InvalidScancode(param3))?;
                let flags = key_flags_from_bits((param4 & 0xFFFF) as u16);
                Ok(if msg == MSG_KEY_DOWN {
                    InputMessage::KeyDown { scancode, flags }
                } else {
                    InputMessage::KeyUp { scancode, flags }
                })
            }
            MSG_SYNCHRONIZE => Ok(InputMessage::Synchronize {
                locks: lock_flags_from_bits((param1 & 0xFF) as u32),
            }),
            MSG_LOAD_LAYOUT => Err(InputError::MissingPayload(msg)),
            other => Err(InputError::UnknownMessage(other)),
        }
    }

    /// Raw message type
    pub fn message_type(&self) -> i32 {
        match self {
            InputMessage::KeyDown { .. } => MSG_KEY_DOWN,
            InputMessage::KeyUp { .. } => MSG_KEY_UP,
            InputMessage::Synchronize { .. } => MSG_SYNCHRONIZE,
            InputMessage::LayoutReload(_) => MSG_LOAD_LAYOUT,
        }
    }
}

/// Routes input messages into one keyboard session
#[derive(Debug)]
pub struct InputDispatcher<S, L, Y> {
    keyboard: RdpKeyboard<S, L>,
    loader: Y,
    defaults: KeyboardLayout,
    active_layout: Option<KeyboardLayout>,
}

impl<S, L, Y> InputDispatcher<S, L, Y>
where
    S: KeyEventSink,
    L: LockStateSource,
    Y: LayoutLoader,
{
    /// Create a dispatcher using `defaults` for layout names the client
    /// leaves empty
    pub fn new(keyboard: RdpKeyboard<S, L>, loader: Y, defaults: KeyboardLayout) -> Self {
        Self {
            keyboard,
            loader,
            defaults,
            active_layout: None,
        }
    }

    /// Dispatch a decoded message
    pub fn dispatch(&mut self, message: InputMessage) -> Result<()> {
        match message {
            InputMessage::KeyDown { scancode, flags } => {
                self.keyboard.handle_key_event(true, scancode, flags);
            }
            InputMessage::KeyUp { scancode, flags } => {
                self.keyboard.handle_key_event(false, scancode, flags);
            }
            InputMessage::Synchronize { locks } => {
                self.keyboard.handle_sync_event(locks);
            }
            InputMessage::LayoutReload(client) => {
                self.reload_layout(&client)?;
            }
        }
        Ok(())
    }

    /// Decode and dispatch a raw message
    ///
    /// Unknown message types are logged and returned as errors; the session
    /// state is left untouched.
    pub fn dispatch_raw(
        &mut self,
        msg: i32,
        param1: i64,
        param2: i64,
        param3: i64,
        param4: i64,
    ) -> Result<()> {
        let message = match InputMessage::decode(msg, param1, param2, param3, param4) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring input message {}: {}", msg, e);
                return Err(e);
            }
        };
        self.dispatch(message)
    }

    fn reload_layout(&mut self, client: &ClientLayoutInfo) -> Result<()> {
        let layout = KeyboardLayout::resolve(&self.defaults, client);
        info!(
            "Loading keyboard layout: keylayout=0x{:08X} {}",
            client.keylayout, layout
        );
        layout.validate()?;
        self.loader.load_layout(&layout)?;
        debug!("Keyboard layout loaded");
        self.active_layout = Some(layout);
        Ok(())
    }

    /// Keyboard session
    pub fn keyboard(&self) -> &RdpKeyboard<S, L> {
        &self.keyboard
    }

    /// Mutable keyboard session
    pub fn keyboard_mut(&mut self) -> &mut RdpKeyboard<S, L> {
        &mut self.keyboard
    }

    /// Layout loader
    pub fn loader(&self) -> &Y {
        &self.loader
    }

    /// Layout defaults
    pub fn defaults(&self) -> &KeyboardLayout {
        &self.defaults
    }

    /// Layout loaded by the most recent successful reload
    pub fn active_layout(&self) -> Option<&KeyboardLayout> {
        self.active_layout.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::device::{KeyTransition, SimulatedDevice};
    use crate::input::flags::{KeyFlag, LockKey};
    use crate::input::keycodes::KEY_CAPSLOCK;

    type TestDispatcher = InputDispatcher<SimulatedDevice, SimulatedDevice, SimulatedDevice>;

    fn dispatcher() -> (TestDispatcher, SimulatedDevice) {
        let device = SimulatedDevice::new();
        let keyboard = RdpKeyboard::new(device.clone(), device.clone());
        let dispatcher = InputDispatcher::new(keyboard, device.clone(), KeyboardLayout::default());
        (dispatcher, device)
    }

    struct FailingLoader;

    impl LayoutLoader for FailingLoader {
        fn load_layout(&mut self, layout: &KeyboardLayout) -> Result<()> {
            Err(InputError::XkbError(format!("cannot compile {}", layout.layout)))
        }
    }

    #[test]
    fn test_decode_key_events() {
        assert_eq!(
            InputMessage::decode(15, 0, 0, 0x1E, 0).unwrap(),
            InputMessage::KeyDown {
                scancode: 0x1E,
                flags: KeyFlags::empty()
            }
        );
        assert_eq!(
            InputMessage::decode(16, 0, 0, 0x38, 0xC100).unwrap(),
            InputMessage::KeyUp {
                scancode: 0x38,
                flags: KeyFlag::Extended.into()
            }
        );
    }

    #[test]
    fn test_decode_sync() {
        assert_eq!(
            InputMessage::decode(17, 0x06, 0, 0, 0).unwrap(),
            InputMessage::Synchronize {
                locks: LockKey::CapsLock | LockKey::NumLock
            }
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            InputMessage::decode(18, 0, 0, 0, 0),
            Err(InputError::MissingPayload(18))
        ));
        assert!(matches!(
            InputMessage::decode(100, 0, 0, 0, 0),
            Err(InputError::UnknownMessage(100))
        ));
        assert!(matches!(
            InputMessage::decode(15, 0, 0, -1, 0),
            Err(InputError::InvalidScancode(-1))
        ));
    }

    #[test]
    fn test_message_type_round_trip() {
        let message = InputMessage::decode(MSG_SYNCHRONIZE, 1, 0, 0, 0).unwrap();
        assert_eq!(message.message_type(), MSG_SYNCHRONIZE);
    }

    #[test]
    fn test_dispatch_key_and_sync() {
        let (mut dispatcher, device) = dispatcher();

        dispatcher.dispatch_raw(MSG_KEY_DOWN, 0, 0, 0x1E, 0).unwrap();
        dispatcher.dispatch_raw(MSG_KEY_UP, 0, 0, 0x1E, 0).unwrap();
        dispatcher.dispatch_raw(MSG_SYNCHRONIZE, 0x04, 0, 0, 0).unwrap();

        assert_eq!(
            device.transitions(),
            vec![
                KeyTransition::release(38),
                KeyTransition::press(38),
                KeyTransition::release(38),
                KeyTransition::press(KEY_CAPSLOCK),
                KeyTransition::release(KEY_CAPSLOCK),
            ]
        );
    }

    #[test]
    fn test_unknown_message_leaves_state_untouched() {
        let (mut dispatcher, device) = dispatcher();

        assert!(dispatcher.dispatch_raw(3, 1, 2, 3, 4).is_err());
        assert!(device.transitions().is_empty());
        assert_eq!(dispatcher.keyboard().state(), &Default::default());
    }

    #[test]
    fn test_layout_reload() {
        let (mut dispatcher, device) = dispatcher();

        let client = ClientLayoutInfo {
            keylayout: 0x0407,
            layout: "de".to_string(),
            ..ClientLayoutInfo::default()
        };
        dispatcher.dispatch(InputMessage::LayoutReload(client)).unwrap();

        let loaded = device.layout().unwrap();
        assert_eq!(loaded.layout, "de");
        assert_eq!(loaded.model, "pc104");
        assert_eq!(device.layout_reloads(), 1);
        assert_eq!(dispatcher.active_layout(), Some(&loaded));
    }

    #[test]
    fn test_layout_reload_failure() {
        let device = SimulatedDevice::new();
        let keyboard = RdpKeyboard::new(device.clone(), device);
        let mut dispatcher = InputDispatcher::new(keyboard, FailingLoader, KeyboardLayout::default());

        let result = dispatcher.dispatch(InputMessage::LayoutReload(ClientLayoutInfo::default()));
        assert!(matches!(result, Err(InputError::XkbError(_))));
        assert!(dispatcher.active_layout().is_none());
    }

    #[test]
    fn test_invalid_layout_is_not_loaded() {
        let (mut dispatcher, device) = dispatcher();

        let client = ClientLayoutInfo {
            variant: "two words".to_string(),
            ..ClientLayoutInfo::default()
        };
        assert!(dispatcher.dispatch(InputMessage::LayoutReload(client)).is_err());
        assert_eq!(device.layout_reloads(), 0);
    }
}
