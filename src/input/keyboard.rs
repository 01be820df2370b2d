//! Keyboard Session
//!
//! [`RdpKeyboard`] is one remote keyboard attached to the local input
//! subsystem. It owns the translator state for the lifetime of the session,
//! together with the sink transitions go to and the source lock state is
//! read from.

use tracing::debug;

use crate::input::device::{KeyEventSink, LockStateSource};
use crate::input::flags::{KeyFlags, LockFlags};
use crate::input::state::KeyboardState;
use crate::input::sync::{synchronize, SyncReport};
use crate::input::translator::ScancodeTranslator;

/// One RDP keyboard session
///
/// Events are processed synchronously and to completion, in arrival order.
#[derive(Debug)]
pub struct RdpKeyboard<S, L> {
    translator: ScancodeTranslator,
    sink: S,
    locks: L,
}

impl<S, L> RdpKeyboard<S, L>
where
    S: KeyEventSink,
    L: LockStateSource,
{
    /// Create a session with empty keyboard state
    pub fn new(sink: S, locks: L) -> Self {
        Self {
            translator: ScancodeTranslator::new(),
            sink,
            locks,
        }
    }

    /// Handle an RDP key down/up event
    pub fn handle_key_event(&mut self, down: bool, scancode: u16, flags: KeyFlags) {
        self.translator
            .handle_key(&mut self.sink, down, scancode, flags);
    }

    /// Handle an RDP synchronize event carrying the remote lock mask
    pub fn handle_sync_event(&mut self, remote: LockFlags) -> SyncReport {
        let report = synchronize(&mut self.translator, &mut self.sink, &self.locks, remote);
        debug!("Keyboard synchronize done, toggled {:?}", report.toggled);
        report
    }

    /// Release any latched modifiers
    pub fn reset_modifiers(&mut self) {
        self.translator.reset_modifiers(&mut self.sink);
    }

    /// Current keyboard state
    pub fn state(&self) -> &KeyboardState {
        self.translator.state()
    }

    /// Transition sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable transition sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Lock state source
    pub fn locks(&self) -> &L {
        &self.locks
    }

    /// Tear the session down, returning its sink and lock source
    pub fn into_parts(self) -> (S, L) {
        (self.sink, self.locks)
    }
}
