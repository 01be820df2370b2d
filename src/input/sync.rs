//! Lock-State Synchronizer
//!
//! Reconciles the lock keys reported by an RDP synchronize event with the
//! lock state of the local keyboard. Every mismatching lock is toggled by
//! feeding a synthesized press and release of its key through the
//! [`ScancodeTranslator`], so the correction follows the same mapping rules
//! as real input.

use tracing::{debug, info};

use crate::input::device::{KeyEventSink, LockStateSource};
use crate::input::flags::{KeyFlags, LockFlags, LockKey};
use crate::input::translator::ScancodeTranslator;

/// Locks toggled by one synchronize event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Lock keys for which a press/release pair was synthesized
    pub toggled: LockFlags,
}

impl SyncReport {
    /// Whether local state already matched the remote side
    pub fn is_empty(&self) -> bool {
        self.toggled.is_empty()
    }
}

/// Bring the local lock keys in line with `remote`
///
/// Caps lock is checked first, then num lock, then scroll lock. Each lock is
/// corrected independently. The local state is queried once, before any
/// correction.
pub fn synchronize<S, L>(
    translator: &mut ScancodeTranslator,
    sink: &mut S,
    source: &L,
    remote: LockFlags,
) -> SyncReport
where
    S: KeyEventSink + ?Sized,
    L: LockStateSource + ?Sized,
{
    let local = source.lock_state();
    debug!("Keyboard synchronize: remote={:?}, local={:?}", remote, local);

    let mut report = SyncReport::default();

    for lock in LockKey::SYNC_ORDER {
        let local_on = match lock {
            LockKey::CapsLock => local.caps_lock,
            LockKey::NumLock => local.num_lock,
            LockKey::ScrollLock => translator.state().scroll_lock_down(),
        };
        let remote_on = remote.contains(lock);

        if local_on != remote_on {
            info!("Keyboard synchronize: toggling {}", lock.name());
            translator.handle_key(sink, true, lock.scancode(), KeyFlags::empty());
            translator.handle_key(sink, false, lock.scancode(), KeyFlags::empty());
            report.toggled |= lock;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::device::{KeyTransition, LocalLockState, MockLockStateSource};
    use crate::input::keycodes::{KEY_CAPSLOCK, KEY_NUMLOCK, KEY_PAUSE, KEY_SCROLLLOCK};
    use crate::input::scancodes;

    fn source_with(caps_lock: bool, num_lock: bool) -> MockLockStateSource {
        let mut source = MockLockStateSource::new();
        source
            .expect_lock_state()
            .times(1)
            .return_const(LocalLockState {
                caps_lock,
                num_lock,
            });
        source
    }

    #[test]
    fn test_caps_lock_mismatch() {
        let mut translator = ScancodeTranslator::new();
        let mut sink: Vec<KeyTransition> = Vec::new();
        let source = source_with(false, false);

        let report = synchronize(&mut translator, &mut sink, &source, LockKey::CapsLock.into());

        assert_eq!(
            sink,
            vec![
                KeyTransition::press(KEY_CAPSLOCK),
                KeyTransition::release(KEY_CAPSLOCK)
            ]
        );
        assert_eq!(report.toggled, LockFlags::from(LockKey::CapsLock));
    }

    #[test]
    fn test_everything_matches() {
        let mut translator = ScancodeTranslator::new();
        let mut sink: Vec<KeyTransition> = Vec::new();
        let source = source_with(true, true);

        let report = synchronize(
            &mut translator,
            &mut sink,
            &source,
            LockKey::CapsLock | LockKey::NumLock,
        );

        assert!(sink.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn test_all_locks_corrected_in_order() {
        let mut translator = ScancodeTranslator::new();
        let mut sink: Vec<KeyTransition> = Vec::new();
        let source = source_with(true, false);

        let report = synchronize(
            &mut translator,
            &mut sink,
            &source,
            LockKey::NumLock | LockKey::ScrollLock,
        );

        assert_eq!(
            sink,
            vec![
                KeyTransition::press(KEY_CAPSLOCK),
                KeyTransition::release(KEY_CAPSLOCK),
                KeyTransition::release(KEY_NUMLOCK),
                KeyTransition::press(KEY_NUMLOCK),
                KeyTransition::release(KEY_NUMLOCK),
                KeyTransition::press(KEY_SCROLLLOCK),
                KeyTransition::release(KEY_SCROLLLOCK),
            ]
        );
        assert_eq!(report.toggled, LockFlags::all());
        assert!(translator.state().scroll_lock_down());
    }

    #[test]
    fn test_scroll_lock_uses_tracked_state() {
        let mut translator = ScancodeTranslator::new();
        let mut sink: Vec<KeyTransition> = Vec::new();

        // Turn scroll lock on through regular input
        translator.handle_key(&mut sink, true, scancodes::SCROLL_LOCK, KeyFlags::empty());
        translator.handle_key(&mut sink, false, scancodes::SCROLL_LOCK, KeyFlags::empty());
        sink.clear();

        let source = source_with(false, false);
        let report = synchronize(&mut translator, &mut sink, &source, LockKey::ScrollLock.into());
        assert!(report.is_empty());
        assert!(sink.is_empty());

        let source = source_with(false, false);
        let report = synchronize(&mut translator, &mut sink, &source, LockFlags::empty());
        assert_eq!(report.toggled, LockFlags::from(LockKey::ScrollLock));
        assert!(!translator.state().scroll_lock_down());
    }

    #[test]
    fn test_held_scroll_lock_then_sync_is_noop() {
        let mut translator = ScancodeTranslator::new();
        let mut sink: Vec<KeyTransition> = Vec::new();

        translator.handle_key(&mut sink, true, scancodes::SCROLL_LOCK, KeyFlags::empty());
        translator.handle_key(&mut sink, true, scancodes::SCROLL_LOCK, KeyFlags::empty());
        translator.handle_key(&mut sink, false, scancodes::SCROLL_LOCK, KeyFlags::empty());
        sink.clear();

        let source = source_with(false, false);
        let report = synchronize(&mut translator, &mut sink, &source, LockKey::ScrollLock.into());

        assert!(report.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_num_lock_toggle_with_control_latched() {
        // The synthesized num-lock press goes through the normal mapping, so
        // a latched control turns it into Pause.
        let mut translator = ScancodeTranslator::new();
        let mut sink: Vec<KeyTransition> = Vec::new();
        translator.handle_key(&mut sink, true, scancodes::CONTROL, KeyFlags::empty());
        sink.clear();

        let source = source_with(false, false);
        synchronize(&mut translator, &mut sink, &source, LockKey::NumLock.into());

        assert_eq!(
            sink,
            vec![
                KeyTransition::release(KEY_PAUSE),
                KeyTransition::press(KEY_PAUSE),
                KeyTransition::release(KEY_PAUSE),
            ]
        );
    }
}
