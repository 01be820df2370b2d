//! Per-session keyboard state

/// Transient keyboard state for one keyboard session
///
/// Latches hold the local keycode that was pressed, so the matching release
/// can be posted even if the remote side never sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    /// Control key currently latched down
    pub(crate) ctrl_down: Option<u32>,
    /// Alt key latched down. Only the modifier reset writes this.
    pub(crate) alt_down: Option<u32>,
    /// Shift key latched down. Only the modifier reset writes this.
    pub(crate) shift_down: Option<u32>,
    /// A tab press was translated and its release has not arrived yet
    pub(crate) tab_down: bool,
    /// A special-flagged control press announced an upcoming Pause
    pub(crate) pause_special_pending: bool,
    /// Local scroll-lock state
    pub(crate) scroll_lock_down: bool,
    /// Scroll-lock key is physically held; repeated downs do not toggle
    pub(crate) scroll_lock_held: bool,
}

impl KeyboardState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Latched control keycode, if any
    pub fn ctrl_down(&self) -> Option<u32> {
        self.ctrl_down
    }

    /// Latched alt keycode, if any
    pub fn alt_down(&self) -> Option<u32> {
        self.alt_down
    }

    /// Latched shift keycode, if any
    pub fn shift_down(&self) -> Option<u32> {
        self.shift_down
    }

    /// Whether tab is held
    pub fn tab_down(&self) -> bool {
        self.tab_down
    }

    /// Whether a Pause sequence is in progress
    pub fn pause_special_pending(&self) -> bool {
        self.pause_special_pending
    }

    /// Whether scroll lock is active locally
    pub fn scroll_lock_down(&self) -> bool {
        self.scroll_lock_down
    }

    /// Whether the scroll-lock key is held
    pub fn scroll_lock_held(&self) -> bool {
        self.scroll_lock_held
    }
}
