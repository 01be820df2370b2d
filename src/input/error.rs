//! Input Handling Error Types
//!
//! Key and synchronize events never fail: out-of-range keycodes are dropped
//! and inconsistent key state is tolerated. Errors only come from the layers
//! around the translation core, message decoding and keymap loading.

use thiserror::Error;

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Input module error types
#[derive(Error, Debug)]
pub enum InputError {
    /// Message type the dispatcher does not know
    #[error("Unknown input message type: {0}")]
    UnknownMessage(i32),

    /// Message type that carries a structured payload and cannot be decoded
    /// from integer parameters alone
    #[error("Input message type {0} requires a payload")]
    MissingPayload(i32),

    /// Scancode parameter does not fit a 16-bit scancode
    #[error("Invalid scancode parameter: {0}")]
    InvalidScancode(i64),

    /// Layout error
    #[error("Keyboard layout error: {0}")]
    LayoutError(String),

    /// XKB error
    #[error("XKB error: {0}")]
    XkbError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed or unsupported input message
    Message,
    /// Layout or keymap errors
    Layout,
    /// Everything else
    Unknown,
}

/// Classify an error
pub fn classify_error(error: &InputError) -> ErrorType {
    match error {
        InputError::UnknownMessage(_)
        | InputError::MissingPayload(_)
        | InputError::InvalidScancode(_) => ErrorType::Message,

        InputError::LayoutError(_) | InputError::XkbError(_) => ErrorType::Layout,

        InputError::Io(_) => ErrorType::Unknown,
    }
}

/// Whether the caller can skip the offending message and keep going
///
/// Malformed messages only affect themselves. A failed layout reload leaves
/// the previous keymap in place, so the session remains usable as well.
pub fn is_recoverable(error: &InputError) -> bool {
    matches!(classify_error(error), ErrorType::Message | ErrorType::Layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let error = InputError::UnknownMessage(99);
        assert_eq!(classify_error(&error), ErrorType::Message);

        let error = InputError::MissingPayload(18);
        assert_eq!(classify_error(&error), ErrorType::Message);

        let error = InputError::LayoutError("test".to_string());
        assert_eq!(classify_error(&error), ErrorType::Layout);

        let error = InputError::XkbError("test".to_string());
        assert_eq!(classify_error(&error), ErrorType::Layout);

        let error = InputError::Io(std::io::Error::new(std::io::ErrorKind::Other, "test"));
        assert_eq!(classify_error(&error), ErrorType::Unknown);
    }

    #[test]
    fn test_recoverable() {
        assert!(is_recoverable(&InputError::UnknownMessage(3)));
        assert!(is_recoverable(&InputError::LayoutError("bad".into())));
        assert!(!is_recoverable(&InputError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "closed"
        ))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            InputError::UnknownMessage(42).to_string(),
            "Unknown input message type: 42"
        );
        assert_eq!(
            InputError::MissingPayload(18).to_string(),
            "Input message type 18 requires a payload"
        );
        assert_eq!(
            InputError::InvalidScancode(-1).to_string(),
            "Invalid scancode parameter: -1"
        );
    }
}
