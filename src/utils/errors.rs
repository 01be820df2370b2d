//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for common error scenarios.

use std::fmt::Write;

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    // Header
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    // Match against the whole context chain, not just the outermost message
    let error_msg = format!("{:#}", error);

    if error_msg.contains("XKB") || error_msg.contains("layout") {
        format_layout_error(&mut output, &error_msg);
    } else if error_msg.contains("config") {
        format_config_error(&mut output, &error_msg);
    } else if error_msg.contains("event") || error_msg.contains("message") {
        format_input_error(&mut output, &error_msg);
    } else {
        format_generic_error(&mut output, &error_msg);
    }

    // Technical details
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    // Footer with help
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: rdpkeyb -vv"
    )
    .ok();
    writeln!(
        &mut output,
        "  - Trace every emitted keycode: RUST_LOG=rdpkeyb=trace rdpkeyb ..."
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_layout_error(output: &mut String, _error: &str) {
    writeln!(output, "Keyboard Layout Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not compile or load the requested keyboard layout.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Unknown layout, model or variant name").ok();
    writeln!(output, "     → List valid names: localectl list-x11-keymap-layouts").ok();
    writeln!(
        output,
        "     → Variants: localectl list-x11-keymap-variants <layout>"
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  2. XKB data not installed").ok();
    writeln!(output, "     → Install: sudo apt install xkb-data").ok();
    writeln!(output, "     → Check: ls /usr/share/X11/xkb/rules/evdev").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Empty or malformed names in [keyboard]").ok();
    writeln!(output, "     → rules and layout must not be empty").ok();
    writeln!(output, "     → Names must not contain whitespace").ok();
}

fn format_config_error(output: &mut String, _error: &str) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Configuration file not found").ok();
    writeln!(output, "     → Specify: rdpkeyb -c /path/to/config.toml").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Invalid values").ok();
    writeln!(
        output,
        "     → logging.level: trace, debug, info, warn or error"
    )
    .ok();
    writeln!(output, "     → logging.format: pretty, compact or json").ok();
}

fn format_input_error(output: &mut String, _error: &str) {
    writeln!(output, "Input Event Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not read an input event from the replay stream.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Line is not valid JSON").ok();
    writeln!(output, "     → One event object per line").ok();
    writeln!(
        output,
        "     → Example: {{\"type\":\"key_down\",\"scancode\":30}}"
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  2. Unknown event type").ok();
    writeln!(
        output,
        "     → Valid types: key_down, key_up, sync, layout, raw"
    )
    .ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Keyboard Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while processing keyboard input.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_user_error() {
        let error = anyhow::anyhow!("XKB error: failed to compile keymap");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("Keyboard Layout Error"));
    }

    #[test]
    fn test_config_error_formatting() {
        let error = anyhow::anyhow!("Failed to parse config file");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Configuration Error"));
        assert!(formatted.contains("logging.level"));
    }

    #[test]
    fn test_context_chain_is_matched() {
        let error = anyhow::anyhow!("expected value at line 1 column 1")
            .context("Invalid event on line 3");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Input Event Error"));
        assert!(formatted.contains("line 3"));
    }

    #[test]
    fn test_generic_error_formatting() {
        let error = anyhow::anyhow!("broken pipe");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Keyboard Error"));
        assert!(formatted.contains("broken pipe"));
    }
}
