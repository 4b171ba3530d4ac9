//! Helpers that keep user-supplied text (player names, command tokens, item labels)
//! readable in single-line logs.

use crate::gems::markup;

const MAX_PREVIEW: usize = 120;

/// Escape control characters and cap the length so one value stays on one log line.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// An item label with colour codes removed, escaped for logging.
pub fn log_label(label: &str) -> String {
    escape_log(&markup::strip(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_newlines() {
        assert_eq!(escape_log("Bob\nAdmin"), "Bob\\nAdmin");
    }

    #[test]
    fn truncates_long_values() {
        let long = "x".repeat(500);
        let esc = escape_log(&long);
        assert!(esc.ends_with('…'));
        assert_eq!(esc.chars().count(), MAX_PREVIEW + 1);
    }

    #[test]
    fn labels_lose_colour_codes() {
        assert_eq!(log_label("§6§lProtection Gem"), "Protection Gem");
    }
}
