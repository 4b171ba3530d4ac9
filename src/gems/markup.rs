//! Colour-code markup handling.
//!
//! Configuration files spell colour codes with `&` (e.g. `&6&lGem`); items and
//! chat carry them in rendered form with the section sign (`§6§lGem`). Every
//! text comparison in this crate runs both sides through [`normalize`] first.

/// Marker used by configuration authors.
pub const ALT_CODE_CHAR: char = '&';
/// Marker understood by clients.
pub const CODE_CHAR: char = '§';

const CODE_CHARS: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

fn is_code(c: char) -> bool {
    CODE_CHARS.contains(c)
}

/// Translate `alt`-prefixed colour codes into rendered form.
///
/// Only recognised code characters are translated, and the code character is
/// lower-cased. An `alt` that is not followed by a code is left as-is.
pub fn translate_codes(alt: char, text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == alt && i + 1 < chars.len() && is_code(chars[i + 1]) {
            out.push(CODE_CHAR);
            out.push(chars[i + 1].to_ascii_lowercase());
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Apply the standard `&` translation. Idempotent on already-rendered text.
pub fn normalize(text: &str) -> String {
    translate_codes(ALT_CODE_CHAR, text)
}

/// Remove rendered colour codes, leaving plain text.
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == CODE_CHAR {
            if let Some(&next) = chars.peek() {
                if is_code(next) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
