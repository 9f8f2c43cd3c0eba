//! XML escaping helpers shared by the comment renderer and the serializer.

use std::borrow::Cow;

/// Escape for element content. Only `& < >` need escaping there.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape for attribute values.
///
/// Escapes: `& < > " '`
pub fn escape_attr(s: &str) -> String {
    escape_text(s)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Coerce a command or tag name into a usable XML element name.
///
/// Characters outside `[A-Za-z0-9_.-]` become `_`, and a name that would start
/// with a digit, `-` or `.` gets a `_` prefix. Empty names yield `None`.
pub fn element_name(name: &str) -> Option<Cow<'_, str>> {
    if name.is_empty() {
        return None;
    }
    let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    let valid_start = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && name.chars().all(valid_char) {
        return Some(Cow::Borrowed(name));
    }

    let mut out = String::with_capacity(name.len() + 1);
    if !valid_start {
        out.push('_');
    }
    out.extend(name.chars().map(|c| if valid_char(c) { c } else { '_' }));
    Some(Cow::Owned(out))
}
