//! iCalendar text escaping utilities.

/// Escapes text for iCalendar TEXT values (RFC 5545 §3.3.11).
///
/// Escapes backslash, comma, semicolon, and newlines. Bare CRs are
/// dropped so CRLF sequences collapse to a single `\n`.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }
    result
}

/// Escapes a parameter value if needed.
///
/// Returns the value quoted if it contains special characters, with
/// caret encoding (RFC 6868) for characters quotes cannot carry.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    if !needs_quoting(s) {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 10);
    result.push('"');
    for c in s.chars() {
        match c {
            '^' => result.push_str("^^"),
            '\n' => result.push_str("^n"),
            '"' => result.push_str("^'"),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

fn needs_quoting(s: &str) -> bool {
    s.chars().any(|c| matches!(c, ':' | ';' | ',' | '"' | '\n'))
}
