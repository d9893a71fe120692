//! Content line folding for iCalendar (RFC 5545 §3.1).

/// Maximum line length in octets (not including CRLF).
const MAX_LINE_OCTETS: usize = 75;

/// Folds a content line to comply with the 75-octet limit.
///
/// Lines are folded by inserting CRLF followed by a single space.
/// Break points never split a UTF-8 multi-byte sequence.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return format!("{line}\r\n");
    }

    let mut result = String::with_capacity(line.len() + (line.len() / MAX_LINE_OCTETS) * 3);
    let mut rest = line;
    let mut first = true;

    while !rest.is_empty() {
        // Continuation lines lose one octet to the leading space.
        let budget = if first {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1
        };

        if !first {
            result.push(' ');
        }

        if rest.len() <= budget {
            result.push_str(rest);
            result.push_str("\r\n");
            break;
        }

        let mut split = budget;
        while split > 0 && !rest.is_char_boundary(split) {
            split -= 1;
        }
        if split == 0 {
            // A single character wider than the budget; emit it whole.
            split = rest
                .char_indices()
                .nth(1)
                .map_or(rest.len(), |(idx, _)| idx);
        }

        let (head, tail) = rest.split_at(split);
        result.push_str(head);
        result.push_str("\r\n");
        rest = tail;
        first = false;
    }

    result
}
