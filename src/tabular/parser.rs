//! Delimited-row parser
//!
//! Quote-aware splitting of a single line of delimiter-separated text.

const QUOTE: char = '"';

/// Split one line into trimmed field strings.
///
/// A delimiter inside a quoted field is kept as text. Inside a quoted field a
/// doubled quote (`""`) yields one literal quote. Every other quote toggles the
/// quoted state and is dropped.
pub fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;
    let mut escaped_quote = false;

    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == QUOTE {
            if escaped_quote {
                current.push(QUOTE);
                escaped_quote = false;
            } else if inside_quotes && chars.peek() == Some(&QUOTE) {
                escaped_quote = true;
            } else {
                inside_quotes = !inside_quotes;
            }
        } else if ch == delimiter && !inside_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Parse a line and align it to `width` fields.
///
/// Missing trailing fields become empty strings; extra fields are dropped.
pub fn parse_aligned(line: &str, delimiter: char, width: usize) -> Vec<String> {
    let mut fields = parse_line(line, delimiter);
    fields.resize(width, String::new());
    fields
}
