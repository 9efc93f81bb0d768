use std::char;

/// Escapes a string as a quoted TOML basic string.
pub fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for ch in text.chars() {
        match ch {
            '\u{8}' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\u{c}' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            ch if is_control(ch) => escaped.push_str(&format!("\\u{:04X}", ch as u32)),
            other => escaped.push(other),
        }
    }
    escaped.push('"');
    escaped
}

/// Characters that may not appear unescaped in a string.
pub fn is_control(ch: char) -> bool {
    (ch < ' ' && ch != '\t') || ch == '\u{7f}'
}

/// Evaluates the escape sequences of a basic string body (without quotes).
///
/// In multi-line strings a backslash at the end of a line removes the line
/// break and all whitespace up to the next non-whitespace character.
pub fn unescape(raw: &str, multiline: bool) -> Result<String, String> {
    let mut string = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            string.push(ch);
            continue;
        }
        match chars.next() {
            Some('b') => string.push('\u{8}'),
            Some('t') => string.push('\t'),
            Some('n') => string.push('\n'),
            Some('f') => string.push('\u{c}'),
            Some('r') => string.push('\r'),
            Some('"') => string.push('"'),
            Some('\\') => string.push('\\'),
            Some(c @ 'u') | Some(c @ 'U') => {
                let len = if c == 'u' { 4 } else { 8 };
                let mut hex = String::with_capacity(len);
                for _ in 0..len {
                    match chars.peek() {
                        Some(&h) if h.is_ascii_hexdigit() => {
                            hex.push(h);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = if hex.len() == len {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(unicode) => {
                        trace!("Escaped unicode \\{}{} => {:?}", c, hex, unicode);
                        string.push(unicode);
                    }
                    None => return Err(format!("invalid unicode escape: \\{}{}", c, hex)),
                }
            }
            Some(c) if multiline && (c == ' ' || c == '\t' || c == '\r' || c == '\n') => {
                let mut saw_newline = c == '\n';
                while let Some(&next) = chars.peek() {
                    match next {
                        ' ' | '\t' | '\r' => {}
                        '\n' => saw_newline = true,
                        _ => break,
                    }
                    chars.next();
                }
                if !saw_newline {
                    return Err(format!("invalid escape sequence: \\{}", c));
                }
            }
            Some(c) => return Err(format!("invalid escape sequence: \\{}", c)),
            None => return Err("invalid escape sequence: \\".to_owned()),
        }
    }
    Ok(string)
}
