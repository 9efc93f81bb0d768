//! Dotted key paths.
//! `key = "something"`
//! `[ key. "other key" . 'third-key' ]`

use crate::utils::{escape_string, unescape};

/// Whether a character may appear in a bare (unquoted) key.
pub fn is_bare_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Whether the key can be written without quotes.
pub fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_bare_char)
}

/// Writes a key, quoting it when it cannot be written bare.
pub fn write_key(key: &str, out: &mut String) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        out.push_str(&escape_string(key));
    }
}

/// Joins key segments into a dotted path, quoting segments where needed.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            path.push('.');
        }
        write_key(segment.as_ref(), &mut path);
    }
    path
}

/// Splits the text of a key or table header into its segments.
///
/// Segments are bare keys, basic strings or literal strings, separated by dots
/// with optional whitespace around them. Quoted segments are unescaped.
pub fn split_key(text: &str) -> Result<Vec<String>, String> {
    let mut segments = Vec::new();
    let mut chars = text.chars().peekable();
    loop {
        while let Some(' ') | Some('\t') = chars.peek() {
            chars.next();
        }
        match chars.next() {
            None if segments.is_empty() => return Err("empty key".to_owned()),
            None => return Err("key cannot end with a dot".to_owned()),
            Some('"') => {
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        None => return Err("unclosed string".to_owned()),
                        Some('"') => break,
                        Some('\\') => {
                            raw.push('\\');
                            if let Some(escaped) = chars.next() {
                                raw.push(escaped);
                            }
                        }
                        Some(ch) => raw.push(ch),
                    }
                }
                segments.push(unescape(&raw, false)?);
            }
            Some('\'') => {
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        None => return Err("unclosed string".to_owned()),
                        Some('\'') => break,
                        Some(ch) => raw.push(ch),
                    }
                }
                segments.push(raw);
            }
            Some(ch) if is_bare_char(ch) => {
                let mut bare = ch.to_string();
                while let Some(&next) = chars.peek() {
                    if !is_bare_char(next) {
                        break;
                    }
                    bare.push(next);
                    chars.next();
                }
                segments.push(bare);
            }
            Some(ch) => return Err(format!("invalid character '{}' in key", ch)),
        }
        while let Some(' ') | Some('\t') = chars.peek() {
            chars.next();
        }
        match chars.next() {
            None => return Ok(segments),
            Some('.') => {}
            Some(ch) => return Err(format!("invalid character '{}' in key", ch)),
        }
    }
}
