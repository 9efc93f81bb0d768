//! String and number scanning shared by the document and query lexers.

use crate::scanner::Scanner;
use crate::utils::{is_control, unescape};

pub(crate) const UNCLOSED_STRING: &str = "unclosed string";

/// The kind of a scanned number literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberKind {
    Integer,
    Float,
}

/// Scans an integer or float literal. The scanner must be at the first
/// character (sign or digit); the literal is left as pending text.
pub(crate) fn scan_number(scanner: &mut Scanner) -> Result<NumberKind, String> {
    let signed = matches!(scanner.peek(), Some('+') | Some('-'));
    if signed {
        scanner.advance();
    }
    if scanner.starts_with("inf") || scanner.starts_with("nan") {
        scanner.advance_by(3);
        return Ok(NumberKind::Float);
    }

    if !signed && scanner.peek_is('0') {
        let radix = match scanner.peek_nth(1) {
            Some('x') => Some(16),
            Some('o') => Some(8),
            Some('b') => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            scanner.advance_by(2);
            if scan_digits(scanner, radix)? == 0 {
                return Err(format!("no digits after '{}'", scanner.pending()));
            }
            return Ok(NumberKind::Integer);
        }
    }

    if scan_digits(scanner, 10)? == 0 {
        return Err(match scanner.peek() {
            Some(ch) => format!("invalid number: unexpected '{}'", ch),
            None => "invalid number: missing digits".to_owned(),
        });
    }

    let mut kind = NumberKind::Integer;
    if scanner.peek_is('.') {
        scanner.advance();
        kind = NumberKind::Float;
        if !scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
            return Err("float cannot end with a dot".to_owned());
        }
        scan_digits(scanner, 10)?;
        if scanner.peek_is('.') {
            return Err("cannot have two dots in one float".to_owned());
        }
    }

    if let Some('e') | Some('E') = scanner.peek() {
        scanner.advance();
        kind = NumberKind::Float;
        if let Some('+') | Some('-') = scanner.peek() {
            scanner.advance();
        }
        if scan_digits(scanner, 10)? == 0 {
            return Err("float exponent needs at least one digit".to_owned());
        }
        if scanner.peek_is('.') {
            return Err("float exponent cannot contain a dot".to_owned());
        }
    }
    Ok(kind)
}

/// Scans a run of digits in the given radix, allowing single underscores
/// between digits. Returns the number of digits read.
fn scan_digits(scanner: &mut Scanner, radix: u32) -> Result<usize, String> {
    let mut count = 0;
    let mut was_digit = false;
    while let Some(ch) = scanner.peek() {
        if ch.is_digit(radix) {
            count += 1;
            was_digit = true;
            scanner.advance();
        } else if ch == '_' {
            let next_is_digit = scanner.peek_nth(1).map_or(false, |c| c.is_digit(radix));
            if !was_digit || !next_is_digit {
                return Err("underscore must be between digits".to_owned());
            }
            was_digit = false;
            scanner.advance();
        } else {
            break;
        }
    }
    Ok(count)
}

/// Scans a quoted string of any of the four TOML kinds and returns its value.
/// The scanner must be at the opening quote.
pub(crate) fn scan_string(scanner: &mut Scanner) -> Result<String, String> {
    if scanner.starts_with("\"\"\"") {
        scanner.advance_by(3);
        let raw = scan_multiline(scanner, '"')?;
        unescape(&raw, true)
    } else if scanner.starts_with("'''") {
        scanner.advance_by(3);
        scan_multiline(scanner, '\'')
    } else if scanner.peek_is('"') {
        scanner.advance();
        let raw = scan_single_line(scanner, '"')?;
        unescape(&raw, false)
    } else {
        scanner.advance();
        scan_single_line(scanner, '\'')
    }
}

/// Reads a single-line string body up to the closing quote. Escapes are kept
/// verbatim for basic strings.
fn scan_single_line(scanner: &mut Scanner, quote: char) -> Result<String, String> {
    let mut raw = String::new();
    loop {
        match scanner.advance() {
            None | Some('\n') => return Err(UNCLOSED_STRING.to_owned()),
            Some(ch) if ch == quote => return Ok(raw),
            Some('\\') if quote == '"' => {
                raw.push('\\');
                match scanner.advance() {
                    None | Some('\n') => return Err(UNCLOSED_STRING.to_owned()),
                    Some(escaped) => raw.push(escaped),
                }
            }
            Some(ch) if is_control(ch) => return Err(control_error(ch)),
            Some(ch) => raw.push(ch),
        }
    }
}

/// Reads a multi-line string body up to the closing triple quote. A newline
/// directly after the opening quotes is trimmed, and up to two quotes in front
/// of the closing delimiter belong to the body.
fn scan_multiline(scanner: &mut Scanner, quote: char) -> Result<String, String> {
    if scanner.starts_with("\r\n") {
        scanner.advance_by(2);
    } else if scanner.peek_is('\n') {
        scanner.advance();
    }
    let mut raw = String::new();
    loop {
        match scanner.peek() {
            None => return Err(UNCLOSED_STRING.to_owned()),
            Some(ch) if ch == quote => {
                let mut run = 0;
                while scanner.peek_nth(run) == Some(quote) {
                    run += 1;
                }
                if run >= 3 {
                    if run > 5 {
                        return Err("too many quotes at the end of a multi-line string".to_owned());
                    }
                    raw.extend(std::iter::repeat(quote).take(run - 3));
                    scanner.advance_by(run);
                    return Ok(raw);
                }
                raw.extend(std::iter::repeat(quote).take(run));
                scanner.advance_by(run);
            }
            Some('\\') if quote == '"' => {
                scanner.advance();
                raw.push('\\');
                match scanner.advance() {
                    None => return Err(UNCLOSED_STRING.to_owned()),
                    Some(escaped) => raw.push(escaped),
                }
            }
            Some('\n') => {
                scanner.advance();
                raw.push('\n');
            }
            Some('\r') if scanner.peek_nth(1) == Some('\n') => {
                scanner.advance_by(2);
                raw.push_str("\r\n");
            }
            Some(ch) if is_control(ch) => return Err(control_error(ch)),
            Some(ch) => {
                scanner.advance();
                raw.push(ch);
            }
        }
    }
}

fn control_error(ch: char) -> String {
    format!("control character U+{:04X} in string", ch as u32)
}

#[cfg(test)]
mod test {
    use super::*;

    fn number(text: &str) -> Result<(NumberKind, String), String> {
        let mut scanner = Scanner::new(text.as_bytes());
        let kind = scan_number(&mut scanner)?;
        Ok((kind, scanner.pending().to_owned()))
    }

    fn string(text: &str) -> Result<String, String> {
        let mut scanner = Scanner::new(text.as_bytes());
        scan_string(&mut scanner)
    }

    #[test]
    fn numbers() {
        assert_eq!(number("42"), Ok((NumberKind::Integer, "42".to_owned())));
        assert_eq!(number("-1_000 "), Ok((NumberKind::Integer, "-1_000".to_owned())));
        assert_eq!(number("0xdead_beef"), Ok((NumberKind::Integer, "0xdead_beef".to_owned())));
        assert_eq!(number("+3.14,"), Ok((NumberKind::Float, "+3.14".to_owned())));
        assert_eq!(number("6.626e-34"), Ok((NumberKind::Float, "6.626e-34".to_owned())));
        assert_eq!(number("-inf"), Ok((NumberKind::Float, "-inf".to_owned())));
        assert_eq!(number("5E+22]"), Ok((NumberKind::Float, "5E+22".to_owned())));
    }

    #[test]
    fn malformed_numbers() {
        assert_eq!(number("42.").unwrap_err(), "float cannot end with a dot");
        assert_eq!(number("1.2.3").unwrap_err(), "cannot have two dots in one float");
        assert_eq!(number("1__2").unwrap_err(), "underscore must be between digits");
        assert_eq!(number("1_").unwrap_err(), "underscore must be between digits");
        assert_eq!(number("1e").unwrap_err(), "float exponent needs at least one digit");
        assert_eq!(number("0x").unwrap_err(), "no digits after '0x'");
    }

    #[test]
    fn strings() {
        assert_eq!(string(r#""a\tb" = 1"#).unwrap(), "a\tb");
        assert_eq!(string(r"'C:\Users'").unwrap(), r"C:\Users");
        assert_eq!(string("\"\"\"\nRoses\nViolets\"\"\"").unwrap(), "Roses\nViolets");
        assert_eq!(string("'''\nline '' quote'''").unwrap(), "line '' quote");
        assert_eq!(string("\"\"\"two \"\"quotes\"\"\"\"\"").unwrap(), "two \"\"quotes\"\"");
    }

    #[test]
    fn malformed_strings() {
        assert_eq!(string("\"abc").unwrap_err(), UNCLOSED_STRING);
        assert_eq!(string("\"abc\n\"").unwrap_err(), UNCLOSED_STRING);
        assert_eq!(string(r#""\x""#).unwrap_err(), "invalid escape sequence: \\x");
        assert_eq!(string("'a\u{1}'").unwrap_err(), "control character U+0001 in string");
        assert_eq!(string("\"\"\"x\ry\"\"\"").unwrap_err(), "control character U+000D in string");
        assert_eq!(string("'''x\r'''").unwrap_err(), "control character U+000D in string");
        assert_eq!(string("'''x\r\ny'''").unwrap(), "x\r\ny");
    }
}
