//! Functions to help visualize errors

use crate::errors::Error;
use crate::scanner::Position;

/// Returns the source line at a position, with a caret under its column on
/// the line below.
pub fn excerpt(source: &str, position: Position) -> String {
    let line = source.lines().nth(position.line).unwrap_or("");
    let mut out = String::with_capacity(2 * line.len() + 2);
    out.push_str(line);
    out.push('\n');
    let mut width = 0;
    for ch in line.chars().take(position.col) {
        // Keep tabs so the caret lines up in a terminal.
        out.push(if ch == '\t' { '\t' } else { ' ' });
        width += 1;
    }
    for _ in width..position.col {
        out.push(' ');
    }
    out.push('^');
    out
}

/// Renders an error followed by an excerpt of the source it points at.
/// Errors without a position are rendered as their message only.
pub fn show_error(source: &str, error: &Error) -> String {
    match error.position() {
        Some(position) => format!("{}\n{}", error, excerpt(source, position)),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn caret_under_column() {
        assert_eq!(excerpt("a = 1\n\tb = 2.", Position::new(1, 5)), "\tb = 2.\n\t    ^");
        assert_eq!(excerpt("x", Position::new(3, 2)), "\n  ^");
    }

    #[test]
    fn shows_parse_errors() {
        let source = "foo = 42.";
        let err = parse(source).unwrap_err();
        assert_eq!(
            show_error(source, &err),
            "float cannot end with a dot at line 1, column 7 (last key parsed: 'foo')\n\
             foo = 42.\n      ^"
        );
    }
}
