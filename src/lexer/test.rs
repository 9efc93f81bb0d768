use pretty_assertions::assert_eq;

use super::*;
use super::TokenKind::*;

fn lex(input: &[u8]) -> Vec<(TokenKind, std::string::String, usize, usize)> {
    tokens(input)
        .map(|t| (t.kind, t.text, t.position.line, t.position.col))
        .collect()
}

fn check(input: &str, expected: &[(TokenKind, &str, usize, usize)]) {
    let expected: Vec<_> = expected
        .iter()
        .map(|&(kind, text, line, col)| (kind, text.to_owned(), line, col))
        .collect();
    assert_eq!(lex(input.as_bytes()), expected, "input: {:?}", input);
}

fn check_error(input: &str, message: &str, line: usize, col: usize) {
    let tokens = lex(input.as_bytes());
    let last = tokens.last().cloned().unwrap();
    assert_eq!(last, (Error, message.to_owned(), line, col), "tokens: {:#?}", tokens);
    assert_eq!(tokens.iter().filter(|t| t.0 == Error || t.0 == Eof).count(), 1);
}

#[test]
fn key_group() {
    check(
        "[hello world]",
        &[
            (LeftBracket, "[", 0, 0),
            (KeyGroup, "hello world", 0, 1),
            (RightBracket, "]", 0, 12),
            (Eof, "", 0, 13),
        ],
    );
}

#[test]
fn key_group_array() {
    check(
        "[[a.b]]\nc = \"x\"",
        &[
            (DoubleLeftBracket, "[[", 0, 0),
            (KeyGroupArray, "a.b", 0, 2),
            (DoubleRightBracket, "]]", 0, 5),
            (Key, "c", 1, 0),
            (Equal, "=", 1, 2),
            (String, "x", 1, 4),
            (Eof, "", 1, 7),
        ],
    );
}

#[test]
fn quoted_brackets_in_key_group() {
    check(
        "[\"a]b\"]",
        &[
            (LeftBracket, "[", 0, 0),
            (KeyGroup, "\"a]b\"", 0, 1),
            (RightBracket, "]", 0, 6),
            (Eof, "", 0, 7),
        ],
    );
}

#[test]
fn comments_are_skipped() {
    check(
        "# comment\n\n  key = 1 # trailing\n",
        &[
            (Key, "key", 2, 2),
            (Equal, "=", 2, 6),
            (Integer, "1", 2, 8),
            (Eof, "", 3, 0),
        ],
    );
}

#[test]
fn nested_empty_arrays() {
    check(
        "foo = [[[]]]",
        &[
            (Key, "foo", 0, 0),
            (Equal, "=", 0, 4),
            (LeftBracket, "[", 0, 6),
            (LeftBracket, "[", 0, 7),
            (LeftBracket, "[", 0, 8),
            (RightBracket, "]", 0, 9),
            (RightBracket, "]", 0, 10),
            (RightBracket, "]", 0, 11),
            (Eof, "", 0, 12),
        ],
    );
}

#[test]
fn multiline_array_with_comments() {
    check(
        "a = [\n  1, # one\n  2,\n] # done\nb = true",
        &[
            (Key, "a", 0, 0),
            (Equal, "=", 0, 2),
            (LeftBracket, "[", 0, 4),
            (Integer, "1", 1, 2),
            (Comma, ",", 1, 3),
            (Integer, "2", 2, 2),
            (Comma, ",", 2, 3),
            (RightBracket, "]", 3, 0),
            (Key, "b", 4, 0),
            (Equal, "=", 4, 2),
            (True, "true", 4, 4),
            (Eof, "", 4, 8),
        ],
    );
}

#[test]
fn inline_table() {
    check(
        "p = { x = 1, y = false }",
        &[
            (Key, "p", 0, 0),
            (Equal, "=", 0, 2),
            (LeftCurlyBrace, "{", 0, 4),
            (Key, "x", 0, 6),
            (Equal, "=", 0, 8),
            (Integer, "1", 0, 10),
            (Comma, ",", 0, 11),
            (Key, "y", 0, 13),
            (Equal, "=", 0, 15),
            (False, "false", 0, 17),
            (RightCurlyBrace, "}", 0, 23),
            (Eof, "", 0, 24),
        ],
    );
}

#[test]
fn dates() {
    check(
        "d = 1979-05-27T07:32:00Z\nt = 07:32:00\nl = 1979-05-27 # day",
        &[
            (Key, "d", 0, 0),
            (Equal, "=", 0, 2),
            (Date, "1979-05-27T07:32:00Z", 0, 4),
            (Key, "t", 1, 0),
            (Equal, "=", 1, 2),
            (Date, "07:32:00", 1, 4),
            (Key, "l", 2, 0),
            (Equal, "=", 2, 2),
            (Date, "1979-05-27", 2, 4),
            (Eof, "", 2, 20),
        ],
    );
}

#[test]
fn strings_are_decoded() {
    check(
        "s = \"\\u00E9\\t\"\nr = 'C:\\x'",
        &[
            (Key, "s", 0, 0),
            (Equal, "=", 0, 2),
            (String, "é\t", 0, 4),
            (Key, "r", 1, 0),
            (Equal, "=", 1, 2),
            (String, "C:\\x", 1, 4),
            (Eof, "", 1, 10),
        ],
    );
}

#[test]
fn quoted_and_dotted_keys() {
    check(
        "\"a b\".c = 1",
        &[
            (Key, "\"a b\".c", 0, 0),
            (Equal, "=", 0, 8),
            (Integer, "1", 0, 10),
            (Eof, "", 0, 11),
        ],
    );
}

#[test]
fn lexing_errors() {
    check_error("foo = 42.", "float cannot end with a dot", 0, 6);
    check_error("a = 1.2.3", "cannot have two dots in one float", 0, 4);
    check_error("a == 1", "cannot have multiple equals for the same key", 0, 3);
    check_error("[abc\nd = 1", "unclosed key group", 0, 1);
    check_error("[[abc]\n", "unclosed key group", 0, 5);
    check_error("a = \"abc", "unclosed string", 0, 4);
    check_error("a = \"\\q\"", "invalid escape sequence: \\q", 0, 4);
    check_error("a = [1, 2", "unclosed array", 0, 9);
    check_error("a = 1 b = 2", "expected a newline, found 'b'", 0, 6);
    check_error("a = {x = 1,\n}", "inline table cannot span multiple lines", 0, 11);
    check_error("a\nb = 1", "key without value", 0, 0);
    check_error("a = @", "no value can start with @", 0, 4);
}

#[test]
fn no_tokens_after_error() {
    let tokens = lex(b"a = 1.\nb = 2");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[2].0, Error);
}

#[test]
fn invalid_utf8() {
    let tokens = lex(b"a = \"\xff\"");
    assert_eq!(
        tokens.last().cloned().unwrap(),
        (Error, "invalid UTF-8 byte sequence".to_owned(), 0, 5)
    );
}

#[test]
fn positions_never_decrease() {
    let input = "a = 1\n[t]\nb = [1, [2, 3], {x = 'y'}]\n[[arr]]\nc.d = 1979-05-27\n";
    let tokens: Vec<Token> = tokens(input.as_bytes()).collect();
    for pair in tokens.windows(2) {
        assert!(pair[0].position <= pair[1].position, "{:?}", pair);
    }
    assert_eq!(tokens.last().map(|t| t.kind), Some(Eof));
}

#[test]
fn carriage_returns() {
    check(
        "a = 1\r\nb = 2\r\n",
        &[
            (Key, "a", 0, 0),
            (Equal, "=", 0, 2),
            (Integer, "1", 0, 4),
            (Key, "b", 1, 0),
            (Equal, "=", 1, 2),
            (Integer, "2", 1, 4),
            (Eof, "", 2, 0),
        ],
    );
    check_error("a = 1\rb = 2", "expected a newline, found '\\r'", 0, 5);
    check_error("a = 1\n\rb = 2", "expected a newline, found '\\r'", 1, 0);
    check_error("a = [1,\r2]", "expected a newline, found '\\r'", 0, 7);
    check_error("a = \"\"\"x\ry\"\"\"", "control character U+000D in string", 0, 4);
    check(
        "# note\r\na = 1 # done\r\n",
        &[
            (Key, "a", 1, 0),
            (Equal, "=", 1, 2),
            (Integer, "1", 1, 4),
            (Eof, "", 2, 0),
        ],
    );
}

#[test]
fn control_characters_in_comments() {
    check_error("a = 1 # \u{1}", "control character U+0001 in comment", 0, 8);
    check_error("# \u{7f}\na = 1", "control character U+007F in comment", 0, 2);
    check_error("a = [1, # x\r]", "control character U+000D in comment", 0, 11);
    check(
        "a = 1 #\tfine\n",
        &[(Key, "a", 0, 0), (Equal, "=", 0, 2), (Integer, "1", 0, 4), (Eof, "", 1, 0)],
    );
}
