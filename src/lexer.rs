use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::literal::{scan_number, scan_string, NumberKind};
use crate::scanner::{Position, Scanner};
use crate::utils::is_control;

#[cfg(test)]
mod test;

/// Offset date-times, local date-times, local dates and local times, anchored
/// at the start of a value.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[0-9]{4}-[0-9]{2}-[0-9]{2}(?:[Tt ][0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:[Zz]|[+-][0-9]{2}:[0-9]{2})?)?|[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?)",
    )
    .expect("date pattern compiles")
});

const LONE_CARRIAGE_RETURN: &str = "expected a newline, found '\\r'";

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `[` opening a table header or an array.
    LeftBracket,
    /// `]` closing a table header or an array.
    RightBracket,
    /// `[[` opening an array-of-tables header.
    DoubleLeftBracket,
    /// `]]` closing an array-of-tables header.
    DoubleRightBracket,
    /// `{` opening an inline table.
    LeftCurlyBrace,
    /// `}` closing an inline table.
    RightCurlyBrace,
    /// The raw path text of a `[table]` header.
    KeyGroup,
    /// The raw path text of a `[[table]]` header.
    KeyGroupArray,
    /// The raw text of a key, possibly dotted and quoted.
    Key,
    /// `=`
    Equal,
    /// A string value, with escapes evaluated.
    String,
    /// An integer literal.
    Integer,
    /// A float literal.
    Float,
    /// `true`
    True,
    /// `false`
    False,
    /// A date, time or date-time literal.
    Date,
    /// `,`
    Comma,
    /// The end of the input.
    Eof,
    /// A lexing error; the text holds the message.
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::TokenKind::*;
        f.write_str(match *self {
            LeftBracket => "'['",
            RightBracket => "']'",
            DoubleLeftBracket => "'[['",
            DoubleRightBracket => "']]'",
            LeftCurlyBrace => "'{'",
            RightCurlyBrace => "'}'",
            KeyGroup => "table name",
            KeyGroupArray => "array of tables name",
            Key => "key",
            Equal => "'='",
            String => "string",
            Integer => "integer",
            Float => "float",
            True => "'true'",
            False => "'false'",
            Date => "date",
            Comma => "','",
            Eof => "end of input",
            Error => "error",
        })
    }
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// The decoded text of the token.
    pub text: String,
    /// The position of the first character of the token.
    pub position: Position,
}

impl Token {
    /// A short description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Key | TokenKind::KeyGroup | TokenKind::KeyGroupArray => {
                format!("{} '{}'", self.kind, self.text)
            }
            TokenKind::Integer | TokenKind::Float | TokenKind::Date => {
                format!("{} {}", self.kind, self.text)
            }
            TokenKind::String => format!("string {:?}", self.text),
            _ => self.kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Statement,
    KeyGroup { array: bool },
    CloseKeyGroup { array: bool },
    Key,
    Equal,
    Rvalue,
    InArray,
    InInlineTable,
    EndOfStatement,
    Done,
}

/// An open value container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Array,
    InlineTable,
}

/// Returns the tokens of a document.
pub fn tokens(input: &[u8]) -> Lexer<'_> {
    Lexer::new(input)
}

/// A lexer over a TOML document.
///
/// Tokens are produced on demand. The stream ends with exactly one `Eof`
/// token, or with exactly one `Error` token if the input is malformed.
#[derive(Debug)]
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    state: State,
    containers: Vec<Container>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over raw bytes.
    pub fn new(input: &'a [u8]) -> Lexer<'a> {
        Lexer {
            scanner: Scanner::new(input),
            state: State::Statement,
            containers: Vec::new(),
        }
    }

    fn emit(&mut self, kind: TokenKind) -> Option<Token> {
        let (text, position) = self.scanner.take();
        Some(Token {
            kind,
            text: text.to_owned(),
            position,
        })
    }

    fn emit_text(&mut self, kind: TokenKind, text: String) -> Option<Token> {
        let (_, position) = self.scanner.take();
        Some(Token {
            kind,
            text,
            position,
        })
    }

    /// Emits an error at the start of the pending token and ends the stream.
    fn error<S: Into<String>>(&mut self, message: S) -> Option<Token> {
        self.state = State::Done;
        let (message, position) = if self.scanner.at_malformed_tail() {
            ("invalid UTF-8 byte sequence".to_owned(), self.scanner.position())
        } else {
            (message.into(), self.scanner.start_position())
        };
        Some(Token {
            kind: TokenKind::Error,
            text: message,
            position,
        })
    }

    /// Emits an error at the current character.
    fn error_here<S: Into<String>>(&mut self, message: S) -> Option<Token> {
        self.scanner.ignore();
        self.error(message)
    }

    fn skip_spaces(&mut self) {
        self.scanner.advance_while(|c| c == ' ' || c == '\t');
    }

    /// Skips a comment up to the line break. Stops at a control character and
    /// returns the error for it.
    fn skip_comment(&mut self) -> Result<(), String> {
        if !self.scanner.peek_is('#') {
            return Ok(());
        }
        loop {
            match self.scanner.peek() {
                None | Some('\n') => return Ok(()),
                Some('\r') if self.scanner.peek_nth(1) == Some('\n') => return Ok(()),
                Some(ch) if is_control(ch) => {
                    return Err(format!("control character U+{:04X} in comment", ch as u32))
                }
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
    }

    /// Skips whitespace, line breaks and comments. A `\r` only counts as part
    /// of a `\r\n` pair.
    fn skip_blank(&mut self) -> Result<(), String> {
        loop {
            self.scanner
                .advance_while(|c| c == ' ' || c == '\t' || c == '\n');
            if self.scanner.starts_with("\r\n") {
                self.scanner.advance_by(2);
            } else if self.scanner.peek_is('#') {
                self.skip_comment()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Moves to the state that follows a complete value.
    fn after_value(&mut self) {
        self.state = match self.containers.last() {
            None => State::EndOfStatement,
            Some(Container::Array) => State::InArray,
            Some(Container::InlineTable) => State::InInlineTable,
        };
    }

    /// Skips over a quoted key segment without decoding it.
    fn skip_quoted(&mut self) -> Result<(), &'static str> {
        let quote = self.scanner.advance();
        loop {
            match self.scanner.advance() {
                None | Some('\n') => return Err("unclosed string"),
                Some('\\') if quote == Some('"') => {
                    if let None | Some('\n') = self.scanner.advance() {
                        return Err("unclosed string");
                    }
                }
                ch if ch == quote => return Ok(()),
                _ => {}
            }
        }
    }

    fn lex_statement(&mut self) -> Option<Token> {
        if let Err(message) = self.skip_blank() {
            return self.error_here(message);
        }
        self.scanner.ignore();
        match self.scanner.peek() {
            None => {
                if self.scanner.at_malformed_tail() {
                    return self.error("invalid UTF-8 byte sequence");
                }
                self.state = State::Done;
                self.emit(TokenKind::Eof)
            }
            Some('[') => {
                if self.scanner.starts_with("[[") {
                    self.scanner.advance_by(2);
                    self.state = State::KeyGroup { array: true };
                    self.emit(TokenKind::DoubleLeftBracket)
                } else {
                    self.scanner.advance();
                    self.state = State::KeyGroup { array: false };
                    self.emit(TokenKind::LeftBracket)
                }
            }
            Some('=') => self.error("missing key before '='"),
            Some('\r') => self.error(LONE_CARRIAGE_RETURN),
            Some(ch @ ']') | Some(ch @ '{') | Some(ch @ '}') | Some(ch @ ',') => {
                self.error(format!("unexpected character '{}'", ch))
            }
            Some(_) => {
                self.state = State::Key;
                None
            }
        }
    }

    fn lex_key_group(&mut self, array: bool) -> Option<Token> {
        loop {
            match self.scanner.peek() {
                None | Some('\n') => return self.error("unclosed key group"),
                Some(']') => break,
                Some('"') | Some('\'') => {
                    if let Err(message) = self.skip_quoted() {
                        return self.error(message);
                    }
                }
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
        self.state = State::CloseKeyGroup { array };
        let kind = if array {
            TokenKind::KeyGroupArray
        } else {
            TokenKind::KeyGroup
        };
        self.emit(kind)
    }

    fn lex_close_key_group(&mut self, array: bool) -> Option<Token> {
        if array {
            if !self.scanner.starts_with("]]") {
                return self.error("unclosed key group");
            }
            self.scanner.advance_by(2);
            self.state = State::EndOfStatement;
            self.emit(TokenKind::DoubleRightBracket)
        } else {
            self.scanner.advance();
            self.state = State::EndOfStatement;
            self.emit(TokenKind::RightBracket)
        }
    }

    fn lex_key(&mut self) -> Option<Token> {
        loop {
            match self.scanner.peek() {
                None | Some('\n') | Some('#') => return self.error("key without value"),
                Some('=') => break,
                Some('"') | Some('\'') => {
                    if let Err(message) = self.skip_quoted() {
                        return self.error(message);
                    }
                }
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
        let (text, position) = self.scanner.take();
        self.state = State::Equal;
        Some(Token {
            kind: TokenKind::Key,
            text: text.trim_end().to_owned(),
            position,
        })
    }

    fn lex_equal(&mut self) -> Option<Token> {
        self.scanner.advance();
        self.state = State::Rvalue;
        self.emit(TokenKind::Equal)
    }

    fn lex_rvalue(&mut self) -> Option<Token> {
        self.skip_spaces();
        self.scanner.ignore();
        match self.scanner.peek() {
            Some('=') => self.error("cannot have multiple equals for the same key"),
            Some('\n') | Some('\r') | Some('#') => self.error("expected a value"),
            _ => self.lex_value(),
        }
    }

    /// Lexes one value at the current position.
    fn lex_value(&mut self) -> Option<Token> {
        self.scanner.ignore();
        let ch = match self.scanner.peek() {
            Some(ch) => ch,
            None => return self.error("expected a value"),
        };
        match ch {
            '"' | '\'' => match scan_string(&mut self.scanner) {
                Ok(text) => {
                    self.after_value();
                    self.emit_text(TokenKind::String, text)
                }
                Err(message) => self.error(message),
            },
            '[' => {
                self.scanner.advance();
                self.containers.push(Container::Array);
                self.state = State::InArray;
                self.emit(TokenKind::LeftBracket)
            }
            '{' => {
                self.scanner.advance();
                self.containers.push(Container::InlineTable);
                self.state = State::InInlineTable;
                self.emit(TokenKind::LeftCurlyBrace)
            }
            't' if self.scanner.starts_with("true") => {
                self.scanner.advance_by(4);
                self.after_value();
                self.emit(TokenKind::True)
            }
            'f' if self.scanner.starts_with("false") => {
                self.scanner.advance_by(5);
                self.after_value();
                self.emit(TokenKind::False)
            }
            _ => {
                if let Some(date) = DATE_PATTERN.find(self.scanner.rest()) {
                    self.scanner.advance_by(date.end());
                    self.after_value();
                    return self.emit(TokenKind::Date);
                }
                let number_start = ch.is_ascii_digit()
                    || ch == '+'
                    || ch == '-'
                    || self.scanner.starts_with("inf")
                    || self.scanner.starts_with("nan");
                if number_start {
                    return match scan_number(&mut self.scanner) {
                        Ok(NumberKind::Integer) => {
                            self.after_value();
                            self.emit(TokenKind::Integer)
                        }
                        Ok(NumberKind::Float) => {
                            self.after_value();
                            self.emit(TokenKind::Float)
                        }
                        Err(message) => self.error(message),
                    };
                }
                self.error(format!("no value can start with {}", ch))
            }
        }
    }

    fn lex_in_array(&mut self) -> Option<Token> {
        if let Err(message) = self.skip_blank() {
            return self.error_here(message);
        }
        self.scanner.ignore();
        match self.scanner.peek() {
            None => self.error("unclosed array"),
            Some('\r') => self.error(LONE_CARRIAGE_RETURN),
            Some(']') => {
                self.scanner.advance();
                self.containers.pop();
                self.after_value();
                self.emit(TokenKind::RightBracket)
            }
            Some(',') => {
                self.scanner.advance();
                self.emit(TokenKind::Comma)
            }
            Some(_) => self.lex_value(),
        }
    }

    fn lex_in_inline_table(&mut self) -> Option<Token> {
        self.skip_spaces();
        self.scanner.ignore();
        match self.scanner.peek() {
            None => self.error("unclosed inline table"),
            Some('\n') | Some('\r') | Some('#') => {
                self.error("inline table cannot span multiple lines")
            }
            Some('}') => {
                self.scanner.advance();
                self.containers.pop();
                self.after_value();
                self.emit(TokenKind::RightCurlyBrace)
            }
            Some(',') => {
                self.scanner.advance();
                self.emit(TokenKind::Comma)
            }
            Some('=') => self.error("missing key before '='"),
            Some(_) => {
                self.state = State::Key;
                None
            }
        }
    }

    fn lex_end_of_statement(&mut self) -> Option<Token> {
        self.skip_spaces();
        if let Err(message) = self.skip_comment() {
            return self.error_here(message);
        }
        match self.scanner.peek() {
            None | Some('\n') => {
                self.state = State::Statement;
                None
            }
            Some('\r') => {
                self.scanner.advance();
                if self.scanner.peek_is('\n') {
                    self.state = State::Statement;
                    return None;
                }
                self.scanner.backup();
                self.error_here(LONE_CARRIAGE_RETURN)
            }
            Some(ch) => self.error_here(format!("expected a newline, found '{}'", ch)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let token = match self.state {
                State::Done => return None,
                State::Statement => self.lex_statement(),
                State::KeyGroup { array } => self.lex_key_group(array),
                State::CloseKeyGroup { array } => self.lex_close_key_group(array),
                State::Key => self.lex_key(),
                State::Equal => self.lex_equal(),
                State::Rvalue => self.lex_rvalue(),
                State::InArray => self.lex_in_array(),
                State::InInlineTable => self.lex_in_inline_table(),
                State::EndOfStatement => self.lex_end_of_statement(),
            };
            if let Some(token) = token {
                trace!("{:?}", token);
                return Some(token);
            }
        }
    }
}
