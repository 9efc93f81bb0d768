//! Tokens of the path query language used to select values from a tree,
//! such as `$.servers[0].ip` or `$..name`.
//!
//! Strings and numbers follow the same rules, and produce the same error
//! messages, as in documents.

use crate::key::is_bare_char;
use crate::literal::{scan_number, scan_string, NumberKind};
use crate::scanner::{Position, Scanner};

/// The kind of a query token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTokenKind {
    /// `.`
    Dot,
    /// `..`, recursive descent.
    DotDot,
    /// `$`, the root.
    Dollar,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `?`
    Question,
    /// `*`
    Star,
    /// `:`, separating slice bounds.
    Colon,
    /// `,`, separating union members.
    Comma,
    /// A bare name.
    Key,
    /// A quoted name, with escapes evaluated.
    String,
    /// An integer literal.
    Integer,
    /// A float literal.
    Float,
    /// The end of the query.
    Eof,
    /// A lexing error; the text holds the message.
    Error,
}

/// A lexed query token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
    /// The position of the first character of the token.
    pub position: Position,
    /// What the token is.
    pub kind: QueryTokenKind,
    /// The decoded text of the token.
    pub text: String,
}

/// Returns the tokens of a query.
pub fn tokens(query: &str) -> QueryLexer<'_> {
    QueryLexer::new(query)
}

/// A lexer over a query. Like the document lexer, it ends with exactly one
/// `Eof` or one `Error` token.
#[derive(Debug)]
pub struct QueryLexer<'a> {
    scanner: Scanner<'a>,
    done: bool,
}

impl<'a> QueryLexer<'a> {
    /// Creates a lexer over a query.
    pub fn new(query: &'a str) -> QueryLexer<'a> {
        QueryLexer {
            scanner: Scanner::new(query.as_bytes()),
            done: false,
        }
    }

    fn emit(&mut self, kind: QueryTokenKind) -> QueryToken {
        let (text, position) = self.scanner.take();
        QueryToken {
            position,
            kind,
            text: text.to_owned(),
        }
    }

    fn punct(&mut self, kind: QueryTokenKind, len: usize) -> QueryToken {
        self.scanner.advance_by(len);
        self.emit(kind)
    }

    fn error(&mut self, message: String) -> QueryToken {
        self.done = true;
        QueryToken {
            position: self.scanner.start_position(),
            kind: QueryTokenKind::Error,
            text: message,
        }
    }

    fn lex(&mut self) -> QueryToken {
        use self::QueryTokenKind::*;

        self.scanner.advance_while(char::is_whitespace);
        self.scanner.ignore();
        let ch = match self.scanner.peek() {
            Some(ch) => ch,
            None => {
                self.done = true;
                return self.emit(Eof);
            }
        };
        match ch {
            '$' => self.punct(Dollar, 1),
            '.' if self.scanner.starts_with("..") => self.punct(DotDot, 2),
            '.' => self.punct(Dot, 1),
            '[' => self.punct(LeftBracket, 1),
            ']' => self.punct(RightBracket, 1),
            '(' => self.punct(LeftParen, 1),
            ')' => self.punct(RightParen, 1),
            '?' => self.punct(Question, 1),
            '*' => self.punct(Star, 1),
            ':' => self.punct(Colon, 1),
            ',' => self.punct(Comma, 1),
            '"' | '\'' => match scan_string(&mut self.scanner) {
                Ok(text) => {
                    let (_, position) = self.scanner.take();
                    QueryToken {
                        position,
                        kind: String,
                        text,
                    }
                }
                Err(message) => self.error(message),
            },
            '+' | '-' | '0'..='9' => match scan_number(&mut self.scanner) {
                Ok(NumberKind::Integer) => self.emit(Integer),
                Ok(NumberKind::Float) => self.emit(Float),
                Err(message) => self.error(message),
            },
            ch if is_bare_char(ch) => {
                self.scanner.advance_while(is_bare_char);
                self.emit(Key)
            }
            ch => self.error(format!("unexpected character '{}'", ch)),
        }
    }
}

impl<'a> Iterator for QueryLexer<'a> {
    type Item = QueryToken;

    fn next(&mut self) -> Option<QueryToken> {
        if self.done {
            return None;
        }
        let token = self.lex();
        trace!("{:?}", token);
        Some(token)
    }
}
