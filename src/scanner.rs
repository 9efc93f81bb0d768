use std::fmt;
use std::str;

/// A 0-based line/column pair. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 0-based line index.
    pub line: usize,
    /// 0-based character index within the line.
    pub col: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, col: usize) -> Position {
        Position { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.col + 1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Mark {
    offset: usize,
    line: usize,
    col: usize,
}

impl Mark {
    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }
}

/// A character cursor over a document.
///
/// The scanner keeps two marks: the start of the pending token text and the
/// current read position. Lexers advance the current mark and then `take` the
/// pending slice as token text.
#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    text: &'a str,
    malformed: bool,
    cur: Mark,
    start: Mark,
    prev: Option<Mark>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over raw bytes. Reading stops at the first invalid
    /// UTF-8 sequence, which is reported through `is_malformed`.
    pub fn new(input: &'a [u8]) -> Scanner<'a> {
        let (text, malformed) = match str::from_utf8(input) {
            Ok(text) => (text, false),
            Err(err) => {
                let valid = str::from_utf8(&input[..err.valid_up_to()]).unwrap_or("");
                (valid, true)
            }
        };
        Scanner {
            text,
            malformed,
            cur: Mark::default(),
            start: Mark::default(),
            prev: None,
        }
    }

    /// Whether the input contained bytes that are not valid UTF-8.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    /// Whether the scanner stopped in front of an invalid UTF-8 sequence.
    pub fn at_malformed_tail(&self) -> bool {
        self.is_malformed() && self.cur.offset == self.text.len()
    }

    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.cur.offset..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    #[inline]
    pub fn peek_is(&self, ch: char) -> bool {
        self.peek() == Some(ch)
    }

    #[inline]
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Consumes one character, updating line and column.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.prev = Some(self.cur);
        self.cur.offset += ch.len_utf8();
        if ch == '\n' {
            self.cur.line += 1;
            self.cur.col = 0;
        } else {
            self.cur.col += 1;
        }
        Some(ch)
    }

    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consumes characters as long as `accept` holds.
    pub fn advance_while<F: Fn(char) -> bool>(&mut self, accept: F) {
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Steps back over the last consumed character. Only one step is remembered.
    pub fn backup(&mut self) {
        if let Some(prev) = self.prev.take() {
            self.cur = prev;
        }
    }

    /// Drops the pending text.
    pub fn ignore(&mut self) {
        self.start = self.cur;
        self.prev = None;
    }

    /// The text consumed since the last `ignore` or `take`.
    pub fn pending(&self) -> &'a str {
        &self.text[self.start.offset..self.cur.offset]
    }

    /// Returns the pending text with its start position and starts a new token.
    pub fn take(&mut self) -> (&'a str, Position) {
        let taken = (self.pending(), self.start.position());
        self.ignore();
        taken
    }

    pub fn start_position(&self) -> Position {
        self.start.position()
    }

    pub fn position(&self) -> Position {
        self.cur.position()
    }
}
