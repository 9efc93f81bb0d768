//! Builds a `Tree` from the token stream of a document.
//!
//! The parser is a recursive descent over a `Peekable` lexer. The table that
//! receives new keys is tracked as a key path from the root and resolved on
//! every assignment, following the last table of arrays of tables.

use std::iter::Peekable;
use std::str::FromStr;

use crate::errors::{Error, ErrorKind, Result};
use crate::key::{join_path, split_key};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::scanner::Position;
use crate::table::Tree;
use crate::value::{Datetime, Value};


/// Settings that change what the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject arrays whose elements are of different kinds.
    pub strict_arrays: bool,
    /// The deepest allowed nesting of arrays and inline tables.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            strict_arrays: false,
            max_depth: 128,
        }
    }
}

/// Parses a document with the default options.
pub fn parse<B: AsRef<[u8]>>(input: B) -> Result<Tree> {
    parse_with(input, &ParseOptions::default())
}

/// Parses a document.
pub fn parse_with<B: AsRef<[u8]>>(input: B, options: &ParseOptions) -> Result<Tree> {
    let parser = Parser {
        tokens: Lexer::new(input.as_ref()).peekable(),
        options: *options,
        root: Tree::new(),
        current: Vec::new(),
        last_key: String::new(),
        last_position: Position::default(),
    };
    parser.parse_document()
}

/// How a path is walked when it passes through existing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// A `[header]` path: missing tables are implicit, and arrays of tables
    /// are entered through their last table.
    Header,
    /// A dotted key: missing tables are defined right away.
    Dotted,
}

struct Parser<'a> {
    tokens: Peekable<Lexer<'a>>,
    options: ParseOptions,
    root: Tree,
    current: Vec<String>,
    last_key: String,
    last_position: Position,
}

impl<'a> Parser<'a> {
    fn parse_document(mut self) -> Result<Tree> {
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::LeftBracket => self.parse_table_header(token)?,
                TokenKind::DoubleLeftBracket => self.parse_array_header(token)?,
                TokenKind::Key => self.parse_key_value(token)?,
                _ => return Err(self.unexpected("a key or a table header", &token)),
            }
        }
        debug!("Parsed document with {} top-level entries", self.root.len());
        Ok(self.root)
    }

    fn error<S: Into<String>>(&self, message: S, position: Position) -> Error {
        ErrorKind::Parse(message.into(), position, self.last_key.clone()).into()
    }

    fn unexpected(&self, expected: &str, found: &Token) -> Error {
        self.error(
            format!("expected {}, found {}", expected, found.describe()),
            found.position,
        )
    }

    /// Takes the next token, turning lexing errors into `ErrorKind::Lex`.
    fn next_token(&mut self) -> Result<Token> {
        match self.tokens.next() {
            Some(token) if token.kind == TokenKind::Error => {
                Err(ErrorKind::Lex(token.text, token.position, self.last_key.clone()).into())
            }
            Some(token) => {
                self.last_position = token.position;
                Ok(token)
            }
            None => Err(self.error("unexpected end of input", self.last_position)),
        }
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek().map(|token| token.kind)
    }

    fn peek_position(&mut self) -> Position {
        let last = self.last_position;
        self.tokens.peek().map_or(last, |token| token.position)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(&kind.to_string(), &token))
        }
    }

    fn split(&self, token: &Token) -> Result<Vec<String>> {
        split_key(&token.text).map_err(|message| self.error(message, token.position))
    }

    fn parse_table_header(&mut self, open: Token) -> Result<()> {
        let name = self.expect(TokenKind::KeyGroup)?;
        let path = self.split(&name)?;
        self.last_key = join_path(&path);
        self.expect(TokenKind::RightBracket)?;
        debug!("Table [{}] at {}", self.last_key, open.position);
        if let Err(message) = define_table(&mut self.root, &path, open.position) {
            return Err(self.error(message, open.position));
        }
        self.current = path;
        Ok(())
    }

    fn parse_array_header(&mut self, open: Token) -> Result<()> {
        let name = self.expect(TokenKind::KeyGroupArray)?;
        let path = self.split(&name)?;
        self.last_key = join_path(&path);
        self.expect(TokenKind::DoubleRightBracket)?;
        debug!("Array of tables [[{}]] at {}", self.last_key, open.position);
        if let Err(message) = define_array_table(&mut self.root, &path, open.position) {
            return Err(self.error(message, open.position));
        }
        self.current = path;
        Ok(())
    }

    fn parse_key_value(&mut self, key: Token) -> Result<()> {
        let path = self.split(&key)?;
        let full_path: Vec<&String> = self.current.iter().chain(&path).collect();
        self.last_key = join_path(&full_path);
        self.expect(TokenKind::Equal)?;
        let value = self.parse_value(0)?;

        let result = match self.root.table_at_mut(&self.current) {
            Some(table) => insert_dotted(table, &path, value, key.position),
            None => Err(format!("key '{}' is not a table", join_path(&self.current))),
        };
        result.map_err(|message| self.error(message, key.position))
    }

    fn check_depth(&self, depth: usize, position: Position) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(self.error(
                format!("maximum nesting depth of {} exceeded", self.options.max_depth),
                position,
            ));
        }
        Ok(())
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        let token = self.next_token()?;
        let position = token.position;
        match token.kind {
            TokenKind::String => Ok(Value::String(token.text)),
            TokenKind::Integer => parse_integer(&token.text)
                .map(Value::Integer)
                .map_err(|message| self.error(message, position)),
            TokenKind::Float => parse_float(&token.text)
                .map(Value::Float)
                .map_err(|message| self.error(message, position)),
            TokenKind::True => Ok(Value::Boolean(true)),
            TokenKind::False => Ok(Value::Boolean(false)),
            TokenKind::Date => Datetime::from_str(&token.text)
                .map(Value::Datetime)
                .map_err(|message| self.error(message, position)),
            TokenKind::LeftBracket => self.parse_array(position, depth + 1),
            TokenKind::LeftCurlyBrace => self.parse_inline_table(position, depth + 1),
            _ => Err(self.unexpected("a value", &token)),
        }
    }

    fn parse_array(&mut self, open: Position, depth: usize) -> Result<Value> {
        self.check_depth(depth, open)?;
        let mut values: Vec<Value> = Vec::new();
        loop {
            if self.peek_kind() == Some(TokenKind::RightBracket) {
                self.next_token()?;
                break;
            }
            let position = self.peek_position();
            let value = self.parse_value(depth)?;
            if self.options.strict_arrays {
                if let Some(first) = values.first() {
                    if !first.is_same_type(&value) {
                        return Err(self.error(
                            format!(
                                "mixed types in array: expected {}, found {}",
                                first.type_name(),
                                value.type_name()
                            ),
                            position,
                        ));
                    }
                }
            }
            values.push(value);

            let token = self.next_token()?;
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBracket => break,
                _ => return Err(self.unexpected("',' or ']'", &token)),
            }
        }
        Ok(Value::Array(values))
    }

    fn parse_inline_table(&mut self, open: Position, depth: usize) -> Result<Value> {
        self.check_depth(depth, open)?;
        let mut table = Tree::inline(open);
        if self.peek_kind() == Some(TokenKind::RightCurlyBrace) {
            self.next_token()?;
            return Ok(Value::Table(table));
        }
        loop {
            let key = self.expect(TokenKind::Key)?;
            let path = self.split(&key)?;
            self.expect(TokenKind::Equal)?;
            let value = self.parse_value(depth)?;
            if let Err(message) = insert_dotted(&mut table, &path, value, key.position) {
                return Err(self.error(message, key.position));
            }

            let token = self.next_token()?;
            match token.kind {
                TokenKind::Comma => {
                    if self.peek_kind() == Some(TokenKind::RightCurlyBrace) {
                        return Err(self.error("trailing comma in inline table", token.position));
                    }
                }
                TokenKind::RightCurlyBrace => break,
                _ => return Err(self.unexpected("',' or '}'", &token)),
            }
        }
        Ok(Value::Table(table))
    }
}

/// Moves from a table into the child table named by the last segment of
/// `path`, creating it if it is missing.
fn step_into<'t>(
    table: &'t mut Tree,
    path: &[String],
    position: Position,
    walk: Walk,
) -> std::result::Result<&'t mut Tree, String> {
    let segment = match path.last() {
        Some(segment) => segment,
        None => return Err("empty key".to_owned()),
    };
    if !table.contains_key(segment) {
        let child = match walk {
            Walk::Header => Tree::implicit(position),
            Walk::Dotted => Tree::defined(position),
        };
        table.insert_entry(segment.clone(), Value::Table(child), position);
    }
    match table.value_mut(segment) {
        Some(Value::Table(child)) if child.is_inline() => {
            Err(format!("cannot extend inline table '{}'", join_path(path)))
        }
        Some(Value::Table(child)) if walk == Walk::Dotted && child.is_from_header() => Err(format!(
            "cannot extend table '{}' with dotted keys",
            join_path(path)
        )),
        Some(Value::Table(child)) => Ok(child),
        Some(Value::ArrayOfTables(tables)) if walk == Walk::Header => match tables.last_mut() {
            Some(last) => Ok(last),
            None => Err(format!("key '{}' is not a table", join_path(path))),
        },
        Some(Value::Array(_)) => Err(format!("cannot extend static array '{}'", join_path(path))),
        _ => Err(format!("key '{}' is not a table", join_path(path))),
    }
}

/// Walks all but the last segment of a header path from the root.
fn walk_header<'t>(
    root: &'t mut Tree,
    path: &[String],
    position: Position,
) -> std::result::Result<&'t mut Tree, String> {
    let mut table = root;
    for end in 1..path.len() {
        table = step_into(table, &path[..end], position, Walk::Header)?;
    }
    Ok(table)
}

/// Handles `[a.b.c]`.
fn define_table(root: &mut Tree, path: &[String], position: Position) -> std::result::Result<(), String> {
    let table = walk_header(root, path, position)?;
    let last = match path.last() {
        Some(last) => last,
        None => return Err("empty key".to_owned()),
    };
    if !table.contains_key(last) {
        table.insert_entry(last.clone(), Value::Table(Tree::header(position)), position);
        return Ok(());
    }
    match table.value_mut(last) {
        Some(Value::Table(existing)) if existing.is_implicit() => {
            existing.declare(position);
            Ok(())
        }
        Some(Value::Table(_)) => Err(format!("duplicate table '{}'", join_path(path))),
        Some(Value::ArrayOfTables(_)) => Err(format!(
            "table '{}' is already an array of tables",
            join_path(path)
        )),
        _ => Err(format!("duplicate key '{}'", join_path(path))),
    }
}

/// Handles `[[a.b]]` by appending a new table.
fn define_array_table(root: &mut Tree, path: &[String], position: Position) -> std::result::Result<(), String> {
    let table = walk_header(root, path, position)?;
    let last = match path.last() {
        Some(last) => last,
        None => return Err("empty key".to_owned()),
    };
    if !table.contains_key(last) {
        let tables = vec![Tree::header(position)];
        table.insert_entry(last.clone(), Value::ArrayOfTables(tables), position);
        return Ok(());
    }
    match table.value_mut(last) {
        Some(Value::ArrayOfTables(tables)) => {
            tables.push(Tree::header(position));
            Ok(())
        }
        Some(Value::Array(_)) => Err(format!("cannot append to static array '{}'", join_path(path))),
        _ => Err(format!("key '{}' is not an array of tables", join_path(path))),
    }
}

/// Stores a value under a possibly dotted key, creating intermediate tables.
fn insert_dotted(
    table: &mut Tree,
    path: &[String],
    value: Value,
    position: Position,
) -> std::result::Result<(), String> {
    let last = match path.last() {
        Some(last) => last,
        None => return Err("empty key".to_owned()),
    };
    let mut table = table;
    for end in 1..path.len() {
        table = step_into(table, &path[..end], position, Walk::Dotted)?;
    }
    if table.insert_entry(last.clone(), value, position) {
        Ok(())
    } else {
        Err(format!("duplicate key '{}'", join_path(path)))
    }
}

fn has_leading_zero(number: &str) -> bool {
    let unsigned = number.trim_start_matches(|c: char| c == '+' || c == '-');
    let integral = unsigned
        .split(|c: char| c == '.' || c == 'e' || c == 'E')
        .next()
        .unwrap_or("");
    integral.len() > 1 && integral.starts_with('0')
}

/// Converts the text of an integer token.
fn parse_integer(text: &str) -> std::result::Result<i64, String> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex)
    } else if let Some(octal) = digits.strip_prefix("0o") {
        (8, octal)
    } else if let Some(binary) = digits.strip_prefix("0b") {
        (2, binary)
    } else {
        if has_leading_zero(&digits) {
            return Err("leading zeros are not allowed".to_owned());
        }
        (10, digits.as_str())
    };
    i64::from_str_radix(body, radix).map_err(|_| format!("integer out of range: {}", text))
}

/// Converts the text of a float token, including `inf` and `nan`.
fn parse_float(text: &str) -> std::result::Result<f64, String> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    if has_leading_zero(&digits) {
        return Err("leading zeros are not allowed".to_owned());
    }
    digits
        .parse::<f64>()
        .map_err(|_| format!("invalid float: {}", text))
}
