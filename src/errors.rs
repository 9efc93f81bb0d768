//! Errors found when reading, editing and writing documents.
#![allow(missing_docs)]

use crate::scanner::Position;

error_chain! {
    errors {
        Lex(message: String, position: Position, last_key: String) {
            description("malformed token")
            display("{} at {} (last key parsed: '{}')", message, position, last_key)
        }
        Parse(message: String, position: Position, last_key: String) {
            description("invalid document structure")
            display("{} at {} (last key parsed: '{}')", message, position, last_key)
        }
        Serialize(message: String) {
            description("tree cannot be written as TOML")
            display("{}", message)
        }
        DuplicateKey(key: String) {
            description("duplicate key")
            display("duplicate key '{}'", key)
        }
        NotATable(path: String) {
            description("path does not lead to a table")
            display("key '{}' is not a table", path)
        }
    }
}

impl Error {
    /// The position of the offending token, for lexing and parsing errors.
    pub fn position(&self) -> Option<Position> {
        match *self.kind() {
            ErrorKind::Lex(_, position, _) | ErrorKind::Parse(_, position, _) => Some(position),
            _ => None,
        }
    }

    /// The bare message, without position information.
    pub fn message(&self) -> String {
        match *self.kind() {
            ErrorKind::Lex(ref message, ..) | ErrorKind::Parse(ref message, ..) => message.clone(),
            ErrorKind::Serialize(ref message) => message.clone(),
            ref other => other.to_string(),
        }
    }
}
