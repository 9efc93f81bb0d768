#![warn(missing_docs)]
//! Parses TOML documents into an ordered tree, reporting errors with exact
//! positions, and writes trees back as canonical TOML.
//!
//! ```
//! let tree = spacetree::parse("title = 'example'\n[owner]\nname = 'Tom'\n").unwrap();
//! assert_eq!(tree.get("owner.name").and_then(|v| v.as_str()), Some("Tom"));
//! let text = tree.to_text().unwrap();
//! assert_eq!(spacetree::parse(&text).unwrap(), tree);
//! ```
#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;

pub mod debug;
pub mod query;

mod errors;
mod key;
mod lexer;
mod literal;
mod parser;
mod scanner;
mod table;
mod utils;
mod value;
mod writer;

pub use errors::{Error, ErrorKind, Result};
pub use key::{is_bare_key, join_path, split_key};
pub use lexer::{tokens, Lexer, Token, TokenKind};
pub use parser::{parse, parse_with, ParseOptions};
pub use scanner::Position;
pub use table::Tree;
pub use value::{Datetime, Value};
pub use writer::WriteOptions;
