use std::str::FromStr;

use indexmap::IndexMap;

use crate::errors::{Error, ErrorKind, Result};
use crate::key::{join_path, split_key};
use crate::parser::parse;
use crate::scanner::Position;
use crate::value::Value;

#[cfg(test)]
mod test;

/// A stored value with the position of the token that defined it.
#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    position: Position,
}

/// How a table came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Created as a prefix of a longer header path; may still be declared.
    Implicit,
    /// Declared by a `[header]`; dotted keys from other sections cannot reach it.
    Header,
    /// Created by a dotted key, or built programmatically.
    Defined,
    /// Written as `{ .. }`; cannot be extended afterwards.
    Inline,
}

/// A TOML table: an ordered mapping from keys to values.
///
/// Keys are unique and keep their insertion order. Every entry remembers the
/// position of its defining token.
#[derive(Debug, Clone)]
pub struct Tree {
    entries: IndexMap<String, Entry>,
    position: Position,
    origin: Origin,
}

impl Default for Tree {
    fn default() -> Tree {
        Tree::new()
    }
}

impl Tree {
    /// Creates an empty table.
    pub fn new() -> Tree {
        Tree::with_origin(Position::default(), Origin::Defined)
    }

    fn with_origin(position: Position, origin: Origin) -> Tree {
        Tree {
            entries: IndexMap::new(),
            position,
            origin,
        }
    }

    pub(crate) fn implicit(position: Position) -> Tree {
        Tree::with_origin(position, Origin::Implicit)
    }

    pub(crate) fn defined(position: Position) -> Tree {
        Tree::with_origin(position, Origin::Defined)
    }

    pub(crate) fn header(position: Position) -> Tree {
        Tree::with_origin(position, Origin::Header)
    }

    pub(crate) fn inline(position: Position) -> Tree {
        Tree::with_origin(position, Origin::Inline)
    }

    pub(crate) fn is_implicit(&self) -> bool {
        self.origin == Origin::Implicit
    }

    /// Whether the table was opened by a header, explicitly or as a prefix.
    pub(crate) fn is_from_header(&self) -> bool {
        matches!(self.origin, Origin::Implicit | Origin::Header)
    }

    /// Promotes an implicit table to a declared one.
    pub(crate) fn declare(&mut self, position: Position) {
        self.origin = Origin::Header;
        self.position = position;
    }

    /// Whether the table was written inline as `{ .. }`.
    pub fn is_inline(&self) -> bool {
        self.origin == Origin::Inline
    }

    /// The position of the header or brace that opened this table.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), &entry.value))
    }

    /// Whether this table has an entry with exactly this key (no path splitting).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value at a single key (no path splitting).
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value at a single key.
    pub fn value_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Looks up a dotted path such as `servers."alpha".ip`.
    ///
    /// Arrays of tables are followed through their last table.
    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let path = split_key(dotted_path).ok()?;
        self.get_path(&path)
    }

    /// Looks up a path given as separate segments.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        self.table_at(parents)?.value(last.as_ref())
    }

    /// Whether a value exists at the dotted path.
    pub fn contains(&self, dotted_path: &str) -> bool {
        self.get(dotted_path).is_some()
    }

    /// The position of the token that defined the value at the dotted path.
    pub fn position_of(&self, dotted_path: &str) -> Option<Position> {
        let path = split_key(dotted_path).ok()?;
        let (last, parents) = path.split_last()?;
        self.table_at(parents)?
            .entries
            .get(last.as_str())
            .map(|entry| entry.position)
    }

    fn table_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Tree> {
        let mut table = self;
        for segment in path {
            table = match table.value(segment.as_ref())? {
                Value::Table(child) => child,
                Value::ArrayOfTables(tables) => tables.last()?,
                _ => return None,
            };
        }
        Some(table)
    }

    /// Resolves a table path from this table, following the last table of
    /// arrays of tables.
    pub(crate) fn table_at_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Tree> {
        let mut table = self;
        for segment in path {
            table = match table.value_mut(segment.as_ref())? {
                Value::Table(child) => child,
                Value::ArrayOfTables(tables) => tables.last_mut()?,
                _ => return None,
            };
        }
        Some(table)
    }

    /// Stores a value under a new key. Returns false, leaving the table
    /// untouched, if the key is already used.
    pub(crate) fn insert_entry(&mut self, key: String, value: Value, position: Position) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, Entry { value, position });
        true
    }

    /// Inserts a new entry. Fails if the key is already used.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(ErrorKind::DuplicateKey(key).into());
        }
        self.entries.insert(
            key,
            Entry {
                value: value.into(),
                position: Position::default(),
            },
        );
        Ok(())
    }

    /// Inserts a value at a path, creating missing intermediate tables.
    ///
    /// Fails if an intermediate segment holds something other than a table,
    /// or if the final key is already used.
    pub fn insert_path<S, V>(&mut self, path: &[S], value: V) -> Result<()>
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        let (last, parents) = match path.split_last() {
            Some(split) => split,
            None => return Err(ErrorKind::Msg("empty key path".to_owned()).into()),
        };
        let mut table = self;
        for (i, segment) in parents.iter().enumerate() {
            let segment = segment.as_ref();
            if !table.contains_key(segment) {
                table.insert_entry(segment.to_owned(), Value::Table(Tree::new()), Position::default());
            }
            table = match table.value_mut(segment) {
                Some(Value::Table(child)) => child,
                _ => return Err(ErrorKind::NotATable(join_path(&path[..=i])).into()),
            };
        }
        table.insert(last.as_ref(), value).map_err(|_| -> Error {
            ErrorKind::DuplicateKey(join_path(path)).into()
        })
    }

    /// Replaces the value of an existing key in place, or appends a new entry.
    /// Returns the previous value.
    ///
    /// This is an explicit overwrite for edits: unlike [`Tree::insert`] it
    /// accepts a used key, and the new value may be of any kind, so a table
    /// can be swapped for a scalar and the other way round. The key keeps its
    /// place in the entry order.
    pub fn replace<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let value = value.into();
        match self.entries.get_mut(&key) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.insert(
                    key,
                    Entry {
                        value,
                        position: Position::default(),
                    },
                );
                None
            }
        }
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key).map(|entry| entry.value)
    }

    /// Returns the entries as a plain ordered map of values, for consumers
    /// that walk the tree without caring about positions.
    pub fn to_nested_map(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }
}

/// Tables are equal when they hold the same keys with equal values. Entry
/// order, positions and inline-ness are not compared.
impl PartialEq for Tree {
    fn eq(&self, other: &Tree) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, entry)| other.value(key) == Some(&entry.value))
    }
}

impl FromStr for Tree {
    type Err = Error;

    fn from_str(text: &str) -> Result<Tree> {
        parse(text)
    }
}
