use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};

use crate::table::Tree;

const LOCAL_DATE: &str = "%Y-%m-%d";
const LOCAL_TIME: &str = "%H:%M:%S%.f";
const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A TOML date-time value in one of its four forms.
/// `1979-05-27T07:32:00-08:00` `1979-05-27T07:32:00` `1979-05-27` `07:32:00`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datetime {
    /// An instant with a UTC offset.
    Offset(DateTime<FixedOffset>),
    /// A date and time without offset.
    Local(NaiveDateTime),
    /// A date without time.
    LocalDate(NaiveDate),
    /// A time of day without date.
    LocalTime(NaiveTime),
}

impl Datetime {
    /// The calendar year, if the value has a date part.
    pub fn year(&self) -> Option<i32> {
        match *self {
            Datetime::Offset(dt) => Some(dt.year()),
            Datetime::Local(dt) => Some(dt.year()),
            Datetime::LocalDate(date) => Some(date.year()),
            Datetime::LocalTime(_) => None,
        }
    }
}

impl FromStr for Datetime {
    type Err = String;

    /// Parses the text of a date token. The date/time separator may be `T`,
    /// `t` or a space, and the UTC designator `Z` or `z`.
    fn from_str(text: &str) -> Result<Datetime, String> {
        let invalid = || format!("invalid date-time '{}'", text);
        if !text.contains('-') {
            return NaiveTime::parse_from_str(text, LOCAL_TIME)
                .map(Datetime::LocalTime)
                .map_err(|_| invalid());
        }
        if text.len() == 10 {
            return NaiveDate::parse_from_str(text, LOCAL_DATE)
                .map(Datetime::LocalDate)
                .map_err(|_| invalid());
        }
        let mut normalized: String = text.chars().take(10).collect();
        normalized.push('T');
        normalized.extend(text.chars().skip(11));
        if normalized.ends_with('z') {
            normalized.pop();
            normalized.push('Z');
        }
        let has_offset = normalized.get(19..).map_or(false, |tail| {
            tail.contains('Z') || tail.contains('+') || tail.contains('-')
        });
        if has_offset {
            DateTime::parse_from_rfc3339(&normalized)
                .map(Datetime::Offset)
                .map_err(|_| invalid())
        } else {
            NaiveDateTime::parse_from_str(&normalized, LOCAL_DATE_TIME)
                .map(Datetime::Local)
                .map_err(|_| invalid())
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Datetime::Offset(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Datetime::Local(dt) => write!(f, "{}", dt.format(LOCAL_DATE_TIME)),
            Datetime::LocalDate(date) => write!(f, "{}", date.format(LOCAL_DATE)),
            Datetime::LocalTime(time) => write!(f, "{}", time.format(LOCAL_TIME)),
        }
    }
}

/// A value in a TOML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string.
    String(String),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// A date, time or date-time.
    Datetime(Datetime),
    /// A static array `[1, 2, 3]`, possibly nested or holding inline tables.
    Array(Vec<Value>),
    /// A table, either declared with a `[header]`, implied by a path, or inline.
    Table(Tree),
    /// The tables of repeated `[[header]]` declarations, in document order.
    ArrayOfTables(Vec<Tree>),
}

impl Value {
    /// A human-readable name for the kind of this value.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
            Value::ArrayOfTables(_) => "array of tables",
        }
    }

    /// Checks whether this value has the same variant as the given value.
    pub fn is_same_type(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Whether the value is written as its own `[section]` rather than inline.
    pub fn is_section(&self) -> bool {
        matches!(*self, Value::Table(_) | Value::ArrayOfTables(_))
    }

    /// Returns the string value of this item (if valid).
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(ref string) = *self {
            Some(string)
        } else {
            None
        }
    }

    /// Returns the integer value of this item (if valid).
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Returns the float value of this item (if valid).
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Returns the boolean value of this item (if valid).
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Returns the datetime value of this item (if valid).
    pub fn as_datetime(&self) -> Option<&Datetime> {
        if let Value::Datetime(ref value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Returns a reference to the array in this item (if valid).
    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(ref array) = *self {
            Some(array)
        } else {
            None
        }
    }

    /// Returns a reference to the table in this item (if valid).
    pub fn as_table(&self) -> Option<&Tree> {
        if let Value::Table(ref table) = *self {
            Some(table)
        } else {
            None
        }
    }

    /// Returns a mutable reference to the table in this item (if valid).
    pub fn as_table_mut(&mut self) -> Option<&mut Tree> {
        if let Value::Table(ref mut table) = *self {
            Some(table)
        } else {
            None
        }
    }

    /// Returns the tables of an array of tables (if valid).
    pub fn as_tables(&self) -> Option<&[Tree]> {
        if let Value::ArrayOfTables(ref tables) = *self {
            Some(tables)
        } else {
            None
        }
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Value {
        Value::String(other.to_owned())
    }
}

impl From<String> for Value {
    fn from(other: String) -> Value {
        Value::String(other)
    }
}

impl From<i64> for Value {
    fn from(other: i64) -> Value {
        Value::Integer(other)
    }
}

impl From<i32> for Value {
    fn from(other: i32) -> Value {
        Value::Integer(i64::from(other))
    }
}

impl From<f64> for Value {
    fn from(other: f64) -> Value {
        Value::Float(other)
    }
}

impl From<f32> for Value {
    fn from(other: f32) -> Value {
        Value::Float(f64::from(other))
    }
}

impl From<bool> for Value {
    fn from(other: bool) -> Value {
        Value::Boolean(other)
    }
}

impl From<Datetime> for Value {
    fn from(other: Datetime) -> Value {
        Value::Datetime(other)
    }
}

impl From<Tree> for Value {
    fn from(other: Tree) -> Value {
        Value::Table(other)
    }
}

impl From<Vec<Value>> for Value {
    fn from(other: Vec<Value>) -> Value {
        Value::Array(other)
    }
}

impl From<Vec<Tree>> for Value {
    fn from(other: Vec<Tree>) -> Value {
        Value::ArrayOfTables(other)
    }
}
