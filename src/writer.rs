//! Renders a `Tree` as canonical TOML text.
//!
//! Simple keys of a table come first, in stored order, followed by its tables
//! and arrays of tables. Headers carry the full path and are indented by their
//! nesting depth.

use crate::errors::{ErrorKind, Result};
use crate::key::{join_path, write_key};
use crate::table::Tree;
use crate::utils::escape_string;
use crate::value::{Datetime, Value};

#[cfg(test)]
mod test;

/// Settings for the text layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Refuse to write arrays whose elements are of different kinds.
    pub strict_arrays: bool,
}

impl Default for WriteOptions {
    fn default() -> WriteOptions {
        WriteOptions {
            indent: 2,
            strict_arrays: false,
        }
    }
}

impl Tree {
    /// Writes the tree as TOML text with the default layout.
    pub fn to_text(&self) -> Result<String> {
        self.to_text_with(&WriteOptions::default())
    }

    /// Writes the tree as TOML text.
    ///
    /// Fails if the tree holds something TOML cannot express, such as an
    /// empty array of tables. Nothing is partially written in that case.
    pub fn to_text_with(&self, options: &WriteOptions) -> Result<String> {
        let mut writer = Writer {
            options: *options,
            out: String::new(),
            path: Vec::new(),
        };
        writer.write_body(self, 0)?;
        debug!("Wrote {} bytes of TOML", writer.out.len());
        Ok(writer.out)
    }
}

struct Writer<'a> {
    options: WriteOptions,
    out: String,
    path: Vec<&'a str>,
}

impl<'a> Writer<'a> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth * self.options.indent {
            self.out.push(' ');
        }
    }

    fn write_body(&mut self, table: &'a Tree, depth: usize) -> Result<()> {
        for (key, value) in table.iter().filter(|(_, value)| !value.is_section()) {
            self.indent(depth);
            write_key(key, &mut self.out);
            self.out.push_str(" = ");
            self.write_value(value)?;
            self.out.push('\n');
        }

        for (key, value) in table.iter() {
            match *value {
                Value::Table(ref child) => {
                    self.path.push(key);
                    self.write_header(false, depth);
                    self.write_body(child, depth + 1)?;
                    self.path.pop();
                }
                Value::ArrayOfTables(ref tables) => {
                    self.path.push(key);
                    if tables.is_empty() {
                        return Err(ErrorKind::Serialize(format!(
                            "cannot write empty array of tables '{}'",
                            join_path(&self.path)
                        ))
                        .into());
                    }
                    for child in tables {
                        self.write_header(true, depth);
                        self.write_body(child, depth + 1)?;
                    }
                    self.path.pop();
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_header(&mut self, array: bool, depth: usize) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.indent(depth);
        let path = join_path(&self.path);
        if array {
            self.out.push_str("[[");
            self.out.push_str(&path);
            self.out.push_str("]]\n");
        } else {
            self.out.push('[');
            self.out.push_str(&path);
            self.out.push_str("]\n");
        }
    }

    /// Writes a value on one line.
    fn write_value(&mut self, value: &Value) -> Result<()> {
        match *value {
            Value::String(ref text) => self.out.push_str(&escape_string(text)),
            Value::Integer(number) => self.out.push_str(&number.to_string()),
            Value::Float(number) => self.out.push_str(&format_float(number)),
            Value::Boolean(flag) => self.out.push_str(if flag { "true" } else { "false" }),
            Value::Datetime(ref datetime) => self.write_datetime(datetime)?,
            Value::Array(ref values) => {
                if self.options.strict_arrays {
                    check_homogeneous(values)?;
                }
                self.out.push('[');
                for (i, item) in values.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_value(item)?;
                }
                self.out.push(']');
            }
            Value::Table(ref table) => self.write_inline_table(table)?,
            Value::ArrayOfTables(ref tables) => {
                self.out.push('[');
                for (i, table) in tables.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_inline_table(table)?;
                }
                self.out.push(']');
            }
        }
        Ok(())
    }

    fn write_inline_table(&mut self, table: &Tree) -> Result<()> {
        if table.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push_str("{ ");
        for (i, (key, value)) in table.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            write_key(key, &mut self.out);
            self.out.push_str(" = ");
            self.write_value(value)?;
        }
        self.out.push_str(" }");
        Ok(())
    }

    fn write_datetime(&mut self, datetime: &Datetime) -> Result<()> {
        if let Some(year) = datetime.year() {
            if !(0..=9999).contains(&year) {
                return Err(ErrorKind::Serialize(format!(
                    "cannot write date-time '{}': year must be between 0 and 9999",
                    datetime
                ))
                .into());
            }
        }
        self.out.push_str(&datetime.to_string());
        Ok(())
    }
}

fn check_homogeneous(values: &[Value]) -> Result<()> {
    if let Some(first) = values.first() {
        if let Some(other) = values.iter().find(|value| !value.is_same_type(first)) {
            return Err(ErrorKind::Serialize(format!(
                "mixed types in array: expected {}, found {}",
                first.type_name(),
                other.type_name()
            ))
            .into());
        }
    }
    Ok(())
}

/// Formats a float so that it reads back as a float.
fn format_float(number: f64) -> String {
    if number.is_nan() {
        return "nan".to_owned();
    }
    if number.is_infinite() {
        let text = if number > 0.0 { "inf" } else { "-inf" };
        return text.to_owned();
    }
    let mut text = format!("{:?}", number);
    if !text.contains(|c: char| c == '.' || c == 'e' || c == 'E') {
        text.push_str(".0");
    }
    text
}
