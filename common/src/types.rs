//! Column type system.
//!
//! Every [`ColumnType`] maps to exactly one native representation in [`Value`]
//! and carries an acceptance predicate plus a text parser.

use crate::error::{DataError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// The closed set of supported column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    String,
    Integer,
    Float,
}

/// A native value stored in a tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    String(String),
    Integer(i64),
    Float(f64),
}

fn decimal_text() -> &'static Regex {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    DECIMAL.get_or_init(|| Regex::new(r"^-?\d+\.\d+$").expect("decimal pattern is valid"))
}

/// Integral, finite and inside the `i64` range.
fn as_whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

fn decimal_value(s: &str) -> Option<f64> {
    if !decimal_text().is_match(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

impl ColumnType {
    /// Acceptance predicate for this type.
    ///
    /// Float deliberately accepts integral values and decimal text as well as
    /// floats, so `Value::Integer(42)` is a valid Float.
    pub fn accepts(&self, value: &Value) -> bool {
        self.to_native(value).is_some()
    }

    /// The accepted value in this type's native representation, or `None`
    /// when the value is not accepted.
    ///
    /// Integer columns store `Value::Integer` and Float columns store
    /// `Value::Float`, whatever shape the accepted input had.
    pub fn to_native(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (ColumnType::Boolean, Value::Boolean(_)) | (ColumnType::String, Value::String(_)) => {
                Some(value.clone())
            }
            (ColumnType::Integer, Value::Integer(i)) => Some(Value::Integer(*i)),
            (ColumnType::Integer, Value::Float(f)) => as_whole(*f).map(Value::Integer),
            (ColumnType::Float, Value::Integer(i)) => Some(Value::Float(*i as f64)),
            (ColumnType::Float, Value::Float(f)) => f.is_finite().then_some(Value::Float(*f)),
            (ColumnType::Float, Value::String(s)) => decimal_value(s).map(Value::Float),
            _ => None,
        }
    }

    /// Parses raw text into this type's native value.
    ///
    /// Boolean maps the literal `"true"` to true and anything else to false.
    /// Non-numeric text for Integer and Float is an error, never a sentinel, and
    /// so is Float text naming a non-finite value.
    pub fn parse(&self, text: &str) -> Result<Value> {
        match self {
            ColumnType::Boolean => Ok(Value::Boolean(text == "true")),
            ColumnType::String => Ok(Value::String(text.to_string())),
            ColumnType::Integer => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.parse_error(text)),
            ColumnType::Float => match text.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(self.parse_error(text)),
            },
        }
    }

    fn parse_error(&self, text: &str) -> DataError {
        DataError::Parse {
            column_type: *self,
            text: text.to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "Boolean",
            ColumnType::String => "String",
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
        };
        f.write_str(name)
    }
}

impl Value {
    /// The type whose native representation this value is.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Boolean(_) => ColumnType::Boolean,
            Value::String(_) => ColumnType::String,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
        }
    }
}

/// Renders the canonical text form accepted back by [`ColumnType::parse`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// A named, typed column. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    name: String,
    column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.column_type.accepts(value)
    }

    pub fn to_native(&self, value: &Value) -> Option<Value> {
        self.column_type.to_native(value)
    }

    pub fn parse(&self, text: &str) -> Result<Value> {
        self.column_type.parse(text)
    }

    /// Same type, different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Column::new(name, self.column_type)
    }
}
