//! Typed values and the coercion layer between raw input and field types.
//!
//! Raw values arrive from users (strings typed into a filter), from the
//! configuration (defaults) or from the execution collaborator (result
//! cells). [`convert`] turns them into a [`Value`] of a declared
//! [`FieldType`]; [`format`] renders a value for display.

mod convert;
mod format;

pub use convert::convert;
pub use format::format;

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::sql::expr::{lit_bool, lit_date, lit_float, lit_int, lit_str, Expr};

/// The five storage types a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Date,
    Float,
    Int,
    Str,
    Bool,
}

impl FieldType {
    /// Display format used when a field declares none.
    pub fn default_format(self) -> FieldFormat {
        match self {
            FieldType::Date => FieldFormat::Date,
            FieldType::Float => FieldFormat::Float,
            FieldType::Int => FieldFormat::Int,
            FieldType::Str => FieldFormat::Str,
            FieldType::Bool => FieldFormat::Bool,
        }
    }

    /// Value substituted for empty-but-present input.
    ///
    /// Dates have no meaningful zero, so their default is absent.
    pub fn falsy_default(self) -> Option<Value> {
        match self {
            FieldType::Date => None,
            FieldType::Float => Some(Value::Float(0.0)),
            FieldType::Int => Some(Value::Int(0)),
            FieldType::Str => Some(Value::Str(String::new())),
            FieldType::Bool => Some(Value::Bool(false)),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Int | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Date => "date",
            FieldType::Float => "float",
            FieldType::Int => "int",
            FieldType::Str => "str",
            FieldType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// How a value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    Accounting,
    Bool,
    Currency,
    Date,
    DateTime,
    Float,
    Int,
    Str,
}

impl FieldFormat {
    /// Storage type implied by this format.
    pub fn field_type(self) -> FieldType {
        match self {
            FieldFormat::Accounting | FieldFormat::Currency | FieldFormat::Float => {
                FieldType::Float
            }
            FieldFormat::Bool => FieldType::Bool,
            FieldFormat::Date | FieldFormat::DateTime => FieldType::Date,
            FieldFormat::Int => FieldType::Int,
            FieldFormat::Str => FieldType::Str,
        }
    }
}

/// A coerced value of one of the five field types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Date(NaiveDate),
    Float(f64),
    Int(i64),
    Str(String),
}

impl Value {
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Bool(_) => FieldType::Bool,
            Value::Date(_) => FieldType::Date,
            Value::Float(_) => FieldType::Float,
            Value::Int(_) => FieldType::Int,
            Value::Str(_) => FieldType::Str,
        }
    }

    /// SQL literal for this value.
    pub fn to_expr(&self) -> Expr {
        match self {
            Value::Bool(b) => lit_bool(*b),
            Value::Date(d) => lit_date(&d.format("%Y-%m-%d").to_string()),
            Value::Float(f) => lit_float(*f),
            Value::Int(n) => lit_int(*n),
            Value::Str(s) => lit_str(s),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Float(x) => write!(f, "{x}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// An uncoerced value as received from a user, the configuration or a
/// result row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Absent or the empty string. An empty filter contributes no predicate.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Str(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("None"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(n) => write!(f, "{n}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Str(s) => f.write_str(s),
            RawValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            RawValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => RawValue::Bool(b),
            Value::Date(d) => RawValue::Date(d),
            Value::Float(f) => RawValue::Float(f),
            Value::Int(n) => RawValue::Int(n),
            Value::Str(s) => RawValue::Str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Int(n as i64)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(dt: NaiveDateTime) -> Self {
        RawValue::DateTime(dt)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawValue::Null)
    }
}
