//! Filters: a predicate bound to one field, an operator and a current value.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

use crate::error::ConversionError;
use crate::sql::expr::{date_of, lit_str, Expr, ExprExt};
use crate::value::{convert, FieldType, RawValue, Value};

/// Escape character used for like-family patterns.
pub const LIKE_ESCAPE: char = '\\';

/// The closed set of filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Operator {
    // boolean
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is_not")]
    IsNot,
    // numeric
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    // string
    #[serde(rename = "equals")]
    Equals,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "not_like")]
    NotLike,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
    // date
    #[serde(rename = "after")]
    After,
    #[serde(rename = "on_or_after")]
    OnOrAfter,
    #[serde(rename = "before")]
    Before,
    #[serde(rename = "on_or_before")]
    OnOrBefore,
    #[serde(rename = "on")]
    On,
    #[serde(rename = "not_on")]
    NotOn,
}

impl Operator {
    /// Operators a field gets when its configuration names none.
    pub fn defaults_for(dtype: FieldType) -> &'static [Operator] {
        match dtype {
            FieldType::Date => &[Operator::OnOrAfter, Operator::OnOrBefore],
            FieldType::Int | FieldType::Float => &[Operator::Gte, Operator::Lte],
            FieldType::Str => &[Operator::Like],
            FieldType::Bool => &[Operator::Is],
        }
    }

    /// Whether this operator can compare values of `dtype`.
    pub fn applies_to(self, dtype: FieldType) -> bool {
        use Operator::*;
        match self {
            Is | IsNot => dtype == FieldType::Bool,
            Eq | Ne | Gt | Gte | Lt | Lte => dtype.is_numeric(),
            Equals | Like | NotLike | StartsWith | EndsWith => dtype == FieldType::Str,
            After | OnOrAfter | Before | OnOrBefore | On | NotOn => dtype == FieldType::Date,
        }
    }

    /// Text appended to the field's display name.
    pub fn suffix(self) -> &'static str {
        use Operator::*;
        match self {
            Is | Like => "",
            IsNot => "is not",
            Eq => "=",
            Ne => "!=",
            Gt => ">",
            Gte => ">=",
            Lt => "<",
            Lte => "<=",
            Equals => "equals",
            NotLike => "not like",
            StartsWith => "starts with",
            EndsWith => "ends with",
            After => "after",
            OnOrAfter => "on or after",
            Before => "before",
            OnOrBefore => "on or before",
            On => "on",
            NotOn => "not on",
        }
    }

    /// Name used in configuration files.
    pub fn name(self) -> &'static str {
        use Operator::*;
        match self {
            Is => "is",
            IsNot => "is_not",
            Eq => "=",
            Ne => "!=",
            Gt => ">",
            Gte => ">=",
            Lt => "<",
            Lte => "<=",
            Equals => "equals",
            Like => "like",
            NotLike => "not_like",
            StartsWith => "starts_with",
            EndsWith => "ends_with",
            After => "after",
            OnOrAfter => "on_or_after",
            Before => "before",
            OnOrBefore => "on_or_before",
            On => "on",
            NotOn => "not_on",
        }
    }

    fn predicate(self, subject: Expr, value: &Value) -> Expr {
        use Operator::*;
        match self {
            Is => subject.eq(value.to_expr()),
            IsNot => subject.ne(value.to_expr()),
            Eq => subject.eq(value.to_expr()),
            Ne => subject.ne(value.to_expr()),
            Gt => subject.gt(value.to_expr()),
            Gte => subject.gte(value.to_expr()),
            Lt => subject.lt(value.to_expr()),
            Lte => subject.lte(value.to_expr()),
            Equals => subject.eq(value.to_expr()),
            Like => subject.like_escape(like_pattern(value, true, true), LIKE_ESCAPE),
            NotLike => subject.not_like_escape(like_pattern(value, true, true), LIKE_ESCAPE),
            StartsWith => subject.like_escape(like_pattern(value, false, true), LIKE_ESCAPE),
            EndsWith => subject.like_escape(like_pattern(value, true, false), LIKE_ESCAPE),
            After | OnOrAfter | Before | OnOrBefore | On | NotOn => {
                let day = value.to_expr();
                let subject = date_of(subject);
                match self {
                    After => subject.gt(day),
                    OnOrAfter => subject.gte(day),
                    Before => subject.lt(day),
                    OnOrBefore => subject.lte(day),
                    On => subject.eq(day),
                    _ => subject.ne(day),
                }
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Escape `%`, `_` and the escape character, then add wildcards.
fn like_pattern(value: &Value, leading: bool, trailing: bool) -> Expr {
    let text = value.to_string();
    let mut pattern = String::with_capacity(text.len() + 2);
    if leading {
        pattern.push('%');
    }
    for c in text.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    if trailing {
        pattern.push('%');
    }
    lit_str(&pattern)
}

/// A predicate over one field with a mutable current value.
///
/// The subject expression is fixed at construction: a qualified column for
/// table fields, the concatenated label for a dimension summary, or the
/// evaluated formula for a calculated field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field_display_name: String,
    dtype: FieldType,
    operator: Operator,
    subject: Expr,
    raw: RawValue,
    value: Option<Value>,
}

impl Filter {
    pub fn new(
        field_display_name: impl Into<String>,
        dtype: FieldType,
        operator: Operator,
        subject: Expr,
    ) -> Self {
        Self {
            field_display_name: field_display_name.into(),
            dtype,
            operator,
            subject,
            raw: RawValue::Null,
            value: None,
        }
    }

    /// Field display name plus operator suffix.
    pub fn display_name(&self) -> String {
        match self.operator.suffix() {
            "" => self.field_display_name.clone(),
            suffix => format!("{} {}", self.field_display_name, suffix),
        }
    }

    pub fn field_display_name(&self) -> &str {
        &self.field_display_name
    }

    pub fn dtype(&self) -> FieldType {
        self.dtype
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The value as last set, before coercion.
    pub fn raw_value(&self) -> &RawValue {
        &self.raw
    }

    /// The coerced value.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Coerce and store a new value.
    ///
    /// On failure the previous raw and coerced values are kept.
    pub fn set_value(&mut self, raw: impl Into<RawValue>) -> Result<(), ConversionError> {
        let raw = raw.into();
        let value = if raw.is_empty() {
            None
        } else {
            convert(self.dtype, &raw).inspect_err(|err| {
                tracing::warn!(filter = %self.display_name(), error = %err, "rejected filter value");
            })?
        };
        self.raw = raw;
        self.value = value;
        Ok(())
    }

    /// Reset to unset.
    pub fn clear(&mut self) {
        self.raw = RawValue::Null;
        self.value = None;
    }

    pub fn is_active(&self) -> bool {
        !self.raw.is_empty() && self.value.is_some()
    }

    /// The composed predicate, absent while the filter is unset.
    pub fn filter(&self) -> Option<Expr> {
        if self.raw.is_empty() {
            return None;
        }
        let value = self.value.as_ref()?;
        Some(self.operator.predicate(self.subject.clone(), value))
    }
}

impl Eq for Filter {}

impl PartialOrd for Filter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Filter {
    /// Layout order only.
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_name().cmp(&other.display_name())
    }
}
