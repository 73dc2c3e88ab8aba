//! Coercion from raw values to typed values.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::{FieldType, RawValue, Value};
use crate::error::ConversionError;

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date regex"));

/// Coerce `raw` to `field_type`.
///
/// - `Null` gives `Ok(None)`.
/// - Empty-but-present input (empty string, `0`, `0.0`, `false`) gives the
///   type's [falsy default](FieldType::falsy_default).
/// - Anything that cannot represent the type fails.
pub fn convert(field_type: FieldType, raw: &RawValue) -> Result<Option<Value>, ConversionError> {
    if raw.is_null() {
        return Ok(None);
    }
    if is_falsy(raw) {
        return Ok(field_type.falsy_default());
    }

    let value = match field_type {
        FieldType::Int => Value::Int(to_int(raw)?),
        FieldType::Float => Value::Float(round2(to_float(FieldType::Float, raw)?)),
        FieldType::Bool => Value::Bool(to_bool(raw)?),
        FieldType::Date => Value::Date(to_date(raw)?),
        FieldType::Str => Value::Str(to_str(raw)),
    };
    Ok(Some(value))
}

fn is_falsy(raw: &RawValue) -> bool {
    match raw {
        RawValue::Str(s) => s.trim().is_empty(),
        RawValue::Int(n) => *n == 0,
        RawValue::Float(f) => *f == 0.0,
        RawValue::Bool(b) => !*b,
        _ => false,
    }
}

/// Strip grouping and currency decoration; `(1,234.50)` is negative.
fn clean_numeric(s: &str) -> String {
    let trimmed = s.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let digits: String = body
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}

fn to_int(raw: &RawValue) -> Result<i64, ConversionError> {
    let ft = FieldType::Int;
    match raw {
        RawValue::Int(n) => Ok(*n),
        RawValue::Bool(b) => Ok(*b as i64),
        RawValue::Float(_) | RawValue::Str(_) => {
            if let RawValue::Str(s) = raw {
                if let Ok(n) = clean_numeric(s).parse::<i64>() {
                    return Ok(n);
                }
            }
            let f = to_float(ft, raw)?;
            let truncated = f.trunc();
            if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                return Err(ConversionError::new(ft, raw, "out of range"));
            }
            Ok(truncated as i64)
        }
        _ => Err(ConversionError::new(ft, raw, "not a number")),
    }
}

fn to_float(ft: FieldType, raw: &RawValue) -> Result<f64, ConversionError> {
    let f = match raw {
        RawValue::Float(f) => *f,
        RawValue::Int(n) => *n as f64,
        RawValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        RawValue::Str(s) => clean_numeric(s)
            .parse::<f64>()
            .map_err(|_| ConversionError::new(ft, raw, "not a number"))?,
        _ => return Err(ConversionError::new(ft, raw, "not a number")),
    };
    if !f.is_finite() {
        return Err(ConversionError::new(ft, raw, "not a finite number"));
    }
    Ok(f)
}

/// Round to cents. Magnitudes too large to scale have no fractional part left.
fn round2(f: f64) -> f64 {
    let scaled = f * 100.0;
    if !scaled.is_finite() {
        return f;
    }
    scaled.round() / 100.0
}

fn to_bool(raw: &RawValue) -> Result<bool, ConversionError> {
    let ft = FieldType::Bool;
    match raw {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Int(1) => Ok(true),
        RawValue::Float(f) if *f == 1.0 => Ok(true),
        RawValue::Str(s) => {
            let lower = s.to_lowercase();
            if lower.contains("true") {
                Ok(true)
            } else if lower.contains("false") {
                Ok(false)
            } else {
                Err(ConversionError::new(ft, raw, "expected true or false"))
            }
        }
        _ => Err(ConversionError::new(ft, raw, "expected true or false")),
    }
}

fn to_date(raw: &RawValue) -> Result<NaiveDate, ConversionError> {
    let ft = FieldType::Date;
    match raw {
        RawValue::Date(d) => Ok(*d),
        RawValue::DateTime(dt) => Ok(dt.date()),
        RawValue::Str(s) => {
            let s = s.trim();
            if !DATE_PREFIX.is_match(s) {
                return Err(ConversionError::new(ft, raw, "expected YYYY-MM-DD"));
            }
            s.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
                .ok_or_else(|| ConversionError::new(ft, raw, "not a calendar date"))
        }
        _ => Err(ConversionError::new(ft, raw, "expected YYYY-MM-DD")),
    }
}

fn to_str(raw: &RawValue) -> String {
    match raw {
        RawValue::Bool(true) => "True".to_string(),
        RawValue::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}
