//! Display rendering for typed values.

use super::{convert, FieldFormat, FieldType, RawValue, Value};
use crate::error::ConversionError;

/// Render `raw` for display.
///
/// The value is coerced to `field_type` first, so a value that cannot be
/// converted fails rather than being shown verbatim. When `field_format` is
/// `None` the type's default format is used.
pub fn format(
    field_type: FieldType,
    raw: &RawValue,
    field_format: Option<FieldFormat>,
) -> Result<Option<String>, ConversionError> {
    let Some(value) = convert(field_type, raw)? else {
        return Ok(None);
    };
    let field_format = field_format.unwrap_or_else(|| field_type.default_format());
    Ok(Some(render(&value, raw, field_format)))
}

fn render(value: &Value, raw: &RawValue, field_format: FieldFormat) -> String {
    match field_format {
        FieldFormat::Accounting => match value.as_f64() {
            Some(f) if f < 0.0 => format!("({})", grouped_decimal(-f)),
            Some(f) => grouped_decimal(f),
            None => value.to_string(),
        },
        FieldFormat::Currency => match value.as_f64() {
            Some(f) if f < 0.0 => format!("-${}", grouped_decimal(-f)),
            Some(f) => format!("${}", grouped_decimal(f)),
            None => value.to_string(),
        },
        FieldFormat::Float => match value.as_f64() {
            Some(f) if f < 0.0 => format!("-{}", grouped_decimal(-f)),
            Some(f) => grouped_decimal(f),
            None => value.to_string(),
        },
        FieldFormat::Int => {
            let n = match value {
                Value::Int(n) => *n,
                other => match other.as_f64() {
                    Some(f) => f.trunc() as i64,
                    None => return value.to_string(),
                },
            };
            let grouped = group_thousands(&n.unsigned_abs().to_string());
            if n < 0 {
                format!("-{grouped}")
            } else {
                grouped
            }
        }
        FieldFormat::DateTime => match raw {
            RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => value.to_string(),
        },
        FieldFormat::Date | FieldFormat::Bool | FieldFormat::Str => value.to_string(),
    }
}

/// Two decimals with thousands separators, for a non-negative number.
fn grouped_decimal(f: f64) -> String {
    let fixed = format!("{f:.2}");
    match fixed.split_once('.') {
        Some((whole, frac)) => format!("{}.{frac}", group_thousands(whole)),
        None => group_thousands(&fixed),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
