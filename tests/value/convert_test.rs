//! Tests for coercing raw values to field types.

use chrono::{NaiveDate, NaiveDateTime};
use constellation::value::{convert, format, FieldFormat, FieldType, RawValue, Value};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Int
// ============================================================================

#[test]
fn test_int_empty_string_is_zero() {
    assert_eq!(
        convert(FieldType::Int, &RawValue::from("")),
        Ok(Some(Value::Int(0)))
    );
}

#[test]
fn test_int_null_is_absent() {
    assert_eq!(convert(FieldType::Int, &RawValue::Null), Ok(None));
}

#[test]
fn test_int_rejects_text() {
    let err = convert(FieldType::Int, &RawValue::from("abc")).unwrap_err();
    assert_eq!(err.field_type, FieldType::Int);
    assert_eq!(err.value, "abc");
}

#[test]
fn test_int_accepts_decorated_numbers() {
    assert_eq!(
        convert(FieldType::Int, &RawValue::from("1,234")),
        Ok(Some(Value::Int(1234)))
    );
    assert_eq!(
        convert(FieldType::Int, &RawValue::from("12.9")),
        Ok(Some(Value::Int(12)))
    );
    assert_eq!(
        convert(FieldType::Int, &RawValue::Float(-3.7)),
        Ok(Some(Value::Int(-3)))
    );
}

// ============================================================================
// Float
// ============================================================================

#[test]
fn test_float_rounds_to_two_places() {
    assert_eq!(
        convert(FieldType::Float, &RawValue::from("$1,234.567")),
        Ok(Some(Value::Float(1234.57)))
    );
}

#[test]
fn test_float_parenthesized_is_negative() {
    assert_eq!(
        convert(FieldType::Float, &RawValue::from("(12.50)")),
        Ok(Some(Value::Float(-12.5)))
    );
}

#[test]
fn test_float_rejects_non_finite() {
    assert!(convert(FieldType::Float, &RawValue::Float(f64::NAN)).is_err());
    assert!(convert(FieldType::Float, &RawValue::from("inf")).is_err());
    assert!(convert(FieldType::Float, &RawValue::from("1e400")).is_err());
}

#[test]
fn test_float_near_the_limit_stays_finite() {
    assert_eq!(
        convert(FieldType::Float, &RawValue::from("1e307")),
        Ok(Some(Value::Float(1e307)))
    );
    assert_eq!(
        convert(FieldType::Float, &RawValue::Float(-1.7e308)),
        Ok(Some(Value::Float(-1.7e308)))
    );
}

// ============================================================================
// Bool
// ============================================================================

#[test]
fn test_bool_from_one() {
    assert_eq!(
        convert(FieldType::Bool, &RawValue::Int(1)),
        Ok(Some(Value::Bool(true)))
    );
}

#[test]
fn test_bool_from_text() {
    assert_eq!(
        convert(FieldType::Bool, &RawValue::from("TRUE")),
        Ok(Some(Value::Bool(true)))
    );
    assert_eq!(
        convert(FieldType::Bool, &RawValue::from("False")),
        Ok(Some(Value::Bool(false)))
    );
}

#[test]
fn test_bool_rejects_other_text() {
    assert!(convert(FieldType::Bool, &RawValue::from("maybe")).is_err());
    assert!(convert(FieldType::Bool, &RawValue::Int(2)).is_err());
}

#[test]
fn test_bool_empty_is_false() {
    assert_eq!(
        convert(FieldType::Bool, &RawValue::from("")),
        Ok(Some(Value::Bool(false)))
    );
}

// ============================================================================
// Date
// ============================================================================

#[test]
fn test_date_from_iso_string() {
    assert_eq!(
        convert(FieldType::Date, &RawValue::from("2020-01-01")),
        Ok(Some(Value::Date(date(2020, 1, 1))))
    );
}

#[test]
fn test_date_truncates_timestamps() {
    assert_eq!(
        convert(FieldType::Date, &RawValue::from("2020-03-04 17:30:00")),
        Ok(Some(Value::Date(date(2020, 3, 4))))
    );
    let dt = NaiveDateTime::parse_from_str("2021-06-07 08:09:10", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(
        convert(FieldType::Date, &RawValue::from(dt)),
        Ok(Some(Value::Date(date(2021, 6, 7))))
    );
}

#[test]
fn test_date_rejects_garbage() {
    assert!(convert(FieldType::Date, &RawValue::from("not-a-date")).is_err());
    assert!(convert(FieldType::Date, &RawValue::from("2020-02-30")).is_err());
    assert!(convert(FieldType::Date, &RawValue::Int(20200101)).is_err());
}

#[test]
fn test_date_rejects_non_ascii_digits() {
    for input in ["2020-01-0\u{0661}", "\u{0662}\u{0660}20-01-01", "2020-01-0\u{0661}T00:00"] {
        let err = convert(FieldType::Date, &RawValue::from(input)).unwrap_err();
        assert_eq!(err.field_type, FieldType::Date);
    }
}

#[test]
fn test_date_empty_is_absent() {
    assert_eq!(convert(FieldType::Date, &RawValue::from("  ")), Ok(None));
}

// ============================================================================
// Str
// ============================================================================

#[test]
fn test_str_renders_scalars() {
    assert_eq!(
        convert(FieldType::Str, &RawValue::Int(42)),
        Ok(Some(Value::Str("42".into())))
    );
    assert_eq!(
        convert(FieldType::Str, &RawValue::Bool(true)),
        Ok(Some(Value::Str("True".into())))
    );
}

// ============================================================================
// Round trips through display formatting
// ============================================================================

#[test]
fn test_formatted_int_converts_back() {
    let shown = format(FieldType::Int, &RawValue::Int(5), Some(FieldFormat::Int))
        .unwrap()
        .unwrap();
    assert_eq!(
        convert(FieldType::Int, &RawValue::from(shown)),
        Ok(Some(Value::Int(5)))
    );
}

#[test]
fn test_formatted_currency_converts_back() {
    let shown = format(
        FieldType::Float,
        &RawValue::Float(-1234.5),
        Some(FieldFormat::Currency),
    )
    .unwrap()
    .unwrap();
    assert_eq!(shown, "-$1,234.50");
    assert_eq!(
        convert(FieldType::Float, &RawValue::from(shown)),
        Ok(Some(Value::Float(-1234.5)))
    );
}
