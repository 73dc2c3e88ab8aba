//! Tests for display formatting.

use chrono::{NaiveDate, NaiveDateTime};
use constellation::value::{format, FieldFormat, FieldType, RawValue};

fn shown(field_type: FieldType, raw: impl Into<RawValue>, fmt: Option<FieldFormat>) -> String {
    format(field_type, &raw.into(), fmt)
        .expect("value converts")
        .expect("value is present")
}

#[test]
fn test_null_formats_to_nothing() {
    assert_eq!(format(FieldType::Float, &RawValue::Null, None), Ok(None));
}

#[test]
fn test_int_groups_thousands() {
    assert_eq!(shown(FieldType::Int, 1234567, None), "1,234,567");
    assert_eq!(shown(FieldType::Int, -1234, None), "-1,234");
    assert_eq!(shown(FieldType::Int, 12, None), "12");
}

#[test]
fn test_large_int_keeps_every_digit() {
    assert_eq!(
        shown(FieldType::Int, RawValue::Int(9_007_199_254_740_993), None),
        "9,007,199,254,740,993"
    );
    assert_eq!(
        shown(FieldType::Int, RawValue::Int(i64::MIN), None),
        "-9,223,372,036,854,775,808"
    );
}

#[test]
fn test_float_two_decimals() {
    assert_eq!(shown(FieldType::Float, 2.5, None), "2.50");
    assert_eq!(shown(FieldType::Float, -1234.5, None), "-1,234.50");
}

#[test]
fn test_currency_and_accounting() {
    assert_eq!(
        shown(FieldType::Float, 1234.5, Some(FieldFormat::Currency)),
        "$1,234.50"
    );
    assert_eq!(
        shown(FieldType::Float, -1234.5, Some(FieldFormat::Accounting)),
        "(1,234.50)"
    );
    assert_eq!(
        shown(FieldType::Float, 99.0, Some(FieldFormat::Accounting)),
        "99.00"
    );
}

#[test]
fn test_currency_applies_to_ints() {
    assert_eq!(shown(FieldType::Int, 5, Some(FieldFormat::Currency)), "$5.00");
}

#[test]
fn test_date_formats_iso() {
    let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    assert_eq!(shown(FieldType::Date, d, None), "2020-01-01");
    assert_eq!(shown(FieldType::Date, "2020-01-01", None), "2020-01-01");
}

#[test]
fn test_datetime_keeps_time_only_for_timestamps() {
    let dt = NaiveDateTime::parse_from_str("2021-06-07 08:09:10", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(
        shown(FieldType::Date, dt, Some(FieldFormat::DateTime)),
        "2021-06-07 08:09:10"
    );
    assert_eq!(
        shown(FieldType::Date, "2021-06-07", Some(FieldFormat::DateTime)),
        "2021-06-07"
    );
}

#[test]
fn test_bool_and_str() {
    assert_eq!(shown(FieldType::Bool, true, None), "True");
    assert_eq!(shown(FieldType::Str, "Ada", None), "Ada");
}

#[test]
fn test_unconvertible_value_is_an_error() {
    assert!(format(FieldType::Int, &RawValue::from("lots"), None).is_err());
}
