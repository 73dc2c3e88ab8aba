//! SQLite dialect.
//!
//! SQLite stores dates as ISO-8601 text, so:
//! - date literals are plain strings
//! - date-only normalization uses the `DATE()` function; `CAST(x AS DATE)`
//!   would apply numeric affinity and yield the year
//! - booleans are stored as 1/0

use super::helpers;
use super::SqlDialect;
use crate::value::FieldType;

/// SQLite dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_date_literal(&self, date: &str) -> String {
        helpers::quote_string_single(date)
    }

    fn date_only_function(&self) -> Option<&'static str> {
        Some("DATE")
    }

    fn column_type(&self, ft: FieldType) -> &'static str {
        helpers::column_type_sqlite(ft)
    }
}
