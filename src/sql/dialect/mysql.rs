//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Boolean is TINYINT(1), returns 1/0
//! - `||` is logical OR by default (use CONCAT())
//! - No `DATE` keyword needed for date literals
//! - Backslash is an escape character inside string literals

use super::helpers;
use super::SqlDialect;
use crate::value::FieldType;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_backslash(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn supports_concat_operator(&self) -> bool {
        // MySQL || is OR by default, use CONCAT() instead
        false
    }

    fn format_date_literal(&self, date: &str) -> String {
        helpers::quote_string_backslash(date)
    }

    fn column_type(&self, ft: FieldType) -> &'static str {
        helpers::column_type_mysql(ft)
    }
}
