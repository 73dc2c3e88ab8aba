//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - No native boolean (BIT, 1/0)
//! - OFFSET FETCH instead of LIMIT (requires ORDER BY)
//! - N'...' prefix for Unicode strings
//! - String concatenation with `+`
//! - No IF NOT EXISTS on CREATE TABLE

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;
use crate::value::FieldType;

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_limit(&self, limit: u64) -> TokenStream {
        helpers::emit_fetch_next(limit)
    }

    fn requires_order_by_for_limit(&self) -> bool {
        true
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }

    fn format_date_literal(&self, date: &str) -> String {
        // T-SQL doesn't support DATE 'YYYY-MM-DD' syntax
        format!("'{}'", date)
    }

    fn column_type(&self, ft: FieldType) -> &'static str {
        helpers::column_type_tsql(ft)
    }

    fn supports_if_not_exists(&self) -> bool {
        false
    }
}
