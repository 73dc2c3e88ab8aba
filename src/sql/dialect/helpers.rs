//! Shared helper functions for SQL dialect implementations.
//!
//! Dialects compose these to implement `SqlDialect` with minimal duplication.

use super::super::token::{Token, TokenStream};
use crate::value::FieldType;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string for dialects where backslash escapes inside literals.
/// Used by: MySQL
pub fn quote_string_backslash(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Quote string with N prefix for Unicode (T-SQL).
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres, DuckDB
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: T-SQL, MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `OFFSET 0 ROWS FETCH NEXT n ROWS ONLY` (T-SQL style).
/// Only valid after an ORDER BY clause.
pub fn emit_fetch_next(limit: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Offset)
        .space()
        .push(Token::LitInt(0))
        .space()
        .push(Token::Rows)
        .space()
        .push(Token::Fetch)
        .space()
        .push(Token::Next)
        .space()
        .push(Token::LitInt(limit as i64))
        .space()
        .push(Token::Rows)
        .space()
        .push(Token::Only);
    ts
}

// =============================================================================
// Column Types
// =============================================================================

/// Column types for MySQL.
pub fn column_type_mysql(ft: FieldType) -> &'static str {
    match ft {
        FieldType::Bool => "TINYINT(1)",
        FieldType::Int => "BIGINT",
        FieldType::Float => "DOUBLE",
        FieldType::Str => "TEXT",
        FieldType::Date => "DATE",
    }
}

/// Column types for T-SQL.
pub fn column_type_tsql(ft: FieldType) -> &'static str {
    match ft {
        FieldType::Bool => "BIT",
        FieldType::Int => "BIGINT",
        FieldType::Float => "FLOAT",
        FieldType::Str => "NVARCHAR(MAX)",
        FieldType::Date => "DATE",
    }
}

/// Column types for SQLite (type affinity names).
pub fn column_type_sqlite(ft: FieldType) -> &'static str {
    match ft {
        FieldType::Bool => "BOOLEAN",
        FieldType::Int => "INTEGER",
        FieldType::Float => "REAL",
        FieldType::Str => "TEXT",
        FieldType::Date => "DATE",
    }
}
