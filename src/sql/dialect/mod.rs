//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (ANSI/PG/DuckDB/SQLite), `` ` `` (MySQL), `[]` (T-SQL)
//! - Row caps: LIMIT vs OFFSET FETCH
//! - Boolean literals: true/false vs 1/0
//! - String concatenation: `||` vs `+` vs CONCAT()
//! - Date literals and date-only normalization
//!
//! # Usage
//!
//! ```ignore
//! use constellation::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("order");  // "order"
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;
mod tsql;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use tsql::TSql;

use std::str::FromStr;

use serde::Deserialize;

use super::token::{Token, TokenStream};
use crate::value::FieldType;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal with single quotes and `''` escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit the row cap.
    ///
    /// - ANSI/PostgreSQL/DuckDB/MySQL/SQLite: `LIMIT n` (default)
    /// - T-SQL: `OFFSET 0 ROWS FETCH NEXT n ROWS ONLY` (override)
    fn emit_limit(&self, limit: u64) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Limit).space().push(Token::LitInt(limit as i64));
        ts
    }

    /// Whether a row cap is only valid after ORDER BY.
    fn requires_order_by_for_limit(&self) -> bool {
        false
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// String concatenation operator.
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// Whether this dialect supports the `||` concat operator.
    ///
    /// MySQL uses `||` as logical OR by default.
    fn supports_concat_operator(&self) -> bool {
        true
    }

    // =========================================================================
    // Date/Time
    // =========================================================================

    /// Format a date literal.
    ///
    /// - ANSI/PostgreSQL/DuckDB: `DATE 'YYYY-MM-DD'`
    /// - T-SQL/MySQL/SQLite: `'YYYY-MM-DD'`
    fn format_date_literal(&self, date: &str) -> String {
        format!("DATE '{}'", date)
    }

    /// Function used to strip the time component of a value.
    ///
    /// `None` renders `CAST(x AS DATE)`.
    fn date_only_function(&self) -> Option<&'static str> {
        None
    }

    // =========================================================================
    // DDL Support
    // =========================================================================

    /// Column type for a field type.
    fn column_type(&self, ft: FieldType) -> &'static str {
        default_column_type(ft)
    }

    /// Whether this dialect supports IF NOT EXISTS for CREATE TABLE.
    fn supports_if_not_exists(&self) -> bool {
        true
    }
}

/// ANSI column type names, shared by the PostgreSQL-like dialects.
pub(crate) fn default_column_type(ft: FieldType) -> &'static str {
    match ft {
        FieldType::Bool => "BOOLEAN",
        FieldType::Int => "BIGINT",
        FieldType::Float => "DOUBLE PRECISION",
        FieldType::Str => "TEXT",
        FieldType::Date => "DATE",
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    DuckDb,
    Postgres,
    Sqlite,
    MySql,
    TSql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::DuckDb => &DuckDb,
            Dialect::Postgres => &Postgres,
            Dialect::Sqlite => &Sqlite,
            Dialect::MySql => &MySql,
            Dialect::TSql => &TSql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn emit_limit(&self, limit: u64) -> TokenStream {
        self.dialect().emit_limit(limit)
    }

    fn requires_order_by_for_limit(&self) -> bool {
        self.dialect().requires_order_by_for_limit()
    }

    fn concat_operator(&self) -> &'static str {
        self.dialect().concat_operator()
    }

    fn supports_concat_operator(&self) -> bool {
        self.dialect().supports_concat_operator()
    }

    fn format_date_literal(&self, date: &str) -> String {
        self.dialect().format_date_literal(date)
    }

    fn date_only_function(&self) -> Option<&'static str> {
        self.dialect().date_only_function()
    }

    fn column_type(&self, ft: FieldType) -> &'static str {
        self.dialect().column_type(ft)
    }

    fn supports_if_not_exists(&self) -> bool {
        self.dialect().supports_if_not_exists()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duckdb" => Ok(Dialect::DuckDb),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::MySql),
            "tsql" | "mssql" | "sqlserver" => Ok(Dialect::TSql),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
