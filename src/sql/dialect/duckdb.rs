//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible for everything a composed star needs:
//! ANSI identifier quoting, native booleans and `DATE` literals. Its only
//! difference here is the column type name for doubles.

use super::helpers;
use super::SqlDialect;
use crate::value::FieldType;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn column_type(&self, ft: FieldType) -> &'static str {
        match ft {
            FieldType::Float => "DOUBLE",
            FieldType::Str => "VARCHAR",
            other => super::default_column_type(other),
        }
    }
}
