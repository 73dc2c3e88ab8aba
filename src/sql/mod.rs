//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates multi-dialect SQL.
//! It includes:
//!
//! - [`query`] - SELECT query builder (the composed plan of a star or view)
//! - [`expr`] - Expression AST and builder DSL
//! - [`ddl`] - CREATE TABLE for declared tables
//! - [`dml`] - INSERT, UPDATE, DELETE for row writes
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use expr::{
    avg, count, date_of, lit_bool, lit_date, lit_float, lit_int, lit_null, lit_str, paren,
    sum, table_col, BinaryOperator, Expr, ExprExt, Literal, SortDir,
};
pub use query::{Join, OrderByExpr, Query, SelectExpr, TableRef};
pub use token::{Token, TokenStream};

pub use ddl::{ColumnConstraint, ColumnDef, CreateTable};
pub use dml::{Delete, Insert, Update};
