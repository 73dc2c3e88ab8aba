//! DDL (Data Definition Language) support.
//!
//! Only `CREATE TABLE` is needed: every declared table can describe its
//! own physical schema.
//!
//! # Examples
//!
//! ```ignore
//! use constellation::sql::ddl::{CreateTable, ColumnDef};
//! use constellation::value::FieldType;
//!
//! let table = CreateTable::new("orders")
//!     .column(ColumnDef::new("id", FieldType::Int).primary_key())
//!     .column(ColumnDef::new("customer_id", FieldType::Int).references("customers", "id"));
//! ```

use super::dialect::{Dialect, SqlDialect};
use super::expr::Expr;
use super::token::{Token, TokenStream};
use crate::value::FieldType;

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub if_not_exists: bool,
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl CreateTable {
    /// Create a new CREATE TABLE statement.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            if_not_exists: false,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add IF NOT EXISTS clause.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Add a column definition.
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Add multiple column definitions.
    pub fn columns(mut self, cols: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(cols);
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space().push(Token::Table);

        // IF NOT EXISTS (dialect-specific)
        if self.if_not_exists && dialect.supports_if_not_exists() {
            ts.space()
                .push(Token::If)
                .space()
                .push(Token::Not)
                .space()
                .push(Token::Exists);
        }

        ts.space().push(Token::Ident(self.name.clone()));
        ts.space().lparen();
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1);
            ts.append(&col.to_tokens(dialect));
        }
        ts.newline().rparen();

        ts
    }
}

// ============================================================================
// Column Definition
// ============================================================================

/// Column definition for CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: FieldType,
    pub default: Option<Expr>,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDef {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, data_type: FieldType) -> Self {
        Self {
            name: name.into(),
            data_type,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Set default value.
    pub fn default(mut self, expr: Expr) -> Self {
        self.default = Some(expr);
        self
    }

    /// Add PRIMARY KEY constraint.
    pub fn primary_key(mut self) -> Self {
        self.constraints.push(ColumnConstraint::PrimaryKey);
        self
    }

    /// Add REFERENCES constraint.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.constraints.push(ColumnConstraint::References {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Ident(self.name.clone()));
        ts.space().push(Token::ColumnType(self.data_type));

        if let Some(ref expr) = self.default {
            ts.space()
                .push(Token::Default)
                .space()
                .append(&expr.to_tokens_for_dialect(dialect));
        }

        for constraint in &self.constraints {
            match constraint {
                ColumnConstraint::PrimaryKey => {
                    ts.space().push(Token::Primary).space().push(Token::Key);
                }
                ColumnConstraint::References { table, column } => {
                    ts.space()
                        .push(Token::References)
                        .space()
                        .push(Token::Ident(table.clone()))
                        .lparen()
                        .push(Token::Ident(column.clone()))
                        .rparen();
                }
            }
        }

        ts
    }
}

/// Column-level constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    References { table: String, column: String },
}
