//! DML (Data Manipulation Language) support.
//!
//! Row writes on a table are expressed as these statements; the caller's
//! executor runs them.
//!
//! # Examples
//!
//! ```ignore
//! use constellation::sql::dml::{Insert, Update, Delete};
//! use constellation::sql::expr::{lit_int, lit_str, table_col, ExprExt};
//!
//! let insert = Insert::into("customers")
//!     .columns(["name", "email"])
//!     .values([lit_str("Alice"), lit_str("alice@example.com")]);
//!
//! let update = Update::table("customers")
//!     .set("status", lit_str("active"))
//!     .filter(table_col("customers", "id").eq(lit_int(1)));
//!
//! let delete = Delete::from("customers")
//!     .filter(table_col("customers", "id").eq(lit_int(1)));
//! ```

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Expr>>,
}

impl Insert {
    /// Create a new INSERT statement.
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Set the columns to insert.
    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = cols.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Add a row of values.
    pub fn values(mut self, vals: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.values
            .push(vals.into_iter().map(|v| v.into()).collect());
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Insert).space().push(Token::Into).space();
        ts.push(Token::Ident(self.table.clone()));

        if !self.columns.is_empty() {
            ts.space().lparen();
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.push(Token::Ident(col.clone()));
            }
            ts.rparen();
        }

        if !self.values.is_empty() {
            ts.space().push(Token::Values);
            for (row_idx, row) in self.values.iter().enumerate() {
                if row_idx > 0 {
                    ts.comma();
                }
                ts.space().lparen();
                for (i, val) in row.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&val.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }
        }

        ts
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Update {
    pub table: String,
    pub set: Vec<(String, Expr)>,
    pub filter: Option<Expr>,
}

impl Update {
    /// Create a new UPDATE statement.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            set: Vec::new(),
            filter: None,
        }
    }

    /// Set a column to a value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    /// Add WHERE clause.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Update).space();
        ts.push(Token::Ident(self.table.clone()));

        ts.space().push(Token::Set).space();
        for (i, (col, expr)) in self.set.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(col.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&expr.to_tokens_for_dialect(dialect));
        }

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens_for_dialect(dialect));
        }

        ts
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Delete {
    pub table: String,
    pub filter: Option<Expr>,
}

impl Delete {
    /// Create a new DELETE statement.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
        }
    }

    /// Add WHERE clause.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Delete).space().push(Token::From).space();
        ts.push(Token::Ident(self.table.clone()));

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens_for_dialect(dialect));
        }

        ts
    }
}
