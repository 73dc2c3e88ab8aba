//! SELECT statements for composed stars, views and lookup caches.
//!
//! Every join a plan needs is a LEFT OUTER JOIN from the fact table, and every
//! plan is capped by the display row limit, so [`Query`] models exactly that.
//! Rendering it for a dialect is the last step and never fails.

use super::dialect::{Dialect, SqlDialect};
use super::expr::{Expr, ExprExt, SortDir};
use super::token::{Token, TokenStream};

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

/// A table in FROM or JOIN. Columns are always qualified by its bare name.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub table: String,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
        }
    }

    fn token(&self) -> Token {
        Token::Ident(self.table.clone())
    }
}

/// `LEFT OUTER JOIN table ON condition`. Fact rows survive a missing
/// dimension row.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Left)
            .space()
            .push(Token::Outer)
            .space()
            .push(Token::Join)
            .space()
            .push(self.table.token())
            .space()
            .push(Token::On)
            .space()
            .append(&self.on.to_tokens_for_dialect(dialect));
        ts
    }
}

/// An ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn new(expr: Expr, dir: SortDir) -> Self {
        Self { expr, dir }
    }

    pub fn asc(expr: Expr) -> Self {
        Self::new(expr, SortDir::Asc)
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        ts.space().push(match self.dir {
            SortDir::Asc => Token::Asc,
            SortDir::Desc => Token::Desc,
        });
        ts
    }
}

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until rendered with to_sql()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(Into::into).collect();
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    pub fn left_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join { table, on });
        self
    }

    /// Add a WHERE condition, ANDed with any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Cap the number of rows returned.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline()
                .indent(1)
                .append(&item.to_tokens_for_dialect(dialect));
        }

        if let Some(from) = &self.from {
            ts.newline().push(Token::From).space().push(from.token());
        }

        for join in &self.joins {
            ts.newline().append(&join.to_tokens_for_dialect(dialect));
        }

        if let Some(condition) = &self.where_clause {
            ts.newline()
                .push(Token::Where)
                .space()
                .append(&condition.to_tokens_for_dialect(dialect));
        }

        if !self.group_by.is_empty() {
            ts.newline().push(Token::GroupBy).space();
            push_list(&mut ts, &self.group_by, |e| e.to_tokens_for_dialect(dialect));
        }

        if !self.order_by.is_empty() {
            ts.newline().push(Token::OrderBy).space();
            push_list(&mut ts, &self.order_by, |o| o.to_tokens_for_dialect(dialect));
        } else if self.limit.is_some() && dialect.requires_order_by_for_limit() {
            // Row order is unspecified here, same as a plain LIMIT elsewhere.
            ts.newline()
                .push(Token::OrderBy)
                .space()
                .lparen()
                .push(Token::Select)
                .space()
                .push(Token::LitNull)
                .rparen();
        }

        if let Some(limit) = self.limit {
            ts.newline().append(&dialect.emit_limit(limit));
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

/// Comma-separated items on one line.
fn push_list<T>(ts: &mut TokenStream, items: &[T], render: impl Fn(&T) -> TokenStream) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&render(item));
    }
}

impl std::fmt::Display for Query {
    /// Renders for the default dialect (DuckDB).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(Dialect::default()))
    }
}
