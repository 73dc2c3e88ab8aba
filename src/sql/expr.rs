//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: table.column
    Column {
        table: String,
        column: String,
    },

    /// Literal values
    Literal(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// LIKE with ESCAPE: expr LIKE pattern ESCAPE escape_char
    LikeEscape {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape_char: char,
        negated: bool,
    },

    /// Date part of a value: `CAST(expr AS DATE)` or the dialect's function.
    DateOf(Box<Expr>),

    /// Parenthesized expression
    Paren(Box<Expr>),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// ISO `YYYY-MM-DD` date.
    Date(String),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    // String
    Concat,
}

/// Sort direction (shared with query ORDER BY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Expression to Tokens
// =============================================================================

impl Expr {
    /// Convert this expression to a token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                ts.push(Token::Ident(table.clone()))
                    .push(Token::Dot)
                    .push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Bool(b) => Token::LitBool(*b),
                    Literal::Date(d) => Token::LitDate(d.clone()),
                    Literal::Null => Token::LitNull,
                });
            }

            Expr::BinaryOp { left, op, right } => {
                // Handle CONCAT specially for dialects that don't support || operator
                if *op == BinaryOperator::Concat && !dialect.supports_concat_operator() {
                    ts.push(Token::FunctionName("CONCAT".into()));
                    ts.lparen();
                    ts.append(&left.to_tokens_for_dialect(dialect));
                    ts.comma().space();
                    ts.append(&right.to_tokens_for_dialect(dialect));
                    ts.rparen();
                } else {
                    ts.append(&left.to_tokens_for_dialect(dialect));
                    ts.space();
                    ts.push(binary_op_to_token(*op));
                    ts.space();
                    ts.append(&right.to_tokens_for_dialect(dialect));
                }
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }

            Expr::LikeEscape {
                expr,
                pattern,
                escape_char,
                negated,
            } => {
                ts.append(&expr.to_tokens_for_dialect(dialect));
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space()
                    .push(Token::Like)
                    .space()
                    .append(&pattern.to_tokens_for_dialect(dialect))
                    .space()
                    .push(Token::Escape)
                    .space()
                    .push(Token::LitString(escape_char.to_string()));
            }

            Expr::DateOf(inner) => match dialect.date_only_function() {
                Some(func) => {
                    ts.push(Token::FunctionName(func.into()));
                    ts.lparen();
                    ts.append(&inner.to_tokens_for_dialect(dialect));
                    ts.rparen();
                }
                None => {
                    ts.push(Token::Cast).lparen();
                    ts.append(&inner.to_tokens_for_dialect(dialect));
                    ts.space()
                        .push(Token::As)
                        .space()
                        .push(Token::ColumnType(crate::value::FieldType::Date));
                    ts.rparen();
                }
            },

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens_for_dialect(dialect));
                ts.rparen();
            }
        }

        ts
    }

    /// Render this expression as SQL text for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Concat => Token::Concat,
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: table.into(),
        column: column.into(),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// Create a date literal from an ISO `YYYY-MM-DD` string.
pub fn lit_date(date: &str) -> Expr {
    Expr::Literal(Literal::Date(date.into()))
}

/// Create a NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Strip the time component of an expression.
pub fn date_of(expr: Expr) -> Expr {
    Expr::DateOf(Box::new(expr))
}

/// Wrap an expression in parentheses.
pub fn paren(expr: Expr) -> Expr {
    Expr::Paren(Box::new(expr))
}

// =============================================================================
// Aggregate Functions
// =============================================================================

/// COUNT(expr)
pub fn count(expr: Expr) -> Expr {
    func("COUNT", vec![expr])
}

/// SUM(expr)
pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

/// AVG(expr)
pub fn avg(expr: Expr) -> Expr {
    func("AVG", vec![expr])
}

fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    /// LIKE with ESCAPE clause for matching literal `%` and `_` characters.
    ///
    /// # Example
    /// ```ignore
    /// // Match strings containing literal "100%"
    /// table_col("orders", "discount").like_escape(lit_str("100\\%"), '\\')
    /// ```
    fn like_escape(self, pattern: impl Into<Expr>, escape_char: char) -> Expr {
        Expr::LikeEscape {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape_char,
            negated: false,
        }
    }

    /// NOT LIKE with ESCAPE clause.
    fn not_like_escape(self, pattern: impl Into<Expr>, escape_char: char) -> Expr {
        Expr::LikeEscape {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape_char,
            negated: true,
        }
    }

    fn concat(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Concat, other)
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> super::query::SelectExpr {
        super::query::SelectExpr {
            expr: self.into_expr(),
            alias: Some(name.into()),
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}
