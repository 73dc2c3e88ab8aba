//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::{Dialect, SqlDialect};
use crate::value::FieldType;

/// Every element a composed plan or row statement can contain.
///
/// Tokens whose text depends on the dialect are rendered by
/// [`Token::serialize`]; the rest come from one fixed table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Query Keywords ===
    Select,
    From,
    Where,
    And,
    Not,
    As,
    On,
    Left,
    Outer,
    Join,
    GroupBy,
    OrderBy,
    Asc,
    Desc,
    Limit,
    Offset,
    Fetch,
    Next,
    Rows,
    Only,
    Like,
    Escape,
    Cast,

    // === DDL Keywords ===
    Create,
    Table,
    Primary,
    Key,
    References,
    Default,
    If,
    Exists,

    // === DML Keywords ===
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Concat,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Simple identifier (table, column, alias)
    Ident(String),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// ISO date literal (`YYYY-MM-DD`)
    LitDate(String),
    /// NULL literal
    LitNull,
    /// Column type for a field type, named by the dialect.
    ColumnType(FieldType),

    /// Function name, upper-cased.
    FunctionName(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::LitInt(n) => n.to_string(),
            // No dialect has a portable literal for NaN or infinity.
            Token::LitFloat(f) if !f.is_finite() => "NULL".into(),
            Token::LitFloat(f) => ryu::Buffer::new().format_finite(*f).to_string(),
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitBool(b) => dialect.format_bool(*b).into(),
            Token::LitDate(d) => dialect.format_date_literal(d),
            Token::ColumnType(ft) => dialect.column_type(*ft).into(),
            Token::Concat => dialect.concat_operator().into(),
            Token::FunctionName(name) => name.to_uppercase(),
            Token::Indent(n) => "  ".repeat(*n),
            fixed => fixed.text().into(),
        }
    }

    /// Text of a token that reads the same in every dialect.
    fn text(&self) -> &'static str {
        match self {
            Token::Select => "SELECT",
            Token::From => "FROM",
            Token::Where => "WHERE",
            Token::And => "AND",
            Token::Not => "NOT",
            Token::As => "AS",
            Token::On => "ON",
            Token::Left => "LEFT",
            Token::Outer => "OUTER",
            Token::Join => "JOIN",
            Token::GroupBy => "GROUP BY",
            Token::OrderBy => "ORDER BY",
            Token::Asc => "ASC",
            Token::Desc => "DESC",
            Token::Limit => "LIMIT",
            Token::Offset => "OFFSET",
            Token::Fetch => "FETCH",
            Token::Next => "NEXT",
            Token::Rows => "ROWS",
            Token::Only => "ONLY",
            Token::Like => "LIKE",
            Token::Escape => "ESCAPE",
            Token::Cast => "CAST",

            Token::Create => "CREATE",
            Token::Table => "TABLE",
            Token::Primary => "PRIMARY",
            Token::Key => "KEY",
            Token::References => "REFERENCES",
            Token::Default => "DEFAULT",
            Token::If => "IF",
            Token::Exists => "EXISTS",

            Token::Insert => "INSERT",
            Token::Into => "INTO",
            Token::Values => "VALUES",
            Token::Update => "UPDATE",
            Token::Set => "SET",
            Token::Delete => "DELETE",

            Token::Comma => ",",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Space => " ",
            Token::Newline => "\n",

            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Mul => "*",
            Token::Div => "/",

            Token::LitNull => "NULL",

            Token::Ident(_)
            | Token::LitInt(_)
            | Token::LitFloat(_)
            | Token::LitString(_)
            | Token::LitBool(_)
            | Token::LitDate(_)
            | Token::ColumnType(_)
            | Token::Concat
            | Token::FunctionName(_)
            | Token::Indent(_) => "",
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
