//! Calculated-field formulas.
//!
//! A formula is arithmetic over bracketed field display names and numeric
//! literals, e.g. `([Price] - [Discount]) * [Quantity]`. See [`parser`] for
//! the grammar and [`eval`] for evaluation.

pub mod eval;
pub mod parser;

pub use eval::{evaluate, Arithmetic};
pub use parser::parse;

use std::fmt;

/// The four arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> char {
        match self {
            ArithOp::Add => '+',
            ArithOp::Sub => '-',
            ArithOp::Mul => '*',
            ArithOp::Div => '/',
        }
    }
}

/// One operand of a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A field referenced by display name.
    Field(String),
    Number(f64),
    /// A parenthesized sub-formula.
    Group(Box<Formula>),
}

/// A parsed formula: a head operand and the operations applied to it in
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub head: Operand,
    pub tail: Vec<(ArithOp, Operand)>,
}

impl Formula {
    /// Display names of every field the formula references, in order of
    /// appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_fields(&mut names);
        names
    }

    fn collect_fields<'a>(&'a self, names: &mut Vec<&'a str>) {
        for operand in std::iter::once(&self.head).chain(self.tail.iter().map(|(_, o)| o)) {
            match operand {
                Operand::Field(name) => names.push(name),
                Operand::Group(inner) => inner.collect_fields(names),
                Operand::Number(_) => {}
            }
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(name) => write!(f, "[{name}]"),
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Group(inner) => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (op, operand) in &self.tail {
            write!(f, " {} {operand}", op.symbol())?;
        }
        Ok(())
    }
}
