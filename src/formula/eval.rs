//! Formula evaluation.
//!
//! A formula evaluates over any [`Arithmetic`] domain: plain numbers for
//! checking values, SQL expressions for composing a calculated column.

use super::{ArithOp, Formula, Operand};
use crate::error::EvaluationError;
use crate::sql::expr::{lit_float, paren, BinaryOperator, Expr, ExprExt, Literal};

/// A value domain formulas can be evaluated in.
pub trait Arithmetic: Sized {
    fn number(value: f64) -> Self;

    fn apply(self, op: ArithOp, rhs: Self) -> Result<Self, EvaluationError>;

    /// Mark a parenthesized sub-formula.
    fn group(self) -> Self {
        self
    }
}

impl Arithmetic for f64 {
    fn number(value: f64) -> Self {
        value
    }

    fn apply(self, op: ArithOp, rhs: Self) -> Result<Self, EvaluationError> {
        Ok(match op {
            ArithOp::Add => self + rhs,
            ArithOp::Sub => self - rhs,
            ArithOp::Mul => self * rhs,
            ArithOp::Div if rhs == 0.0 => return Err(EvaluationError::DivisionByZero),
            ArithOp::Div => self / rhs,
        })
    }
}

impl Arithmetic for Expr {
    fn number(value: f64) -> Self {
        lit_float(value)
    }

    fn apply(self, op: ArithOp, rhs: Self) -> Result<Self, EvaluationError> {
        if op == ArithOp::Div && is_literal_zero(&rhs) {
            return Err(EvaluationError::DivisionByZero);
        }
        // SQL applies precedence; keep the left-to-right grouping explicit.
        let lhs = match self {
            Expr::BinaryOp { .. } => paren(self),
            other => other,
        };
        Ok(lhs.binary(op.into(), rhs))
    }

    fn group(self) -> Self {
        match self {
            Expr::BinaryOp { .. } => paren(self),
            other => other,
        }
    }
}

fn is_literal_zero(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Float(f)) => *f == 0.0,
        Expr::Literal(Literal::Int(n)) => *n == 0,
        Expr::Paren(inner) => is_literal_zero(inner),
        _ => false,
    }
}

impl From<ArithOp> for BinaryOperator {
    fn from(op: ArithOp) -> Self {
        match op {
            ArithOp::Add => BinaryOperator::Plus,
            ArithOp::Sub => BinaryOperator::Minus,
            ArithOp::Mul => BinaryOperator::Mul,
            ArithOp::Div => BinaryOperator::Div,
        }
    }
}

/// Evaluate `formula`, resolving field operands by display name.
///
/// Operators apply strictly left to right. A name missing from `lookup` is
/// an error, never a zero.
pub fn evaluate<S, F>(formula: &Formula, lookup: &F) -> Result<S, EvaluationError>
where
    S: Arithmetic,
    F: Fn(&str) -> Option<S>,
{
    formula
        .tail
        .iter()
        .try_fold(operand(&formula.head, lookup)?, |acc, (op, rhs)| {
            acc.apply(*op, operand(rhs, lookup)?)
        })
}

fn operand<S, F>(operand: &Operand, lookup: &F) -> Result<S, EvaluationError>
where
    S: Arithmetic,
    F: Fn(&str) -> Option<S>,
{
    match operand {
        Operand::Number(n) => Ok(S::number(*n)),
        Operand::Field(name) => {
            lookup(name).ok_or_else(|| EvaluationError::UnknownOperand(name.clone()))
        }
        Operand::Group(inner) => Ok(evaluate(inner, lookup)?.group()),
    }
}
