//! Calculated-field formula parser using chumsky.
//!
//! Grammar:
//!
//! ```text
//! formula := operand (op operand)+
//! operand := '[' name ']' | number | '(' formula ')'
//! op      := '+' | '-' | '*' | '/'
//! ```
//!
//! Operators have no precedence. A formula is a head operand followed by
//! `(op, operand)` pairs applied left to right; parentheses are the only
//! way to group. A bracketed number (`[-1]`) is a literal, not a field.

use chumsky::prelude::*;

use super::{ArithOp, Formula, Operand};
use crate::error::FormulaError;

/// Create the formula parser.
pub fn parser<'src>() -> impl Parser<'src, &'src str, Formula, extra::Err<Rich<'src, char>>> {
    recursive(|formula| {
        let number = just('-')
            .or_not()
            .then(text::digits(10))
            .then(just('.').then(text::digits(10)).or_not())
            .to_slice()
            .map(|s: &str| match s.parse::<f64>() {
                Ok(n) => Operand::Number(n),
                Err(_) => Operand::Field(s.to_string()),
            });

        let bracketed = none_of(']')
            .repeated()
            .at_least(1)
            .to_slice()
            .delimited_by(just('['), just(']'))
            .map(bracket_operand);

        let group = formula
            .delimited_by(just('('), just(')'))
            .map(|inner| Operand::Group(Box::new(inner)));

        let operand = choice((bracketed, number, group)).padded();

        let op = choice((
            just('+').to(ArithOp::Add),
            just('-').to(ArithOp::Sub),
            just('*').to(ArithOp::Mul),
            just('/').to(ArithOp::Div),
        ))
        .padded();

        operand
            .clone()
            .then(op.then(operand).repeated().at_least(1).collect::<Vec<_>>())
            .map(|(head, tail)| Formula { head, tail })
    })
    .then_ignore(end())
}

/// Bracket contents: a literal when numeric, otherwise a field display name.
fn bracket_operand(contents: &str) -> Operand {
    let trimmed = contents.trim();
    let numeric = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '.');
    match trimmed.parse::<f64>() {
        Ok(n) if numeric => Operand::Number(n),
        _ => Operand::Field(trimmed.to_string()),
    }
}

/// A literal too large for `f64` parses as infinity.
fn has_non_finite(formula: &Formula) -> bool {
    std::iter::once(&formula.head)
        .chain(formula.tail.iter().map(|(_, operand)| operand))
        .any(|operand| match operand {
            Operand::Number(n) => !n.is_finite(),
            Operand::Group(inner) => has_non_finite(inner),
            Operand::Field(_) => false,
        })
}

/// Parse a formula.
pub fn parse(source: &str) -> Result<Formula, FormulaError> {
    let (formula, errs) = parser().parse(source).into_output_errors();
    match formula {
        Some(formula) if errs.is_empty() && has_non_finite(&formula) => Err(FormulaError {
            formula: source.to_string(),
            message: "numeric literal is out of range".to_string(),
        }),
        Some(formula) if errs.is_empty() => Ok(formula),
        _ => Err(FormulaError {
            formula: source.to_string(),
            message: if errs.is_empty() {
                "empty formula".to_string()
            } else {
                errs.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        }),
    }
}
