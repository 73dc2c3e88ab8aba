//! Tests for calculated-field formulas: parsing, evaluation and SQL output.

use constellation::error::EvaluationError;
use constellation::formula::{evaluate, parse, ArithOp, Formula, Operand};
use constellation::sql::expr::{table_col, Expr};
use constellation::sql::Dialect;

fn field(name: &str) -> Operand {
    Operand::Field(name.into())
}

fn numbers(name: &str) -> Option<f64> {
    match name {
        "A" => Some(2.0),
        "B" => Some(3.0),
        "C" => Some(4.0),
        "Zero" => Some(0.0),
        _ => None,
    }
}

fn columns(name: &str) -> Option<Expr> {
    match name {
        "Price" => Some(table_col("orders", "price")),
        "Discount" => Some(table_col("orders", "discount")),
        "Qty" => Some(table_col("orders", "quantity")),
        _ => None,
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_two_terms() {
    assert_eq!(
        parse("[A] + [B]").unwrap(),
        Formula {
            head: field("A"),
            tail: vec![(ArithOp::Add, field("B"))],
        }
    );
}

#[test]
fn test_group_nests_left_operand() {
    let formula = parse("([A]+[B])-[C]").unwrap();
    assert_eq!(
        formula.head,
        Operand::Group(Box::new(Formula {
            head: field("A"),
            tail: vec![(ArithOp::Add, field("B"))],
        }))
    );
    assert_eq!(formula.tail, vec![(ArithOp::Sub, field("C"))]);
}

#[test]
fn test_names_may_contain_spaces() {
    let formula = parse("[Unit Price] * [ Qty ]").unwrap();
    assert_eq!(formula.fields(), vec!["Unit Price", "Qty"]);
}

#[test]
fn test_numeric_literals() {
    let formula = parse("[A] * 1.5 - [-2]").unwrap();
    assert_eq!(
        formula.tail,
        vec![
            (ArithOp::Mul, Operand::Number(1.5)),
            (ArithOp::Sub, Operand::Number(-2.0)),
        ]
    );
}

#[test]
fn test_single_term_is_rejected() {
    assert!(parse("[A]").is_err());
    assert!(parse("(([A]))").is_err());
}

#[test]
fn test_malformed_formulas() {
    for source in ["", "[A] +", "[A] ^ [B]", "[A] + [B", "([A] + [B]", "[] + [A]"] {
        let err = parse(source).unwrap_err();
        assert_eq!(err.formula, source, "{source:?} should fail");
    }
}

#[test]
fn test_overflowing_literal_is_rejected() {
    let source = format!("[Price] * {}", "9".repeat(400));
    let err = parse(&source).unwrap_err();
    assert_eq!(err.formula, source);
    assert!(parse("[Price] * 99999999999").is_ok());
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_evaluate_grouped() {
    let formula = parse("([A] + [B]) - [C]").unwrap();
    assert_eq!(evaluate(&formula, &numbers), Ok(1.0));
}

#[test]
fn test_evaluate_is_left_to_right() {
    let formula = parse("[A] + [B] * [C]").unwrap();
    assert_eq!(evaluate(&formula, &numbers), Ok(20.0));
    let grouped = parse("[A] + ([B] * [C])").unwrap();
    assert_eq!(evaluate(&grouped, &numbers), Ok(14.0));
}

#[test]
fn test_evaluate_is_deterministic() {
    let formula = parse("[A] / [C] + [B] * 2").unwrap();
    let first = evaluate(&formula, &numbers);
    for _ in 0..10 {
        assert_eq!(evaluate(&formula, &numbers), first);
    }
}

#[test]
fn test_unknown_operand() {
    let formula = parse("[A] + [Missing]").unwrap();
    assert_eq!(
        evaluate(&formula, &numbers),
        Err(EvaluationError::UnknownOperand("Missing".into()))
    );
}

#[test]
fn test_division_by_zero() {
    let formula = parse("[A] / [Zero]").unwrap();
    assert_eq!(
        evaluate(&formula, &numbers),
        Err(EvaluationError::DivisionByZero)
    );
    let literal = parse("[Price] / 0").unwrap();
    assert_eq!(
        evaluate(&literal, &columns),
        Err(EvaluationError::DivisionByZero)
    );
}

// ============================================================================
// SQL expressions
// ============================================================================

#[test]
fn test_sql_keeps_left_to_right_grouping() {
    let formula = parse("[Price] - [Discount] * [Qty]").unwrap();
    let expr = evaluate(&formula, &columns).unwrap();
    assert_eq!(
        expr.to_sql(Dialect::DuckDb),
        r#"("orders"."price" - "orders"."discount") * "orders"."quantity""#
    );
}

#[test]
fn test_sql_group() {
    let formula = parse("[Price] * ([Qty] + 1)").unwrap();
    let expr = evaluate(&formula, &columns).unwrap();
    assert_eq!(
        expr.to_sql(Dialect::Postgres),
        r#""orders"."price" * ("orders"."quantity" + 1.0)"#
    );
}
