#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use brs_values::ErrorDetail;
use pretty_assertions::assert_eq;

fn at() -> Location {
    Location::on_line("main.brs", 2, 4, 7)
}

#[test]
fn negate_numbers() {
    assert_eq!(evaluate_unary(UnaryOp::Negate, Value::Int32(5), &at()).unwrap(), Value::Int32(-5));
    assert_eq!(evaluate_unary(UnaryOp::Negate, Value::Double(-2.5), &at()).unwrap(), Value::Double(2.5));
}

#[test]
fn negate_min_int32_wraps() {
    let result = evaluate_unary(UnaryOp::Negate, Value::Int32(i32::MIN), &at()).unwrap();
    assert_eq!(result, Value::Int32(i32::MIN));
}

#[test]
fn not_booleans_and_numbers() {
    assert_eq!(evaluate_unary(UnaryOp::Not, Value::Boolean(true), &at()).unwrap(), Value::Boolean(false));
    assert_eq!(evaluate_unary(UnaryOp::Not, Value::Int32(0), &at()).unwrap(), Value::Int32(-1));
}

#[test]
fn plus_passes_through() {
    assert_eq!(evaluate_unary(UnaryOp::Plus, Value::string("x"), &at()).unwrap(), Value::string("x"));
}

#[test]
fn negate_string_is_mismatch_at_operator() {
    let err = evaluate_unary(UnaryOp::Negate, Value::string("x"), &at()).unwrap_err();
    assert_eq!(err.errno, ErrorDetail::TYPE_MISMATCH.errno);
    assert_eq!(err.message, "Type Mismatch. Operator \"-\" can't be applied to \"String\".");
    assert_eq!(err.location, at());
}

#[test]
fn not_invalid_is_mismatch() {
    let err = evaluate_unary(UnaryOp::Not, Value::Invalid, &at()).unwrap_err();
    assert_eq!(err.message, "Type Mismatch. Operator \"not\" can't be applied to \"Invalid\".");
}
