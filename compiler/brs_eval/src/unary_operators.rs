//! Unary operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch for unary operations. The operand
//! arrives unboxed.

use brs_ir::{Location, UnaryOp};
use brs_values::{operator_mismatch, Operand, RuntimeError, Value};

/// Evaluate a unary operation.
///
/// `-` negates numbers, `not` complements booleans and numbers, `+`
/// passes any value through. A mismatch is reported at the operator.
pub fn evaluate_unary(op: UnaryOp, operand: Value, at: &Location) -> Result<Value, RuntimeError> {
    match (op, &operand) {
        (UnaryOp::Plus, _) => Ok(operand),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOp::Negate | UnaryOp::Not, other) => match other.as_number() {
            Some(n) if op == UnaryOp::Negate => Ok(n.negate().into()),
            Some(n) => Ok(n.not().into()),
            None => Err(operator_mismatch(
                op.symbol(),
                Operand::of(&operand, at.clone()),
                None,
            )),
        },
    }
}

#[cfg(test)]
mod tests;
