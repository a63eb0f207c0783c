//! Binary operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch for binary operations. The value
//! kinds are fixed, so pattern matching is preferred over trait objects.
//! Both operands arrive already unboxed; `and`/`or` are split in two so
//! the interpreter can short-circuit before evaluating the right side.

use brs_ir::{BinaryOp, Location};
use brs_values::{
    operator_mismatch, runtime_error, BitwiseOperand, BitwiseResult, ErrorDetail,
    Number, Operand, RuntimeError, Value,
};

/// Locations of the two operand expressions, for error reporting.
#[derive(Copy, Clone)]
pub struct OperandLocations<'a> {
    pub left: &'a Location,
    pub right: &'a Location,
}

#[cold]
fn mismatch(op: BinaryOp, left: &Value, right: &Value, at: OperandLocations<'_>) -> RuntimeError {
    operator_mismatch(
        op.symbol(),
        Operand::of(left, at.left.clone()),
        Some(Operand::of(right, at.right.clone())),
    )
}

/// A shift count must lie in `0..32`.
fn valid_shift(count: Number) -> bool {
    count.is_positive_or_nan() && count.as_f64() < 32.0
}

/// Whether `=`/`<>` may compare the two (unboxed) operands.
///
/// Anything compares against `invalid`; otherwise both sides must be
/// primitive kinds. Components that do not unbox are a mismatch.
fn can_check_equality(left: &Value, right: &Value) -> bool {
    if left.is_invalid() || right.is_invalid() {
        return true;
    }
    left.kind().is_comparable_primitive() && right.kind().is_comparable_primitive()
}

/// Evaluate every binary operator except `and`/`or`.
///
/// Operands must already be unboxed.
pub fn evaluate_binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    at: OperandLocations<'_>,
) -> Result<Value, RuntimeError> {
    let numbers = left.as_number().zip(right.as_number());
    match op {
        BinaryOp::Add => match (numbers, left, right) {
            (Some((a, b)), _, _) => Ok(a.add(b).into()),
            (None, Value::String(a), Value::String(b)) => {
                let mut joined = String::with_capacity(a.len().saturating_add(b.len()));
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::string(joined))
            }
            _ => Err(mismatch(op, left, right, at)),
        },
        BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Pow
        | BinaryOp::Mod
        | BinaryOp::IntDiv => {
            let (a, b) = numbers.ok_or_else(|| mismatch(op, left, right, at))?;
            let result = match op {
                BinaryOp::Sub => a.sub(b),
                BinaryOp::Mul => a.mul(b),
                BinaryOp::Div => a.div(b),
                BinaryOp::Mod => a.modulo(b),
                BinaryOp::IntDiv => a.int_divide(b),
                _ => a.pow(b),
            };
            Ok(result.into())
        }
        BinaryOp::Shl | BinaryOp::Shr => {
            let (a, b) = numbers.ok_or_else(|| mismatch(op, left, right, at))?;
            if !valid_shift(b) {
                return Err(runtime_error(ErrorDetail::BAD_BIT_SHIFT, at.right.clone()));
            }
            let result = if op == BinaryOp::Shl { a.shl(b) } else { a.shr(b) };
            Ok(result.into())
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordered = numbers.is_some()
                || matches!((left, right), (Value::String(_), Value::String(_)));
            if !ordered {
                return Err(mismatch(op, left, right, at));
            }
            let result = match op {
                BinaryOp::Lt => left.less_than(right),
                BinaryOp::Gt => left.greater_than(right),
                BinaryOp::LtEq => left.less_than(right) || left.equal_to(right),
                _ => left.greater_than(right) || left.equal_to(right),
            };
            Ok(Value::Boolean(result))
        }
        BinaryOp::Eq | BinaryOp::NotEq => {
            if !can_check_equality(left, right) {
                return Err(mismatch(op, left, right, at));
            }
            let equal = left.equal_to(right);
            Ok(Value::Boolean(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::And | BinaryOp::Or => evaluate_logical(op, left, right, at),
    }
}

/// The result of `and`/`or` when the left operand alone decides it.
///
/// `false and x` is `false` and `true or x` is `true`; the right side
/// is never evaluated for those.
pub fn short_circuit(op: BinaryOp, left: &Value) -> Option<Value> {
    match (op, left) {
        (BinaryOp::And, Value::Boolean(false)) => Some(Value::Boolean(false)),
        (BinaryOp::Or, Value::Boolean(true)) => Some(Value::Boolean(true)),
        _ => None,
    }
}

/// Whether the right side of `and`/`or` should be evaluated at all.
///
/// A left side that is neither boolean nor numeric is a mismatch before
/// the right side runs.
pub fn needs_right_operand(left: &Value) -> bool {
    matches!(left, Value::Boolean(_)) || left.as_number().is_some()
}

/// `and`/`or` once both (unboxed) operands are known.
///
/// Booleans give logical results, two numbers give bitwise results and a
/// mixed pair follows the numeric tower: a boolean on either side
/// switches to a logical result.
pub fn evaluate_logical(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    at: OperandLocations<'_>,
) -> Result<Value, RuntimeError> {
    let is_and = op == BinaryOp::And;
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => {
            Ok(Value::Boolean(if is_and { *a && *b } else { *a || *b }))
        }
        (Value::Boolean(a), other) => match other.as_number() {
            Some(n) => {
                let b = n.to_boolean();
                Ok(Value::Boolean(if is_and { *a && b } else { *a || b }))
            }
            None => Err(mismatch(op, left, right, at)),
        },
        (lhs, rhs) => {
            let Some(a) = lhs.as_number() else {
                return Err(mismatch(op, left, right, at));
            };
            let operand = match rhs {
                Value::Boolean(b) => BitwiseOperand::Boolean(*b),
                other => match other.as_number() {
                    Some(n) => BitwiseOperand::Number(n),
                    None => return Err(mismatch(op, left, right, at)),
                },
            };
            let result = if is_and { a.and(operand) } else { a.or(operand) };
            Ok(match result {
                BitwiseResult::Number(n) => n.into(),
                BitwiseResult::Boolean(b) => Value::Boolean(b),
            })
        }
    }
}

#[cfg(test)]
mod tests;
