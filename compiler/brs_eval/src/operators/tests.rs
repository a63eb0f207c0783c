#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use brs_values::Float;
use pretty_assertions::assert_eq;

fn left_loc() -> Location {
    Location::on_line("main.brs", 3, 4, 5)
}

fn right_loc() -> Location {
    Location::on_line("main.brs", 3, 9, 10)
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (l, r) = (left_loc(), right_loc());
    evaluate_binary(op, &left, &right, OperandLocations { left: &l, right: &r })
}

fn logical(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (l, r) = (left_loc(), right_loc());
    evaluate_logical(op, &left, &right, OperandLocations { left: &l, right: &r })
}

#[test]
fn add_numbers_and_concatenate_strings() {
    assert_eq!(binary(BinaryOp::Add, Value::Int32(2), Value::Int32(3)).unwrap(), Value::Int32(5));
    assert_eq!(
        binary(BinaryOp::Add, Value::string("foo"), Value::string("bar")).unwrap(),
        Value::string("foobar")
    );
}

#[test]
fn add_string_and_number_is_mismatch() {
    let err = binary(BinaryOp::Add, Value::string("a"), Value::Int32(1)).unwrap_err();
    assert_eq!(err.errno, ErrorDetail::TYPE_MISMATCH.errno);
    assert_eq!(
        err.message,
        "Type Mismatch. Operator \"+\" can't be applied to \"String\" and \"Integer\"."
    );
    assert_eq!(err.location, left_loc());
}

#[test]
fn mixed_kinds_promote() {
    let result = binary(BinaryOp::Mul, Value::Int32(2), Value::Double(1.5)).unwrap();
    assert_eq!(result, Value::Double(3.0));
    let result = binary(BinaryOp::Sub, Value::Int64(10), Value::Int32(4)).unwrap();
    assert_eq!(result, Value::Int64(6));
}

#[test]
fn divide_never_returns_integer() {
    let result = binary(BinaryOp::Div, Value::Int32(7), Value::Int32(2)).unwrap();
    assert!(matches!(result, Value::Float(_) | Value::Double(_)));
}

#[test]
fn integer_zero_divisor_saturates_instead_of_failing() {
    assert_eq!(binary(BinaryOp::IntDiv, Value::Int32(7), Value::Int32(0)).unwrap(), Value::Int32(i32::MAX));
    assert_eq!(binary(BinaryOp::IntDiv, Value::Int32(-7), Value::Int32(0)).unwrap(), Value::Int32(i32::MIN));
    assert_eq!(binary(BinaryOp::IntDiv, Value::Int32(0), Value::Int32(0)).unwrap(), Value::Int32(0));
    assert_eq!(binary(BinaryOp::Mod, Value::Int32(7), Value::Int32(0)).unwrap(), Value::Int32(0));
    assert_eq!(binary(BinaryOp::IntDiv, Value::Int64(7), Value::Int32(0)).unwrap(), Value::Int64(i64::MAX));
    assert_eq!(binary(BinaryOp::Mod, Value::Int64(7), Value::Int64(0)).unwrap(), Value::Int64(0));
}

#[test]
fn shifts_require_count_below_32() {
    assert_eq!(binary(BinaryOp::Shl, Value::Int32(1), Value::Int32(4)).unwrap(), Value::Int32(16));
    assert_eq!(binary(BinaryOp::Shr, Value::Int32(16), Value::Int32(2)).unwrap(), Value::Int32(4));

    for count in [Value::Int32(32), Value::Int32(-1)] {
        let err = binary(BinaryOp::Shl, Value::Int32(1), count).unwrap_err();
        assert_eq!(err.errno, ErrorDetail::BAD_BIT_SHIFT.errno);
        assert_eq!(err.location, right_loc());
    }
}

#[test]
fn shift_of_non_number_is_mismatch() {
    let err = binary(BinaryOp::Shr, Value::string("x"), Value::Int32(1)).unwrap_err();
    assert_eq!(err.errno, ErrorDetail::TYPE_MISMATCH.errno);
}

#[test]
fn comparisons_of_numbers_and_strings() {
    assert_eq!(binary(BinaryOp::Lt, Value::Int32(1), Value::float(1.5)).unwrap(), Value::Boolean(true));
    assert_eq!(binary(BinaryOp::GtEq, Value::Int32(2), Value::Int32(2)).unwrap(), Value::Boolean(true));
    assert_eq!(binary(BinaryOp::LtEq, Value::string("b"), Value::string("a")).unwrap(), Value::Boolean(false));
    assert_eq!(binary(BinaryOp::Gt, Value::string("b"), Value::string("a")).unwrap(), Value::Boolean(true));
}

#[test]
fn ordering_across_kinds_is_mismatch() {
    let err = binary(BinaryOp::Lt, Value::string("1"), Value::Int32(1)).unwrap_err();
    assert_eq!(
        err.message,
        "Type Mismatch. Operator \"<\" can't be applied to \"String\" and \"Integer\"."
    );
    assert!(binary(BinaryOp::Gt, Value::Invalid, Value::Int32(1)).is_err());
}

#[test]
fn equality_against_invalid_is_always_legal() {
    let array = Value::object(brs_values::RoArray::new(Vec::new()));
    assert_eq!(binary(BinaryOp::Eq, array.clone(), Value::Invalid).unwrap(), Value::Boolean(false));
    assert_eq!(binary(BinaryOp::NotEq, Value::Invalid, array).unwrap(), Value::Boolean(true));
    assert_eq!(binary(BinaryOp::Eq, Value::Invalid, Value::Invalid).unwrap(), Value::Boolean(true));
}

#[test]
fn equality_between_containers_is_mismatch() {
    let a = Value::object(brs_values::RoArray::new(Vec::new()));
    let err = binary(BinaryOp::Eq, a.clone(), a).unwrap_err();
    assert_eq!(err.errno, ErrorDetail::TYPE_MISMATCH.errno);
}

#[test]
fn equality_of_primitives() {
    assert_eq!(binary(BinaryOp::Eq, Value::Int32(1), Value::Double(1.0)).unwrap(), Value::Boolean(true));
    assert_eq!(binary(BinaryOp::NotEq, Value::string("a"), Value::string("a")).unwrap(), Value::Boolean(false));
    assert_eq!(binary(BinaryOp::Eq, Value::string("1"), Value::Int32(1)).unwrap(), Value::Boolean(false));
}

#[test]
fn short_circuit_only_on_deciding_booleans() {
    assert_eq!(short_circuit(BinaryOp::And, &Value::Boolean(false)), Some(Value::Boolean(false)));
    assert_eq!(short_circuit(BinaryOp::Or, &Value::Boolean(true)), Some(Value::Boolean(true)));
    assert_eq!(short_circuit(BinaryOp::And, &Value::Boolean(true)), None);
    assert_eq!(short_circuit(BinaryOp::Or, &Value::Int32(0)), None);
}

#[test]
fn needs_right_operand_only_for_booleans_and_numbers() {
    assert!(needs_right_operand(&Value::Boolean(true)));
    assert!(needs_right_operand(&Value::float(2.0)));
    assert!(!needs_right_operand(&Value::string("x")));
}

#[test]
fn logical_on_booleans() {
    assert_eq!(logical(BinaryOp::And, Value::Boolean(true), Value::Boolean(false)).unwrap(), Value::Boolean(false));
    assert_eq!(logical(BinaryOp::Or, Value::Boolean(false), Value::Boolean(true)).unwrap(), Value::Boolean(true));
}

#[test]
fn bitwise_on_numbers() {
    assert_eq!(logical(BinaryOp::And, Value::Int32(6), Value::Int32(3)).unwrap(), Value::Int32(2));
    assert_eq!(logical(BinaryOp::Or, Value::Int32(4), Value::Int32(1)).unwrap(), Value::Int32(5));
}

#[test]
fn mixed_boolean_and_number_is_logical() {
    assert_eq!(logical(BinaryOp::And, Value::Boolean(true), Value::Int32(5)).unwrap(), Value::Boolean(true));
    assert_eq!(logical(BinaryOp::Or, Value::Boolean(false), Value::Int32(0)).unwrap(), Value::Boolean(false));
    assert_eq!(logical(BinaryOp::And, Value::Int32(0), Value::Boolean(true)).unwrap(), Value::Boolean(false));
}

#[test]
fn logical_on_strings_is_mismatch() {
    let err = logical(BinaryOp::And, Value::Boolean(true), Value::string("x")).unwrap_err();
    assert_eq!(
        err.message,
        "Type Mismatch. Operator \"and\" can't be applied to \"Boolean\" and \"String\"."
    );
    assert!(logical(BinaryOp::Or, Value::string("x"), Value::Invalid).is_err());
}

#[test]
fn float_results_stay_single_precision() {
    let result = binary(BinaryOp::Add, Value::float(0.5), Value::Int32(1)).unwrap();
    assert_eq!(result, Value::Float(Float::new(1.5)));
}
