//! Implicit conversions applied when a value meets a declared kind:
//! function arguments, return values and type-designated variables.

use brs_ir::ValueKind;

use crate::value::Value;

/// Converts `value` to `target`, or `None` when no implicit conversion
/// exists.
///
/// - `Dynamic` and same-kind targets take the value as is.
/// - Numeric targets accept any number, unboxing boxed numbers first.
/// - `String`, `Boolean` and `Function` targets unbox their boxed forms.
/// - `Object` targets accept objects and `invalid`, and box primitives.
pub fn try_coerce(value: &Value, target: ValueKind) -> Option<Value> {
    if target == ValueKind::Dynamic {
        return Some(value.clone());
    }
    if value.kind() == target {
        return Some(value.clone());
    }
    match target {
        ValueKind::Int32 | ValueKind::Int64 | ValueKind::Float | ValueKind::Double => {
            let number = value.unbox().as_number()?;
            number.convert(target).map(Value::from)
        }
        ValueKind::String | ValueKind::Boolean | ValueKind::Callable | ValueKind::Invalid => {
            let unboxed = value.unbox();
            (unboxed.kind() == target).then_some(unboxed)
        }
        ValueKind::Object => match value {
            Value::Object(_) | Value::Invalid => Some(value.clone()),
            other => other.boxed().map(Value::Object),
        },
        _ => None,
    }
}
