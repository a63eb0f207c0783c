//! `throw` and `catch`: thrown values become runtime errors, caught errors
//! become the associative array bound to the catch variable.

use brs_ir::Location;
use brs_values::{
    find_error_detail, ErrorDetail, RoArray, RoAssociativeArray, RuntimeError, TracePoint, Value,
};

use crate::diagnostics::backtrace_array;

const MALFORMED_VALUE: &str = "Thrown value neither string nor roAssociativeArray.";
const MALFORMED_NUMBER: &str = "Thrown \"number\" is not an integer.";
const MALFORMED_MESSAGE: &str = "Thrown \"message\" is not a string.";
const MALFORMED_BACKTRACE: &str = "Thrown \"backtrace\" is not an object.";
const UNKNOWN_ERROR: &str = "UNKNOWN ERROR";

fn malformed(message: &str, location: Location) -> RuntimeError {
    RuntimeError::with_message(ErrorDetail::MALFORMED_THROW.errno, message, location)
}

/// The error a `throw value` raises.
///
/// Strings throw with `user_errno`. Associative arrays may carry `number`,
/// `message` and `backtrace` (a rethrown record) plus any other fields,
/// which travel with the error. An explicitly thrown `number` becomes the
/// new `user_errno`. Anything else is a malformed throw.
pub fn thrown_error(value: &Value, user_errno: &mut i32, location: Location) -> RuntimeError {
    if value.is_string_like() {
        let message = value.unbox().to_string();
        return RuntimeError::with_message(*user_errno, message, location);
    }

    let entries = value
        .as_object()
        .and_then(|obj| obj.with(|aa: &RoAssociativeArray| aa.entries().to_vec()));
    let Some(entries) = entries else {
        return malformed(MALFORMED_VALUE, location);
    };

    let mut message = String::new();
    let mut extra_fields: Vec<(String, Value)> = Vec::new();
    for (key, element) in entries {
        match key.to_lowercase().as_str() {
            "number" => match element {
                Value::Int32(errno) => {
                    *user_errno = errno;
                    if message.is_empty() {
                        message = find_error_detail(errno)
                            .map_or_else(|| UNKNOWN_ERROR.to_owned(), |d| d.message.to_owned());
                    }
                }
                Value::Invalid => {}
                _ => return malformed(MALFORMED_NUMBER, location),
            },
            "message" => match element {
                Value::String(text) => message = text.to_string(),
                Value::Invalid => {}
                _ => return malformed(MALFORMED_MESSAGE, location),
            },
            "backtrace" => match &element {
                Value::Object(obj) if obj.is::<RoArray>() => {
                    extra_fields.push(("backtrace".to_owned(), element.clone()));
                    extra_fields.push(("rethrown".to_owned(), Value::Boolean(true)));
                }
                _ => return malformed(MALFORMED_BACKTRACE, location),
            },
            "rethrown" => {}
            _ => extra_fields.push((key, element)),
        }
    }

    RuntimeError::with_message(*user_errno, message, location).with_extra_fields(extra_fields)
}

/// The associative array a `catch` binds for `err`:
/// `{backtrace, message, number, rethrown}` plus the thrown extra fields.
///
/// A rethrown record keeps its original `backtrace` and gets the current
/// one as `rethrow_backtrace`.
pub fn error_record(err: &RuntimeError) -> Value {
    let frames: &[TracePoint] = err.backtrace.as_deref().unwrap_or_default();
    let backtrace = backtrace_array(&err.location, frames);
    let mut record = RoAssociativeArray::new(vec![
        ("backtrace".to_owned(), backtrace.clone()),
        ("message".to_owned(), Value::string(err.message.as_str())),
        ("number".to_owned(), Value::Int32(err.errno)),
        ("rethrown".to_owned(), Value::Boolean(false)),
    ]);
    for (key, value) in &err.extra_fields {
        let rethrown = key == "rethrown" && matches!(value, Value::Boolean(true));
        record.insert(key, value.clone(), false);
        if rethrown {
            record.insert("rethrow_backtrace", backtrace.clone(), false);
        }
    }
    Value::object(record)
}

#[cfg(test)]
mod tests;
