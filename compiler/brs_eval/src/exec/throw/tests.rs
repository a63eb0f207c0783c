#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

fn at() -> Location {
    Location::on_line("main.brs", 7, 4, 9)
}

fn aa(entries: Vec<(&str, Value)>) -> Value {
    Value::object(RoAssociativeArray::new(
        entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect(),
    ))
}

fn field(record: &Value, key: &str) -> Option<Value> {
    record
        .as_object()
        .unwrap()
        .with(|aa: &RoAssociativeArray| aa.lookup(key, false).cloned())
        .unwrap()
}

#[test]
fn string_throw_uses_current_user_errno() {
    let mut errno = 40;
    let err = thrown_error(&Value::string("boom"), &mut errno, at());
    assert_eq!(err.errno, 40);
    assert_eq!(err.message, "boom");
    assert!(err.extra_fields.is_empty());
}

#[test]
fn thrown_number_persists_for_later_string_throws() {
    let mut errno = 40;
    let err = thrown_error(&aa(vec![("number", Value::Int32(1234))]), &mut errno, at());
    assert_eq!(err.errno, 1234);
    assert_eq!(err.message, "UNKNOWN ERROR");

    let err = thrown_error(&Value::string("again"), &mut errno, at());
    assert_eq!(err.errno, 1234);
}

#[test]
fn known_number_takes_catalog_message() {
    let mut errno = 40;
    let err = thrown_error(&aa(vec![("Number", Value::Int32(20))]), &mut errno, at());
    assert_eq!(err.message, ErrorDetail::DIVIDE_BY_ZERO.message);
}

#[test]
fn message_before_number_is_kept() {
    let mut errno = 40;
    let thrown = aa(vec![
        ("message", Value::string("custom")),
        ("number", Value::Int32(20)),
    ]);
    let err = thrown_error(&thrown, &mut errno, at());
    assert_eq!(err.message, "custom");
    assert_eq!(err.errno, 20);
}

#[test]
fn extra_fields_travel_with_the_error() {
    let mut errno = 40;
    let thrown = aa(vec![
        ("message", Value::string("x")),
        ("code", Value::string("E1")),
        ("rethrown", Value::Boolean(true)),
    ]);
    let err = thrown_error(&thrown, &mut errno, at());
    assert_eq!(err.extra_fields.len(), 1);
    assert_eq!(err.extra_fields[0].0, "code");
}

#[test]
fn invalid_fields_are_ignored() {
    let mut errno = 40;
    let thrown = aa(vec![("number", Value::Invalid), ("message", Value::Invalid)]);
    let err = thrown_error(&thrown, &mut errno, at());
    assert_eq!(err.errno, 40);
    assert_eq!(err.message, "");
}

#[test]
fn malformed_throws() {
    let malformed_errno = ErrorDetail::MALFORMED_THROW.errno;
    let cases = [
        (Value::Int32(3), "Thrown value neither string nor roAssociativeArray."),
        (aa(vec![("number", Value::string("1"))]), "Thrown \"number\" is not an integer."),
        (aa(vec![("message", Value::Int32(1))]), "Thrown \"message\" is not a string."),
        (aa(vec![("backtrace", Value::string("x"))]), "Thrown \"backtrace\" is not an object."),
    ];
    for (value, message) in cases {
        let mut errno = 40;
        let err = thrown_error(&value, &mut errno, at());
        assert_eq!(err.errno, malformed_errno);
        assert_eq!(err.message, message);
        assert!(err.extra_fields.is_empty());
    }
}

#[test]
fn record_has_standard_fields() {
    let err = RuntimeError::with_message(26, "oops", at()).with_backtrace(Vec::new());
    let record = error_record(&err);
    assert_eq!(field(&record, "message"), Some(Value::string("oops")));
    assert_eq!(field(&record, "number"), Some(Value::Int32(26)));
    assert_eq!(field(&record, "rethrown"), Some(Value::Boolean(false)));
    assert!(field(&record, "backtrace").unwrap().as_object().unwrap().is::<RoArray>());
    assert_eq!(field(&record, "rethrow_backtrace"), None);
}

#[test]
fn rethrown_record_keeps_original_backtrace() {
    let original = Value::object(RoArray::new(vec![Value::string("frame")]));
    let mut errno = 40;
    let thrown = aa(vec![
        ("message", Value::string("again")),
        ("backtrace", original.clone()),
    ]);
    let err = thrown_error(&thrown, &mut errno, at());
    let record = error_record(&err);

    let backtrace = field(&record, "backtrace").unwrap();
    assert!(backtrace.as_object().unwrap().ptr_eq(original.as_object().unwrap()));
    assert_eq!(field(&record, "rethrown"), Some(Value::Boolean(true)));
    assert!(field(&record, "rethrow_backtrace").is_some());
}
