use super::*;
use pretty_assertions::assert_eq;

use crate::component::{BoxedValue, RoArray, RoAssociativeArray};

fn boxed(value: Value) -> Value {
    Value::object(BoxedValue::new(value))
}

#[test]
fn kinds_follow_variants() {
    assert_eq!(Value::Int32(1).kind(), ValueKind::Int32);
    assert_eq!(Value::float(1.0).kind(), ValueKind::Float);
    assert_eq!(Value::string("a").kind(), ValueKind::String);
    assert_eq!(Value::object(RoArray::new(Vec::new())).kind(), ValueKind::Object);
}

#[test]
fn unbox_recovers_primitives() {
    assert_eq!(boxed(Value::Int64(4)).unbox(), Value::Int64(4));
    assert!(boxed(Value::Invalid).is_invalid_like());
    assert!(boxed(Value::Double(1.5)).is_numeric_like());
    assert!(boxed(Value::string("s")).is_string_like());
    let array = Value::object(RoArray::new(Vec::new()));
    assert_eq!(array.unbox(), array);
}

#[test]
fn display_matches_device_text() {
    assert_eq!(Value::Invalid.to_string(), "invalid");
    assert_eq!(Value::Uninitialized.to_string(), "<UNINITIALIZED>");
    assert_eq!(Value::Boolean(true).to_string(), "true");
    assert_eq!(Value::Int32(-12).to_string(), "-12");
    assert_eq!(Value::float(1.5e7).to_string(), "1.5e+07");
    assert_eq!(Value::Double(1e21).to_string(), "1e+21");
    assert_eq!(Value::Double(f64::NAN).to_string(), "nan");
    assert_eq!(boxed(Value::string("boxed")).to_string(), "boxed");
}

#[test]
fn nested_display_quotes_strings() {
    assert_eq!(Value::string("x").display_nested(), "\"x\"");
    assert_eq!(Value::Int32(3).display_nested(), "3");
    let aa = Value::object(RoAssociativeArray::new(Vec::new()));
    assert_eq!(aa.display_nested(), "<Component: roAssociativeArray>");
}

#[test]
fn equality_across_kinds() {
    assert!(Value::Int32(1).equal_to(&Value::Double(1.0)));
    assert!(Value::Boolean(true).equal_to(&Value::Int32(5)));
    assert!(Value::Int32(0).equal_to(&Value::Boolean(false)));
    assert!(!Value::string("1").equal_to(&Value::Int32(1)));
    assert!(Value::Invalid.equal_to(&boxed(Value::Invalid)));
    assert!(Value::Uninitialized.equal_to(&Value::string("<uninitialized>")));
    assert!(Value::string("a").equal_to(&boxed(Value::string("a"))));
}

#[test]
fn boxed_equality_requires_same_class() {
    let a = boxed(Value::Int32(3));
    assert!(a.equal_to(&boxed(Value::Int32(3))));
    assert!(!a.equal_to(&boxed(Value::Int32(4))));
    assert!(!a.equal_to(&boxed(Value::Double(3.0))));
    assert!(a.equal_to(&Value::Int32(3)));
}

#[test]
fn containers_compare_by_identity() {
    let array = Value::object(RoArray::new(vec![Value::Int32(1)]));
    let same = array.clone();
    let other = Value::object(RoArray::new(vec![Value::Int32(1)]));
    assert!(array.equal_to(&same));
    assert!(!array.equal_to(&other));
}

#[test]
fn ordering_numbers_and_strings() {
    assert!(Value::Int32(1).less_than(&Value::Double(1.5)));
    assert!(Value::string("b").greater_than(&Value::string("a")));
    assert!(boxed(Value::Int32(2)).greater_than(&Value::Int32(1)));
    assert_eq!(Value::string("1").compare(&Value::Int32(1)), None);
}

#[test]
fn boxed_counterparts() {
    let obj = Value::Int32(7).boxed().map(|obj| obj.component_name());
    assert_eq!(obj, Some("roInt"));
    assert_eq!(Value::Invalid.boxed().map(|obj| obj.component_name()), Some("roInvalid"));
    assert!(Value::Uninitialized.boxed().is_none());
}

#[test]
fn literals_become_values() {
    assert_eq!(Value::from(&Literal::Float(0.1)), Value::float(0.1));
    assert_eq!(Value::from(&Literal::String("s".into())), Value::string("s"));
    assert_eq!(Value::from(Number::Int64(3)), Value::Int64(3));
}
