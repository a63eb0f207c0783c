#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::rc::Rc;

use super::*;
use brs_ir::ValueKind;
use brs_values::{Argument, ObjectRef, Signature};
use pretty_assertions::assert_eq;

fn frame(name: &str, args: Vec<Argument>, returns: ValueKind, call_line: u32) -> TracePoint {
    TracePoint {
        function_name: name.to_owned(),
        function_location: Location::on_line("source/main.brs", 1, 0, 10),
        call_location: Location::on_line("source/main.brs", call_line, 4, 12),
        signature: Rc::new(Signature::new(args, returns)),
    }
}

fn two_frames() -> Vec<TracePoint> {
    vec![
        frame("Main", Vec::new(), ValueKind::Void, 0),
        frame(
            "inner",
            vec![Argument::new("x", ValueKind::Int32), Argument::new("s", ValueKind::String)],
            ValueKind::Dynamic,
            5,
        ),
    ]
}

#[test]
fn push_respects_depth_limit() {
    let mut stack = CallStack::new(Some(1));
    stack.push(frame("a", Vec::new(), ValueKind::Void, 1)).unwrap();
    let err = stack.push(frame("b", Vec::new(), ValueKind::Void, 9)).unwrap_err();
    assert_eq!(err.errno, ErrorDetail::STACK_OVERFLOW.errno);
    assert_eq!(err.location.start.line, 9);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn unlimited_stack_accepts_frames() {
    let mut stack = CallStack::default();
    for line in 1..=100 {
        stack.push(frame("r", Vec::new(), ValueKind::Void, line)).unwrap();
    }
    assert_eq!(stack.depth(), 100);
    assert_eq!(stack.current_frame().unwrap().call_location.start.line, 100);
}

#[test]
fn pop_returns_to_previous_frame() {
    let mut stack = CallStack::new(None);
    stack.push(frame("a", Vec::new(), ValueKind::Void, 1)).unwrap();
    stack.push(frame("b", Vec::new(), ValueKind::Void, 2)).unwrap();
    stack.pop();
    assert_eq!(stack.current_frame().unwrap().function_name, "a");
    stack.pop();
    assert!(stack.is_empty());
}

#[test]
fn format_backtrace_lists_innermost_first() {
    let at = Location::on_line("source/main.brs", 12, 8, 9);
    let text = format_backtrace(&at, &two_frames());
    assert_eq!(
        text,
        "#1  Function inner(x As Integer,s As String) As Dynamic\r\n   file/line: pkg:/source/main.brs(12)\r\n\
         #0  Function Main() As Void\r\n   file/line: pkg:/source/main.brs(5)\r\n"
    );
}

#[test]
fn format_backtrace_of_empty_stack_is_empty() {
    assert_eq!(format_backtrace(&Location::internal(), &[]), "");
}

fn field(record: &ObjectRef, key: &str) -> Value {
    record
        .with(|aa: &RoAssociativeArray| aa.lookup(key, false).cloned())
        .flatten()
        .unwrap()
}

#[test]
fn backtrace_array_lists_outermost_first() {
    let at = Location::on_line("source/main.brs", 12, 8, 9);
    let Value::Object(array) = backtrace_array(&at, &two_frames()) else {
        panic!("expected an roArray");
    };
    let entries = array.with(|a: &RoArray| a.elements().to_vec()).unwrap();
    assert_eq!(entries.len(), 2);

    let outer = entries[0].as_object().unwrap();
    assert_eq!(field(outer, "function"), Value::string("Main() As Void"));
    assert_eq!(field(outer, "line_number"), Value::Int32(5));
    assert_eq!(field(outer, "filename"), Value::string("source/main.brs"));

    let inner = entries[1].as_object().unwrap();
    assert_eq!(field(inner, "line_number"), Value::Int32(12));
}
