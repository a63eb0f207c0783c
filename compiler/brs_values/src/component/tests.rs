#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

use brs_ir::Location;

use crate::callable::CallableImpl;
use crate::context::CallContext;

struct TestContext {
    factory: ObjectFactory,
    output: String,
    diagnostics: Vec<String>,
}

impl TestContext {
    fn new() -> Self {
        TestContext {
            factory: ObjectFactory::with_builtins(),
            output: String::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl CallContext for TestContext {
    fn location(&self) -> Location {
        Location::on_line("main.brs", 3, 4, 20)
    }

    fn write_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_diagnostic(&mut self, line: &str) {
        self.diagnostics.push(line.to_owned());
    }

    fn object_factory(&self) -> &ObjectFactory {
        &self.factory
    }
}

fn call(ctx: &mut TestContext, obj: &ObjectRef, method: &str, args: &[Value]) -> Value {
    let callable = obj.get_method(method).unwrap();
    let CallableImpl::Method { receiver, func } = callable.implementation() else {
        panic!("{method} should be a bound method");
    };
    func(ctx, receiver, args).unwrap()
}

fn array_of(values: Vec<Value>) -> ObjectRef {
    ObjectRef::new(RoArray::new(values))
}

fn aa_of(members: &[(&str, Value)]) -> ObjectRef {
    let members = members
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect();
    ObjectRef::new(RoAssociativeArray::new(members))
}

fn ints(values: &[i32]) -> Vec<Value> {
    values.iter().copied().map(Value::Int32).collect()
}

// === Dispatch ===

#[test]
fn interfaces_are_listed_in_registration_order() {
    let array = array_of(Vec::new());
    assert_eq!(
        array.interface_names(),
        vec!["ifArray", "ifArrayGet", "ifArraySet", "ifArrayJoin", "ifEnum"]
    );
    assert!(array.has_interface("IFARRAY"));
    assert!(!array.has_interface("ifAssociativeArray"));
}

#[test]
fn method_lookup_is_case_insensitive() {
    let array = array_of(Vec::new());
    let callable = array.get_method("PUSH").unwrap();
    assert_eq!(callable.name(), "push");
    assert!(array.get_method("frobnicate").is_none());
}

#[test]
fn filter_narrows_one_lookup() {
    let array = array_of(Vec::new());
    array.set_filter(Some("ifArrayGet"));
    assert!(array.get_method("push").is_none());
    assert!(array.get_method("push").is_some());

    array.set_filter(Some("ifArrayGet"));
    assert!(array.get_method("getEntry").is_some());
}

#[test]
fn interface_descriptor_lowercases_methods() {
    let iface = BrsInterface::new("ifGlobal", ["CreateObject", "Main"]);
    assert_eq!(iface.name(), "ifGlobal");
    assert!(iface.has_method("createobject"));
    assert!(!iface.has_method("print"));
}

// === roArray ===

#[test]
fn array_get_truncates_and_defaults_to_invalid() {
    let array = array_of(ints(&[10, 20, 30]));
    assert_eq!(array.get_element(&Value::Int32(1), false), Ok(Value::Int32(20)));
    assert_eq!(array.get_element(&Value::float(2.9), false), Ok(Value::Int32(30)));
    assert_eq!(array.get_element(&Value::Int32(7), false), Ok(Value::Invalid));
    assert_eq!(array.get_element(&Value::Int32(-1), false), Ok(Value::Invalid));
}

#[test]
fn array_string_index_finds_methods() {
    let array = array_of(Vec::new());
    let found = array.get_element(&Value::string("count"), false).unwrap();
    assert!(matches!(found, Value::Callable(ref c) if c.name() == "count"));
    assert_eq!(array.get_element(&Value::string("nope"), false), Ok(Value::Invalid));
}

#[test]
fn array_set_grows_with_invalid() {
    let array = array_of(ints(&[1]));
    array.set_element(&Value::Int32(3), Value::Int32(4), false).unwrap();
    let elements = array.with(|a: &RoArray| a.elements().to_vec()).unwrap();
    assert_eq!(elements, vec![Value::Int32(1), Value::Invalid, Value::Invalid, Value::Int32(4)]);

    array.set_element(&Value::Int32(-2), Value::Int32(9), false).unwrap();
    assert_eq!(array.with(RoArray::len), Some(4));
    assert_eq!(
        array.set_element(&Value::string("x"), Value::Int32(9), false),
        Err("Array indexes must be 32-bit integers, or Float".to_owned())
    );
}

#[test]
fn array_index_must_be_integer_or_float() {
    let array = array_of(ints(&[1, 2]));
    let rejected = Err("Array indexes must be 32-bit integers, or Float".to_owned());
    assert_eq!(array.set_element(&Value::Int64(i64::MAX), Value::Int32(1), false), rejected);
    assert_eq!(array.set_element(&Value::Int64(1), Value::Int32(1), false), rejected);
    assert_eq!(array.set_element(&Value::Double(1.0), Value::Int32(1), false), rejected);
    assert_eq!(array.get_element(&Value::Int64(1), false), Ok(Value::Invalid));
    assert_eq!(array.with(|a: &RoArray| a.elements().to_vec()), Some(ints(&[1, 2])));
}

#[test]
fn array_out_of_range_assignment_is_an_error() {
    let array = array_of(Vec::new());
    assert_eq!(
        array.set_element(&Value::float(1e12), Value::Int32(1), false),
        Err("Array index 2147483647 exceeds the maximum array size of 16777216".to_owned())
    );
    assert_eq!(
        array.set_element(&Value::Int32(i32::MAX), Value::Int32(1), false),
        Err("Array index 2147483647 exceeds the maximum array size of 16777216".to_owned())
    );
    assert_eq!(array.with(RoArray::len), Some(0));
    assert_eq!(array.get_element(&Value::float(1e12), false), Ok(Value::Invalid));
}

#[test]
fn array_negative_index_is_ignored() {
    let array = array_of(ints(&[5]));
    array.set_element(&Value::float(-1e12), Value::Int32(1), false).unwrap();
    array.set_element(&Value::Int32(i32::MIN), Value::Int32(1), false).unwrap();
    assert_eq!(array.with(|a: &RoArray| a.elements().to_vec()), Some(ints(&[5])));
    assert_eq!(array.get_element(&Value::float(-0.5), false), Ok(Value::Int32(5)));
}

#[test]
fn huge_array_capacity_is_not_reserved_up_front() {
    let mut ctx = TestContext::new();
    let created = create_object(
        &mut ctx,
        &[Value::string("roArray"), Value::Int32(i32::MAX), Value::Boolean(false)],
    )
    .unwrap();
    let Value::Object(array) = created else {
        panic!("expected an roArray");
    };
    assert_eq!(array.with(RoArray::is_empty), Some(true));
    call(&mut ctx, &array, "push", &[Value::Int32(1)]);
    assert_eq!(array.with(RoArray::len), Some(1));
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn array_stack_and_queue_methods() {
    let mut ctx = TestContext::new();
    let array = array_of(ints(&[1, 2]));
    call(&mut ctx, &array, "push", &[Value::Int32(3)]);
    call(&mut ctx, &array, "unshift", &[Value::Int32(0)]);
    assert_eq!(call(&mut ctx, &array, "count", &[]), Value::Int32(4));
    assert_eq!(call(&mut ctx, &array, "peek", &[]), Value::Int32(3));
    assert_eq!(call(&mut ctx, &array, "pop", &[]), Value::Int32(3));
    assert_eq!(call(&mut ctx, &array, "shift", &[]), Value::Int32(0));
    assert_eq!(call(&mut ctx, &array, "delete", &[Value::Int32(5)]), Value::Boolean(false));
    assert_eq!(call(&mut ctx, &array, "delete", &[Value::Int32(0)]), Value::Boolean(true));
    assert_eq!(call(&mut ctx, &array, "getEntry", &[Value::Int32(0)]), Value::Int32(2));
    call(&mut ctx, &array, "clear", &[]);
    assert_eq!(call(&mut ctx, &array, "isEmpty", &[]), Value::Boolean(true));
    assert_eq!(call(&mut ctx, &array, "pop", &[]), Value::Invalid);
}

#[test]
fn fixed_size_array_rejects_push_when_full() {
    let mut ctx = TestContext::new();
    let array = ObjectRef::new(RoArray::with_capacity(1, false));
    call(&mut ctx, &array, "push", &[Value::Int32(1)]);
    call(&mut ctx, &array, "push", &[Value::Int32(2)]);
    assert_eq!(array.with(RoArray::len), Some(1));
    assert_eq!(
        ctx.diagnostics,
        vec![
            "BRIGHTSCRIPT: ERROR: roArray.Push: set ignored for index out of bounds on non-resizable array: pkg:/main.brs(3)"
                .to_owned()
        ]
    );
}

#[test]
fn array_append_and_join() {
    let mut ctx = TestContext::new();
    let array = array_of(vec![Value::string("a")]);
    let other = array_of(vec![Value::string("b"), Value::string("c")]);
    call(&mut ctx, &array, "append", &[Value::Object(other)]);
    assert_eq!(call(&mut ctx, &array, "join", &[Value::string("-")]), Value::string("a-b-c"));

    call(&mut ctx, &array, "append", &[Value::Object(array.clone())]);
    assert_eq!(array.with(RoArray::len), Some(6));

    call(&mut ctx, &array, "push", &[Value::Int32(1)]);
    assert_eq!(call(&mut ctx, &array, "join", &[Value::string(",")]), Value::string(""));

    let aa = aa_of(&[]);
    call(&mut ctx, &array, "append", &[Value::Object(aa)]);
    assert_eq!(
        ctx.diagnostics,
        vec!["BRIGHTSCRIPT: ERROR: roArray.Append: invalid parameter type roAssociativeArray: pkg:/main.brs(3)".to_owned()]
    );
}

#[test]
fn array_iteration_follows_updates() {
    let array = array_of(ints(&[1, 2]));
    let mut seen = Vec::new();
    array.with_collection_mut(|c| c.reset_next());
    while array.with_collection_mut(|c| c.has_next()) == Some(true) {
        seen.push(array.with_collection_mut(|c| c.get_next()).unwrap());
    }
    assert_eq!(seen, ints(&[1, 2]));
    assert_eq!(array.with_collection_mut(|c| c.get_next()), Some(Value::Invalid));
}

#[test]
fn array_listing() {
    let array = array_of(vec![Value::Int32(1), Value::string("two"), Value::Object(array_of(Vec::new()))]);
    assert_eq!(
        array.display(false),
        "<Component: roArray> =\n[\n    1\n    \"two\"\n    <Component: roArray>\n]"
    );
    assert_eq!(array.display(true), "<Component: roArray>");
}

// === roAssociativeArray ===

#[test]
fn aa_lookup_ignores_case_by_default() {
    let aa = aa_of(&[("Name", Value::string("brs"))]);
    assert_eq!(aa.get_element(&Value::string("NAME"), false), Ok(Value::string("brs")));
    assert_eq!(
        aa.get_element(&Value::Int32(1), false),
        Err("Associative array indexes must be strings".to_owned())
    );
}

#[test]
fn aa_set_replaces_any_spelling() {
    let aa = aa_of(&[("Name", Value::Int32(1))]);
    aa.set_element(&Value::string("NAME"), Value::Int32(2), false).unwrap();
    let keys = aa.with(RoAssociativeArray::sorted_keys).unwrap();
    assert_eq!(keys, vec!["name".to_owned()]);
    assert_eq!(aa.get_element(&Value::string("Name"), false), Ok(Value::Int32(2)));
}

#[test]
fn aa_methods() {
    let mut ctx = TestContext::new();
    let aa = aa_of(&[("b", Value::Int32(2)), ("a", Value::Int32(1))]);
    call(&mut ctx, &aa, "addReplace", &[Value::string("Cee"), Value::Int32(3)]);
    assert_eq!(call(&mut ctx, &aa, "count", &[]), Value::Int32(3));
    assert_eq!(call(&mut ctx, &aa, "doesExist", &[Value::string("CEE")]), Value::Boolean(true));
    assert_eq!(call(&mut ctx, &aa, "lookup", &[Value::string("cee")]), Value::Int32(3));
    assert_eq!(call(&mut ctx, &aa, "delete", &[Value::string("A")]), Value::Boolean(true));
    assert_eq!(call(&mut ctx, &aa, "delete", &[Value::string("A")]), Value::Boolean(false));

    let keys = call(&mut ctx, &aa, "keys", &[]);
    let keys = keys.as_object().unwrap().with(|a: &RoArray| a.elements().to_vec()).unwrap();
    assert_eq!(keys, vec![Value::string("Cee"), Value::string("b")]);

    let items = call(&mut ctx, &aa, "items", &[]);
    let first = items.as_object().unwrap().get_element(&Value::Int32(0), false).unwrap();
    let first = first.as_object().unwrap();
    assert_eq!(first.get_element(&Value::string("key"), false), Ok(Value::string("Cee")));
    assert_eq!(first.get_element(&Value::string("value"), false), Ok(Value::Int32(3)));
}

#[test]
fn aa_case_sensitive_mode() {
    let mut ctx = TestContext::new();
    let aa = aa_of(&[("Key", Value::Int32(1))]);
    call(&mut ctx, &aa, "setModeCaseSensitive", &[]);
    call(&mut ctx, &aa, "addReplace", &[Value::string("key"), Value::Int32(2)]);
    assert_eq!(call(&mut ctx, &aa, "count", &[]), Value::Int32(2));
    assert_eq!(call(&mut ctx, &aa, "lookup", &[Value::string("Key")]), Value::Int32(1));
    assert_eq!(call(&mut ctx, &aa, "lookup", &[Value::string("key")]), Value::Int32(2));
    assert_eq!(call(&mut ctx, &aa, "lookupCI", &[Value::string("KEY")]), Value::Int32(1));
    assert_eq!(call(&mut ctx, &aa, "doesExist", &[Value::string("KEY")]), Value::Boolean(false));
}

#[test]
fn aa_append_copies_entries() {
    let mut ctx = TestContext::new();
    let aa = aa_of(&[("a", Value::Int32(1))]);
    let other = aa_of(&[("A", Value::Int32(10)), ("z", Value::Int32(26))]);
    call(&mut ctx, &aa, "append", &[Value::Object(other)]);
    assert_eq!(aa.with(RoAssociativeArray::sorted_keys), Some(vec!["A".to_owned(), "z".to_owned()]));

    call(&mut ctx, &aa, "append", &[Value::Object(array_of(Vec::new()))]);
    assert_eq!(
        ctx.diagnostics,
        vec!["BRIGHTSCRIPT: ERROR: roAssociativeArray.Append: invalid parameter type roArray: pkg:/main.brs(3)".to_owned()]
    );
}

#[test]
fn aa_element_shadows_method() {
    let aa = aa_of(&[("count", Value::Int32(99))]);
    assert_eq!(aa.get_element(&Value::string("count"), false), Ok(Value::Int32(99)));
    let method = aa.get_element(&Value::string("keys"), false).unwrap();
    assert!(matches!(method, Value::Callable(_)));
}

#[test]
fn aa_listing_is_sorted() {
    let aa = aa_of(&[("zeta", Value::Boolean(true)), ("alpha", Value::string("x"))]);
    assert_eq!(
        aa.display(false),
        "<Component: roAssociativeArray> =\n{\n    alpha: \"x\"\n    zeta: true\n}"
    );
    let elements = aa.borrow().as_collection().unwrap().elements();
    assert_eq!(elements, vec![Value::string("alpha"), Value::string("zeta")]);
}

// === Boxed values ===

#[test]
fn boxed_accessors() {
    let mut ctx = TestContext::new();
    let int = ObjectRef::new(BoxedValue::new(Value::Int32(5)));
    assert_eq!(int.component_name(), "roInt");
    assert_eq!(call(&mut ctx, &int, "getInt", &[]), Value::Int32(5));
    call(&mut ctx, &int, "setInt", &[Value::Int32(8)]);
    assert_eq!(call(&mut ctx, &int, "toStr", &[]), Value::string("8"));

    let text = ObjectRef::new(BoxedValue::new(Value::string("héllo")));
    assert_eq!(call(&mut ctx, &text, "len", &[]), Value::Int32(5));
    assert!(text.has_interface("ifStringOps"));

    let invalid = ObjectRef::new(BoxedValue::new(Value::Uninitialized));
    assert_eq!(invalid.component_name(), "roInvalid");
    assert_eq!(invalid.unbox(), Some(Value::Invalid));
}

// === Factory ===

#[test]
fn factory_builds_known_classes() {
    let mut ctx = TestContext::new();
    let array = create_object(&mut ctx, &[Value::string("ROARRAY"), Value::Int32(4), Value::Boolean(true)]).unwrap();
    assert_eq!(array.as_object().map(ObjectRef::component_name), Some("roArray"));

    let int = create_object(&mut ctx, &[Value::string("roInt"), Value::Int32(4)]).unwrap();
    assert_eq!(int.unbox(), Value::Int32(0));

    let aa = create_object(&mut ctx, &[Value::string("roAssociativeArray")]).unwrap();
    assert!(aa.as_object().is_some_and(|obj| obj.is::<RoAssociativeArray>()));
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn factory_reports_unknown_classes() {
    let mut ctx = TestContext::new();
    let result = create_object(&mut ctx, &[Value::string("roSprocket")]).unwrap();
    assert_eq!(result, Value::Invalid);
    assert_eq!(
        ctx.diagnostics,
        vec!["BRIGHTSCRIPT: ERROR: Runtime: unknown classname \"roSprocket\": pkg:/main.brs(3)".to_owned()]
    );
}

#[test]
fn factory_parameter_contracts() {
    let mut ctx = TestContext::new();
    let missing = create_object(&mut ctx, &[Value::string("roArray")]).unwrap();
    assert_eq!(missing, Value::Invalid);
    assert_eq!(
        ctx.diagnostics,
        vec!["BRIGHTSCRIPT: ERROR: Runtime: \"roArray\": invalid number of parameters: pkg:/main.brs(3)".to_owned()]
    );

    let wrong = create_object(&mut ctx, &[Value::string("roArray"), Value::Int32(1)]);
    let errno = wrong.err().and_then(|signal| signal.as_error().map(|e| e.errno));
    assert_eq!(errno, Some(245));

    let extra = create_object(&mut ctx, &[Value::string("roAssociativeArray"), Value::Int32(1)]);
    assert!(extra.is_err());
}

#[test]
fn factory_reports_rejected_arguments() {
    let mut ctx = TestContext::new();
    let result = create_object(&mut ctx, &[Value::string("roArray"), Value::string("x"), Value::Boolean(true)]).unwrap();
    assert_eq!(result, Value::Invalid);
    assert_eq!(
        ctx.diagnostics.last().map(String::as_str),
        Some("BRIGHTSCRIPT: ERROR: Runtime: \"roArray\": invalid number of parameters: pkg:/main.brs(3)")
    );
}

#[test]
fn factory_accepts_host_registrations() {
    let mut factory = ObjectFactory::new();
    assert!(factory.lookup("roArray").is_none());
    factory.register("roWidget", Arity::Exactly(0), |_, _| Ok(Value::Invalid));
    assert_eq!(factory.lookup("ROWIDGET").map(|entry| entry.arity), Some(Arity::Exactly(0)));
    assert_eq!(factory.class_names(), vec!["roWidget"]);
}
