#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use brs_values::{BrsInterface, ErrorDetail, RoAssociativeArray};
use pretty_assertions::assert_eq;

fn new_m() -> ObjectRef {
    ObjectRef::new(RoAssociativeArray::new(Vec::new()))
}

fn ident(name: &str) -> Identifier {
    Identifier::new(name, Location::on_line("main.brs", 7, 4, 8))
}

fn define(env: &mut Environment, scope: ScopeKind, name: &str, value: Value) {
    env.define(scope, name, value, &Location::internal()).unwrap();
}

#[test]
fn lookup_is_case_insensitive() {
    let mut env = Environment::new(new_m());
    define(&mut env, ScopeKind::Function, "Counter", Value::Int32(3));
    assert_eq!(env.get(&ident("COUNTER")), Some(Value::Int32(3)));
    assert_eq!(env.names(ScopeKind::Function), vec!["counter", "m"]);
}

#[test]
fn function_scope_shadows_module_and_global() {
    let mut env = Environment::new(new_m());
    define(&mut env, ScopeKind::Global, "x", Value::Int32(1));
    assert_eq!(env.get(&ident("x")), Some(Value::Int32(1)));
    define(&mut env, ScopeKind::Module, "x", Value::Int32(2));
    assert_eq!(env.get(&ident("x")), Some(Value::Int32(2)));
    define(&mut env, ScopeKind::Function, "x", Value::Int32(3));
    assert_eq!(env.get(&ident("x")), Some(Value::Int32(3)));
}

#[test]
fn missing_name_is_none() {
    let env = Environment::new(new_m());
    assert!(env.get(&ident("nothing")).is_none());
}

#[test]
fn line_num_reports_identifier_line() {
    let env = Environment::new(new_m());
    assert_eq!(env.get(&ident("line_num")), Some(Value::Int32(7)));
}

#[test]
fn m_is_always_present() {
    let m = new_m();
    let env = Environment::new(m.clone());
    assert!(env.has("M", ScopeKind::Module));
    let Some(Value::Object(found)) = env.get(&ident("m")) else {
        panic!("m should resolve to an object");
    };
    assert!(found.ptr_eq(&m));
}

#[test]
fn sub_environment_shares_module_and_global_only() {
    let mut env = Environment::new(new_m());
    define(&mut env, ScopeKind::Module, "main", Value::Int32(1));
    define(&mut env, ScopeKind::Global, "print", Value::Int32(2));
    define(&mut env, ScopeKind::Function, "local", Value::Int32(3));

    let receiver = new_m();
    let mut sub = env.sub_environment(Some(receiver.clone()));
    assert_eq!(sub.get(&ident("main")), Some(Value::Int32(1)));
    assert_eq!(sub.get(&ident("print")), Some(Value::Int32(2)));
    assert!(sub.get(&ident("local")).is_none());
    assert!(sub.m().ptr_eq(&receiver));
    assert!(sub.root_m().ptr_eq(env.root_m()));

    define(&mut sub, ScopeKind::Module, "helper", Value::Int32(4));
    assert_eq!(env.get(&ident("helper")), Some(Value::Int32(4)));
}

#[test]
fn sub_environment_without_receiver_keeps_m() {
    let env = Environment::new(new_m());
    let sub = env.sub_environment(None);
    assert!(sub.m().ptr_eq(env.m()));
}

#[test]
fn rebinding_global_to_non_interface_is_cast_mismatch() {
    let mut env = Environment::new(new_m());
    let global = Value::Interface(Rc::new(BrsInterface::new("ifGlobal", ["createobject"])));
    define(&mut env, ScopeKind::Global, "global", global.clone());

    let err = env
        .define(ScopeKind::Function, "Global", Value::Int32(1), &Location::on_line("a.brs", 2, 0, 6))
        .unwrap_err();
    assert_eq!(err.errno, ErrorDetail::TYPE_MISMATCH.errno);
    assert_eq!(
        err.message,
        "Type Mismatch. Unable to cast \"Integer\" to \"Interface\"."
    );

    assert!(env
        .define(ScopeKind::Function, "global", global, &Location::internal())
        .is_ok());
}

#[test]
fn remove_keeps_global_bindings() {
    let mut env = Environment::new(new_m());
    define(&mut env, ScopeKind::Function, "a", Value::Int32(1));
    define(&mut env, ScopeKind::Global, "b", Value::Int32(2));
    env.remove("A", ScopeKind::Function);
    env.remove("b", ScopeKind::Global);
    assert!(!env.has("a", ScopeKind::Function));
    assert!(env.has("b", ScopeKind::Global));
}

#[test]
fn reset_jump_state_clears_goto() {
    let mut env = Environment::new(new_m());
    env.goto_label = Some("retry".into());
    env.continue_for = true;
    env.continue_for_each = 3;
    env.reset_jump_state();
    assert!(env.goto_label.is_none());
    assert!(!env.continue_for);
    assert_eq!(env.continue_for_each, 0);
}
