//! Boxed primitives: `roInt`, `roFloat`, `roString` and friends.
//!
//! One component type serves every primitive kind. The kind decides the
//! class name and the interface table, both fixed at construction.

use std::rc::Rc;

use brs_ir::ValueKind;

use super::{BrsComponent, ComponentCore, InterfaceDef, MethodDef, ObjectRef};
use crate::callable::{Argument, Signature};
use crate::context::CallContext;
use crate::errors::EvalResult;
use crate::value::Value;

/// A primitive wrapped as an object.
pub struct BoxedValue {
    core: ComponentCore,
    value: Value,
}

impl BoxedValue {
    /// Boxes `value`. Kinds without a boxed form become `roInvalid`.
    pub fn new(value: Value) -> Self {
        let value = match value {
            Value::Uninitialized | Value::Interface(_) | Value::Object(_) => Value::Invalid,
            other => other,
        };
        let (name, interfaces) = interfaces_for(value.kind());
        BoxedValue {
            core: ComponentCore::new(name, interfaces),
            value,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Boxes a primitive into a fresh object.
pub fn box_primitive(value: Value) -> ObjectRef {
    ObjectRef::new(BoxedValue::new(value))
}

impl BrsComponent for BoxedValue {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn display(&self, nested: bool) -> String {
        if nested {
            self.value.display_nested()
        } else {
            self.value.to_string()
        }
    }

    /// Boxed values of different kinds never compare equal; against a
    /// primitive the wrapped value decides.
    fn equal_to(&self, other: &Value) -> bool {
        match other {
            Value::Object(obj) => obj
                .with(|rhs: &BoxedValue| {
                    rhs.core.name() == self.core.name() && self.value.equal_to(&rhs.value)
                })
                .unwrap_or(false),
            primitive => self.value.equal_to(primitive),
        }
    }

    fn unbox(&self) -> Option<Value> {
        Some(self.value.clone())
    }
}

fn get_value(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    Ok(this.unbox().unwrap_or(Value::Invalid))
}

fn set_value(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    if let Some(value) = args.first() {
        this.with_mut(|boxed: &mut BoxedValue| boxed.value = value.clone());
    }
    Ok(Value::Invalid)
}

fn to_str(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let text = this.unbox().unwrap_or(Value::Invalid).to_string();
    Ok(Value::string(text))
}

fn string_len(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let len = this
        .unbox()
        .and_then(|value| value.as_str().map(|s| s.chars().count()))
        .unwrap_or(0);
    Ok(Value::Int32(i32::try_from(len).unwrap_or(i32::MAX)))
}

fn getter(name: &'static str, kind: ValueKind) -> MethodDef {
    MethodDef::new(name, Signature::new(Vec::new(), kind), get_value)
}

fn setter(name: &'static str, kind: ValueKind) -> MethodDef {
    MethodDef::new(
        name,
        Signature::new(vec![Argument::new("value", kind)], ValueKind::Void),
        set_value,
    )
}

fn to_str_method() -> MethodDef {
    MethodDef::new("toStr", Signature::new(Vec::new(), ValueKind::String), to_str)
}

fn if_to_str() -> InterfaceDef {
    InterfaceDef::new("ifToStr", vec![to_str_method()])
}

fn build_interfaces(kind: ValueKind) -> Rc<[InterfaceDef]> {
    let interfaces = match kind {
        ValueKind::Int32 => vec![
            InterfaceDef::new(
                "ifInt",
                vec![getter("getInt", ValueKind::Int32), setter("setInt", ValueKind::Int32)],
            ),
            InterfaceDef::new("ifIntOps", vec![to_str_method()]),
            if_to_str(),
        ],
        ValueKind::Int64 => vec![
            InterfaceDef::new(
                "ifLongInt",
                vec![
                    getter("getLongInt", ValueKind::Int64),
                    setter("setLongInt", ValueKind::Int64),
                ],
            ),
            if_to_str(),
        ],
        ValueKind::Float => vec![
            InterfaceDef::new(
                "ifFloat",
                vec![getter("getFloat", ValueKind::Float), setter("setFloat", ValueKind::Float)],
            ),
            if_to_str(),
        ],
        ValueKind::Double => vec![
            InterfaceDef::new(
                "ifDouble",
                vec![
                    getter("getDouble", ValueKind::Double),
                    setter("setDouble", ValueKind::Double),
                ],
            ),
            if_to_str(),
        ],
        ValueKind::Boolean => vec![
            InterfaceDef::new(
                "ifBoolean",
                vec![
                    getter("getBoolean", ValueKind::Boolean),
                    setter("setBoolean", ValueKind::Boolean),
                ],
            ),
            if_to_str(),
        ],
        ValueKind::String => vec![
            InterfaceDef::new(
                "ifString",
                vec![
                    getter("getString", ValueKind::String),
                    setter("setString", ValueKind::String),
                ],
            ),
            InterfaceDef::new(
                "ifStringOps",
                vec![
                    MethodDef::new("len", Signature::new(Vec::new(), ValueKind::Int32), string_len),
                    to_str_method(),
                ],
            ),
            if_to_str(),
        ],
        ValueKind::Callable => vec![
            InterfaceDef::new(
                "ifFunction",
                vec![
                    getter("getSub", ValueKind::Callable),
                    setter("setSub", ValueKind::Callable),
                ],
            ),
            if_to_str(),
        ],
        _ => vec![if_to_str()],
    };
    Rc::from(interfaces)
}

macro_rules! cached_interfaces {
    ($($kind:ident => $name:literal, $cache:ident;)*) => {
        thread_local! {
            $(static $cache: Rc<[InterfaceDef]> = build_interfaces(ValueKind::$kind);)*
            static INVALID_INTERFACES: Rc<[InterfaceDef]> = build_interfaces(ValueKind::Invalid);
        }

        fn interfaces_for(kind: ValueKind) -> (&'static str, Rc<[InterfaceDef]>) {
            match kind {
                $(ValueKind::$kind => ($name, $cache.with(Rc::clone)),)*
                _ => ("roInvalid", INVALID_INTERFACES.with(Rc::clone)),
            }
        }
    };
}

cached_interfaces! {
    Int32 => "roInt", INT_INTERFACES;
    Int64 => "roLongInteger", LONG_INTERFACES;
    Float => "roFloat", FLOAT_INTERFACES;
    Double => "roDouble", DOUBLE_INTERFACES;
    Boolean => "roBoolean", BOOLEAN_INTERFACES;
    String => "roString", STRING_INTERFACES;
    Callable => "roFunction", FUNCTION_INTERFACES;
}
