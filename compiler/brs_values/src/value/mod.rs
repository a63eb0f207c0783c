//! Runtime values.
//!
//! Primitives are immutable and copied by value (`String` shares its
//! buffer). Objects are reference-counted components shared by every value
//! that points at them; mutation through one reference is visible through
//! all of them.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use brs_ir::{Literal, ValueKind};

use crate::callable::Callable;
use crate::component::{boxed, BrsComponent, BrsInterface, ObjectRef};
use crate::numeric::{Float, Number};

/// Text the uninitialized value equals.
const UNINITIALIZED_TEXT: &str = "<uninitialized>";

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Invalid,
    /// Reading a variable that was never assigned.
    Uninitialized,
    Boolean(bool),
    String(Rc<str>),
    Int32(i32),
    Int64(i64),
    Float(Float),
    Double(f64),
    Callable(Callable),
    /// Interface descriptor, e.g. the `global` `ifGlobal` value.
    Interface(Rc<BrsInterface>),
    Object(ObjectRef),
}

impl Value {
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::String(text.into())
    }

    /// Single-precision value, normalized.
    pub fn float(value: f64) -> Self {
        Value::Float(Float::new(value))
    }

    /// Wraps a freshly built component.
    pub fn object<C: BrsComponent>(component: C) -> Self {
        Value::Object(ObjectRef::new(component))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Invalid => ValueKind::Invalid,
            Value::Uninitialized => ValueKind::Uninitialized,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Callable(_) => ValueKind::Callable,
            Value::Interface(_) => ValueKind::Interface,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// The numeric payload of a primitive number.
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Value::Int32(v) => Some(Number::Int32(v)),
            Value::Int64(v) => Some(Number::Int64(v)),
            Value::Float(v) => Some(Number::Float(v)),
            Value::Double(v) => Some(Number::Double(v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid)
    }

    /// `Invalid`, or a boxed `roInvalid`.
    pub fn is_invalid_like(&self) -> bool {
        matches!(self.unbox(), Value::Invalid)
    }

    /// A number, primitive or boxed.
    pub fn is_numeric_like(&self) -> bool {
        self.unbox().as_number().is_some()
    }

    /// A string, primitive or boxed.
    pub fn is_string_like(&self) -> bool {
        matches!(self.unbox(), Value::String(_))
    }

    /// The primitive behind a boxed object; any other value is returned as is.
    #[must_use]
    pub fn unbox(&self) -> Value {
        match self {
            Value::Object(obj) => obj.unbox().unwrap_or_else(|| self.clone()),
            other => other.clone(),
        }
    }

    /// Object counterpart of a primitive, or `None` for values that do not
    /// box (objects, interfaces, uninitialized).
    pub fn boxed(&self) -> Option<ObjectRef> {
        match self {
            Value::Invalid
            | Value::Boolean(_)
            | Value::String(_)
            | Value::Int32(_)
            | Value::Int64(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::Callable(_) => Some(boxed::box_primitive(self.clone())),
            Value::Uninitialized | Value::Interface(_) | Value::Object(_) => None,
        }
    }

    /// Structural equality used by `=`, array searches and boxed values.
    ///
    /// Primitives compare against the unboxed form of `other`. Booleans and
    /// numbers compare through truthiness. Objects are equal to themselves
    /// and otherwise defer to the component.
    pub fn equal_to(&self, other: &Value) -> bool {
        if let Value::Object(obj) = self {
            if let Value::Object(rhs) = other {
                if obj.ptr_eq(rhs) {
                    return true;
                }
            }
            return obj.borrow().equal_to(other);
        }
        let other = other.unbox();
        match (self, &other) {
            (Value::Invalid, rhs) => rhs.is_invalid(),
            (Value::Uninitialized, Value::String(s)) => &**s == UNINITIALIZED_TEXT,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Boolean(a), rhs) => rhs.as_number().is_some_and(|n| n.to_boolean() == *a),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Interface(a), Value::Interface(b)) => a.name().eq_ignore_ascii_case(b.name()),
            (lhs, Value::Boolean(b)) => lhs.as_number().is_some_and(|n| n.to_boolean() == *b),
            (lhs, rhs) => match (lhs.as_number(), rhs.as_number()) {
                (Some(a), Some(b)) => a.equal_to(b),
                _ => false,
            },
        }
    }

    /// Ordering for `<` and `>`: numbers against numbers, strings against
    /// strings, both after unboxing. `None` for anything else.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let (lhs, rhs) = (self.unbox(), other.unbox());
        if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
            return a.compare(b);
        }
        match (lhs, rhs) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }

    pub fn less_than(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    pub fn greater_than(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    /// Text form inside a container listing: strings are quoted and
    /// containers collapse to their component name.
    pub fn display_nested(&self) -> String {
        match self {
            Value::String(s) => format!("\"{s}\""),
            Value::Object(obj) => obj.display(true),
            other => other.to_string(),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int32(v) => Value::Int32(v),
            Number::Int64(v) => Value::Int64(v),
            Number::Float(v) => Value::Float(v),
            Number::Double(v) => Value::Double(v),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Invalid => Value::Invalid,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Int32(v) => Value::Int32(*v),
            Literal::Int64(v) => Value::Int64(*v),
            Literal::Float(v) => Value::float(*v),
            Literal::Double(v) => Value::Double(*v),
            Literal::String(s) => Value::string(s.as_str()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Invalid => f.write_str("invalid"),
            Value::Uninitialized => f.write_str("<UNINITIALIZED>"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Callable(callable) => write!(f, "{callable}"),
            Value::Interface(iface) => write!(f, "<Interface: {}>", iface.name()),
            Value::Object(obj) => f.write_str(&obj.display(false)),
            number => match number.as_number() {
                Some(n) => write!(f, "{n}"),
                None => Ok(()),
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Invalid => write!(f, "Invalid"),
            Value::Uninitialized => write!(f, "Uninitialized"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::String(s) => write!(f, "String({:?})", &**s),
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::Int64(v) => write!(f, "Int64({v})"),
            Value::Float(v) => write!(f, "Float({v:?})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::Callable(c) => write!(f, "{c:?}"),
            Value::Interface(iface) => write!(f, "Interface({})", iface.name()),
            Value::Object(obj) => write!(f, "Object({})", obj.component_name()),
        }
    }
}

/// Kind-and-payload equality for tests and assertions.
///
/// Unlike `equal_to`, kinds must match exactly; objects and callables
/// compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Invalid, Value::Invalid) | (Value::Uninitialized, Value::Uninitialized) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Interface(a), Value::Interface(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
