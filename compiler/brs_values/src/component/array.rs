//! `roArray`: a growable, ordered list of values.

use std::rc::Rc;

use brs_ir::{Literal, ValueKind};

use super::{BrsComponent, Collection, ComponentCore, InterfaceDef, MethodDef, ObjectRef};
use crate::callable::{Argument, MethodFn, Signature};
use crate::context::CallContext;
use crate::errors::EvalResult;
use crate::numeric::Number;
use crate::value::Value;

thread_local! {
    static INTERFACES: Rc<[InterfaceDef]> = build_interfaces();
}

/// Array component.
pub struct RoArray {
    core: ComponentCore,
    elements: Vec<Value>,
    /// Iteration cursor for `for each` and `ifEnum`; `None` when exhausted.
    cursor: Option<usize>,
    max_size: usize,
    resizable: bool,
}

impl RoArray {
    pub fn new(elements: Vec<Value>) -> Self {
        let cursor = (!elements.is_empty()).then_some(0);
        RoArray {
            core: ComponentCore::new("roArray", INTERFACES.with(Rc::clone)),
            elements,
            cursor,
            max_size: 0,
            resizable: true,
        }
    }

    /// `CreateObject("roArray", capacity, resizable)`. Only a bounded
    /// number of slots is reserved up front; the rest grows on demand.
    pub fn with_capacity(capacity: usize, resizable: bool) -> Self {
        let mut array = RoArray::new(Vec::with_capacity(capacity.min(MAX_PREALLOCATED)));
        array.max_size = capacity.min(MAX_ELEMENTS);
        array.resizable = resizable;
        array
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// Appends or prepends, unless a fixed-size array is full.
    fn add(&mut self, value: Value, at_tail: bool) -> bool {
        if !self.resizable && self.elements.len() >= self.max_size {
            return false;
        }
        if at_tail {
            self.elements.push(value);
        } else {
            self.elements.insert(0, value);
        }
        self.update_next();
        true
    }

    fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        self.update_next();
        Some(removed)
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.cursor = None;
    }
}

/// Largest length an indexed assignment may grow an array to.
const MAX_ELEMENTS: usize = 1 << 24;

/// Slots reserved up front by `CreateObject("roArray", capacity, ...)`.
const MAX_PREALLOCATED: usize = 4096;

/// Array position named by an `Integer` or `Float` index. Floats are
/// truncated and clamped to the 32-bit range; negative positions are
/// `Ok(None)`.
fn element_index(index: &Value) -> Result<Option<usize>, String> {
    let position = match index.unbox().as_number() {
        Some(Number::Int32(v)) => v,
        Some(Number::Float(v)) => v.get() as i32,
        _ => return Err("Array indexes must be 32-bit integers, or Float".to_owned()),
    };
    Ok(usize::try_from(position).ok())
}

impl Collection for RoArray {
    fn get(&self, index: &Value, _case_sensitive: bool) -> Result<Option<Value>, String> {
        if index.is_string_like() {
            return Ok(None);
        }
        let element = match element_index(index) {
            Ok(Some(position)) => self.elements.get(position).cloned(),
            _ => None,
        };
        Ok(Some(element.unwrap_or(Value::Invalid)))
    }

    fn set(&mut self, index: &Value, value: Value, _case_sensitive: bool) -> Result<(), String> {
        let Some(position) = element_index(index)? else {
            return Ok(());
        };
        if position >= self.elements.len() {
            if position >= MAX_ELEMENTS {
                return Err(format!("Array index {position} exceeds the maximum array size of {MAX_ELEMENTS}"));
            }
            let additional = position.saturating_sub(self.elements.len()).saturating_add(1);
            self.elements
                .try_reserve(additional)
                .map_err(|_| format!("Not enough memory to grow array to index {position}"))?;
            self.elements.resize(position, Value::Invalid);
            self.elements.push(value);
            self.update_next();
        } else {
            self.elements[position] = value;
        }
        Ok(())
    }

    fn elements(&self) -> Vec<Value> {
        self.elements.clone()
    }

    fn reset_next(&mut self) {
        self.cursor = (!self.elements.is_empty()).then_some(0);
    }

    fn has_next(&self) -> bool {
        self.cursor.is_some()
    }

    fn get_next(&mut self) -> Value {
        let Some(position) = self.cursor else {
            return Value::Invalid;
        };
        let next = position.saturating_add(1);
        self.cursor = (next < self.elements.len()).then_some(next);
        self.elements.get(position).cloned().unwrap_or(Value::Invalid)
    }

    fn update_next(&mut self) {
        self.cursor = match self.cursor {
            None if !self.elements.is_empty() => Some(0),
            Some(position) if position >= self.elements.len() => None,
            other => other,
        };
    }
}

impl BrsComponent for RoArray {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn display(&self, nested: bool) -> String {
        if nested {
            return "<Component: roArray>".to_owned();
        }
        let mut lines = vec!["<Component: roArray> =".to_owned(), "[".to_owned()];
        lines.extend(self.elements.iter().map(|el| format!("    {}", el.display_nested())));
        lines.push("]".to_owned());
        lines.join("\n")
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }

    fn as_collection_mut(&mut self) -> Option<&mut dyn Collection> {
        Some(self)
    }
}

// Methods

fn with_array<R>(this: &ObjectRef, f: impl FnOnce(&mut RoArray) -> R) -> Option<R> {
    this.with_mut(f)
}

fn peek(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let last = with_array(this, |array| array.elements.last().cloned()).flatten();
    Ok(last.unwrap_or(Value::Invalid))
}

fn pop(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let popped = with_array(this, |array| {
        let tail = array.elements.len().checked_sub(1)?;
        array.remove(tail)
    })
    .flatten();
    Ok(popped.unwrap_or(Value::Invalid))
}

fn shift(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let shifted = with_array(this, |array| array.remove(0)).flatten();
    Ok(shifted.unwrap_or(Value::Invalid))
}

fn add_reporting(ctx: &mut dyn CallContext, this: &ObjectRef, args: &[Value], at_tail: bool) -> EvalResult {
    let value = args.first().cloned().unwrap_or(Value::Invalid);
    let added = with_array(this, |array| array.add(value, at_tail)).unwrap_or(true);
    if !added {
        let method = if at_tail { "Push" } else { "Unshift" };
        let line = format!(
            "BRIGHTSCRIPT: ERROR: roArray.{method}: set ignored for index out of bounds on non-resizable array: {}",
            ctx.location().format_pkg()
        );
        ctx.write_diagnostic(&line);
    }
    Ok(Value::Invalid)
}

fn push(ctx: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    add_reporting(ctx, this, args, true)
}

fn unshift(ctx: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    add_reporting(ctx, this, args, false)
}

fn delete(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let removed = match args.first() {
        Some(Value::Int32(index)) => usize::try_from(*index)
            .ok()
            .and_then(|position| with_array(this, |array| array.remove(position)).flatten())
            .is_some(),
        _ => false,
    };
    Ok(Value::Boolean(removed))
}

fn count(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let len = with_array(this, |array| array.len()).unwrap_or(0);
    Ok(Value::Int32(i32::try_from(len).unwrap_or(i32::MAX)))
}

fn clear(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    with_array(this, RoArray::clear);
    Ok(Value::Invalid)
}

fn append(ctx: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let Some(Value::Object(other)) = args.first() else {
        return Ok(Value::Invalid);
    };
    // Read the source first: `a.append(a)` borrows the same cell twice.
    let Some(incoming) = other.with(|source: &RoArray| source.elements.clone()) else {
        let line = format!(
            "BRIGHTSCRIPT: ERROR: roArray.Append: invalid parameter type {}: {}",
            other.component_name(),
            ctx.location().format_pkg()
        );
        ctx.write_diagnostic(&line);
        return Ok(Value::Invalid);
    };
    with_array(this, |array| {
        let fits = array.resizable
            || array.elements.len().saturating_add(incoming.len()) <= array.max_size;
        if fits {
            array.elements.extend(incoming);
            array.update_next();
        }
    });
    Ok(Value::Invalid)
}

fn get_entry(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let index = args.first().cloned().unwrap_or(Value::Invalid);
    let entry = this.with(|array: &RoArray| array.get(&index, false));
    Ok(entry.and_then(Result::ok).flatten().unwrap_or(Value::Invalid))
}

fn set_entry(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    if let [index, value, ..] = args {
        let _ = with_array(this, |array| array.set(index, value.clone(), false));
    }
    Ok(Value::Invalid)
}

fn join(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let separator = args.first().and_then(Value::as_str).unwrap_or_default().to_owned();
    let joined = this
        .with(|array: &RoArray| {
            let parts: Option<Vec<String>> = array
                .elements
                .iter()
                .map(|el| el.unbox().as_str().map(str::to_owned))
                .collect();
            parts.map(|parts| parts.join(&separator)).unwrap_or_default()
        })
        .unwrap_or_default();
    Ok(Value::string(joined))
}

fn is_empty(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    Ok(Value::Boolean(with_array(this, |array| array.is_empty()).unwrap_or(true)))
}

fn is_next(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    Ok(Value::Boolean(with_array(this, |array| array.has_next()).unwrap_or(false)))
}

fn next(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    Ok(with_array(this, Collection::get_next).unwrap_or(Value::Invalid))
}

fn reset(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    with_array(this, Collection::reset_next);
    Ok(Value::Invalid)
}

fn no_args(returns: ValueKind) -> Signature {
    Signature::new(Vec::new(), returns)
}

/// `ifEnum`, shared by both collection types.
pub(super) fn if_enum(
    is_empty: MethodFn,
    is_next: MethodFn,
    next: MethodFn,
    reset: MethodFn,
) -> InterfaceDef {
    InterfaceDef::new(
        "ifEnum",
        vec![
            MethodDef::new("isEmpty", no_args(ValueKind::Boolean), is_empty),
            MethodDef::new("isNext", no_args(ValueKind::Boolean), is_next),
            MethodDef::new("next", no_args(ValueKind::Dynamic), next),
            MethodDef::new("reset", no_args(ValueKind::Void), reset),
        ],
    )
}

fn build_interfaces() -> Rc<[InterfaceDef]> {
    let value_arg = || vec![Argument::new("tvalue", ValueKind::Dynamic)];
    Rc::from(vec![
        InterfaceDef::new(
            "ifArray",
            vec![
                MethodDef::new("peek", no_args(ValueKind::Dynamic), peek),
                MethodDef::new("pop", no_args(ValueKind::Dynamic), pop),
                MethodDef::new("push", Signature::new(value_arg(), ValueKind::Void), push),
                MethodDef::new("shift", no_args(ValueKind::Dynamic), shift),
                MethodDef::new("unshift", Signature::new(value_arg(), ValueKind::Void), unshift),
                MethodDef::new(
                    "delete",
                    Signature::new(vec![Argument::new("index", ValueKind::Int32)], ValueKind::Boolean),
                    delete,
                ),
                MethodDef::new("count", no_args(ValueKind::Int32), count),
                MethodDef::new("clear", no_args(ValueKind::Void), clear),
                MethodDef::new(
                    "append",
                    Signature::new(vec![Argument::new("array", ValueKind::Object)], ValueKind::Void),
                    append,
                ),
            ],
        ),
        InterfaceDef::new(
            "ifArrayGet",
            vec![MethodDef::new(
                "getEntry",
                Signature::new(vec![Argument::new("index", ValueKind::Dynamic)], ValueKind::Dynamic),
                get_entry,
            )],
        ),
        InterfaceDef::new(
            "ifArraySet",
            vec![MethodDef::new(
                "setEntry",
                Signature::new(
                    vec![
                        Argument::new("index", ValueKind::Dynamic),
                        Argument::new("tvalue", ValueKind::Dynamic),
                    ],
                    ValueKind::Void,
                ),
                set_entry,
            )],
        ),
        InterfaceDef::new(
            "ifArrayJoin",
            vec![MethodDef::new(
                "join",
                Signature::new(
                    vec![Argument::optional("separator", ValueKind::String, Literal::String(String::new()))],
                    ValueKind::String,
                ),
                join,
            )],
        ),
        if_enum(is_empty, is_next, next, reset),
    ])
}

/// Factory constructor: `(capacity as Integer|Float, resizable as Boolean|number)`.
pub(super) fn construct(_: &mut dyn CallContext, args: &[Value]) -> Result<Value, String> {
    let invalid = || "BRIGHTSCRIPT: ERROR: Runtime: \"roArray\": invalid number of parameters".to_owned();
    let [capacity, resizable] = args else {
        return Err(invalid());
    };
    let capacity = match capacity {
        Value::Int32(v) => i64::from(*v),
        Value::Float(v) => v.get().trunc() as i64,
        _ => return Err(invalid()),
    };
    let resizable = match resizable {
        Value::Boolean(b) => *b,
        other => other.as_number().ok_or_else(invalid)?.to_boolean(),
    };
    let capacity = usize::try_from(capacity).unwrap_or(0);
    Ok(Value::object(RoArray::with_capacity(capacity, resizable)))
}
