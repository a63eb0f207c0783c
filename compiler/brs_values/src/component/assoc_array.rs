//! `roAssociativeArray`: string-keyed map that remembers insertion order.
//!
//! Keys are matched without regard to case unless the array was switched to
//! case-sensitive mode. Keys written through dotted access are stored
//! lowercased; keys written through `addReplace`, literals and `append`
//! keep their spelling.

use std::rc::Rc;

use brs_ir::ValueKind;

use super::array::{if_enum, RoArray};
use super::{BrsComponent, Collection, ComponentCore, InterfaceDef, MethodDef, ObjectRef};
use crate::callable::{Argument, Signature};
use crate::context::CallContext;
use crate::errors::EvalResult;
use crate::value::Value;

thread_local! {
    static INTERFACES: Rc<[InterfaceDef]> = build_interfaces();
}

const NON_STRING_INDEX: &str = "Associative array indexes must be strings";

/// Associative array component.
pub struct RoAssociativeArray {
    core: ComponentCore,
    entries: Vec<(String, Value)>,
    /// Position in insertion order; `None` when exhausted.
    cursor: Option<usize>,
    case_sensitive: bool,
}

impl RoAssociativeArray {
    /// Builds an array from literal members, keeping each key's spelling.
    pub fn new(members: Vec<(String, Value)>) -> Self {
        let mut aa = RoAssociativeArray {
            core: ComponentCore::new("roAssociativeArray", INTERFACES.with(Rc::clone)),
            entries: Vec::with_capacity(members.len()),
            cursor: None,
            case_sensitive: false,
        };
        for (key, value) in members {
            aa.insert(&key, value, true);
        }
        aa.reset_next();
        aa
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Stored keys in lexicographic order.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|(key, _)| key.clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Position of the entry `key` names. Exact match only when both the
    /// array and the lookup are case-sensitive.
    fn position(&self, key: &str, case_sensitive: bool) -> Option<usize> {
        if self.case_sensitive && case_sensitive {
            self.entries.iter().position(|(stored, _)| stored == key)
        } else {
            let lowered = key.to_lowercase();
            self.entries
                .iter()
                .position(|(stored, _)| stored.to_lowercase() == lowered)
        }
    }

    pub fn lookup(&self, key: &str, case_sensitive: bool) -> Option<&Value> {
        self.position(key, case_sensitive).map(|idx| &self.entries[idx].1)
    }

    /// Inserts or replaces. In case-insensitive mode any differently spelled
    /// key for the same name is dropped first.
    pub fn insert(&mut self, key: &str, value: Value, case_sensitive: bool) {
        if !self.case_sensitive {
            if let Some(old) = self.position(key, false) {
                self.entries.remove(old);
            }
        }
        let stored = if case_sensitive { key.to_owned() } else { key.to_lowercase() };
        match self.entries.iter_mut().find(|(existing, _)| *existing == stored) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((stored, value)),
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(idx) = self.position(key, self.case_sensitive) else {
            return false;
        };
        self.entries.remove(idx);
        self.update_next();
        true
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

fn string_index(index: &Value) -> Result<Rc<str>, String> {
    match index.unbox() {
        Value::String(key) => Ok(key),
        _ => Err(NON_STRING_INDEX.to_owned()),
    }
}

impl Collection for RoAssociativeArray {
    fn get(&self, index: &Value, case_sensitive: bool) -> Result<Option<Value>, String> {
        let key = string_index(index)?;
        Ok(self.lookup(&key, case_sensitive).cloned())
    }

    fn set(&mut self, index: &Value, value: Value, case_sensitive: bool) -> Result<(), String> {
        let key = string_index(index)?;
        self.insert(&key, value, case_sensitive);
        Ok(())
    }

    /// Keys in lexicographic order, as `for each` visits them.
    fn elements(&self) -> Vec<Value> {
        self.sorted_keys().into_iter().map(Value::string).collect()
    }

    fn reset_next(&mut self) {
        self.cursor = (!self.entries.is_empty()).then_some(0);
    }

    fn has_next(&self) -> bool {
        self.cursor.is_some()
    }

    fn get_next(&mut self) -> Value {
        let Some(position) = self.cursor else {
            return Value::Invalid;
        };
        let next = position.saturating_add(1);
        self.cursor = (next < self.entries.len()).then_some(next);
        self.entries
            .get(position)
            .map_or(Value::Invalid, |(key, _)| Value::string(key.as_str()))
    }

    fn update_next(&mut self) {
        self.cursor = match self.cursor {
            None if !self.entries.is_empty() => Some(0),
            Some(position) if position >= self.entries.len() => None,
            other => other,
        };
    }
}

impl BrsComponent for RoAssociativeArray {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn display(&self, nested: bool) -> String {
        if nested {
            return "<Component: roAssociativeArray>".to_owned();
        }
        let mut sorted: Vec<&(String, Value)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let mut lines = vec!["<Component: roAssociativeArray> =".to_owned(), "{".to_owned()];
        lines.extend(
            sorted
                .into_iter()
                .map(|(key, value)| format!("    {key}: {}", value.display_nested())),
        );
        lines.push("}".to_owned());
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

fn key_arg(args: &[Value]) -> String {
    args.first()
        .map(Value::unbox)
        .and_then(|key| key.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn clear(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    this.with_mut(RoAssociativeArray::clear);
    Ok(Value::Invalid)
}

fn delete(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let key = key_arg(args);
    let deleted = this
        .with_mut(|aa: &mut RoAssociativeArray| aa.remove(&key))
        .unwrap_or(false);
    Ok(Value::Boolean(deleted))
}

fn add_replace(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let key = key_arg(args);
    let value = args.get(1).cloned().unwrap_or(Value::Invalid);
    this.with_mut(|aa: &mut RoAssociativeArray| {
        aa.insert(&key, value, true);
        aa.update_next();
    });
    Ok(Value::Invalid)
}

fn count(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let len = this.with(RoAssociativeArray::len).unwrap_or(0);
    Ok(Value::Int32(i32::try_from(len).unwrap_or(i32::MAX)))
}

fn does_exist(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let key = key_arg(args);
    let exists = this
        .with(|aa: &RoAssociativeArray| aa.position(&key, aa.case_sensitive).is_some())
        .unwrap_or(false);
    Ok(Value::Boolean(exists))
}

fn append(ctx: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    let Some(Value::Object(other)) = args.first() else {
        return Ok(Value::Invalid);
    };
    let Some(incoming) = other.with(|source: &RoAssociativeArray| source.entries.clone()) else {
        let line = format!(
            "BRIGHTSCRIPT: ERROR: roAssociativeArray.Append: invalid parameter type {}: {}",
            other.component_name(),
            ctx.location().format_pkg()
        );
        ctx.write_diagnostic(&line);
        return Ok(Value::Invalid);
    };
    this.with_mut(|aa: &mut RoAssociativeArray| {
        for (key, value) in incoming {
            aa.insert(&key, value, true);
        }
        aa.update_next();
    });
    Ok(Value::Invalid)
}

fn keys(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let keys = this
        .with(|aa: &RoAssociativeArray| aa.elements())
        .unwrap_or_default();
    Ok(Value::object(RoArray::new(keys)))
}

fn items(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let pairs = this
        .with(|aa: &RoAssociativeArray| {
            aa.sorted_keys()
                .into_iter()
                .map(|key| {
                    let value = aa.lookup(&key, true).cloned().unwrap_or(Value::Invalid);
                    (key, value)
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let items = pairs
        .into_iter()
        .map(|(key, value)| {
            Value::object(RoAssociativeArray::new(vec![
                ("key".to_owned(), Value::string(key)),
                ("value".to_owned(), value),
            ]))
        })
        .collect();
    Ok(Value::object(RoArray::new(items)))
}

fn lookup_with(this: &ObjectRef, args: &[Value], case_sensitive: bool) -> EvalResult {
    let key = Value::string(key_arg(args));
    this.get_element(&key, case_sensitive).or(Ok(Value::Invalid))
}

fn lookup(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    lookup_with(this, args, true)
}

fn lookup_ci(_: &mut dyn CallContext, this: &ObjectRef, args: &[Value]) -> EvalResult {
    lookup_with(this, args, false)
}

fn set_mode_case_sensitive(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    this.with_mut(|aa: &mut RoAssociativeArray| aa.case_sensitive = true);
    Ok(Value::Invalid)
}

fn is_empty(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    Ok(Value::Boolean(this.with(RoAssociativeArray::is_empty).unwrap_or(true)))
}

fn is_next(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    let next = this.with(|aa: &RoAssociativeArray| aa.has_next()).unwrap_or(false);
    Ok(Value::Boolean(next))
}

fn next(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    Ok(this
        .with_mut(|aa: &mut RoAssociativeArray| aa.get_next())
        .unwrap_or(Value::Invalid))
}

fn reset(_: &mut dyn CallContext, this: &ObjectRef, _: &[Value]) -> EvalResult {
    this.with_mut(|aa: &mut RoAssociativeArray| aa.reset_next());
    Ok(Value::Invalid)
}

fn build_interfaces() -> Rc<[InterfaceDef]> {
    let none = |returns| Signature::new(Vec::new(), returns);
    let by_key = |returns| Signature::new(vec![Argument::new("key", ValueKind::String)], returns);
    Rc::from(vec![
        InterfaceDef::new(
            "ifAssociativeArray",
            vec![
                MethodDef::new("clear", none(ValueKind::Void), clear),
                MethodDef::new("delete", by_key(ValueKind::Boolean), delete),
                MethodDef::new(
                    "addReplace",
                    Signature::new(
                        vec![
                            Argument::new("key", ValueKind::String),
                            Argument::new("value", ValueKind::Dynamic),
                        ],
                        ValueKind::Void,
                    ),
                    add_replace,
                ),
                MethodDef::new("count", none(ValueKind::Int32), count),
                MethodDef::new("doesExist", by_key(ValueKind::Boolean), does_exist),
                MethodDef::new(
                    "append",
                    Signature::new(vec![Argument::new("obj", ValueKind::Object)], ValueKind::Void),
                    append,
                ),
                MethodDef::new("keys", none(ValueKind::Object), keys),
                MethodDef::new("items", none(ValueKind::Object), items),
                MethodDef::new("lookup", by_key(ValueKind::Dynamic), lookup),
                MethodDef::new("lookupCI", by_key(ValueKind::Dynamic), lookup_ci),
                MethodDef::new("setModeCaseSensitive", none(ValueKind::Void), set_mode_case_sensitive),
            ],
        ),
        if_enum(is_empty, is_next, next, reset),
    ])
}

/// Factory constructor; takes no arguments.
pub(super) fn construct(_: &mut dyn CallContext, _: &[Value]) -> Result<Value, String> {
    Ok(Value::object(RoAssociativeArray::new(Vec::new())))
}
