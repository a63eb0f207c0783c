//! Member access: `a.b`, `a[i, j]`, their assignments and interface
//! narrowing.
//!
//! Primitives are boxed before method lookup, so `"abc".len()` resolves on
//! the `roString` counterpart. Associative arrays are searched for keys
//! before methods; a function read from one is bound to it so that it
//! becomes `m` when called.

use brs_ir::{Expr, ExprKind, Identifier, Location};
use brs_values::{
    runtime_error, type_mismatch, ErrorDetail, EvalResult, ObjectRef, Operand,
    RoAssociativeArray, RuntimeError, Value,
};

use super::{AccessMode, Interpreter};
use crate::globals::GLOBAL_INTERFACE;

/// The object a value dispatches methods on: objects as they are,
/// primitives boxed.
fn dispatch_target(value: &Value) -> Option<ObjectRef> {
    match value {
        Value::Object(obj) => Some(obj.clone()),
        other => other.boxed(),
    }
}

fn is_assoc_array(obj: &ObjectRef) -> bool {
    obj.is::<RoAssociativeArray>()
}

/// Binds functions read from an associative array to it.
fn bind_to_source(value: Value, source: &ObjectRef) -> Value {
    match value {
        Value::Callable(callable) if is_assoc_array(source) => {
            Value::Callable(callable.with_context(source))
        }
        other => other,
    }
}

/// Drops the receiver of a function being stored, so a collection never
/// keeps itself alive through one of its own members.
fn unbound(value: Value) -> Value {
    match value {
        Value::Callable(callable) => Value::Callable(callable.without_context()),
        other => other,
    }
}

/// What the object of a dotted access evaluated to.
enum MemberSource<'e> {
    /// `obj.ifFoo` where `obj` implements `ifFoo`.
    Interface(ObjectRef, &'e Identifier),
    Value(Value),
}

impl Interpreter {
    /// `obj.name`.
    ///
    /// `obj.ifFoo` alone yields `obj`. `obj.ifFoo.member` narrows the
    /// method lookup to `ifFoo` when it is the target of a call and is a
    /// syntax error anywhere else, at any depth of a dotted chain.
    pub(crate) fn eval_dotted_get(
        &mut self,
        obj: &Expr,
        name: &Identifier,
        optional: bool,
        mode: AccessMode,
    ) -> EvalResult {
        match self.member_source(obj)? {
            MemberSource::Interface(component, interface) => {
                self.narrowed_member(&component, interface, name, mode)
            }
            MemberSource::Value(source) => self.get_member(source, name, optional),
        }
    }

    /// Evaluates the object of a dotted access, keeping `obj.ifFoo` apart
    /// so the member read after it can be narrowed.
    fn member_source<'e>(&mut self, obj: &'e Expr) -> EvalResult<MemberSource<'e>> {
        let ExprKind::DottedGet {
            obj: inner,
            name: interface,
            optional,
        } = &obj.kind
        else {
            return self.evaluate(obj).map(MemberSource::Value);
        };
        let source = match self.member_source(inner)? {
            MemberSource::Interface(component, outer) => {
                self.narrowed_member(&component, outer, interface, AccessMode::Value)?
            }
            MemberSource::Value(source) => source,
        };
        self.location = obj.location.clone();
        if let Some(component) = dispatch_target(&source) {
            if component.has_interface(&interface.name) {
                return Ok(MemberSource::Interface(component, interface));
            }
        }
        self.get_member(source, interface, *optional).map(MemberSource::Value)
    }

    fn narrowed_member(
        &mut self,
        component: &ObjectRef,
        interface: &Identifier,
        name: &Identifier,
        mode: AccessMode,
    ) -> EvalResult {
        if mode == AccessMode::Value {
            return Err(self.raise(runtime_error(ErrorDetail::BAD_SYNTAX, name.location.clone())));
        }
        component.set_filter(Some(&interface.name));
        match component.get_method(&name.name) {
            Some(method) => Ok(Value::Callable(method)),
            None => Err(self.raise(runtime_error(
                ErrorDetail::MEMBER_FUNCTION_NOT_FOUND,
                name.location.clone(),
            ))),
        }
    }

    /// Reads member `name` of an evaluated `source`.
    fn get_member(&mut self, source: Value, name: &Identifier, optional: bool) -> EvalResult {
        let component = dispatch_target(&source);
        match (&component, &source) {
            (Some(component), _) => {
                if component.has_interface(&name.name) {
                    return Ok(Value::Object(component.clone()));
                }
                component.set_filter(None);
            }
            (None, Value::Interface(interface))
                if interface.name() == GLOBAL_INTERFACE && interface.has_method(&name.name) =>
            {
                if let Some(function @ Value::Callable(_)) = self.env.get_global(&name.name) {
                    return Ok(function);
                }
            }
            _ => {}
        }

        if let Value::Object(obj) = &source {
            if obj.is_collection() {
                let key = Value::string(name.name.as_str());
                return match obj.get_element(&key, false) {
                    Ok(value) => Ok(bind_to_source(value, obj)),
                    Err(message) => Err(self.raise(RuntimeError::plain(message, name.location.clone()))),
                };
            }
        }

        let mut detail = ErrorDetail::DOT_ON_NON_OBJECT;
        if let Some(component) = component {
            let invalid = source.is_invalid_like();
            if invalid && optional {
                return Ok(source);
            }
            if let Some(method) = component.get_method(&name.name) {
                return Ok(Value::Callable(method));
            }
            if !invalid {
                detail = ErrorDetail::MEMBER_FUNCTION_NOT_FOUND;
            }
        }
        Err(self.raise(runtime_error(detail, name.location.clone())))
    }

    /// `obj[i]` or `obj[i, j, ...]`.
    pub(crate) fn eval_indexed_get(
        &mut self,
        obj: &Expr,
        indexes: &[Expr],
        optional: bool,
        closing_square: &Location,
    ) -> EvalResult {
        let source = self.evaluate(obj)?;
        let collection = match &source {
            Value::Object(collection) if collection.is_collection() => collection.clone(),
            _ => {
                if optional && source.is_invalid() {
                    return Ok(source);
                }
                let at = obj.location.merge(closing_square);
                return Err(self.raise(runtime_error(ErrorDetail::UNDIMMED_ARRAY, at)));
            }
        };

        if is_assoc_array(&collection) {
            let key = self.assoc_array_key(indexes, closing_square)?;
            return match collection.get_element(&key, true) {
                Ok(value) => Ok(bind_to_source(value, &collection)),
                Err(message) => Err(self.raise(RuntimeError::plain(message, closing_square.clone()))),
            };
        }

        let mut current = source;
        for index in indexes {
            let position = self.array_index(index)?;
            current = match &current {
                Value::Object(array) if array.is_collection() && !is_assoc_array(array) => {
                    match array.get_element(&position, false) {
                        Ok(value) => value,
                        Err(message) => {
                            return Err(self.raise(RuntimeError::plain(message, index.location.clone())));
                        }
                    }
                }
                _ => {
                    let at = obj.location.merge(closing_square);
                    return Err(self.raise(runtime_error(ErrorDetail::BAD_NUMBER_OF_INDEXES, at)));
                }
            };
        }
        Ok(current)
    }

    /// The single string key of an associative array access.
    fn assoc_array_key(&mut self, indexes: &[Expr], closing_square: &Location) -> EvalResult {
        let [index] = indexes else {
            return Err(self.raise(runtime_error(
                ErrorDetail::WRONG_NUMBER_OF_PARAMS,
                closing_square.clone(),
            )));
        };
        let key = self.evaluate(index)?;
        if !matches!(key, Value::String(_)) {
            let err = type_mismatch(
                "\"String\" should be used as key, but received",
                Operand::of(&key, index.location.clone()),
                None,
            );
            return Err(self.raise(err));
        }
        Ok(key)
    }

    /// One numeric array index.
    fn array_index(&mut self, index: &Expr) -> EvalResult {
        let position = self.evaluate(index)?;
        if !position.is_numeric_like() {
            return Err(self.raise(runtime_error(
                ErrorDetail::NON_NUMERIC_ARRAY_INDEX,
                index.location.clone(),
            )));
        }
        Ok(position)
    }

    /// `obj.name = value`. The value is evaluated before the object.
    pub(crate) fn assign_dotted(&mut self, obj: &Expr, name: &Identifier, value: &Expr) -> EvalResult<()> {
        let value = self.evaluate(value)?;
        let source = self.evaluate(obj)?;
        let target = self.assignable(source, &name.location)?;
        self.store_member(&target, name, value)
    }

    /// The collection an assignment writes into; anything else is a bad
    /// left-hand side at `at`.
    pub(crate) fn assignable(&mut self, source: Value, at: &Location) -> EvalResult<ObjectRef> {
        match source {
            Value::Object(target) if target.is_collection() => Ok(target),
            _ => Err(self.raise(runtime_error(ErrorDetail::BAD_LHS, at.clone()))),
        }
    }

    /// Writes member `name` of an already evaluated object.
    pub(crate) fn store_member(&mut self, target: &ObjectRef, name: &Identifier, value: Value) -> EvalResult<()> {
        let key = Value::string(name.name.as_str());
        target
            .set_element(&key, unbound(value), false)
            .map_err(|message| self.raise(RuntimeError::plain(message, name.location.clone())))
    }

    /// `obj[i, ...] = value`. The value is evaluated before the object.
    pub(crate) fn assign_indexed(
        &mut self,
        obj: &Expr,
        indexes: &[Expr],
        value: &Expr,
        closing_square: &Location,
    ) -> EvalResult<()> {
        let value = self.evaluate(value)?;
        let source = self.evaluate(obj)?;
        let target = self.assignable(source, &obj.location)?;
        self.store_indexed(&target, indexes, value, closing_square)
    }

    /// Writes `target[i, ...]`, walking nested arrays for every index but
    /// the last.
    pub(crate) fn store_indexed(
        &mut self,
        target: &ObjectRef,
        indexes: &[Expr],
        value: Value,
        closing_square: &Location,
    ) -> EvalResult<()> {
        if is_assoc_array(target) {
            let key = self.assoc_array_key(indexes, closing_square)?;
            return target
                .set_element(&key, unbound(value), true)
                .map_err(|message| self.raise(RuntimeError::plain(message, closing_square.clone())));
        }

        let Some((last, leading)) = indexes.split_last() else {
            return Err(self.raise(runtime_error(
                ErrorDetail::BAD_NUMBER_OF_INDEXES,
                closing_square.clone(),
            )));
        };

        let mut current = target.clone();
        for index in leading {
            let position = self.array_index(index)?;
            let next = current
                .get_element(&position, false)
                .map_err(|message| self.raise(RuntimeError::plain(message, closing_square.clone())))?;
            current = match next {
                Value::Object(array) if array.is_collection() && !is_assoc_array(&array) => array,
                _ => {
                    return Err(self.raise(runtime_error(
                        ErrorDetail::BAD_NUMBER_OF_INDEXES,
                        closing_square.clone(),
                    )));
                }
            };
        }

        let position = self.array_index(last)?;
        current
            .set_element(&position, unbound(value), false)
            .map_err(|message| self.raise(RuntimeError::plain(message, closing_square.clone())))
    }
}
