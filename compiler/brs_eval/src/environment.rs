//! Variable scopes for the interpreter.
//!
//! Lookup walks three scopes: the running function's locals, the module
//! scope (named functions of the loaded files) and the global scope
//! (standard library). Module and global scopes are shared by every
//! sub-environment; each call gets fresh function locals.
//!
//! Names are case-insensitive and stored lower-cased.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use brs_ir::{Identifier, Location, ValueKind};
use brs_values::{cast_mismatch, ObjectRef, Operand, RuntimeError, Value};
use rustc_hash::FxHashMap;

/// A single-threaded shared scope.
///
/// Wraps `Rc<RefCell<T>>` so every shared allocation goes through
/// `LocalScope::new()`. Not thread-safe: the interpreter runs on one
/// thread and values themselves are `Rc`-based.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Which scope a definition targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
}

/// Bindings of one scope, keyed by lower-cased name.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Looks up an already lower-cased name.
    #[inline]
    fn get(&self, key: &str) -> Option<&Value> {
        self.bindings.get(key)
    }

    #[inline]
    fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    fn insert(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_lowercase(), value);
    }

    fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(&name.to_lowercase())
    }

    /// Lower-cased names bound in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The variable environment of one running function.
pub struct Environment {
    global: LocalScope<Scope>,
    module: LocalScope<Scope>,
    function: Scope,
    m: ObjectRef,
    root_m: ObjectRef,
    /// Label a `goto` is searching for, lower-cased. While set, statements
    /// are skipped until the label is reached.
    pub goto_label: Option<String>,
    /// The next loop entered resumes its iteration instead of restarting.
    pub continue_for: bool,
    /// Element a resumed `for each` continues at.
    pub continue_for_each: usize,
}

impl Environment {
    /// Top-level environment whose `m` is `root_m`.
    pub fn new(root_m: ObjectRef) -> Self {
        Environment::with_scopes(
            LocalScope::new(Scope::new()),
            LocalScope::new(Scope::new()),
            root_m.clone(),
            root_m,
        )
    }

    fn with_scopes(
        global: LocalScope<Scope>,
        module: LocalScope<Scope>,
        m: ObjectRef,
        root_m: ObjectRef,
    ) -> Self {
        let mut function = Scope::new();
        function.insert("m", Value::Object(m.clone()));
        Environment {
            global,
            module,
            function,
            m,
            root_m,
            goto_label: None,
            continue_for: false,
            continue_for_each: 0,
        }
    }

    /// Environment for a call: shares the module and global scopes, starts
    /// with empty locals and `m` bound to `m` (or to this environment's `m`).
    pub fn sub_environment(&self, m: Option<ObjectRef>) -> Environment {
        Environment::with_scopes(
            self.global.clone(),
            self.module.clone(),
            m.unwrap_or_else(|| self.m.clone()),
            self.root_m.clone(),
        )
    }

    /// Binds `name` in `scope`.
    ///
    /// Rebinding `global` in a function to anything but the global
    /// interface is a cast mismatch at `location`.
    pub fn define(
        &mut self,
        scope: ScopeKind,
        name: &str,
        value: Value,
        location: &Location,
    ) -> Result<(), RuntimeError> {
        if scope == ScopeKind::Function
            && name.eq_ignore_ascii_case("global")
            && !matches!(value, Value::Interface(_))
        {
            let current = self
                .global
                .borrow()
                .get("global")
                .map_or(ValueKind::Interface, Value::kind);
            return Err(cast_mismatch(
                Operand::new(current, location.clone()),
                Operand::of(&value, location.clone()),
            ));
        }
        match scope {
            ScopeKind::Function => self.function.insert(name, value),
            ScopeKind::Module => self.module.borrow_mut().insert(name, value),
            ScopeKind::Global => self.global.borrow_mut().insert(name, value),
        }
        Ok(())
    }

    /// Binds `name` in the global scope. Never fails.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.global.borrow_mut().insert(name, value);
    }

    /// Resolves `name`: function locals, then module, then global.
    ///
    /// `LINE_NUM` always resolves to the line it appears on.
    pub fn get(&self, name: &Identifier) -> Option<Value> {
        let key = name.name.to_lowercase();
        if key == "line_num" {
            let line = i32::try_from(name.location.start.line).unwrap_or(i32::MAX);
            return Some(Value::Int32(line));
        }
        if let Some(value) = self.function.get(&key) {
            return Some(value.clone());
        }
        if let Some(value) = self.module.borrow().get(&key) {
            return Some(value.clone());
        }
        self.global.borrow().get(&key).cloned()
    }

    /// Resolves `name` in the global scope only, skipping any shadowing
    /// local or module binding.
    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.global.borrow().get(&name.to_lowercase()).cloned()
    }

    /// Looks a name up without a source location.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.get(&Identifier::new(name, Location::internal()))
    }

    /// Whether `name` is bound in `scope`. `m` always is.
    pub fn has(&self, name: &str, scope: ScopeKind) -> bool {
        let key = name.to_lowercase();
        if key == "m" {
            return true;
        }
        match scope {
            ScopeKind::Function => self.function.contains(&key),
            ScopeKind::Module => self.module.borrow().contains(&key),
            ScopeKind::Global => self.global.borrow().contains(&key),
        }
    }

    /// Removes a function-local or module binding. Global bindings stay.
    pub fn remove(&mut self, name: &str, scope: ScopeKind) {
        match scope {
            ScopeKind::Function => {
                self.function.remove(name);
            }
            ScopeKind::Module => {
                self.module.borrow_mut().remove(name);
            }
            ScopeKind::Global => {}
        }
    }

    /// The current `m` object.
    #[inline]
    pub fn m(&self) -> &ObjectRef {
        &self.m
    }

    pub fn set_m(&mut self, m: ObjectRef) {
        self.m = m;
    }

    /// The `m` of the top-level run.
    #[inline]
    pub fn root_m(&self) -> &ObjectRef {
        &self.root_m
    }

    /// Names bound in `scope`.
    pub fn names(&self, scope: ScopeKind) -> Vec<String> {
        match scope {
            ScopeKind::Function => self.function.names(),
            ScopeKind::Module => self.module.borrow().names(),
            ScopeKind::Global => self.global.borrow().names(),
        }
    }

    /// Clears the goto and loop-resumption state.
    pub fn reset_jump_state(&mut self) {
        self.goto_label = None;
        self.continue_for = false;
        self.continue_for_each = 0;
    }
}

#[cfg(test)]
mod tests;
