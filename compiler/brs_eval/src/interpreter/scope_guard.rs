//! RAII-style guards for swapping the interpreter's environment.
//!
//! A call runs in a sub-environment: fresh locals, the caller's module and
//! global scopes, its own `m`. [`ScopedInterpreter`] swaps that environment
//! in and puts the caller's back when dropped, so every way out of a call
//! (value, signal, error) restores the caller's scope. A guard opened for a
//! user-function call also pops that call's frame.
//!
//! # Usage
//!
//! ```text
//! let env = interpreter.environment().sub_environment(Some(m));
//! {
//!     let mut scoped = interpreter.in_sub_env(env);
//!     scoped.execute(stmt)?;
//! } // caller's environment restored here
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::Environment;

/// Guard that restores the caller's environment on drop.
///
/// Access the interpreter through this guard - it implements `Deref` and
/// `DerefMut`.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
    saved: Option<Environment>,
    pops_frame: bool,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        if self.pops_frame {
            self.interpreter.call_stack.pop();
        }
        if let Some(env) = self.saved.take() {
            self.interpreter.env = env;
        }
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Runs with `env` as the current environment until the guard drops.
    pub fn in_sub_env(&mut self, env: Environment) -> ScopedInterpreter<'_> {
        let saved = std::mem::replace(&mut self.env, env);
        ScopedInterpreter {
            interpreter: self,
            saved: Some(saved),
            pops_frame: false,
        }
    }

    /// Like `in_sub_env`, for a user-function body whose frame the caller
    /// has just pushed. The guard pops that frame too.
    pub(crate) fn in_call_frame(&mut self, env: Environment) -> ScopedInterpreter<'_> {
        let mut scoped = self.in_sub_env(env);
        scoped.pops_frame = true;
        scoped
    }

    /// Closure form of [`Interpreter::in_sub_env`].
    pub fn with_sub_env<T>(&mut self, env: Environment, f: impl FnOnce(&mut Interpreter) -> T) -> T {
        let mut scoped = self.in_sub_env(env);
        f(&mut scoped)
    }
}
