//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::sync::Arc;

use brs_ir::Location;
use brs_values::{Callable, ObjectFactory, ObjectRef, RoAssociativeArray, Value};

use super::Interpreter;
use crate::debugger::Debugger;
use crate::diagnostics::CallStack;
use crate::error_channel::ErrorChannel;
use crate::globals::{global_functions, global_interface};
use crate::host::{NoHost, SharedHost};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::{Environment, ExecutionOptions, Manifest};

/// Errno a thrown string reports before any number was thrown.
const DEFAULT_USER_ERRNO: i32 = 40;

/// Builder for creating Interpreter instances.
///
/// Everything has a default: stdout output, no host, no debugger, the
/// built-in component classes and an empty manifest.
pub struct InterpreterBuilder {
    options: ExecutionOptions,
    manifest: Manifest,
    print_handler: Option<SharedPrintHandler>,
    host: Option<SharedHost>,
    debugger: Option<Box<dyn Debugger>>,
    factory: Option<ObjectFactory>,
    functions: Vec<Callable>,
    root_m: Option<ObjectRef>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            options: ExecutionOptions::default(),
            manifest: Manifest::new(),
            print_handler: None,
            host: None,
            debugger: None,
            factory: None,
            functions: Vec::new(),
            root_m: None,
        }
    }

    #[must_use]
    pub fn options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Set the output sink for `print` and diagnostics.
    ///
    /// Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set the host polled before every statement.
    #[must_use]
    pub fn host(mut self, host: SharedHost) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn debugger(mut self, debugger: Box<dyn Debugger>) -> Self {
        self.debugger = Some(debugger);
        self
    }

    /// Replace the component classes `CreateObject` knows.
    #[must_use]
    pub fn object_factory(mut self, factory: ObjectFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Add a function to the global scope, next to the built-in ones.
    #[must_use]
    pub fn global_function(mut self, function: Callable) -> Self {
        self.functions.push(function);
        self
    }

    /// Use `m` as the top-level `m` instead of a fresh associative array.
    #[must_use]
    pub fn root_m(mut self, m: ObjectRef) -> Self {
        self.root_m = Some(m);
        self
    }

    pub fn build(self) -> Interpreter {
        let root_m = self
            .root_m
            .unwrap_or_else(|| ObjectRef::new(RoAssociativeArray::new(Vec::new())));
        let mut env = Environment::new(root_m);

        let mut functions = global_functions();
        functions.extend(self.functions);
        for function in &functions {
            env.define_global(function.name(), Value::Callable(function.clone()));
        }
        env.define_global("global", global_interface(&functions));

        Interpreter {
            env,
            call_stack: CallStack::new(self.options.max_call_depth),
            location: Location::internal(),
            options: self.options,
            manifest: self.manifest,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            host: self.host.unwrap_or_else(|| Arc::new(NoHost) as SharedHost),
            debugger: self.debugger,
            factory: self.factory.unwrap_or_else(ObjectFactory::with_builtins),
            errors: Vec::new(),
            error_channel: ErrorChannel::new(),
            try_mode: false,
            debug_mode: false,
            last_was_stop: false,
            printed: false,
            run_params: None,
            user_errno: DEFAULT_USER_ERRNO,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
