//! Tree-walking interpreter for BrightScript.
//!
//! # Architecture
//!
//! `evaluate(&Expr)` and `execute(&Stmt)` are the two mutually recursive
//! entry points. Both record the node's location first, so an error raised
//! mid-evaluation reports the precise source position.
//!
//! Non-local control flow travels as `Err(ControlSignal)`. Each boundary
//! matches only the signals it owns and re-propagates everything else:
//!
//! - `function_call.rs` - callee resolution, argument binding, frames,
//!   `Return`
//! - `member_access.rs` - dotted/indexed get and set, interface narrowing
//! - `statements.rs` - statement dispatch, loop signals, goto label search
//! - `debug.rs` - host polling and debugger breaks
//! - `entry.rs` - top-level runs and entry point selection
//!
//! Helpers that need no interpreter state live in `crate::exec`.
//!
//! # Error recording
//!
//! Every detected error goes through `raise()`, which snapshots the call
//! stack, logs it, appends it to `errors()` and broadcasts it on the error
//! channel before it starts unwinding. Catching happens later (or never).

mod builder;
mod debug;
mod entry;
mod function_call;
mod member_access;
mod scope_guard;
mod statements;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use std::rc::Rc;

use brs_ir::{BinaryOp, Expr, ExprKind, Location};
use brs_stack::ensure_sufficient_stack;
use brs_values::{
    CallContext, Callable, ControlSignal, EvalResult, ObjectFactory, ObjectRef, RoArray,
    RoAssociativeArray, RuntimeError, Value,
};
use tracing::debug;

use crate::debugger::{BreakContext, BreakError, Debugger};
use crate::diagnostics::CallStack;
use crate::error_channel::{ErrorChannel, ErrorSubscription};
use crate::host::SharedHost;
use crate::operators::{
    evaluate_binary, evaluate_logical, needs_right_operand, short_circuit, OperandLocations,
};
use crate::print_handler::SharedPrintHandler;
use crate::unary_operators::evaluate_unary;
use crate::{Environment, ExecutionOptions, Manifest};

/// How a dotted access is used: as a value or as the target of a call.
///
/// Interface narrowing (`obj.ifFoo.member`) is only legal for call targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AccessMode {
    Value,
    Callee,
}

/// The BrightScript interpreter.
///
/// Single-threaded: values are `Rc`-based. Only the host handle and the
/// output sink are shareable with other threads.
pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) call_stack: CallStack,
    /// Location of the node being evaluated.
    pub(crate) location: Location,
    pub(crate) options: ExecutionOptions,
    pub(crate) manifest: Manifest,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) host: SharedHost,
    pub(crate) debugger: Option<Box<dyn Debugger>>,
    pub(crate) factory: ObjectFactory,
    pub(crate) errors: Vec<RuntimeError>,
    pub(crate) error_channel: ErrorChannel,
    /// Inside a `try` block: crash breaks are suppressed.
    pub(crate) try_mode: bool,
    /// Break at the next non-block statement.
    pub(crate) debug_mode: bool,
    /// The previous statement was `stop`; skip the next host poll.
    pub(crate) last_was_stop: bool,
    /// A `print` ran during this run.
    pub(crate) printed: bool,
    pub(crate) run_params: Option<ObjectRef>,
    /// Errno a thrown string reports; the last explicitly thrown number.
    pub(crate) user_errno: i32,
}

impl Interpreter {
    /// Interpreter with default options, stdout output and no host.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Evaluates an expression.
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        if !expr.location.is_unknown() {
            self.location = expr.location.clone();
        }
        ensure_sufficient_stack(|| self.eval_expr(expr))
    }

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Value::from(literal)),
            ExprKind::Variable(name) => Ok(self.env.get(name).unwrap_or(Value::Uninitialized)),
            ExprKind::Grouping(inner) => self.evaluate(inner),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => {
                let value = self.evaluate(operand)?.unbox();
                evaluate_unary(*op, value, &expr.location).map_err(|err| self.raise(err))
            }
            ExprKind::ArrayLiteral(elements) => {
                let values = elements
                    .iter()
                    .map(|element| self.evaluate(element))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::object(RoArray::new(values)))
            }
            ExprKind::AALiteral(members) => {
                let mut entries = Vec::with_capacity(members.len());
                for member in members {
                    let value = self.evaluate(&member.value)?;
                    entries.push((member.name.clone(), value));
                }
                Ok(Value::object(RoAssociativeArray::new(entries)))
            }
            ExprKind::Function(func) => Ok(Value::Callable(Callable::user(None, Rc::clone(func)))),
            ExprKind::Call {
                callee,
                args,
                optional,
                closing_paren,
            } => self.eval_call(callee, args, *optional, closing_paren),
            ExprKind::DottedGet {
                obj,
                name,
                optional,
            } => self.eval_dotted_get(obj, name, *optional, AccessMode::Value),
            ExprKind::IndexedGet {
                obj,
                indexes,
                optional,
                closing_square,
            } => self.eval_indexed_get(obj, indexes, *optional, closing_square),
        }
    }

    /// Binary operators. `and`/`or` evaluate the right side only when the
    /// left side does not decide the result.
    fn eval_binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr) -> EvalResult {
        let lhs = self.evaluate(left)?.unbox();
        let at = OperandLocations {
            left: &left.location,
            right: &right.location,
        };
        if op.is_logical() {
            if let Some(decided) = short_circuit(op, &lhs) {
                return Ok(decided);
            }
            let rhs = if needs_right_operand(&lhs) {
                self.evaluate(right)?.unbox()
            } else {
                Value::Invalid
            };
            return evaluate_logical(op, &lhs, &rhs, at).map_err(|err| self.raise(err));
        }
        let rhs = self.evaluate(right)?.unbox();
        evaluate_binary(op, &lhs, &rhs, at).map_err(|err| self.raise(err))
    }

    /// Records `err` and turns it into the signal that unwinds with it.
    ///
    /// The backtrace is snapshotted here unless the error already carries
    /// one (rethrown records keep theirs).
    pub(crate) fn raise(&mut self, mut err: RuntimeError) -> ControlSignal {
        if err.backtrace.is_none() {
            err.backtrace = Some(self.call_stack.capture());
        }
        debug!(
            errno = err.errno,
            location = %err.location,
            message = %err.message,
            "runtime error"
        );
        self.errors.push(err.clone());
        self.error_channel.emit(&err);

        if self.options.stop_on_crash && !self.try_mode {
            self.options.stop_on_crash = false;
            let context = BreakContext {
                location: err.location.clone(),
                error: Some(BreakError {
                    message: err.message.clone(),
                    errno: err.errno,
                }),
                backtrace: err.backtrace.clone().unwrap_or_default(),
            };
            if let Some(debugger) = self.debugger.as_mut() {
                debug!(errno = err.errno, "crash break");
                if !debugger.on_break(&context) {
                    return ControlSignal::DebugExit;
                }
            }
        }
        ControlSignal::from(err)
    }

    /// Records errors coming back from native code, which does not know
    /// about the error log.
    pub(crate) fn record_signal(&mut self, signal: ControlSignal) -> ControlSignal {
        match signal {
            ControlSignal::Error(err) if err.backtrace.is_none() => self.raise(*err),
            other => other,
        }
    }

    /// Every error raised so far, caught or not, oldest first.
    pub fn errors(&self) -> &[RuntimeError] {
        &self.errors
    }

    /// Calls `handler` for every error as it is raised.
    pub fn on_error(&self, handler: impl Fn(&RuntimeError) + 'static) -> ErrorSubscription {
        self.error_channel.subscribe(handler)
    }

    /// Calls `handler` for the next raised error only.
    pub fn on_error_once(&self, handler: impl Fn(&RuntimeError) + 'static) {
        self.error_channel.subscribe_once(handler);
    }

    #[inline]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    #[inline]
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    #[inline]
    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Location of the node evaluated last.
    #[inline]
    pub fn current_location(&self) -> &Location {
        &self.location
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// The associative array passed as the entry point's first argument.
    pub fn run_params(&self) -> Option<&ObjectRef> {
        self.run_params.as_ref()
    }

    pub fn in_try_mode(&self) -> bool {
        self.try_mode
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl CallContext for Interpreter {
    fn location(&self) -> Location {
        self.location.clone()
    }

    fn write_output(&mut self, text: &str) {
        self.print_handler.print(text);
    }

    fn write_diagnostic(&mut self, line: &str) {
        self.print_handler.diagnostic(line);
    }

    fn object_factory(&self) -> &ObjectFactory {
        &self.factory
    }
}
