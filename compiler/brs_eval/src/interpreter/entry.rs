//! Top-level runs: module statements, then the entry point.

use brs_ir::{Location, Stmt};
use brs_values::{Callable, ControlSignal, EvalResult, RoAssociativeArray, Value};
use tracing::debug;

use super::Interpreter;
use crate::diagnostics::format_backtrace;
use crate::ExecError;

/// Entry points in lookup order.
const ENTRY_POINTS: [&str; 2] = ["RunUserInterface", "Main"];

const NO_ENTRY_POINT: &str =
    "WARNING! No entry point found! You may need to define a function Main() or RunUserInterface()";

impl Interpreter {
    /// Runs a program.
    ///
    /// Every top-level statement executes first (declaring functions along
    /// the way), then `RunUserInterface` or else `Main` is called with
    /// `args`. Entry points without parameters are called without them.
    ///
    /// Returns the entry point's (or a top-level `return`'s) value. An
    /// uncaught error is written to the diagnostic sink with its backtrace
    /// and returned as [`ExecError::Runtime`].
    pub fn exec(&mut self, statements: &[Stmt], args: Vec<Value>) -> Result<Value, ExecError> {
        let outcome = self.run_program(statements, args);
        self.finish(outcome)
    }

    fn run_program(&mut self, statements: &[Stmt], mut args: Vec<Value>) -> EvalResult {
        self.run_body(statements)?;

        let Some((name, entry)) = self.entry_point() else {
            if self.options.entry_point && !self.printed {
                self.print_handler.diagnostic(NO_ENTRY_POINT);
            }
            return Ok(Value::Invalid);
        };
        debug!(entry = name, "entry point");

        if let Some(Value::Object(params)) = args.first() {
            if params.is::<RoAssociativeArray>() {
                self.run_params = Some(params.clone());
            }
        }
        if entry.signatures().iter().all(|signature| signature.args.is_empty()) {
            args.clear();
        }
        self.host.post_message(&format!("start,{name}"));
        let at = Location::internal();
        self.call_function(&entry, &args, None, &at, &at)
    }

    fn entry_point(&self) -> Option<(&'static str, Callable)> {
        ENTRY_POINTS.iter().find_map(|&name| match self.env.lookup(name) {
            Some(Value::Callable(entry)) => Some((name, entry)),
            _ => None,
        })
    }

    fn finish(&mut self, outcome: EvalResult) -> Result<Value, ExecError> {
        match outcome {
            Ok(value) => Ok(value),
            Err(ControlSignal::Return { value, .. }) => Ok(value.unwrap_or(Value::Invalid)),
            Err(ControlSignal::DebugExit) => Err(ExecError::DebugExit),
            Err(ControlSignal::Error(error)) => {
                let frames = error.backtrace.as_deref().unwrap_or_default();
                let backtrace = format_backtrace(&error.location, frames);
                let failure = ExecError::Runtime {
                    formatted: error.format(),
                    backtrace,
                    error,
                };
                self.print_handler.diagnostic(&failure.to_string());
                Err(failure)
            }
            // `end`, and loop signals already reported by the function body
            Err(_) => Ok(Value::Invalid),
        }
    }
}
