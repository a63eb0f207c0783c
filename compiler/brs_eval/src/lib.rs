#![deny(clippy::arithmetic_side_effects)]
#![allow(
    clippy::result_large_err,
    reason = "ControlSignal carries the full error record; boxing only the error variant is enough"
)]
//! BRS Eval - Tree-walking evaluator for the BrightScript engine.
//!
//! This crate runs an already-parsed statement tree.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Interpreter`: statement execution and expression evaluation, with
//!   non-local control flow propagated as `Err(ControlSignal)`
//! - `Environment`: function, module and global scopes
//! - `evaluate_binary`/`evaluate_unary`: direct enum-based operator dispatch
//! - `CallStack`: live frames, the recursion limit and backtraces
//! - `HostControl`/`Debugger`: the suspension points a host can use
//! - `ErrorChannel`: every raised error, caught or not
//!
//! Values, components and the error catalog come from `brs_values`.

mod debugger;
pub mod diagnostics;
mod environment;
mod error_channel;
pub mod exec;
mod globals;
mod host;
pub mod interpreter;
mod manifest;
mod operators;
mod options;
mod print_handler;
mod unary_operators;

use std::sync::Once;

pub use brs_values::{ControlSignal, EvalResult, RuntimeError, Value};

pub use debugger::{BreakContext, BreakError, Debugger};
pub use diagnostics::CallStack;
pub use environment::{Environment, LocalScope, Scope, ScopeKind};
pub use error_channel::{ErrorChannel, ErrorSubscription};
pub use globals::global_functions;
pub use host::{CommandQueue, HostCommand, HostControl, NoHost, SharedHost};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use manifest::Manifest;
pub use operators::{evaluate_binary, evaluate_logical, OperandLocations};
pub use options::{ExecutionOptions, DEFAULT_MAX_CALL_DEPTH};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use unary_operators::evaluate_unary;

/// Why a top-level run did not finish normally.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// An error no try block caught.
    #[error("{formatted}\nBackTrace:\n{backtrace}")]
    Runtime {
        /// `file(line,col-col): message`
        formatted: String,
        backtrace: String,
        error: Box<RuntimeError>,
    },
    /// The debugger or the host abandoned the run.
    #[error("debug session exited")]
    DebugExit,
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=brs_eval=debug` or `RUST_LOG=brs_values=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
