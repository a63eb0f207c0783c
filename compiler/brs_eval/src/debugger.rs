//! Debugger collaborator.
//!
//! The interpreter breaks into the debugger on `stop`, on a host `Break`
//! command and, with `stop_on_crash`, on the first error raised outside a
//! try block. The debugger decides whether the run goes on.

use brs_ir::Location;
use brs_values::TracePoint;

use crate::diagnostics::format_backtrace;

/// Error that triggered a crash break.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakError {
    pub message: String,
    pub errno: i32,
}

/// Where execution stopped.
#[derive(Clone, Debug)]
pub struct BreakContext {
    pub location: Location,
    /// Set for crash breaks.
    pub error: Option<BreakError>,
    /// Call stack at the break, outermost first.
    pub backtrace: Vec<TracePoint>,
}

impl BreakContext {
    /// The backtrace in the listing format used for uncaught errors.
    pub fn backtrace_text(&self) -> String {
        format_backtrace(&self.location, &self.backtrace)
    }
}

/// Interactive debugger hook.
pub trait Debugger {
    /// Called at a break. `false` abandons the run.
    fn on_break(&mut self, context: &BreakContext) -> bool;

    /// Whether to break again at the next statement.
    fn stepping(&self) -> bool {
        false
    }
}
