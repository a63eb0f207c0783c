//! Suspension points: host commands and debugger breaks.

use brs_ir::Stmt;
use brs_values::{ControlSignal, EvalResult};
use tracing::debug;

use super::Interpreter;
use crate::debugger::BreakContext;
use crate::host::HostCommand;

impl Interpreter {
    /// Runs before a statement executes. In debug mode (after `stop`, a
    /// host break or while stepping) every statement breaks; otherwise the
    /// host is polled for a command.
    pub(crate) fn check_debugger(&mut self, stmt: &Stmt) -> EvalResult<()> {
        let command = if self.debug_mode {
            HostCommand::Break
        } else {
            self.host.poll()
        };
        match command {
            HostCommand::None => Ok(()),
            HostCommand::Pause => {
                self.pause();
                Ok(())
            }
            HostCommand::Break => self.break_at(stmt),
            HostCommand::Exit => {
                debug!(location = %stmt.location, "debug exit requested by host");
                self.options.stop_on_crash = false;
                Err(ControlSignal::DebugExit)
            }
        }
    }

    /// Blocks until the host resumes. Nothing of the next statement has run.
    fn pause(&self) {
        debug!(location = %self.location, "debug pause");
        self.host.post_message("debug,pause");
        self.host.wait_resume();
        self.host.post_message("debug,continue");
        debug!("debug continue");
    }

    fn break_at(&mut self, stmt: &Stmt) -> EvalResult<()> {
        self.debug_mode = true;
        if stmt.is_block() {
            return Ok(());
        }
        if self.debugger.is_none() {
            // Nobody to hand control to: carry on as if continued.
            self.debug_mode = false;
            return Ok(());
        }

        let context = BreakContext {
            location: stmt.location.clone(),
            error: None,
            backtrace: self.call_stack.capture(),
        };
        debug!(location = %context.location, depth = context.backtrace.len(), "debug break");
        let Some(debugger) = self.debugger.as_mut() else {
            return Ok(());
        };
        if debugger.on_break(&context) {
            self.debug_mode = debugger.stepping();
            Ok(())
        } else {
            debug!("debugger ended the session");
            self.options.stop_on_crash = false;
            Err(ControlSignal::DebugExit)
        }
    }
}
