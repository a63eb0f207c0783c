//! Host control: commands a host sends into a running interpreter and
//! the notifications it gets back.
//!
//! The interpreter polls `HostControl::poll()` before every non-block
//! statement. The host lives on another thread (a UI, a debugger front
//! end), so implementations are `Send + Sync`.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// A command waiting for the interpreter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    None,
    /// Block until the host resumes.
    Pause,
    /// Break into the debugger at the next statement.
    Break,
    /// Abandon the run.
    Exit,
}

/// What the interpreter needs from its host.
pub trait HostControl: Send + Sync {
    /// Takes the pending command, if any.
    fn poll(&self) -> HostCommand;

    /// Blocks the interpreter thread until the host resumes it.
    fn wait_resume(&self);

    /// Fire-and-forget notification (`start,Main`, `debug,pause`, ...).
    fn post_message(&self, message: &str);
}

/// Shared host handle.
pub type SharedHost = Arc<dyn HostControl>;

/// Host that never sends commands and drops notifications.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHost;

impl HostControl for NoHost {
    fn poll(&self) -> HostCommand {
        HostCommand::None
    }

    fn wait_resume(&self) {}

    fn post_message(&self, _message: &str) {}
}

/// In-process host: a command queue, a resume latch and a message log.
///
/// `send` and `resume` may be called from any thread.
#[derive(Default)]
pub struct CommandQueue {
    commands: Mutex<VecDeque<HostCommand>>,
    resumed: Mutex<bool>,
    resume_signal: Condvar,
    messages: Mutex<Vec<String>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        CommandQueue::default()
    }

    /// Queues a command for the next poll.
    pub fn send(&self, command: HostCommand) {
        self.commands.lock().push_back(command);
    }

    /// Releases a paused interpreter. A resume sent before the pause is
    /// kept and releases the next wait immediately.
    pub fn resume(&self) {
        *self.resumed.lock() = true;
        self.resume_signal.notify_all();
    }

    /// Notifications posted so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl HostControl for CommandQueue {
    fn poll(&self) -> HostCommand {
        self.commands.lock().pop_front().unwrap_or(HostCommand::None)
    }

    fn wait_resume(&self) {
        let mut resumed = self.resumed.lock();
        while !*resumed {
            self.resume_signal.wait(&mut resumed);
        }
        *resumed = false;
    }

    fn post_message(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

#[cfg(test)]
mod tests;
