//! Execution options.

/// Default bound on nested user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Per-run behavior switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Warn when a run defines neither `Main` nor `RunUserInterface`.
    pub entry_point: bool,
    /// Break into the debugger on the first error raised outside a try
    /// block.
    pub stop_on_crash: bool,
    /// `None` for unlimited recursion.
    pub max_call_depth: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        ExecutionOptions {
            entry_point: true,
            stop_on_crash: false,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}

impl ExecutionOptions {
    #[must_use]
    pub fn entry_point(mut self, enabled: bool) -> Self {
        self.entry_point = enabled;
        self
    }

    #[must_use]
    pub fn stop_on_crash(mut self, enabled: bool) -> Self {
        self.stop_on_crash = enabled;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }
}
