//! Output sink for `print` and diagnostics.
//!
//! Output can be directed to different destinations:
//! - Native: stdout for `print`, stderr for diagnostics (default)
//! - Embedding hosts and tests: buffers for capture and assertions
//! - Silent: discards everything
//!
//! Every sink tracks the current output column; `print` pads `,`
//! separated items to the next 16-column zone from it.
//!
//! # Performance
//! Uses enum dispatch instead of trait objects for static dispatch on
//! this frequently-used path.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Moves `column` past `text`: back to the start after a line break,
/// otherwise forward by the number of characters.
pub(crate) fn advance_column(column: &mut usize, text: &str) {
    match text.rfind('\n') {
        Some(pos) => *column = text[pos..].chars().count().saturating_sub(1),
        None => *column = column.saturating_add(text.chars().count()),
    }
}

/// Writes `print` output to stdout and diagnostics to stderr.
#[derive(Default)]
pub struct StdoutPrintHandler {
    column: Mutex<usize>,
}

impl StdoutPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print without adding a line ending.
    pub fn print(&self, msg: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout only loses output.
        let _ = out.write_all(msg.as_bytes());
        let _ = out.flush();
        advance_column(&mut self.column.lock(), msg);
    }

    /// Write one diagnostic line.
    pub fn diagnostic(&self, line: &str) {
        eprintln!("{line}");
    }

    pub fn column(&self) -> usize {
        *self.column.lock()
    }

    /// Returns empty string since stdout doesn't capture.
    pub fn get_output(&self) -> String {
        String::new()
    }

    /// Resets the column; there is nothing to clear.
    pub fn clear(&self) {
        *self.column.lock() = 0;
    }
}

/// Captures `print` output and diagnostics into separate buffers.
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
    diagnostics: Mutex<Vec<String>>,
    column: Mutex<usize>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler {
            buffer: Mutex::new(String::new()),
            diagnostics: Mutex::new(Vec::new()),
            column: Mutex::new(0),
        }
    }

    pub fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
        advance_column(&mut self.column.lock(), msg);
    }

    pub fn diagnostic(&self, line: &str) {
        self.diagnostics.lock().push(line.to_owned());
    }

    pub fn column(&self) -> usize {
        *self.column.lock()
    }

    /// Everything printed so far.
    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Diagnostic lines written so far, oldest first.
    pub fn get_diagnostics(&self) -> Vec<String> {
        self.diagnostics.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
        self.diagnostics.lock().clear();
        *self.column.lock() = 0;
    }
}

impl Default for BufferPrintHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Output sink implementation using enum dispatch.
pub enum PrintHandlerImpl {
    /// Writes to stdout/stderr (default).
    Stdout(StdoutPrintHandler),
    /// Captures to buffers (embedding, testing).
    Buffer(BufferPrintHandler),
    /// Discards all output silently.
    Silent,
}

impl PrintHandlerImpl {
    /// Print without adding a line ending.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print(msg),
            Self::Buffer(h) => h.print(msg),
            Self::Silent => {}
        }
    }

    /// Write one diagnostic line (warnings, soft errors, uncaught errors).
    pub fn diagnostic(&self, line: &str) {
        match self {
            Self::Stdout(h) => h.diagnostic(line),
            Self::Buffer(h) => h.diagnostic(line),
            Self::Silent => {}
        }
    }

    /// Current output column; 0 right after a line break.
    pub fn column(&self) -> usize {
        match self {
            Self::Stdout(h) => h.column(),
            Self::Buffer(h) => h.column(),
            Self::Silent => 0,
        }
    }

    /// All captured output.
    ///
    /// Returns empty string for handlers that don't capture (stdout, silent).
    pub fn get_output(&self) -> String {
        match self {
            Self::Stdout(h) => h.get_output(),
            Self::Buffer(h) => h.get_output(),
            Self::Silent => String::new(),
        }
    }

    /// All captured diagnostic lines.
    pub fn get_diagnostics(&self) -> Vec<String> {
        match self {
            Self::Buffer(h) => h.get_diagnostics(),
            Self::Stdout(_) | Self::Silent => Vec::new(),
        }
    }

    pub fn clear(&self) {
        match self {
            Self::Stdout(h) => h.clear(),
            Self::Buffer(h) => h.clear(),
            Self::Silent => {}
        }
    }
}

/// Shared output sink; hosts keep a handle to read captured output.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

/// Create a default stdout output sink.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler::new()))
}

/// Create a buffer output sink for capturing output.
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

/// Create a silent output sink that discards all output.
pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}
