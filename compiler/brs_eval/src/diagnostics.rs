//! Call stack tracking and backtrace rendering.
//!
//! - `CallStack`: the live chain of user-function frames, with the depth
//!   limit integrated into `push()`
//! - `format_backtrace`: the text listing printed for uncaught errors
//! - `backtrace_array`: the `roArray` stored in a caught error record

use brs_ir::Location;
use brs_values::{runtime_error, ErrorDetail, RoArray, RoAssociativeArray, RuntimeError, TracePoint, Value};

/// Live call stack of the interpreter.
///
/// Each user-function call pushes a `TracePoint` right before its body
/// runs and pops it on every way out.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<TracePoint>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited recursion.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// Returns a `StackOverflow` error at the frame's call site when the
    /// limit is reached. The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: TracePoint) -> Result<(), RuntimeError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(runtime_error(ErrorDetail::STACK_OVERFLOW, frame.call_location));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent frame. No-op on an empty stack.
    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop() called on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn current_frame(&self) -> Option<&TracePoint> {
        self.frames.last()
    }

    /// Frames outermost first.
    pub fn frames(&self) -> &[TracePoint] {
        &self.frames
    }

    /// Copy of the frames, for attaching to an error.
    pub fn capture(&self) -> Vec<TracePoint> {
        self.frames.clone()
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Walks `frames` innermost first, pairing each frame with the location
/// execution was at inside it: `location` for the innermost, the call
/// site of the frame above for the others.
fn walk<'a>(
    location: &'a Location,
    frames: &'a [TracePoint],
) -> impl Iterator<Item = (usize, &'a TracePoint, &'a Location)> {
    let mut current = location;
    frames.iter().enumerate().rev().map(move |(index, frame)| {
        let at = current;
        current = &frame.call_location;
        (index, frame, at)
    })
}

/// Text backtrace, innermost frame first:
///
/// ```text
/// #1  Function inner(x As Integer) As Void
///    file/line: pkg:/source/main.brs(12)
/// ```
pub fn format_backtrace(location: &Location, frames: &[TracePoint]) -> String {
    let mut text = String::new();
    for (index, frame, at) in walk(location, frames) {
        text.push_str(&format!("#{index}  Function {}\r\n", frame.format_signature()));
        text.push_str(&format!("   file/line: {}\r\n", at.format_pkg()));
    }
    text
}

/// Backtrace as an `roArray` of `{filename, function, line_number}`
/// records, outermost frame first.
pub fn backtrace_array(location: &Location, frames: &[TracePoint]) -> Value {
    let mut entries: Vec<Value> = walk(location, frames)
        .map(|(_, frame, at)| {
            let line = i32::try_from(at.start.line).unwrap_or(i32::MAX);
            Value::object(RoAssociativeArray::new(vec![
                ("filename".to_owned(), Value::string(&*at.file)),
                ("function".to_owned(), Value::string(frame.format_signature())),
                ("line_number".to_owned(), Value::Int32(line)),
            ]))
        })
        .collect();
    entries.reverse();
    Value::object(RoArray::new(entries))
}

#[cfg(test)]
mod tests;
