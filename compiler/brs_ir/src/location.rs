//! Source locations.
//!
//! A `Location` names a file and a line/column range inside it. Lines are
//! 1-based; a line of 0 means the position is unknown (runtime-generated
//! nodes, native frames).

use std::fmt;
use std::sync::Arc;

/// A single line/column position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Source range inside a named file.
///
/// The file name is shared: every node parsed from the same file points at
/// the same `Arc<str>`.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Location {
    pub file: Arc<str>,
    pub start: Position,
    pub end: Position,
}

impl Location {
    /// File name used for nodes the runtime synthesizes.
    pub const INTERNAL_FILE: &'static str = "(internal)";

    pub fn new(file: impl Into<Arc<str>>, start: Position, end: Position) -> Self {
        Location {
            file: file.into(),
            start,
            end,
        }
    }

    /// Location on a single line spanning `start_col..end_col`.
    pub fn on_line(file: impl Into<Arc<str>>, line: u32, start_col: u32, end_col: u32) -> Self {
        Location::new(
            file,
            Position::new(line, start_col),
            Position::new(line, end_col),
        )
    }

    /// Location with no source position.
    pub fn internal() -> Self {
        Location::new(Self::INTERNAL_FILE, Position::default(), Position::default())
    }

    /// True when the start line is unknown.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.start.line == 0
    }

    /// Smallest location covering both `self` and `other`.
    ///
    /// Keeps `self`'s file.
    #[must_use]
    pub fn merge(&self, other: &Location) -> Location {
        Location {
            file: Arc::clone(&self.file),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Backtrace form: `pkg:/file(line)`, or `pkg:/file(??)` when the line is unknown.
    ///
    /// Files already named with a `pkg:` prefix keep it as is.
    pub fn format_pkg(&self) -> String {
        let file = if self.file.starts_with("pkg:") {
            self.file.to_string()
        } else {
            format!("pkg:/{}", self.file)
        };
        if self.is_unknown() {
            format!("{file}(??)")
        } else {
            format!("{file}({})", self.start.line)
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::internal()
    }
}

/// Diagnostic form used in front of error messages.
///
/// - same line, same column: `file(line,col)`
/// - same line: `file(line,col-endcol)`
/// - multi-line: `file(line,col,endline,endline)`
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}({},{}", self.file, self.start.line, self.start.column)?;
            if self.start.column != self.end.column {
                write!(f, "-{}", self.end.column)?;
            }
            f.write_str(")")
        } else {
            // The end line is repeated where the end column would go. Hosts
            // parse this exact shape, so it stays.
            write!(
                f,
                "{}({},{},{},{})",
                self.file, self.start.line, self.start.column, self.end.line, self.end.line
            )
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}..{}:{}",
            self.file, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

#[cfg(test)]
mod tests;
