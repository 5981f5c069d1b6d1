//! Source locations.

use std::fmt;

use serde::Serialize;

/// A position in a source file.
///
/// Attached to every AST node and every diagnostic. Locations are never
/// synthesized: desugared nodes inherit the location of the surface form
/// they were lowered from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// Path of the source file, as given to the parser.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// 0-based byte offset into the file.
    pub offset: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32) -> Self {
        Location {
            file: file.into(),
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
