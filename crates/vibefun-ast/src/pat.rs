//! Core patterns.

use vibefun_common::Location;

/// A pattern with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub loc: Location,
}

impl Pattern {
    pub fn new(kind: PatternKind, loc: Location) -> Pattern {
        Pattern { kind, loc }
    }
}

/// The post-desugar pattern forms. Or-patterns do not appear: the
/// desugarer expands them into separate match arms.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Wildcard,
    /// Variable binding.
    Var(String),
    Literal(PatternLiteral),
    /// Constructor pattern, e.g. `Some(x)`.
    Variant { ctor: String, args: Vec<Pattern> },
    /// Record pattern; matches any record with at least these fields.
    Record { fields: Vec<(String, Pattern)> },
    Tuple { elems: Vec<Pattern> },
}

/// A literal pattern. `null` in the surface language is the unit literal.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternLiteral {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Unit,
}
