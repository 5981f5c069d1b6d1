//! The Core AST of the vibefun compiler.
//!
//! This is the representation the external parser + desugarer produce and
//! the type checker consumes. Surface sugar -- multi-parameter lambdas,
//! pipes, composition, if/then/else, blocks, list literals, or-patterns,
//! record update spread syntax -- does not appear here: lambdas take one
//! parameter, applications take one argument, and control flow is `match`.

pub mod decl;
pub mod expr;
pub mod pat;
pub mod ty;

pub use decl::{DeclKind, Declaration, ImportDecl, ImportItem, Module, TypeDecl, TypeDeclBody};
pub use expr::{
    BinaryOp, Expr, ExprKind, MatchCase, RecBinding, RecordEntry, UnaryOp,
};
pub use pat::{Pattern, PatternKind, PatternLiteral};
pub use ty::{TypeExpr, TypeExprKind};

/// Identity of an AST expression node, unique within a module.
///
/// The type checker's output maps every `NodeId` to its inferred type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);
