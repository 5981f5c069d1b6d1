//! Core expressions.

use vibefun_common::Location;

use crate::pat::Pattern;
use crate::ty::TypeExpr;
use crate::NodeId;

/// A core expression: a form tag plus identity and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub loc: Location,
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind, loc: Location) -> Expr {
        Expr { id, kind, loc }
    }
}

/// The post-desugar expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    BoolLit(bool),
    UnitLit,
    /// Variable reference.
    Var(String),
    /// Single-parameter lambda; multi-parameter surface lambdas arrive
    /// curried.
    Lambda { param: String, body: Box<Expr> },
    /// Single-argument application; multi-argument calls arrive nested.
    Apply { func: Box<Expr>, arg: Box<Expr> },
    /// `let name = value in body`, with mutability and recursion flags.
    Let {
        name: String,
        mutable: bool,
        recursive: bool,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    /// Mutually-recursive binding group: `let rec a = .. and b = .. in body`.
    LetGroup {
        bindings: Vec<RecBinding>,
        body: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Record construction from fields and spreads, in source order.
    /// Later fields overwrite earlier ones.
    Record { entries: Vec<RecordEntry> },
    /// `base.field`
    FieldAccess { base: Box<Expr>, field: String },
    /// `{ ...base, field: value, ... }`
    RecordUpdate {
        base: Box<Expr>,
        updates: Vec<(String, Expr)>,
    },
    /// Variant construction, e.g. `Some(1)` or a nullary `None`.
    Variant { ctor: String, args: Vec<Expr> },
    Match {
        scrutinee: Box<Expr>,
        cases: Vec<MatchCase>,
    },
    /// `expr : T`
    Annotated { expr: Box<Expr>, ty: TypeExpr },
    /// `unsafe { expr }` -- a code-generation marker, transparent to types.
    Unsafe { body: Box<Expr> },
    Tuple { elems: Vec<Expr> },
}

/// One binding of a mutually-recursive group.
#[derive(Debug, Clone, PartialEq)]
pub struct RecBinding {
    pub name: String,
    pub value: Expr,
    pub loc: Location,
}

/// An entry of a record literal.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEntry {
    Field { name: String, value: Expr },
    Spread { value: Expr },
}

/// One arm of a match expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

/// Binary operators surviving desugaring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    IntDivide,
    FloatDivide,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Neq,
    And,
    Or,
    /// String concatenation `&`.
    Concat,
    /// Reference assignment `:=`.
    RefAssign,
    /// List cons `::`.
    Cons,
}

impl BinaryOp {
    /// Surface spelling, for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::IntDivide => "/",
            BinaryOp::FloatDivide => "/.",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Concat => "&",
            BinaryOp::RefAssign => ":=",
            BinaryOp::Cons => "::",
        }
    }
}

/// Unary operators surviving desugaring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    /// Reference cell read `!`.
    Deref,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::LogicalNot => "not",
            UnaryOp::Deref => "!",
        }
    }
}
