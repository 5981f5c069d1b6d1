//! Hindley-Milner type inference for the vibefun compiler.
//!
//! The entry points are [`typecheck`] for a standalone module and
//! [`typecheck_with_imports`] for a module inside a resolved graph. Both
//! are fail-fast: the first type error aborts the module and is returned
//! as a structured diagnostic. Warnings (unreachable match arms) go to the
//! caller's `WarningCollector`.

pub mod builtins;
pub mod env;
pub mod exhaustiveness;
pub mod infer;
pub mod patterns;
pub mod ty;
pub mod unify;

pub use infer::{
    is_syntactic_value, typecheck, typecheck_with_imports, ImportContext, ModuleExports,
    TypedModule,
};
pub use ty::{Scheme, TyCon, TyVar, Type};
pub use unify::InferCtx;
