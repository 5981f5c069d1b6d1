//! Type representation for the vibefun type system.
//!
//! Defines the core `Type` enum, type constructors (`TyCon`), type
//! variables (`TyVar`), and polymorphic type schemes (`Scheme`). These form
//! the foundation of Hindley-Milner type inference.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;

/// A type variable, identified by a `u32` index into the unification table.
///
/// Type variables are created during inference and unified with concrete
/// types or other variables. The `ena` crate handles the union-find
/// mechanics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

/// A type constructor -- a named type like `Int`, `String`, or an opaque
/// external type. Parameterized constructors appear applied via
/// [`Type::App`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyCon {
    pub name: String,
}

impl TyCon {
    pub fn new(name: impl Into<String>) -> Self {
        TyCon { name: name.into() }
    }
}

impl fmt::Display for TyCon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A vibefun type.
///
/// - `Var`: an inference variable, resolved by unification
/// - `Con`: a concrete type constructor (Int, String, Bool, ...)
/// - `Fun`: a function type; always one parameter after desugaring
/// - `App`: a type constructor applied to arguments
/// - `Record`: a structural record; field order is irrelevant
/// - `Variant`: a nominal sum type; identity is the declared name
/// - `Union`: an ad-hoc union of types
/// - `Tuple`: a tuple type
/// - `Ref`: a mutable reference cell
/// - `Never`: the bottom type, unifies with anything
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Var(TyVar),
    Con(TyCon),
    Fun(Vec<Type>, Box<Type>),
    App(Box<Type>, Vec<Type>),
    Record(BTreeMap<String, Type>),
    /// Nominal: `name` is the declared type name and carries identity.
    /// The constructor table lives in the type environment, not here.
    Variant { name: String, args: Vec<Type> },
    Union(Vec<Type>),
    Tuple(Vec<Type>),
    Ref(Box<Type>),
    Never,
}

impl Type {
    pub fn int() -> Type {
        Type::Con(TyCon::new("Int"))
    }

    pub fn float() -> Type {
        Type::Con(TyCon::new("Float"))
    }

    pub fn string() -> Type {
        Type::Con(TyCon::new("String"))
    }

    pub fn bool() -> Type {
        Type::Con(TyCon::new("Bool"))
    }

    pub fn unit() -> Type {
        Type::Con(TyCon::new("Unit"))
    }

    /// A single-parameter function type.
    pub fn fun(param: Type, ret: Type) -> Type {
        Type::Fun(vec![param], Box::new(ret))
    }

    /// A curried function type from a parameter list.
    pub fn fun_n(params: Vec<Type>, ret: Type) -> Type {
        params
            .into_iter()
            .rev()
            .fold(ret, |acc, p| Type::fun(p, acc))
    }

    pub fn reference(inner: Type) -> Type {
        Type::Ref(Box::new(inner))
    }

    pub fn option(inner: Type) -> Type {
        Type::Variant {
            name: "Option".into(),
            args: vec![inner],
        }
    }

    pub fn result(ok: Type, err: Type) -> Type {
        Type::Variant {
            name: "Result".into(),
            args: vec![ok, err],
        }
    }

    pub fn list(inner: Type) -> Type {
        Type::Variant {
            name: "List".into(),
            args: vec![inner],
        }
    }

    pub fn record(fields: Vec<(&str, Type)>) -> Type {
        Type::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Whether this is the `Int` or `Float` constructor.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Con(c) if c.name == "Int" || c.name == "Float")
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Con(c) if c.name == "Float")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_args(f: &mut fmt::Formatter<'_>, args: &[Type]) -> fmt::Result {
            if args.is_empty() {
                return Ok(());
            }
            write!(f, "<")?;
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{a}")?;
            }
            write!(f, ">")
        }

        match self {
            Type::Var(v) => write!(f, "?{}", v.0),
            Type::Con(c) => write!(f, "{c}"),
            Type::Fun(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::App(con, args) => {
                write!(f, "{con}")?;
                write_args(f, args)
            }
            Type::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, " }}")
            }
            Type::Variant { name, args } => {
                write!(f, "{name}")?;
                write_args(f, args)
            }
            Type::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
            Type::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Type::Ref(inner) => write!(f, "Ref<{inner}>"),
            Type::Never => write!(f, "Never"),
        }
    }
}

/// A polymorphic type scheme: a type with universally quantified variables.
///
/// The type of `id` is `forall a. (a) -> a`, represented as
/// `Scheme { vars: [a], ty: Fun([Var(a)], Var(a)) }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    /// The quantified (generic) type variables.
    pub vars: Vec<TyVar>,
    /// The underlying type (may reference vars).
    pub ty: Type,
}

impl Scheme {
    /// Create a monomorphic scheme (no quantified variables).
    pub fn mono(ty: Type) -> Self {
        Scheme {
            vars: Vec::new(),
            ty,
        }
    }

    /// Create a self-contained scheme from a fully resolved type by
    /// collecting its free variables and remapping them to sequential IDs
    /// starting from 0.
    ///
    /// This makes the scheme independent of any particular inference
    /// context's unification table, which matters for cross-module export:
    /// unnormalized `TyVar` IDs from the exporting module would index out
    /// of bounds in the importing module's table.
    pub fn normalize_from_type(ty: Type) -> Self {
        let mut seen: Vec<TyVar> = Vec::new();
        collect_vars(&ty, &mut seen);
        if seen.is_empty() {
            return Scheme {
                vars: Vec::new(),
                ty,
            };
        }
        let mut mapping: FxHashMap<TyVar, TyVar> = FxHashMap::default();
        let mut vars = Vec::new();
        for v in &seen {
            if !mapping.contains_key(v) {
                let fresh = TyVar(mapping.len() as u32);
                mapping.insert(*v, fresh);
                vars.push(fresh);
            }
        }
        let ty = remap_vars(&ty, &mapping);
        Scheme { vars, ty }
    }
}

/// Collect every `TyVar` in a type, in order of first appearance.
fn collect_vars(ty: &Type, out: &mut Vec<TyVar>) {
    match ty {
        Type::Var(v) => out.push(*v),
        Type::Con(_) | Type::Never => {}
        Type::Fun(params, ret) => {
            for p in params {
                collect_vars(p, out);
            }
            collect_vars(ret, out);
        }
        Type::App(con, args) => {
            collect_vars(con, out);
            for a in args {
                collect_vars(a, out);
            }
        }
        Type::Record(fields) => {
            for v in fields.values() {
                collect_vars(v, out);
            }
        }
        Type::Variant { args, .. } => {
            for a in args {
                collect_vars(a, out);
            }
        }
        Type::Union(members) => {
            for m in members {
                collect_vars(m, out);
            }
        }
        Type::Tuple(elems) => {
            for e in elems {
                collect_vars(e, out);
            }
        }
        Type::Ref(inner) => collect_vars(inner, out),
    }
}

/// Remap `TyVar` IDs in a type according to the given mapping.
pub(crate) fn remap_vars(ty: &Type, mapping: &FxHashMap<TyVar, TyVar>) -> Type {
    match ty {
        Type::Var(v) => match mapping.get(v) {
            Some(new_v) => Type::Var(*new_v),
            None => ty.clone(),
        },
        Type::Con(_) | Type::Never => ty.clone(),
        Type::Fun(params, ret) => Type::Fun(
            params.iter().map(|p| remap_vars(p, mapping)).collect(),
            Box::new(remap_vars(ret, mapping)),
        ),
        Type::App(con, args) => Type::App(
            Box::new(remap_vars(con, mapping)),
            args.iter().map(|a| remap_vars(a, mapping)).collect(),
        ),
        Type::Record(fields) => Type::Record(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), remap_vars(v, mapping)))
                .collect(),
        ),
        Type::Variant { name, args } => Type::Variant {
            name: name.clone(),
            args: args.iter().map(|a| remap_vars(a, mapping)).collect(),
        },
        Type::Union(members) => {
            Type::Union(members.iter().map(|m| remap_vars(m, mapping)).collect())
        }
        Type::Tuple(elems) => {
            Type::Tuple(elems.iter().map(|e| remap_vars(e, mapping)).collect())
        }
        Type::Ref(inner) => Type::Ref(Box::new(remap_vars(inner, mapping))),
    }
}

/// Substitute types for `TyVar` placeholders. Used to instantiate
/// declaration bodies, whose parameters are stored as plain variables.
pub(crate) fn remap_with_types(ty: &Type, mapping: &FxHashMap<TyVar, Type>) -> Type {
    match ty {
        Type::Var(v) => match mapping.get(v) {
            Some(t) => t.clone(),
            None => ty.clone(),
        },
        Type::Con(_) | Type::Never => ty.clone(),
        Type::Fun(params, ret) => Type::Fun(
            params.iter().map(|p| remap_with_types(p, mapping)).collect(),
            Box::new(remap_with_types(ret, mapping)),
        ),
        Type::App(con, args) => Type::App(
            Box::new(remap_with_types(con, mapping)),
            args.iter().map(|a| remap_with_types(a, mapping)).collect(),
        ),
        Type::Record(fields) => Type::Record(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), remap_with_types(v, mapping)))
                .collect(),
        ),
        Type::Variant { name, args } => Type::Variant {
            name: name.clone(),
            args: args.iter().map(|a| remap_with_types(a, mapping)).collect(),
        },
        Type::Union(members) => Type::Union(
            members.iter().map(|m| remap_with_types(m, mapping)).collect(),
        ),
        Type::Tuple(elems) => {
            Type::Tuple(elems.iter().map(|e| remap_with_types(e, mapping)).collect())
        }
        Type::Ref(inner) => Type::Ref(Box::new(remap_with_types(inner, mapping))),
    }
}

// ── ena trait implementations ──────────────────────────────────────────

impl ena::unify::UnifyKey for TyVar {
    type Value = Option<Type>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TyVar(u)
    }

    fn tag() -> &'static str {
        "TyVar"
    }
}

impl ena::unify::EqUnifyValue for Type {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_display() {
        assert_eq!(Type::int().to_string(), "Int");
        assert_eq!(Type::fun(Type::int(), Type::bool()).to_string(), "(Int) -> Bool");
        assert_eq!(Type::option(Type::int()).to_string(), "Option<Int>");
        assert_eq!(
            Type::record(vec![("x", Type::int()), ("y", Type::float())]).to_string(),
            "{ x: Int, y: Float }"
        );
        assert_eq!(
            Type::Tuple(vec![Type::int(), Type::string()]).to_string(),
            "(Int, String)"
        );
        assert_eq!(Type::reference(Type::int()).to_string(), "Ref<Int>");
        assert_eq!(
            Type::Union(vec![Type::int(), Type::string()]).to_string(),
            "Int | String"
        );
        assert_eq!(Type::Never.to_string(), "Never");
    }

    #[test]
    fn fun_n_curries() {
        let ty = Type::fun_n(vec![Type::int(), Type::string()], Type::bool());
        assert_eq!(ty.to_string(), "(Int) -> (String) -> Bool");
    }

    #[test]
    fn normalize_remaps_vars_from_zero() {
        let ty = Type::fun(Type::Var(TyVar(17)), Type::Var(TyVar(17)));
        let scheme = Scheme::normalize_from_type(ty);
        assert_eq!(scheme.vars, vec![TyVar(0)]);
        assert_eq!(scheme.ty.to_string(), "(?0) -> ?0");
    }

    #[test]
    fn normalize_keeps_distinct_vars_distinct() {
        let ty = Type::fun(Type::Var(TyVar(9)), Type::Var(TyVar(4)));
        let scheme = Scheme::normalize_from_type(ty);
        assert_eq!(scheme.vars, vec![TyVar(0), TyVar(1)]);
        assert_eq!(scheme.ty.to_string(), "(?0) -> ?1");
    }
}
