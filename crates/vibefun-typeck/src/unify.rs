//! Unification engine for Hindley-Milner type inference.
//!
//! Implements first-order unification with occurs check over the vibefun
//! type algebra, using `ena`'s union-find table as the substitution.
//! Levels on type variables drive generalization scoping: binding a
//! variable lowers the level of every variable inside the bound type, so a
//! variable can never be generalized in a scope it escaped into.

use ena::unify::{InPlace, InPlaceUnificationTable, Snapshot};
use rustc_hash::FxHashMap;

use vibefun_common::{Diagnostic, Location};

use crate::ty::{Scheme, TyVar, Type};

/// The inference context -- owns the unification table and level state.
///
/// All type inference happens through this context. It creates fresh type
/// variables, unifies types, and tracks levels for generalization.
/// Failures are returned as diagnostics; the first error aborts the module
/// being checked.
pub struct InferCtx {
    /// The union-find unification table (ena).
    table: InPlaceUnificationTable<TyVar>,
    /// Current let-nesting level for generalization.
    current_level: u32,
    /// Level at which each type variable currently lives, indexed by
    /// `TyVar.0`. Lookups go through the union-find root.
    var_levels: Vec<u32>,
}

/// A restore point over the unification table and level table, used to
/// roll back failed overload candidate trials.
pub struct InferSnapshot {
    table: Snapshot<InPlace<TyVar>>,
    var_levels: Vec<u32>,
}

impl InferCtx {
    pub fn new() -> Self {
        InferCtx {
            table: InPlaceUnificationTable::new(),
            current_level: 0,
            var_levels: Vec::new(),
        }
    }

    // ── Type variable creation ──────────────────────────────────────────

    /// Create a fresh type variable at the current level.
    pub fn fresh_var(&mut self) -> Type {
        let var = self.table.new_key(None);
        debug_assert_eq!(var.0 as usize, self.var_levels.len());
        self.var_levels.push(self.current_level);
        Type::Var(var)
    }

    fn level_of(&mut self, var: TyVar) -> u32 {
        let root = self.table.find(var);
        self.var_levels[root.0 as usize]
    }

    fn set_level(&mut self, var: TyVar, level: u32) {
        let root = self.table.find(var);
        self.var_levels[root.0 as usize] = level;
    }

    // ── Level management ────────────────────────────────────────────────

    /// Enter a new let-binding level.
    pub fn enter_level(&mut self) {
        self.current_level += 1;
    }

    /// Leave the current let-binding level.
    pub fn leave_level(&mut self) {
        debug_assert!(self.current_level > 0, "cannot leave level 0");
        self.current_level -= 1;
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    // ── Resolution ──────────────────────────────────────────────────────

    /// Resolve a type by following union-find indirection.
    ///
    /// Bound variables expand to their values recursively; unbound
    /// variables normalize to their root key so that two unified-but-
    /// unbound variables resolve to the same representative. That
    /// normalization is what makes generalization see one variable, not
    /// two.
    pub fn resolve(&mut self, ty: Type) -> Type {
        match ty {
            Type::Var(v) => match self.table.probe_value(v) {
                Some(inner) => self.resolve(inner),
                None => Type::Var(self.table.find(v)),
            },
            Type::Fun(params, ret) => {
                let params = params.into_iter().map(|p| self.resolve(p)).collect();
                let ret = Box::new(self.resolve(*ret));
                Type::Fun(params, ret)
            }
            Type::App(con, args) => {
                let con = Box::new(self.resolve(*con));
                let args = args.into_iter().map(|a| self.resolve(a)).collect();
                Type::App(con, args)
            }
            Type::Record(fields) => Type::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, self.resolve(v)))
                    .collect(),
            ),
            Type::Variant { name, args } => Type::Variant {
                name,
                args: args.into_iter().map(|a| self.resolve(a)).collect(),
            },
            Type::Union(members) => {
                Type::Union(members.into_iter().map(|m| self.resolve(m)).collect())
            }
            Type::Tuple(elems) => {
                Type::Tuple(elems.into_iter().map(|e| self.resolve(e)).collect())
            }
            Type::Ref(inner) => Type::Ref(Box::new(self.resolve(*inner))),
            other => other,
        }
    }

    // ── Occurs check ────────────────────────────────────────────────────

    /// Check whether a type variable occurs anywhere within a type.
    ///
    /// Rejecting `a ~ (a) -> Int` here is what prevents infinite types.
    pub fn occurs_in(&mut self, var: TyVar, ty: &Type) -> bool {
        match ty {
            Type::Var(v) => {
                if self.table.find(*v) == self.table.find(var) {
                    return true;
                }
                match self.table.probe_value(*v) {
                    Some(inner) => self.occurs_in(var, &inner),
                    None => false,
                }
            }
            Type::Con(_) | Type::Never => false,
            Type::Fun(params, ret) => {
                params.iter().any(|p| self.occurs_in(var, p)) || self.occurs_in(var, ret)
            }
            Type::App(con, args) => {
                self.occurs_in(var, con) || args.iter().any(|a| self.occurs_in(var, a))
            }
            Type::Record(fields) => fields.values().any(|v| self.occurs_in(var, v)),
            Type::Variant { args, .. } => args.iter().any(|a| self.occurs_in(var, a)),
            Type::Union(members) => members.iter().any(|m| self.occurs_in(var, m)),
            Type::Tuple(elems) => elems.iter().any(|e| self.occurs_in(var, e)),
            Type::Ref(inner) => self.occurs_in(var, inner),
        }
    }

    /// Lower the level of every unbound variable in `ty` to at most
    /// `max_level`. Run before binding a variable of level `max_level` so
    /// that no variable inside the bound type outlives the binder's scope.
    fn lower_levels(&mut self, ty: &Type, max_level: u32) {
        match ty {
            Type::Var(v) => match self.table.probe_value(*v) {
                Some(inner) => self.lower_levels(&inner, max_level),
                None => {
                    if self.level_of(*v) > max_level {
                        self.set_level(*v, max_level);
                    }
                }
            },
            Type::Con(_) | Type::Never => {}
            Type::Fun(params, ret) => {
                for p in params {
                    self.lower_levels(p, max_level);
                }
                self.lower_levels(ret, max_level);
            }
            Type::App(con, args) => {
                self.lower_levels(con, max_level);
                for a in args {
                    self.lower_levels(a, max_level);
                }
            }
            Type::Record(fields) => {
                for v in fields.values() {
                    self.lower_levels(v, max_level);
                }
            }
            Type::Variant { args, .. } => {
                for a in args {
                    self.lower_levels(a, max_level);
                }
            }
            Type::Union(members) => {
                for m in members {
                    self.lower_levels(m, max_level);
                }
            }
            Type::Tuple(elems) => {
                for e in elems {
                    self.lower_levels(e, max_level);
                }
            }
            Type::Ref(inner) => self.lower_levels(inner, max_level),
        }
    }

    // ── Unification ─────────────────────────────────────────────────────

    /// Unify two types, making them equal under the substitution.
    ///
    /// When both sides are records their orientation is ambiguous, so the
    /// smaller record is taken as the narrow side for width subtyping.
    /// Use [`InferCtx::unify_expected`] at sites where one side is what
    /// the user required.
    pub fn unify(&mut self, a: Type, b: Type, loc: &Location) -> Result<(), Diagnostic> {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if let (Type::Record(f1), Type::Record(f2)) = (&a, &b) {
            return if f1.len() <= f2.len() {
                self.unify_records(a, b, loc)
            } else {
                self.unify_records(b, a, loc)
            };
        }
        self.unify_resolved(a, b, loc)
    }

    /// Unify with `expected` as the narrow side when both are records:
    /// every field the expected type names must exist in the actual type,
    /// and extra actual fields are allowed.
    pub fn unify_expected(
        &mut self,
        expected: Type,
        actual: Type,
        loc: &Location,
    ) -> Result<(), Diagnostic> {
        let expected = self.resolve(expected);
        let actual = self.resolve(actual);
        if let (Type::Record(_), Type::Record(_)) = (&expected, &actual) {
            return self.unify_records(expected, actual, loc);
        }
        self.unify_resolved(expected, actual, loc)
    }

    /// Width-subtyped record unification: `narrow`'s fields must all be
    /// present in `wide`; extra fields of `wide` are allowed.
    fn unify_records(&mut self, narrow: Type, wide: Type, loc: &Location) -> Result<(), Diagnostic> {
        let (Type::Record(narrow_fields), Type::Record(wide_fields)) = (&narrow, &wide) else {
            unreachable!("unify_records called on non-records");
        };
        let pairs: Vec<(Type, Type)> = narrow_fields
            .iter()
            .map(|(k, n)| match wide_fields.get(k) {
                Some(w) => Ok((n.clone(), w.clone())),
                None => Err(Diagnostic::new(
                    "VF4501",
                    loc.clone(),
                    &[
                        ("record", wide.to_string()),
                        ("field", k.clone()),
                    ],
                )),
            })
            .collect::<Result<_, _>>()?;
        for (n, w) in pairs {
            self.unify(n, w, loc)?;
        }
        Ok(())
    }

    /// Structural unification over already-resolved types.
    fn unify_resolved(&mut self, a: Type, b: Type, loc: &Location) -> Result<(), Diagnostic> {
        match (a, b) {
            // Never unifies with anything (bottom) and records nothing,
            // so it must win even against an unbound variable.
            (Type::Never, _) | (_, Type::Never) => Ok(()),

            // Two identical variables -- already unified.
            (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(()),

            // Variable meets variable -- union them, keeping the lower
            // level so neither escapes the shallower scope.
            (Type::Var(v1), Type::Var(v2)) => {
                let level = self.level_of(v1).min(self.level_of(v2));
                self.table
                    .unify_var_var(v1, v2)
                    .expect("unifying two unbound vars cannot fail");
                self.set_level(v1, level);
                Ok(())
            }

            // Variable meets a type -- occurs check, level adjustment,
            // then bind.
            (Type::Var(v), ty) | (ty, Type::Var(v)) => {
                if self.occurs_in(v, &ty) {
                    return Err(Diagnostic::new(
                        "VF4300",
                        loc.clone(),
                        &[
                            ("var", Type::Var(v).to_string()),
                            ("ty", ty.to_string()),
                        ],
                    ));
                }
                let level = self.level_of(v);
                self.lower_levels(&ty, level);
                self.table
                    .unify_var_value(v, Some(ty))
                    .expect("binding an unbound var after occurs check cannot fail");
                Ok(())
            }

            (Type::Con(c1), Type::Con(c2)) => {
                if c1 == c2 {
                    Ok(())
                } else {
                    Err(mismatch(&Type::Con(c1), &Type::Con(c2), loc))
                }
            }

            (Type::Fun(p1, r1), Type::Fun(p2, r2)) => {
                if p1.len() != p2.len() {
                    return Err(Diagnostic::new(
                        "VF4021",
                        loc.clone(),
                        &[
                            ("expected", p1.len().to_string()),
                            ("found", p2.len().to_string()),
                        ],
                    ));
                }
                for (a, b) in p1.into_iter().zip(p2) {
                    self.unify(a, b, loc)?;
                }
                self.unify(*r1, *r2, loc)
            }

            (Type::App(c1, a1), Type::App(c2, a2)) => {
                self.unify(*c1, *c2, loc)?;
                if a1.len() != a2.len() {
                    return Err(Diagnostic::new(
                        "VF4022",
                        loc.clone(),
                        &[
                            ("expected", a1.len().to_string()),
                            ("found", a2.len().to_string()),
                        ],
                    ));
                }
                for (a, b) in a1.into_iter().zip(a2) {
                    self.unify(a, b, loc)?;
                }
                Ok(())
            }

            (Type::Tuple(e1), Type::Tuple(e2)) => {
                if e1.len() != e2.len() {
                    return Err(Diagnostic::new(
                        "VF4023",
                        loc.clone(),
                        &[
                            ("expected", e1.len().to_string()),
                            ("found", e2.len().to_string()),
                        ],
                    ));
                }
                for (a, b) in e1.into_iter().zip(e2) {
                    self.unify(a, b, loc)?;
                }
                Ok(())
            }

            (Type::Ref(a), Type::Ref(b)) => self.unify(*a, *b, loc),

            // Nominal variants: identity is the declared name. Matching
            // identity fixes the constructor table, so unification reduces
            // to the type-application arguments.
            (
                Type::Variant { name: n1, args: a1 },
                Type::Variant { name: n2, args: a2 },
            ) => {
                if n1 != n2 {
                    return Err(Diagnostic::new(
                        "VF4025",
                        loc.clone(),
                        &[("expected", n1), ("found", n2)],
                    ));
                }
                debug_assert_eq!(a1.len(), a2.len(), "one declaration, one arity");
                for (a, b) in a1.into_iter().zip(a2) {
                    self.unify(a, b, loc)?;
                }
                Ok(())
            }

            // Unions are conservative: identical member lists in the same
            // order, a union whose constructor set is a subset of the
            // other's, or a variant that appears among the members.
            // Primitive-union narrowing is not supported.
            (Type::Union(m1), Type::Union(m2)) => {
                if m1.len() == m2.len() {
                    for (a, b) in m1.into_iter().zip(m2) {
                        self.unify(a, b, loc)?;
                    }
                    return Ok(());
                }
                // A narrower union is a subset of a wider one when every
                // member is a nominal variant that also appears (by
                // declared name) in the wider union.
                let (narrow, wide) = if m1.len() < m2.len() { (m1, m2) } else { (m2, m1) };
                for member in &narrow {
                    let Type::Variant { name, .. } = member else {
                        return Err(union_mismatch(
                            &Type::Union(narrow.clone()),
                            &Type::Union(wide.clone()),
                            loc,
                        ));
                    };
                    let counterpart = wide
                        .iter()
                        .find(|m| matches!(m, Type::Variant { name: n, .. } if n == name))
                        .cloned();
                    let Some(counterpart) = counterpart else {
                        return Err(union_mismatch(
                            &Type::Union(narrow.clone()),
                            &Type::Union(wide.clone()),
                            loc,
                        ));
                    };
                    self.unify(member.clone(), counterpart, loc)?;
                }
                Ok(())
            }
            (Type::Union(members), v @ Type::Variant { .. })
            | (v @ Type::Variant { .. }, Type::Union(members)) => {
                let Type::Variant { name, .. } = &v else {
                    unreachable!()
                };
                let member = members
                    .iter()
                    .find(|m| matches!(m, Type::Variant { name: n, .. } if n == name))
                    .cloned();
                match member {
                    Some(m) => self.unify(m, v, loc),
                    None => Err(union_mismatch(&Type::Union(members), &v, loc)),
                }
            }
            (u @ Type::Union(_), other) | (other, u @ Type::Union(_)) => {
                Err(union_mismatch(&u, &other, loc))
            }

            (a, b) => Err(mismatch(&a, &b, loc)),
        }
    }

    // ── Generalization ──────────────────────────────────────────────────

    /// Generalize a type into a polymorphic scheme.
    ///
    /// Quantifies every variable whose level is strictly greater than the
    /// current level -- exactly the variables introduced in the let body
    /// that escaped to no outer scope. Callers apply the value restriction
    /// before calling this.
    pub fn generalize(&mut self, ty: Type) -> Scheme {
        let resolved = self.resolve(ty);
        let mut vars = Vec::new();
        self.collect_generalizable(&resolved, &mut vars);
        let mut seen = std::collections::HashSet::new();
        vars.retain(|v| seen.insert(*v));
        Scheme { vars, ty: resolved }
    }

    fn collect_generalizable(&mut self, ty: &Type, out: &mut Vec<TyVar>) {
        match ty {
            Type::Var(v) => match self.table.probe_value(*v) {
                Some(inner) => self.collect_generalizable(&inner, out),
                None => {
                    let root = self.table.find(*v);
                    if self.var_levels[root.0 as usize] > self.current_level {
                        out.push(root);
                    }
                }
            },
            Type::Con(_) | Type::Never => {}
            Type::Fun(params, ret) => {
                for p in params {
                    self.collect_generalizable(p, out);
                }
                self.collect_generalizable(ret, out);
            }
            Type::App(con, args) => {
                self.collect_generalizable(con, out);
                for a in args {
                    self.collect_generalizable(a, out);
                }
            }
            Type::Record(fields) => {
                for v in fields.values() {
                    self.collect_generalizable(v, out);
                }
            }
            Type::Variant { args, .. } => {
                for a in args {
                    self.collect_generalizable(a, out);
                }
            }
            Type::Union(members) => {
                for m in members {
                    self.collect_generalizable(m, out);
                }
            }
            Type::Tuple(elems) => {
                for e in elems {
                    self.collect_generalizable(e, out);
                }
            }
            Type::Ref(inner) => self.collect_generalizable(inner, out),
        }
    }

    // ── Instantiation ───────────────────────────────────────────────────

    /// Instantiate a scheme with fresh type variables at the current
    /// level.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Type {
        if scheme.vars.is_empty() {
            return scheme.ty.clone();
        }
        let subst: FxHashMap<TyVar, Type> = scheme
            .vars
            .iter()
            .map(|v| (*v, self.fresh_var()))
            .collect();
        self.apply_subst(&scheme.ty, &subst)
    }

    /// Apply a substitution map to a type, following table bindings for
    /// variables not in the map.
    fn apply_subst(&mut self, ty: &Type, subst: &FxHashMap<TyVar, Type>) -> Type {
        match ty {
            Type::Var(v) => {
                if let Some(replacement) = subst.get(v) {
                    return replacement.clone();
                }
                match self.table.probe_value(*v) {
                    Some(inner) => self.apply_subst(&inner, subst),
                    None => ty.clone(),
                }
            }
            Type::Con(_) | Type::Never => ty.clone(),
            Type::Fun(params, ret) => Type::Fun(
                params.iter().map(|p| self.apply_subst(p, subst)).collect(),
                Box::new(self.apply_subst(ret, subst)),
            ),
            Type::App(con, args) => Type::App(
                Box::new(self.apply_subst(con, subst)),
                args.iter().map(|a| self.apply_subst(a, subst)).collect(),
            ),
            Type::Record(fields) => Type::Record(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), self.apply_subst(v, subst)))
                    .collect(),
            ),
            Type::Variant { name, args } => Type::Variant {
                name: name.clone(),
                args: args.iter().map(|a| self.apply_subst(a, subst)).collect(),
            },
            Type::Union(members) => Type::Union(
                members.iter().map(|m| self.apply_subst(m, subst)).collect(),
            ),
            Type::Tuple(elems) => Type::Tuple(
                elems.iter().map(|e| self.apply_subst(e, subst)).collect(),
            ),
            Type::Ref(inner) => Type::Ref(Box::new(self.apply_subst(inner, subst))),
        }
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Take a restore point. Used by overload resolution to try a
    /// candidate signature without committing its bindings.
    pub fn snapshot(&mut self) -> InferSnapshot {
        InferSnapshot {
            table: self.table.snapshot(),
            var_levels: self.var_levels.clone(),
        }
    }

    /// Undo everything since the snapshot.
    pub fn rollback_to(&mut self, snapshot: InferSnapshot) {
        self.table.rollback_to(snapshot.table);
        self.var_levels = snapshot.var_levels;
    }

    /// Keep everything since the snapshot.
    pub fn commit(&mut self, snapshot: InferSnapshot) {
        self.table.commit(snapshot.table);
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch(expected: &Type, found: &Type, loc: &Location) -> Diagnostic {
    Diagnostic::new(
        "VF4024",
        loc.clone(),
        &[
            ("expected", expected.to_string()),
            ("found", found.to_string()),
        ],
    )
}

fn union_mismatch(left: &Type, right: &Type, loc: &Location) -> Diagnostic {
    Diagnostic::new(
        "VF4020",
        loc.clone(),
        &[("left", left.to_string()), ("right", right.to_string())],
    )
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::TyCon;

    fn loc() -> Location {
        Location::new("test.vf", 1, 1, 0)
    }

    #[test]
    fn unify_two_fresh_vars() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();

        ctx.unify(a.clone(), b.clone(), &loc()).unwrap();
        ctx.unify(a.clone(), Type::int(), &loc()).unwrap();

        assert_eq!(ctx.resolve(a), Type::int());
        assert_eq!(ctx.resolve(b), Type::int());
    }

    #[test]
    fn unify_is_sound() {
        // After a successful unify, both sides resolve to the same type.
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let t1 = Type::fun(a.clone(), Type::int());
        let t2 = Type::fun(Type::string(), a.clone());
        // (?a) -> Int ~ (String) -> ?a fails: a ~ String, then Int ~ a=String.
        assert!(ctx.unify(t1, t2, &loc()).is_err());

        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        let t1 = Type::fun(a.clone(), b.clone());
        let t2 = Type::fun(Type::string(), Type::int());
        ctx.unify(t1.clone(), t2.clone(), &loc()).unwrap();
        assert_eq!(ctx.resolve(t1), ctx.resolve(t2));
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        ctx.unify(a.clone(), Type::list(b.clone()), &loc()).unwrap();
        ctx.unify(b, Type::int(), &loc()).unwrap();
        let once = ctx.resolve(a.clone());
        let twice = ctx.resolve(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, Type::list(Type::int()));
    }

    #[test]
    fn unify_mismatch() {
        let mut ctx = InferCtx::new();
        let err = ctx.unify(Type::int(), Type::string(), &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4024");
        assert!(err.message.contains("`Int`"));
        assert!(err.message.contains("`String`"));
    }

    #[test]
    fn occurs_check_infinite_type() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let fun = Type::fun(a.clone(), Type::int());
        let err = ctx.unify(a, fun, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4300");
    }

    #[test]
    fn no_bound_var_contains_itself() {
        // Occurs soundness: binding through an intermediate var still
        // trips the check.
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        ctx.unify(a.clone(), b.clone(), &loc()).unwrap();
        let err = ctx.unify(b, Type::fun(a, Type::int()), &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4300");
    }

    #[test]
    fn function_arity_mismatch() {
        let mut ctx = InferCtx::new();
        let f1 = Type::Fun(vec![Type::int()], Box::new(Type::int()));
        let f2 = Type::Fun(vec![Type::int(), Type::int()], Box::new(Type::int()));
        let err = ctx.unify(f1, f2, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4021");
    }

    #[test]
    fn tuple_arity_mismatch() {
        let mut ctx = InferCtx::new();
        let t1 = Type::Tuple(vec![Type::int(), Type::int()]);
        let t2 = Type::Tuple(vec![Type::int()]);
        let err = ctx.unify(t1, t2, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4023");
    }

    #[test]
    fn never_unifies_with_anything() {
        let mut ctx = InferCtx::new();
        ctx.unify(Type::Never, Type::int(), &loc()).unwrap();
        ctx.unify(Type::string(), Type::Never, &loc()).unwrap();
        // And it records nothing: a var unified with Never stays free.
        let a = ctx.fresh_var();
        ctx.unify(a.clone(), Type::Never, &loc()).unwrap();
        ctx.unify(a.clone(), Type::int(), &loc()).unwrap();
        assert_eq!(ctx.resolve(a), Type::int());
    }

    #[test]
    fn ref_unifies_by_inner() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        ctx.unify(
            Type::reference(a.clone()),
            Type::reference(Type::int()),
            &loc(),
        )
        .unwrap();
        assert_eq!(ctx.resolve(a), Type::int());

        let err = ctx
            .unify(
                Type::reference(Type::int()),
                Type::reference(Type::string()),
                &loc(),
            )
            .unwrap_err();
        assert_eq!(err.code(), "VF4024");
    }

    #[test]
    fn record_width_subtyping_allows_extra_fields() {
        let mut ctx = InferCtx::new();
        let narrow = Type::record(vec![("x", Type::int())]);
        let wide = Type::record(vec![("x", Type::int()), ("y", Type::int())]);
        ctx.unify(narrow, wide, &loc()).unwrap();
    }

    #[test]
    fn record_width_subtyping_binds_field_types() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let narrow = Type::record(vec![("x", a.clone())]);
        let wide = Type::record(vec![("x", Type::int()), ("y", Type::bool())]);
        ctx.unify(narrow, wide, &loc()).unwrap();
        assert_eq!(ctx.resolve(a), Type::int());
    }

    #[test]
    fn record_missing_field_on_wide_side() {
        let mut ctx = InferCtx::new();
        let narrow = Type::record(vec![("z", Type::int())]);
        let wide = Type::record(vec![("x", Type::int()), ("y", Type::int())]);
        let err = ctx.unify(narrow, wide, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4501");
        assert!(err.message.contains("`z`"));
    }

    #[test]
    fn unify_expected_keeps_required_fields() {
        // The annotated side is narrow even when it has more fields, so a
        // value missing a required field is rejected.
        let mut ctx = InferCtx::new();
        let annotated = Type::record(vec![("x", Type::int()), ("y", Type::int())]);
        let value = Type::record(vec![("x", Type::int())]);
        let err = ctx.unify_expected(annotated, value, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4501");
        assert!(err.message.contains("`y`"));
    }

    #[test]
    fn variants_are_nominal() {
        // Same constructor shapes, different declared names: rejected.
        let mut ctx = InferCtx::new();
        let a = Type::Variant {
            name: "A".into(),
            args: vec![],
        };
        let b = Type::Variant {
            name: "B".into(),
            args: vec![],
        };
        let err = ctx.unify(a, b, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4025");
    }

    #[test]
    fn same_variant_unifies_args() {
        let mut ctx = InferCtx::new();
        let v = ctx.fresh_var();
        ctx.unify(Type::option(v.clone()), Type::option(Type::int()), &loc())
            .unwrap();
        assert_eq!(ctx.resolve(v), Type::int());
    }

    #[test]
    fn union_requires_structural_identity() {
        let mut ctx = InferCtx::new();
        let u1 = Type::Union(vec![Type::int(), Type::string()]);
        let u2 = Type::Union(vec![Type::int(), Type::string()]);
        ctx.unify(u1, u2, &loc()).unwrap();

        let u3 = Type::Union(vec![Type::string(), Type::int()]);
        let u4 = Type::Union(vec![Type::int(), Type::string()]);
        let err = ctx.unify(u3, u4, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4024");
    }

    #[test]
    fn union_rejects_primitive_narrowing() {
        let mut ctx = InferCtx::new();
        let u = Type::Union(vec![Type::int(), Type::string()]);
        let err = ctx.unify(u, Type::int(), &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4020");
    }

    #[test]
    fn union_accepts_member_variant() {
        let mut ctx = InferCtx::new();
        let a = Type::Variant {
            name: "A".into(),
            args: vec![],
        };
        let b = Type::Variant {
            name: "B".into(),
            args: vec![],
        };
        let u = Type::Union(vec![a.clone(), b]);
        ctx.unify(u, a, &loc()).unwrap();
    }

    #[test]
    fn narrower_union_is_subset_of_wider() {
        let variant = |name: &str| Type::Variant {
            name: name.into(),
            args: vec![],
        };
        let narrow = Type::Union(vec![variant("A"), variant("B")]);
        let wide = Type::Union(vec![variant("A"), variant("B"), variant("C")]);

        let mut ctx = InferCtx::new();
        ctx.unify(narrow.clone(), wide.clone(), &loc()).unwrap();
        // Orientation does not matter; the shorter side is the subset.
        let mut ctx = InferCtx::new();
        ctx.unify(wide, narrow, &loc()).unwrap();
    }

    #[test]
    fn union_subset_binds_variant_args() {
        let mut ctx = InferCtx::new();
        let v = ctx.fresh_var();
        let narrow = Type::Union(vec![Type::option(v.clone())]);
        let wide = Type::Union(vec![
            Type::option(Type::int()),
            Type::result(Type::int(), Type::string()),
        ]);
        ctx.unify(narrow, wide, &loc()).unwrap();
        assert_eq!(ctx.resolve(v), Type::int());
    }

    #[test]
    fn union_subset_rejects_missing_member() {
        let variant = |name: &str| Type::Variant {
            name: name.into(),
            args: vec![],
        };
        let mut ctx = InferCtx::new();
        let narrow = Type::Union(vec![variant("A"), variant("D")]);
        let wide = Type::Union(vec![variant("A"), variant("B"), variant("C")]);
        let err = ctx.unify(narrow, wide, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4020");
    }

    #[test]
    fn union_subset_requires_nominal_members() {
        // Primitive members have no constructor name to match on.
        let mut ctx = InferCtx::new();
        let narrow = Type::Union(vec![Type::int()]);
        let wide = Type::Union(vec![Type::int(), Type::string()]);
        let err = ctx.unify(narrow, wide, &loc()).unwrap_err();
        assert_eq!(err.code(), "VF4020");
    }

    #[test]
    fn generalize_and_instantiate() {
        let mut ctx = InferCtx::new();

        ctx.enter_level();
        let a = ctx.fresh_var();
        let identity = Type::fun(a.clone(), a);
        ctx.leave_level();

        let scheme = ctx.generalize(identity);
        assert_eq!(scheme.vars.len(), 1);

        let inst1 = ctx.instantiate(&scheme);
        let inst2 = ctx.instantiate(&scheme);
        match (&inst1, &inst2) {
            (Type::Fun(p1, _), Type::Fun(p2, _)) => {
                assert_ne!(p1[0], p2[0], "instantiations must be independent");
            }
            _ => panic!("expected function types"),
        }
        // Each instantiation is still usable at its own type.
        ctx.unify(inst1, Type::fun(Type::int(), Type::int()), &loc())
            .unwrap();
        ctx.unify(inst2, Type::fun(Type::string(), Type::string()), &loc())
            .unwrap();
    }

    #[test]
    fn level_adjustment_blocks_escaping_vars() {
        // A variable created at level 2 that is unified into a level-1
        // variable must not be generalized when leaving level 2.
        let mut ctx = InferCtx::new();
        ctx.enter_level(); // level 1
        let outer = ctx.fresh_var();
        ctx.enter_level(); // level 2
        let inner = ctx.fresh_var();
        ctx.unify(outer.clone(), Type::fun(inner.clone(), Type::int()), &loc())
            .unwrap();
        ctx.leave_level(); // back to level 1

        let scheme = ctx.generalize(inner);
        assert!(
            scheme.vars.is_empty(),
            "inner var was lowered to level 1 and must not generalize at level 1"
        );
        let _ = outer;
    }

    #[test]
    fn var_var_union_keeps_min_level() {
        let mut ctx = InferCtx::new();
        let shallow = ctx.fresh_var(); // level 0
        ctx.enter_level();
        let deep = ctx.fresh_var(); // level 1
        ctx.unify(shallow, deep.clone(), &loc()).unwrap();
        ctx.leave_level();
        let scheme = ctx.generalize(deep);
        assert!(scheme.vars.is_empty(), "merged var holds the outer level");
    }

    #[test]
    fn snapshot_rollback_discards_bindings() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let snap = ctx.snapshot();
        ctx.unify(a.clone(), Type::int(), &loc()).unwrap();
        assert_eq!(ctx.resolve(a.clone()), Type::int());
        ctx.rollback_to(snap);
        assert!(matches!(ctx.resolve(a.clone()), Type::Var(_)));
        // And the variable can still be bound afterwards.
        ctx.unify(a.clone(), Type::string(), &loc()).unwrap();
        assert_eq!(ctx.resolve(a), Type::string());
    }

    #[test]
    fn con_equality_is_by_name() {
        let mut ctx = InferCtx::new();
        ctx.unify(
            Type::Con(TyCon::new("Unit")),
            Type::unit(),
            &loc(),
        )
        .unwrap();
    }
}
