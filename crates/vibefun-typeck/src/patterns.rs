//! Pattern type-checking.
//!
//! Checks one pattern against a scrutinee type, producing the variable
//! bindings the pattern introduces plus an abstract pattern for the
//! exhaustiveness matrix. Patterns are linear: a name bound twice in one
//! pattern is an error.

use rustc_hash::FxHashMap;

use vibefun_ast::{Pattern, PatternKind, PatternLiteral};
use vibefun_common::{suggest, Diagnostic, Location};

use crate::env::TypeEnv;
use crate::exhaustiveness::Pat;
use crate::ty::{TyVar, Type};
use crate::unify::InferCtx;

/// Check `pattern` against `scrutinee`, returning the introduced bindings
/// in source order and the abstract pattern.
pub fn check_pattern(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    pattern: &Pattern,
    scrutinee: &Type,
) -> Result<(Vec<(String, Type)>, Pat), Diagnostic> {
    let mut bindings: Vec<(String, Type)> = Vec::new();
    let abs = check(ctx, env, pattern, scrutinee, &mut bindings)?;
    Ok((bindings, abs))
}

fn check(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    pattern: &Pattern,
    scrutinee: &Type,
    bindings: &mut Vec<(String, Type)>,
) -> Result<Pat, Diagnostic> {
    let loc = &pattern.loc;
    match &pattern.kind {
        PatternKind::Wildcard => Ok(Pat::Wild),

        PatternKind::Var(name) => {
            bind(bindings, name, scrutinee.clone(), loc)?;
            Ok(Pat::Wild)
        }

        PatternKind::Literal(lit) => {
            let (lit_ty, abs) = literal_type(lit);
            if let Err(err) = ctx.unify(scrutinee.clone(), lit_ty.clone(), loc) {
                // A literal pattern conflicting with an already-determined
                // scrutinee is the general two-uses-disagree error.
                if err.code() == "VF4024" {
                    let expected = ctx.resolve(scrutinee.clone());
                    return Err(Diagnostic::new(
                        "VF4001",
                        loc.clone(),
                        &[
                            ("expected", expected.to_string()),
                            ("found", lit_ty.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
            Ok(abs)
        }

        PatternKind::Variant { ctor, args } => {
            check_variant(ctx, env, ctor, args, scrutinee, loc, bindings)
        }

        PatternKind::Record { fields } => {
            // A record pattern requires at least its listed fields; the
            // pattern side is narrow under width subtyping.
            let mut field_vars: Vec<(String, Type)> = Vec::new();
            let mut pattern_rec = std::collections::BTreeMap::new();
            for (name, _) in fields {
                let v = ctx.fresh_var();
                field_vars.push((name.clone(), v.clone()));
                pattern_rec.insert(name.clone(), v);
            }
            let pattern_ty = Type::Record(pattern_rec);
            if let Err(err) = ctx.unify_expected(pattern_ty, scrutinee.clone(), loc) {
                if err.code() == "VF4024" {
                    let found = ctx.resolve(scrutinee.clone());
                    return Err(Diagnostic::new(
                        "VF4003",
                        loc.clone(),
                        &[
                            ("expected", "a record".to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
            let mut abs_fields = Vec::new();
            for ((name, sub), (_, field_ty)) in fields.iter().zip(field_vars) {
                let resolved = ctx.resolve(field_ty);
                let abs = check(ctx, env, sub, &resolved, bindings)?;
                abs_fields.push((name.clone(), abs));
            }
            Ok(Pat::Record(abs_fields))
        }

        PatternKind::Tuple { elems } => {
            let resolved = ctx.resolve(scrutinee.clone());
            if let Type::Tuple(scrutinee_elems) = &resolved {
                if scrutinee_elems.len() != elems.len() {
                    return Err(Diagnostic::new(
                        "VF4203",
                        loc.clone(),
                        &[
                            ("expected", scrutinee_elems.len().to_string()),
                            ("found", elems.len().to_string()),
                        ],
                    ));
                }
            }
            let elem_vars: Vec<Type> = elems.iter().map(|_| ctx.fresh_var()).collect();
            ctx.unify(
                scrutinee.clone(),
                Type::Tuple(elem_vars.clone()),
                loc,
            )?;
            let mut abs_elems = Vec::new();
            for (sub, var) in elems.iter().zip(elem_vars) {
                let resolved = ctx.resolve(var);
                abs_elems.push(check(ctx, env, sub, &resolved, bindings)?);
            }
            Ok(Pat::Tuple(abs_elems))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn check_variant(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    ctor: &str,
    args: &[Pattern],
    scrutinee: &Type,
    loc: &Location,
    bindings: &mut Vec<(String, Type)>,
) -> Result<Pat, Diagnostic> {
    let Some(binding) = env.lookup_ctor(ctor) else {
        return Err(unknown_ctor(env, ctor, loc));
    };
    let binding = binding.clone();

    if binding.arg_types.len() != args.len() {
        return Err(Diagnostic::new(
            "VF4200",
            loc.clone(),
            &[
                ("ctor", ctor.to_string()),
                ("expected", binding.arg_types.len().to_string()),
                ("found", args.len().to_string()),
            ],
        ));
    }

    // Instantiate the constructor's type parameters fresh, then tie the
    // variant's identity to the scrutinee.
    let mapping: FxHashMap<TyVar, Type> = binding
        .params
        .iter()
        .map(|p| (*p, ctx.fresh_var()))
        .collect();
    let result_ty = Type::Variant {
        name: binding.type_name.clone(),
        args: binding.params.iter().map(|p| mapping[p].clone()).collect(),
    };

    let resolved_scrutinee = ctx.resolve(scrutinee.clone());
    match &resolved_scrutinee {
        Type::Variant { name, .. } if name != &binding.type_name => {
            return Err(Diagnostic::new(
                "VF4602",
                loc.clone(),
                &[
                    ("ctor", ctor.to_string()),
                    ("expected", binding.type_name.clone()),
                    ("found", name.clone()),
                ],
            ));
        }
        Type::Var(_) | Type::Variant { .. } | Type::Never | Type::Union(_) => {
            ctx.unify(scrutinee.clone(), result_ty, loc)?;
        }
        other => {
            return Err(Diagnostic::new(
                "VF4204",
                loc.clone(),
                &[
                    ("ctor", ctor.to_string()),
                    ("found", other.to_string()),
                ],
            ));
        }
    }

    let mut abs_args = Vec::new();
    for (sub, arg_ty) in args.iter().zip(&binding.arg_types) {
        let instantiated = substitute_params(arg_ty, &mapping);
        let resolved = ctx.resolve(instantiated);
        abs_args.push(check(ctx, env, sub, &resolved, bindings)?);
    }
    Ok(Pat::Ctor {
        name: ctor.to_string(),
        args: abs_args,
    })
}

/// VF4600 with a typo suggestion when a plausible one exists.
pub(crate) fn unknown_ctor(env: &TypeEnv, ctor: &str, loc: &Location) -> Diagnostic {
    let suggestion = suggest::closest(ctor, env.ctor_names());
    let diag = Diagnostic::new(
        "VF4600",
        loc.clone(),
        &[
            ("ctor", ctor.to_string()),
            ("suggestion", suggestion.unwrap_or_default().to_string()),
        ],
    );
    match suggestion {
        Some(_) => diag,
        None => diag.without_hint(),
    }
}

fn substitute_params(ty: &Type, mapping: &FxHashMap<TyVar, Type>) -> Type {
    // Parameter placeholders are plain TyVars; remapping them is ordinary
    // variable substitution.
    crate::ty::remap_with_types(ty, mapping)
}

fn bind(
    bindings: &mut Vec<(String, Type)>,
    name: &str,
    ty: Type,
    loc: &Location,
) -> Result<(), Diagnostic> {
    if bindings.iter().any(|(n, _)| n == name) {
        return Err(Diagnostic::new(
            "VF4402",
            loc.clone(),
            &[("name", name.to_string())],
        ));
    }
    bindings.push((name.to_string(), ty));
    Ok(())
}

fn literal_type(lit: &PatternLiteral) -> (Type, Pat) {
    match lit {
        PatternLiteral::Int(i) => (Type::int(), Pat::Int(*i)),
        PatternLiteral::Float(f) => (Type::float(), Pat::Float(format!("{f}"))),
        PatternLiteral::String(s) => (Type::string(), Pat::Str(s.clone())),
        PatternLiteral::Bool(b) => (Type::bool(), Pat::Bool(*b)),
        PatternLiteral::Unit => (Type::unit(), Pat::Unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::base_env;

    fn loc() -> Location {
        Location::new("test.vf", 1, 1, 0)
    }

    fn pat(kind: PatternKind) -> Pattern {
        Pattern::new(kind, loc())
    }

    #[test]
    fn variable_pattern_binds_scrutinee_type() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let (bindings, abs) =
            check_pattern(&mut ctx, &env, &pat(PatternKind::Var("x".into())), &Type::int())
                .unwrap();
        assert_eq!(bindings, vec![("x".to_string(), Type::int())]);
        assert_eq!(abs, Pat::Wild);
    }

    #[test]
    fn literal_pattern_unifies_with_var_scrutinee() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let scrutinee = ctx.fresh_var();
        check_pattern(
            &mut ctx,
            &env,
            &pat(PatternKind::Literal(PatternLiteral::Int(1))),
            &scrutinee,
        )
        .unwrap();
        assert_eq!(ctx.resolve(scrutinee), Type::int());
    }

    #[test]
    fn literal_pattern_mismatch() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let err = check_pattern(
            &mut ctx,
            &env,
            &pat(PatternKind::Literal(PatternLiteral::Int(1))),
            &Type::string(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "VF4001");
    }

    #[test]
    fn variant_pattern_extracts_payload_type() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let some_x = pat(PatternKind::Variant {
            ctor: "Some".into(),
            args: vec![pat(PatternKind::Var("x".into()))],
        });
        let (bindings, abs) =
            check_pattern(&mut ctx, &env, &some_x, &Type::option(Type::int())).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].0, "x");
        assert_eq!(ctx.resolve(bindings[0].1.clone()), Type::int());
        assert!(matches!(abs, Pat::Ctor { ref name, .. } if name == "Some"));
    }

    #[test]
    fn variant_pattern_arity_mismatch() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let bad = pat(PatternKind::Variant {
            ctor: "Some".into(),
            args: vec![],
        });
        let err = check_pattern(&mut ctx, &env, &bad, &Type::option(Type::int())).unwrap_err();
        assert_eq!(err.code(), "VF4200");
    }

    #[test]
    fn unknown_constructor_suggests() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let bad = pat(PatternKind::Variant {
            ctor: "Soem".into(),
            args: vec![pat(PatternKind::Wildcard)],
        });
        let scrutinee = ctx.fresh_var();
        let err = check_pattern(&mut ctx, &env, &bad, &scrutinee).unwrap_err();
        assert_eq!(err.code(), "VF4600");
        assert_eq!(err.hint.as_deref(), Some("did you mean `Some`?"));
    }

    #[test]
    fn ctor_pattern_on_non_variant() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let bad = pat(PatternKind::Variant {
            ctor: "Some".into(),
            args: vec![pat(PatternKind::Wildcard)],
        });
        let err = check_pattern(&mut ctx, &env, &bad, &Type::int()).unwrap_err();
        assert_eq!(err.code(), "VF4204");
    }

    #[test]
    fn ctor_of_wrong_variant_type() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let ok = pat(PatternKind::Variant {
            ctor: "Ok".into(),
            args: vec![pat(PatternKind::Wildcard)],
        });
        let err =
            check_pattern(&mut ctx, &env, &ok, &Type::option(Type::int())).unwrap_err();
        assert_eq!(err.code(), "VF4602");
    }

    #[test]
    fn duplicate_binding_rejected() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let dup = pat(PatternKind::Tuple {
            elems: vec![
                pat(PatternKind::Var("x".into())),
                pat(PatternKind::Var("x".into())),
            ],
        });
        let scrutinee = Type::Tuple(vec![Type::int(), Type::int()]);
        let err = check_pattern(&mut ctx, &env, &dup, &scrutinee).unwrap_err();
        assert_eq!(err.code(), "VF4402");
    }

    #[test]
    fn tuple_pattern_arity_mismatch() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let one = pat(PatternKind::Tuple {
            elems: vec![pat(PatternKind::Var("a".into()))],
        });
        let scrutinee = Type::Tuple(vec![Type::int(), Type::int()]);
        let err = check_pattern(&mut ctx, &env, &one, &scrutinee).unwrap_err();
        assert_eq!(err.code(), "VF4203");
    }

    #[test]
    fn record_pattern_on_fresh_var_binds_minimal_record() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let record = pat(PatternKind::Record {
            fields: vec![("x".into(), pat(PatternKind::Var("a".into())))],
        });
        let scrutinee = ctx.fresh_var();
        let (bindings, _) = check_pattern(&mut ctx, &env, &record, &scrutinee).unwrap();
        assert_eq!(bindings.len(), 1);
        match ctx.resolve(scrutinee) {
            Type::Record(fields) => assert!(fields.contains_key("x")),
            other => panic!("expected record, got {other}"),
        }
    }

    #[test]
    fn record_pattern_allows_wider_scrutinee() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let record = pat(PatternKind::Record {
            fields: vec![("x".into(), pat(PatternKind::Var("a".into())))],
        });
        let scrutinee = Type::record(vec![("x", Type::int()), ("y", Type::bool())]);
        let (bindings, _) = check_pattern(&mut ctx, &env, &record, &scrutinee).unwrap();
        assert_eq!(ctx.resolve(bindings[0].1.clone()), Type::int());
    }
}
