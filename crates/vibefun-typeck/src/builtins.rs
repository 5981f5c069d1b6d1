//! Built-in type and value registration.
//!
//! Registers primitive types (Int, Float, String, Bool, Unit), the builtin
//! variants (`Option`, `Result`, `List`) with their constructors, the `ref`
//! cell builtin, and the standard library signatures. These are data: the
//! stdlib functions themselves live in the JavaScript runtime; the checker
//! only knows their schemes.

use vibefun_common::Location;

use crate::env::{CtorBinding, TypeBinding, TypeDefKind, TypeEnv, ValueBinding};
use crate::ty::{Scheme, TyVar, Type};

fn builtin_loc() -> Location {
    Location::new("<builtin>", 1, 1, 0)
}

/// A scheme quantified over one placeholder variable.
fn poly1(build: impl Fn(Type) -> Type) -> Scheme {
    let a = TyVar(0);
    Scheme {
        vars: vec![a],
        ty: build(Type::Var(a)),
    }
}

/// A scheme quantified over two placeholder variables.
fn poly2(build: impl Fn(Type, Type) -> Type) -> Scheme {
    let a = TyVar(0);
    let b = TyVar(1);
    Scheme {
        vars: vec![a, b],
        ty: build(Type::Var(a), Type::Var(b)),
    }
}

/// A scheme quantified over three placeholder variables.
fn poly3(build: impl Fn(Type, Type, Type) -> Type) -> Scheme {
    let a = TyVar(0);
    let b = TyVar(1);
    let c = TyVar(2);
    Scheme {
        vars: vec![a, b, c],
        ty: build(Type::Var(a), Type::Var(b), Type::Var(c)),
    }
}

fn mono(ty: Type) -> Scheme {
    Scheme::mono(ty)
}

/// Build the base environment every module starts from.
pub fn base_env() -> TypeEnv {
    let mut env = TypeEnv::new();
    register_primitive_types(&mut env);
    register_builtin_variants(&mut env);
    register_stdlib(&mut env);
    env
}

/// Register the nullary primitive type constructors.
fn register_primitive_types(env: &mut TypeEnv) {
    for name in ["Int", "Float", "String", "Bool", "Unit", "Never"] {
        env.insert_type(
            name,
            TypeBinding {
                arity: 0,
                kind: TypeDefKind::Opaque,
                loc: builtin_loc(),
            },
        );
    }
    // Ref is a builtin unary constructor with dedicated `Type::Ref`
    // representation; the annotation converter special-cases it.
    env.insert_type(
        "Ref",
        TypeBinding {
            arity: 1,
            kind: TypeDefKind::Opaque,
            loc: builtin_loc(),
        },
    );
}

/// Register `Option`, `Result`, and `List` as ordinary variant types so
/// pattern exhaustiveness sees their constructor tables.
fn register_builtin_variants(env: &mut TypeEnv) {
    let a = TyVar(0);
    let e = TyVar(1);

    register_variant(
        env,
        "Option",
        vec![a],
        vec![("Some", vec![Type::Var(a)]), ("None", vec![])],
    );
    register_variant(
        env,
        "Result",
        vec![a, e],
        vec![("Ok", vec![Type::Var(a)]), ("Err", vec![Type::Var(e)])],
    );
    register_variant(
        env,
        "List",
        vec![a],
        vec![
            (
                "Cons",
                vec![
                    Type::Var(a),
                    Type::Variant {
                        name: "List".into(),
                        args: vec![Type::Var(a)],
                    },
                ],
            ),
            ("Nil", vec![]),
        ],
    );
}

/// Register one variant type: its type binding, its constructor index
/// entries, and a function-valued binding per constructor.
pub fn register_variant(
    env: &mut TypeEnv,
    type_name: &str,
    params: Vec<TyVar>,
    ctors: Vec<(&str, Vec<Type>)>,
) {
    let ctors: Vec<(String, Vec<Type>)> = ctors
        .into_iter()
        .map(|(n, args)| (n.to_string(), args))
        .collect();
    env.insert_type(
        type_name,
        TypeBinding {
            arity: params.len(),
            kind: TypeDefKind::VariantDef {
                params: params.clone(),
                ctors: ctors.clone(),
            },
            loc: builtin_loc(),
        },
    );

    let result_ty = Type::Variant {
        name: type_name.to_string(),
        args: params.iter().map(|p| Type::Var(*p)).collect(),
    };
    for (ctor_name, arg_types) in ctors {
        env.insert_ctor(
            ctor_name.clone(),
            CtorBinding {
                type_name: type_name.to_string(),
                params: params.clone(),
                arg_types: arg_types.clone(),
                loc: builtin_loc(),
            },
        );
        // Constructors are also first-class functions.
        let fn_ty = if arg_types.is_empty() {
            result_ty.clone()
        } else {
            Type::fun_n(arg_types, result_ty.clone())
        };
        env.insert_value(
            ctor_name,
            ValueBinding::Value {
                scheme: Scheme {
                    vars: params.clone(),
                    ty: fn_ty,
                },
                loc: builtin_loc(),
            },
        );
    }
}

/// The standard library scheme table.
fn register_stdlib(env: &mut TypeEnv) {
    use Type as T;

    let entries: Vec<(&str, Scheme)> = vec![
        // ── Core ────────────────────────────────────────────────────
        ("ref", poly1(|a| T::fun(a.clone(), T::reference(a)))),
        ("print", mono(T::fun(T::string(), T::unit()))),
        ("println", mono(T::fun(T::string(), T::unit()))),
        ("toString", poly1(|a| T::fun(a, T::string()))),
        // ── List ────────────────────────────────────────────────────
        (
            "map",
            poly2(|a, b| {
                T::fun_n(vec![T::fun(a.clone(), b.clone()), T::list(a)], T::list(b))
            }),
        ),
        (
            "filter",
            poly1(|a| {
                T::fun_n(
                    vec![T::fun(a.clone(), T::bool()), T::list(a.clone())],
                    T::list(a),
                )
            }),
        ),
        (
            "foldLeft",
            poly2(|a, b| {
                T::fun_n(
                    vec![
                        T::fun_n(vec![b.clone(), a.clone()], b.clone()),
                        b.clone(),
                        T::list(a),
                    ],
                    b,
                )
            }),
        ),
        (
            "foldRight",
            poly2(|a, b| {
                T::fun_n(
                    vec![
                        T::fun_n(vec![a.clone(), b.clone()], b.clone()),
                        b.clone(),
                        T::list(a),
                    ],
                    b,
                )
            }),
        ),
        (
            "flatMap",
            poly2(|a, b| {
                T::fun_n(
                    vec![T::fun(a.clone(), T::list(b.clone())), T::list(a)],
                    T::list(b),
                )
            }),
        ),
        ("length", poly1(|a| T::fun(T::list(a), T::int()))),
        ("head", poly1(|a| T::fun(T::list(a.clone()), T::option(a)))),
        (
            "tail",
            poly1(|a| T::fun(T::list(a.clone()), T::option(T::list(a)))),
        ),
        ("reverse", poly1(|a| T::fun(T::list(a.clone()), T::list(a)))),
        (
            "append",
            poly1(|a| {
                T::fun_n(vec![T::list(a.clone()), T::list(a.clone())], T::list(a))
            }),
        ),
        (
            "concat",
            poly1(|a| T::fun(T::list(T::list(a.clone())), T::list(a))),
        ),
        ("isEmpty", poly1(|a| T::fun(T::list(a), T::bool()))),
        (
            "take",
            poly1(|a| T::fun_n(vec![T::int(), T::list(a.clone())], T::list(a))),
        ),
        (
            "drop",
            poly1(|a| T::fun_n(vec![T::int(), T::list(a.clone())], T::list(a))),
        ),
        (
            "zip",
            poly2(|a, b| {
                T::fun_n(
                    vec![T::list(a.clone()), T::list(b.clone())],
                    T::list(T::Tuple(vec![a, b])),
                )
            }),
        ),
        (
            "any",
            poly1(|a| T::fun_n(vec![T::fun(a.clone(), T::bool()), T::list(a)], T::bool())),
        ),
        (
            "all",
            poly1(|a| T::fun_n(vec![T::fun(a.clone(), T::bool()), T::list(a)], T::bool())),
        ),
        (
            "find",
            poly1(|a| {
                T::fun_n(
                    vec![T::fun(a.clone(), T::bool()), T::list(a.clone())],
                    T::option(a),
                )
            }),
        ),
        (
            "range",
            mono(T::fun_n(vec![T::int(), T::int()], T::list(T::int()))),
        ),
        // ── Option ──────────────────────────────────────────────────
        (
            "mapOption",
            poly2(|a, b| {
                T::fun_n(
                    vec![T::fun(a.clone(), b.clone()), T::option(a)],
                    T::option(b),
                )
            }),
        ),
        (
            "andThen",
            poly2(|a, b| {
                T::fun_n(
                    vec![T::fun(a.clone(), T::option(b.clone())), T::option(a)],
                    T::option(b),
                )
            }),
        ),
        (
            "getOrElse",
            poly1(|a| T::fun_n(vec![a.clone(), T::option(a.clone())], a)),
        ),
        ("isSome", poly1(|a| T::fun(T::option(a), T::bool()))),
        ("isNone", poly1(|a| T::fun(T::option(a), T::bool()))),
        (
            "okOr",
            poly2(|a, e| {
                T::fun_n(vec![e.clone(), T::option(a.clone())], T::result(a, e))
            }),
        ),
        // ── Result ──────────────────────────────────────────────────
        (
            "mapResult",
            poly3(|a, b, e| {
                T::fun_n(
                    vec![T::fun(a.clone(), b.clone()), T::result(a, e.clone())],
                    T::result(b, e),
                )
            }),
        ),
        (
            "mapError",
            poly3(|a, e, f| {
                T::fun_n(
                    vec![T::fun(e.clone(), f.clone()), T::result(a.clone(), e)],
                    T::result(a, f),
                )
            }),
        ),
        (
            "andThenResult",
            poly3(|a, b, e| {
                T::fun_n(
                    vec![
                        T::fun(a.clone(), T::result(b.clone(), e.clone())),
                        T::result(a, e.clone()),
                    ],
                    T::result(b, e),
                )
            }),
        ),
        (
            "unwrapOr",
            poly2(|a, e| T::fun_n(vec![a.clone(), T::result(a.clone(), e)], a)),
        ),
        ("isOk", poly2(|a, e| T::fun(T::result(a, e), T::bool()))),
        ("isError", poly2(|a, e| T::fun(T::result(a, e), T::bool()))),
        (
            "toOption",
            poly2(|a, e| T::fun(T::result(a.clone(), e), T::option(a))),
        ),
        // ── String ──────────────────────────────────────────────────
        ("stringLength", mono(T::fun(T::string(), T::int()))),
        (
            "split",
            mono(T::fun_n(
                vec![T::string(), T::string()],
                T::list(T::string()),
            )),
        ),
        (
            "join",
            mono(T::fun_n(
                vec![T::string(), T::list(T::string())],
                T::string(),
            )),
        ),
        ("toUpper", mono(T::fun(T::string(), T::string()))),
        ("toLower", mono(T::fun(T::string(), T::string()))),
        ("trim", mono(T::fun(T::string(), T::string()))),
        (
            "contains",
            mono(T::fun_n(vec![T::string(), T::string()], T::bool())),
        ),
        (
            "startsWith",
            mono(T::fun_n(vec![T::string(), T::string()], T::bool())),
        ),
        (
            "endsWith",
            mono(T::fun_n(vec![T::string(), T::string()], T::bool())),
        ),
        (
            "charAt",
            mono(T::fun_n(
                vec![T::int(), T::string()],
                T::option(T::string()),
            )),
        ),
        (
            "substring",
            mono(T::fun_n(
                vec![T::int(), T::int(), T::string()],
                T::string(),
            )),
        ),
        (
            "replace",
            mono(T::fun_n(
                vec![T::string(), T::string(), T::string()],
                T::string(),
            )),
        ),
        // ── Numeric conversions ─────────────────────────────────────
        ("toFloat", mono(T::fun(T::int(), T::float()))),
        ("toInt", mono(T::fun(T::float(), T::int()))),
        ("parseInt", mono(T::fun(T::string(), T::option(T::int())))),
        (
            "parseFloat",
            mono(T::fun(T::string(), T::option(T::float()))),
        ),
        ("abs", mono(T::fun(T::int(), T::int()))),
        ("absFloat", mono(T::fun(T::float(), T::float()))),
        ("round", mono(T::fun(T::float(), T::int()))),
        ("floor", mono(T::fun(T::float(), T::int()))),
        ("ceil", mono(T::fun(T::float(), T::int()))),
        ("sqrt", mono(T::fun(T::float(), T::float()))),
        ("min", mono(T::fun_n(vec![T::int(), T::int()], T::int()))),
        ("max", mono(T::fun_n(vec![T::int(), T::int()], T::int()))),
    ];

    for (name, scheme) in entries {
        env.insert_value(
            name,
            ValueBinding::Value {
                scheme,
                loc: builtin_loc(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unify::InferCtx;

    #[test]
    fn base_env_has_primitives_and_stdlib() {
        let env = base_env();
        for ty in ["Int", "Float", "String", "Bool", "Unit", "Ref"] {
            assert!(env.lookup_type(ty).is_some(), "missing type {ty}");
        }
        for value in ["ref", "map", "getOrElse", "toFloat", "split"] {
            assert!(env.lookup_value(value).is_some(), "missing value {value}");
        }
        for ctor in ["Some", "None", "Ok", "Err", "Cons", "Nil"] {
            assert!(env.lookup_ctor(ctor).is_some(), "missing ctor {ctor}");
        }
    }

    #[test]
    fn ref_scheme_is_polymorphic() {
        let env = base_env();
        let mut ctx = InferCtx::new();
        let scheme = env.lookup_value("ref").unwrap().scheme().clone();
        assert_eq!(scheme.vars.len(), 1);
        let inst = ctx.instantiate(&scheme);
        match inst {
            Type::Fun(params, ret) => {
                assert_eq!(params.len(), 1);
                assert!(matches!(*ret, Type::Ref(_)));
            }
            other => panic!("expected function type, got {other}"),
        }
    }

    #[test]
    fn constructors_are_first_class_functions() {
        let env = base_env();
        let some = env.lookup_value("Some").unwrap().scheme().clone();
        assert_eq!(some.vars.len(), 1);
        assert!(matches!(some.ty, Type::Fun(_, _)));
        let none = env.lookup_value("None").unwrap().scheme().clone();
        assert!(matches!(none.ty, Type::Variant { .. }));
    }

    #[test]
    fn list_ctor_table_is_recursive() {
        let env = base_env();
        let (params, ctors) = env.variant_ctors("List").unwrap();
        assert_eq!(params.len(), 1);
        let cons = ctors.iter().find(|(n, _)| n == "Cons").unwrap();
        assert_eq!(cons.1.len(), 2);
        assert!(matches!(&cons.1[1], Type::Variant { name, .. } if name == "List"));
    }
}
