//! Algorithm W inference engine.
//!
//! Walks the Core AST, generates constraints, and solves them through the
//! unification context. Implements Hindley-Milner inference with:
//! - Let-polymorphism (generalize + instantiate)
//! - Level-based generalization
//! - The syntactic value restriction
//! - Width-subtyped records and nominal variants
//! - Match exhaustiveness and reachability analysis
//! - Overloaded external resolution by arity and argument types
//!
//! Checking is fail-fast: the first error aborts the module. Warnings
//! accumulate in the collector the orchestrator provides.

use rustc_hash::FxHashMap;

use vibefun_ast::{
    BinaryOp, DeclKind, Expr, ExprKind, Module, NodeId, RecBinding, RecordEntry, TypeDecl,
    TypeDeclBody, TypeExpr, TypeExprKind, UnaryOp,
};
use vibefun_common::{suggest, Diagnostic, Location, WarningCollector};

use crate::builtins::base_env;
use crate::env::{
    CtorBinding, ExternalSig, TypeBinding, TypeDefKind, TypeEnv, ValueBinding,
};
use crate::exhaustiveness::{analyze_match, CtorSig, Pat, TypeInfoSource, TypeShape};
use crate::patterns::{check_pattern, unknown_ctor};
use crate::ty::{remap_with_types, Scheme, TyVar, Type};
use crate::unify::InferCtx;

/// A checked module: the inferred scheme of every top-level binding, the
/// type of every expression node, and the module's exports.
#[derive(Debug)]
pub struct TypedModule {
    /// Top-level value bindings in source order, schemes normalized.
    pub declaration_types: Vec<(String, Scheme)>,
    /// Fully resolved type of every expression node.
    pub node_types: FxHashMap<NodeId, Type>,
    pub exports: ModuleExports,
}

/// What a module exposes to its importers.
#[derive(Debug, Default, Clone)]
pub struct ModuleExports {
    pub names: Vec<String>,
    pub values: FxHashMap<String, Scheme>,
    pub types: FxHashMap<String, TypeBinding>,
    pub ctors: FxHashMap<String, CtorBinding>,
}

/// Bindings injected from other modules, keyed by local (aliased) name.
/// The orchestrator builds one per module from its dependencies' exports.
#[derive(Debug, Default, Clone)]
pub struct ImportContext {
    pub values: FxHashMap<String, ValueBinding>,
    pub types: FxHashMap<String, TypeBinding>,
    pub ctors: FxHashMap<String, CtorBinding>,
}

/// Type-check a standalone module.
pub fn typecheck(
    module: &Module,
    warnings: &mut WarningCollector,
) -> Result<TypedModule, Diagnostic> {
    typecheck_with_imports(module, &ImportContext::default(), warnings)
}

/// Type-check a module with bindings imported from its dependencies.
pub fn typecheck_with_imports(
    module: &Module,
    imports: &ImportContext,
    warnings: &mut WarningCollector,
) -> Result<TypedModule, Diagnostic> {
    let mut checker = Checker {
        ctx: InferCtx::new(),
        node_types: FxHashMap::default(),
        warnings,
    };
    checker.check_module(module, imports)
}

struct Checker<'w> {
    ctx: InferCtx,
    node_types: FxHashMap<NodeId, Type>,
    warnings: &'w mut WarningCollector,
}

impl Checker<'_> {
    // ── Module-level driver ─────────────────────────────────────────────

    fn check_module(
        mut self,
        module: &Module,
        imports: &ImportContext,
    ) -> Result<TypedModule, Diagnostic> {
        let mut env = base_env();
        for (name, binding) in &imports.values {
            env.insert_value(name.clone(), binding.clone());
        }
        for (name, binding) in &imports.types {
            env.insert_type(name.clone(), binding.clone());
        }
        for (name, binding) in &imports.ctors {
            env.insert_ctor(name.clone(), binding.clone());
        }

        self.register_type_declarations(module, &mut env)?;
        self.register_externals(module, &mut env)?;

        // Raw schemes carry unification variables until the whole module
        // is checked; normalization happens under the final substitution.
        let mut raw_declarations: Vec<(String, Scheme)> = Vec::new();
        let mut export_names: Vec<String> = Vec::new();

        for decl in &module.declarations {
            match &decl.kind {
                DeclKind::Let {
                    name,
                    mutable,
                    recursive,
                    value,
                } => {
                    let scheme = self.check_let_binding(
                        &env,
                        name,
                        *mutable,
                        *recursive,
                        value,
                        &decl.loc,
                    )?;
                    env.insert_value(
                        name.clone(),
                        ValueBinding::Value {
                            scheme: scheme.clone(),
                            loc: decl.loc.clone(),
                        },
                    );
                    raw_declarations.push((name.clone(), scheme));
                }
                DeclKind::LetGroup { bindings } => {
                    let schemes = self.check_rec_group(&env, bindings)?;
                    for (binding, scheme) in bindings.iter().zip(schemes) {
                        env.insert_value(
                            binding.name.clone(),
                            ValueBinding::Value {
                                scheme: scheme.clone(),
                                loc: binding.loc.clone(),
                            },
                        );
                        raw_declarations.push((binding.name.clone(), scheme));
                    }
                }
                DeclKind::Export { names } => {
                    export_names.extend(names.iter().cloned());
                }
                // Type and external declarations were handled in the
                // registration passes; imports and re-exports belong to
                // the module resolver.
                DeclKind::Type(_)
                | DeclKind::ExternalType { .. }
                | DeclKind::External { .. }
                | DeclKind::Import(_)
                | DeclKind::ReExport { .. } => {}
            }
        }

        let exports = self.collect_exports(&env, module, export_names)?;

        let mut declaration_types = Vec::with_capacity(raw_declarations.len());
        for (name, scheme) in raw_declarations {
            let normalized = normalize(&mut self.ctx, scheme);
            declaration_types.push((name, normalized));
        }

        let mut node_types = FxHashMap::default();
        for (id, ty) in std::mem::take(&mut self.node_types) {
            let resolved = self.ctx.resolve(ty);
            node_types.insert(id, resolved);
        }

        Ok(TypedModule {
            declaration_types,
            node_types,
            exports,
        })
    }

    /// Two-pass type-declaration processing: names and arities first so
    /// recursive and mutually recursive types resolve, then bodies.
    fn register_type_declarations(
        &mut self,
        module: &Module,
        env: &mut TypeEnv,
    ) -> Result<(), Diagnostic> {
        let mut declared: Vec<(&TypeDecl, &Location)> = Vec::new();
        for decl in &module.declarations {
            match &decl.kind {
                DeclKind::Type(td) => {
                    if declared.iter().any(|(d, _)| d.name == td.name) {
                        return Err(Diagnostic::new(
                            "VF4102",
                            decl.loc.clone(),
                            &[("name", td.name.clone())],
                        ));
                    }
                    env.insert_type(
                        td.name.clone(),
                        TypeBinding {
                            arity: td.params.len(),
                            kind: TypeDefKind::Opaque,
                            loc: decl.loc.clone(),
                        },
                    );
                    declared.push((td, &decl.loc));
                }
                DeclKind::ExternalType { name, params } => {
                    if env.lookup_type(name).is_some_and(|b| b.loc.file != "<builtin>") {
                        return Err(Diagnostic::new(
                            "VF4802",
                            decl.loc.clone(),
                            &[("name", name.clone())],
                        ));
                    }
                    env.insert_type(
                        name.clone(),
                        TypeBinding {
                            arity: params.len(),
                            kind: TypeDefKind::Opaque,
                            loc: decl.loc.clone(),
                        },
                    );
                }
                _ => {}
            }
        }

        // Pass 2: convert bodies against the now-complete name table.
        for (td, loc) in declared {
            let params: Vec<TyVar> = (0..td.params.len() as u32).map(TyVar).collect();
            let scope: FxHashMap<String, Type> = td
                .params
                .iter()
                .zip(&params)
                .map(|(n, v)| (n.clone(), Type::Var(*v)))
                .collect();
            let kind = match &td.body {
                TypeDeclBody::Alias(te) => TypeDefKind::Alias {
                    params: params.clone(),
                    body: self.convert_decl_type(env, te, &scope)?,
                },
                TypeDeclBody::Record(fields) => {
                    let mut converted = Vec::new();
                    for (name, te) in fields {
                        converted.push((name.clone(), self.convert_decl_type(env, te, &scope)?));
                    }
                    TypeDefKind::RecordDef {
                        params: params.clone(),
                        fields: converted,
                    }
                }
                TypeDeclBody::Variant(ctors) => {
                    let mut converted = Vec::new();
                    for (ctor, arg_tes) in ctors {
                        let mut args = Vec::new();
                        for te in arg_tes {
                            args.push(self.convert_decl_type(env, te, &scope)?);
                        }
                        converted.push((ctor.clone(), args));
                    }
                    TypeDefKind::VariantDef {
                        params: params.clone(),
                        ctors: converted,
                    }
                }
            };
            env.insert_type(
                td.name.clone(),
                TypeBinding {
                    arity: params.len(),
                    kind: kind.clone(),
                    loc: loc.clone(),
                },
            );

            // Variant constructors enter the value namespace as functions
            // and the constructor index for pattern sites.
            if let TypeDefKind::VariantDef { params, ctors } = kind {
                let result_ty = Type::Variant {
                    name: td.name.clone(),
                    args: params.iter().map(|p| Type::Var(*p)).collect(),
                };
                for (ctor, arg_types) in ctors {
                    env.insert_ctor(
                        ctor.clone(),
                        CtorBinding {
                            type_name: td.name.clone(),
                            params: params.clone(),
                            arg_types: arg_types.clone(),
                            loc: loc.clone(),
                        },
                    );
                    let fn_ty = if arg_types.is_empty() {
                        result_ty.clone()
                    } else {
                        Type::fun_n(arg_types, result_ty.clone())
                    };
                    env.insert_value(
                        ctor,
                        ValueBinding::Value {
                            scheme: Scheme {
                                vars: params.clone(),
                                ty: fn_ty,
                            },
                            loc: loc.clone(),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    /// Register external value declarations, grouping same-name externals
    /// into overload sets.
    fn register_externals(
        &mut self,
        module: &Module,
        env: &mut TypeEnv,
    ) -> Result<(), Diagnostic> {
        // Externals may only overload other externals; a let binding of
        // the same name anywhere in the module is a conflict.
        let let_names: Vec<&str> = module
            .declarations
            .iter()
            .flat_map(|d| match &d.kind {
                DeclKind::Let { name, .. } => vec![name.as_str()],
                DeclKind::LetGroup { bindings } => {
                    bindings.iter().map(|b| b.name.as_str()).collect()
                }
                _ => Vec::new(),
            })
            .collect();

        for decl in &module.declarations {
            let DeclKind::External {
                name,
                signature,
                js_name,
                from,
            } = &decl.kind
            else {
                continue;
            };

            if !is_valid_js_path(js_name) {
                return Err(Diagnostic::new(
                    "VF4803",
                    decl.loc.clone(),
                    &[("jsName", js_name.clone())],
                ));
            }
            if let_names.contains(&name.as_str()) {
                return Err(Diagnostic::new(
                    "VF4800",
                    decl.loc.clone(),
                    &[("name", name.clone())],
                ));
            }

            let scheme = self.convert_external_signature(env, signature)?;
            let sig = ExternalSig {
                scheme: scheme.clone(),
                js_name: js_name.clone(),
                from: from.clone(),
                loc: decl.loc.clone(),
            };

            let existing = env.lookup_value(name).cloned();
            match existing {
                None => env.insert_value(
                    name.clone(),
                    ValueBinding::External {
                        scheme,
                        js_name: js_name.clone(),
                        from: from.clone(),
                        loc: decl.loc.clone(),
                    },
                ),
                Some(ValueBinding::External {
                    scheme: first_scheme,
                    js_name: first_js,
                    from: first_from,
                    loc: first_loc,
                }) => {
                    let first = ExternalSig {
                        scheme: first_scheme,
                        js_name: first_js,
                        from: first_from,
                        loc: first_loc,
                    };
                    for s in [&first, &sig] {
                        if !matches!(s.scheme.ty, Type::Fun(_, _)) {
                            return Err(Diagnostic::new(
                                "VF4801",
                                s.loc.clone(),
                                &[("name", name.clone())],
                            ));
                        }
                    }
                    env.insert_value(
                        name.clone(),
                        ValueBinding::ExternalOverload {
                            overloads: vec![first, sig],
                            loc: decl.loc.clone(),
                        },
                    );
                }
                Some(ValueBinding::ExternalOverload { mut overloads, loc }) => {
                    if !matches!(sig.scheme.ty, Type::Fun(_, _)) {
                        return Err(Diagnostic::new(
                            "VF4801",
                            decl.loc.clone(),
                            &[("name", name.clone())],
                        ));
                    }
                    overloads.push(sig);
                    env.insert_value(
                        name.clone(),
                        ValueBinding::ExternalOverload { overloads, loc },
                    );
                }
                Some(ValueBinding::Value { .. }) => {
                    return Err(Diagnostic::new(
                        "VF4800",
                        decl.loc.clone(),
                        &[("name", name.clone())],
                    ));
                }
            }
        }
        Ok(())
    }

    fn collect_exports(
        &mut self,
        env: &TypeEnv,
        module: &Module,
        export_names: Vec<String>,
    ) -> Result<ModuleExports, Diagnostic> {
        let mut exports = ModuleExports::default();
        for name in export_names {
            let value = env.lookup_value(&name);
            let ty = env.lookup_type(&name);
            if value.is_none() && ty.is_none() {
                let loc = module.loc.clone();
                return Err(Diagnostic::new("VF4804", loc, &[("name", name)]));
            }
            if let Some(binding) = value {
                let scheme = binding.scheme().clone();
                exports
                    .values
                    .insert(name.clone(), normalize(&mut self.ctx, scheme));
            }
            if let Some(binding) = ty {
                exports.types.insert(name.clone(), binding.clone());
                if let TypeDefKind::VariantDef { ctors, .. } = &binding.kind {
                    for (ctor, _) in ctors {
                        if let Some(cb) = env.lookup_ctor(ctor) {
                            exports.ctors.insert(ctor.clone(), cb.clone());
                            if let Some(vb) = env.lookup_value(ctor) {
                                let scheme = vb.scheme().clone();
                                exports
                                    .values
                                    .insert(ctor.clone(), normalize(&mut self.ctx, scheme));
                            }
                        }
                    }
                }
            }
            exports.names.push(name);
        }
        Ok(exports)
    }

    // ── Let bindings ────────────────────────────────────────────────────

    /// Infer one let binding and produce its scheme, applying the value
    /// restriction and the mutable-binding rule.
    fn check_let_binding(
        &mut self,
        env: &TypeEnv,
        name: &str,
        mutable: bool,
        recursive: bool,
        value: &Expr,
        loc: &Location,
    ) -> Result<Scheme, Diagnostic> {
        self.ctx.enter_level();
        let rec_var = if recursive {
            let var = self.ctx.fresh_var();
            Some(var)
        } else {
            None
        };
        let rhs_env = match &rec_var {
            Some(var) => env.with_value(
                name,
                ValueBinding::Value {
                    scheme: Scheme::mono(var.clone()),
                    loc: loc.clone(),
                },
            ),
            None => env.clone(),
        };
        let inferred = self.infer_expr(&rhs_env, value)?;
        if let Some(var) = rec_var {
            if let Err(err) = self.ctx.unify(var.clone(), inferred.clone(), loc) {
                if err.code() == "VF4024" {
                    let expected = self.ctx.resolve(var);
                    let found = self.ctx.resolve(inferred.clone());
                    return Err(Diagnostic::new(
                        "VF4016",
                        loc.clone(),
                        &[
                            ("name", name.to_string()),
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
        }
        self.ctx.leave_level();

        // A mutable binding wraps its value in a reference cell; the cell
        // allocation is an application, so it is never generalized.
        if mutable {
            let cell = Type::reference(self.ctx.resolve(inferred));
            return Ok(Scheme::mono(cell));
        }
        if is_syntactic_value(value) {
            Ok(self.ctx.generalize(inferred))
        } else {
            Ok(Scheme::mono(self.ctx.resolve(inferred)))
        }
    }

    /// Infer a mutually-recursive binding group.
    fn check_rec_group(
        &mut self,
        env: &TypeEnv,
        bindings: &[RecBinding],
    ) -> Result<Vec<Scheme>, Diagnostic> {
        self.ctx.enter_level();
        let vars: Vec<Type> = bindings.iter().map(|_| self.ctx.fresh_var()).collect();
        let mut group_env = env.clone();
        for (binding, var) in bindings.iter().zip(&vars) {
            group_env.insert_value(
                binding.name.clone(),
                ValueBinding::Value {
                    scheme: Scheme::mono(var.clone()),
                    loc: binding.loc.clone(),
                },
            );
        }
        let mut inferred = Vec::new();
        for binding in bindings {
            inferred.push(self.infer_expr(&group_env, &binding.value)?);
        }
        for ((binding, var), ty) in bindings.iter().zip(&vars).zip(&inferred) {
            if let Err(err) = self.ctx.unify(var.clone(), ty.clone(), &binding.loc) {
                if err.code() == "VF4024" {
                    let expected = self.ctx.resolve(var.clone());
                    let found = self.ctx.resolve(ty.clone());
                    return Err(Diagnostic::new(
                        "VF4016",
                        binding.loc.clone(),
                        &[
                            ("name", binding.name.clone()),
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
        }
        self.ctx.leave_level();

        // The value restriction applies per binding.
        let mut schemes = Vec::new();
        for (binding, ty) in bindings.iter().zip(inferred) {
            if is_syntactic_value(&binding.value) {
                schemes.push(self.ctx.generalize(ty));
            } else {
                schemes.push(Scheme::mono(self.ctx.resolve(ty)));
            }
        }
        Ok(schemes)
    }

    // ── Expression dispatcher ───────────────────────────────────────────

    fn infer_expr(&mut self, env: &TypeEnv, e: &Expr) -> Result<Type, Diagnostic> {
        let ty = match &e.kind {
            ExprKind::IntLit(_) => Type::int(),
            ExprKind::FloatLit(_) => Type::float(),
            ExprKind::StringLit(_) => Type::string(),
            ExprKind::BoolLit(_) => Type::bool(),
            ExprKind::UnitLit => Type::unit(),

            ExprKind::Var(name) => self.infer_var(env, name, &e.loc)?,

            ExprKind::Lambda { param, body } => {
                let param_ty = self.ctx.fresh_var();
                let body_env = env.with_value(
                    param,
                    ValueBinding::Value {
                        scheme: Scheme::mono(param_ty.clone()),
                        loc: e.loc.clone(),
                    },
                );
                let body_ty = self.infer_expr(&body_env, body)?;
                Type::fun(self.ctx.resolve(param_ty), body_ty)
            }

            ExprKind::Apply { .. } => self.infer_apply(env, e)?,

            ExprKind::Let {
                name,
                mutable,
                recursive,
                value,
                body,
            } => {
                let scheme =
                    self.check_let_binding(env, name, *mutable, *recursive, value, &e.loc)?;
                let body_env = env.with_value(
                    name,
                    ValueBinding::Value {
                        scheme,
                        loc: e.loc.clone(),
                    },
                );
                self.infer_expr(&body_env, body)?
            }

            ExprKind::LetGroup { bindings, body } => {
                let schemes = self.check_rec_group(env, bindings)?;
                let mut body_env = env.clone();
                for (binding, scheme) in bindings.iter().zip(schemes) {
                    body_env.insert_value(
                        binding.name.clone(),
                        ValueBinding::Value {
                            scheme,
                            loc: binding.loc.clone(),
                        },
                    );
                }
                self.infer_expr(&body_env, body)?
            }

            ExprKind::Binary { op, lhs, rhs } => self.infer_binary(env, *op, lhs, rhs, &e.loc)?,
            ExprKind::Unary { op, operand } => self.infer_unary(env, *op, operand, &e.loc)?,

            ExprKind::Record { entries } => self.infer_record(env, entries)?,
            ExprKind::FieldAccess { base, field } => {
                self.infer_field_access(env, base, field, &e.loc)?
            }
            ExprKind::RecordUpdate { base, updates } => {
                self.infer_record_update(env, base, updates, &e.loc)?
            }

            ExprKind::Variant { ctor, args } => self.infer_variant(env, ctor, args, &e.loc)?,

            ExprKind::Match { scrutinee, cases } => {
                self.infer_match(env, scrutinee, cases, &e.loc)?
            }

            ExprKind::Annotated { expr, ty } => {
                let inferred = self.infer_expr(env, expr)?;
                let annotation = self.convert_annotation(env, ty)?;
                if let Err(err) =
                    self.ctx
                        .unify_expected(annotation.clone(), inferred.clone(), &e.loc)
                {
                    if err.code() == "VF4024" || err.code() == "VF4025" {
                        let expected = self.ctx.resolve(annotation);
                        let found = self.ctx.resolve(inferred);
                        return Err(Diagnostic::new(
                            "VF4004",
                            e.loc.clone(),
                            &[
                                ("expected", expected.to_string()),
                                ("found", found.to_string()),
                            ],
                        ));
                    }
                    return Err(err);
                }
                self.ctx.resolve(annotation)
            }

            // `unsafe` marks code for the generator; types flow through.
            ExprKind::Unsafe { body } => self.infer_expr(env, body)?,

            ExprKind::Tuple { elems } => {
                let mut tys = Vec::new();
                for elem in elems {
                    tys.push(self.infer_expr(env, elem)?);
                }
                Type::Tuple(tys)
            }
        };
        self.node_types.insert(e.id, ty.clone());
        Ok(ty)
    }

    fn infer_var(&mut self, env: &TypeEnv, name: &str, loc: &Location) -> Result<Type, Diagnostic> {
        match env.lookup_value(name) {
            Some(binding) => {
                let scheme = binding.scheme().clone();
                Ok(self.ctx.instantiate(&scheme))
            }
            None => {
                let suggestion = suggest::closest(name, env.value_names());
                let diag = Diagnostic::new(
                    "VF4100",
                    loc.clone(),
                    &[
                        ("name", name.to_string()),
                        ("suggestion", suggestion.unwrap_or_default().to_string()),
                    ],
                );
                Err(match suggestion {
                    Some(_) => diag,
                    None => diag.without_hint(),
                })
            }
        }
    }

    // ── Application ─────────────────────────────────────────────────────

    fn infer_apply(&mut self, env: &TypeEnv, e: &Expr) -> Result<Type, Diagnostic> {
        // Collect the application spine so overloaded externals can be
        // narrowed by the full argument list.
        let mut spine_nodes: Vec<(&Expr, &Expr)> = Vec::new(); // (apply node, arg)
        let mut head = e;
        while let ExprKind::Apply { func, arg } = &head.kind {
            spine_nodes.push((head, arg));
            head = func;
        }
        spine_nodes.reverse();

        if let ExprKind::Var(name) = &head.kind {
            if let Some(ValueBinding::ExternalOverload { overloads, .. }) = env.lookup_value(name)
            {
                let overloads = overloads.clone();
                return self.infer_overloaded_call(env, name, &overloads, head, &spine_nodes);
            }
        }

        // Ordinary nested application: recurse on the function side, then
        // constrain with a fresh result variable.
        let ExprKind::Apply { func, arg } = &e.kind else {
            unreachable!("infer_apply called on non-application");
        };
        let fun_ty = self.infer_expr(env, func)?;
        let arg_ty = self.infer_expr(env, arg)?;
        let resolved_fun = self.ctx.resolve(fun_ty);
        match &resolved_fun {
            Type::Fun(_, _) | Type::Var(_) => {}
            Type::Never => return Ok(self.ctx.fresh_var()),
            other => {
                return Err(Diagnostic::new(
                    "VF4202",
                    e.loc.clone(),
                    &[("found", other.to_string())],
                ));
            }
        }
        let result = self.ctx.fresh_var();
        if let Err(err) = self.ctx.unify(
            resolved_fun.clone(),
            Type::fun(arg_ty.clone(), result.clone()),
            &e.loc,
        ) {
            if err.code() == "VF4024" || err.code() == "VF4025" || err.code() == "VF4501" {
                if let Type::Fun(params, _) = &resolved_fun {
                    let expected = self.ctx.resolve(params[0].clone());
                    let found = self.ctx.resolve(arg_ty);
                    return Err(Diagnostic::new(
                        "VF4005",
                        e.loc.clone(),
                        &[
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
            }
            return Err(err);
        }
        Ok(self.ctx.resolve(result))
    }

    /// Resolve a call to an overloaded external: narrow by arity, then try
    /// the remaining candidates in declaration order against the inferred
    /// argument types. Exactly one survivor wins.
    fn infer_overloaded_call(
        &mut self,
        env: &TypeEnv,
        name: &str,
        overloads: &[ExternalSig],
        head: &Expr,
        spine: &[(&Expr, &Expr)],
    ) -> Result<Type, Diagnostic> {
        let loc = &spine.last().expect("spine is non-empty").0.loc;
        let mut arg_tys = Vec::new();
        for (_, arg) in spine {
            arg_tys.push(self.infer_expr(env, arg)?);
        }

        let mut survivors: Vec<usize> = Vec::new();
        for (i, candidate) in overloads.iter().enumerate() {
            let snapshot = self.ctx.snapshot();
            let inst = self.ctx.instantiate(&candidate.scheme);
            let fits = match peel_params(&inst, arg_tys.len()) {
                Some((params, _)) => params
                    .iter()
                    .zip(&arg_tys)
                    .all(|(p, a)| self.ctx.unify(p.clone(), a.clone(), loc).is_ok()),
                None => false,
            };
            self.ctx.rollback_to(snapshot);
            if fits {
                survivors.push(i);
            }
        }

        match survivors.len() {
            0 => {
                let candidates = overloads
                    .iter()
                    .map(|o| o.scheme.ty.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(Diagnostic::new(
                    "VF4201",
                    loc.clone(),
                    &[("name", name.to_string()), ("candidates", candidates)],
                ))
            }
            1 => {
                let winner = &overloads[survivors[0]];
                let inst = self.ctx.instantiate(&winner.scheme);
                let (params, ret) = peel_params(&inst, arg_tys.len())
                    .expect("winning candidate peels by construction");
                for (p, a) in params.iter().zip(&arg_tys) {
                    self.ctx.unify(p.clone(), a.clone(), loc)?;
                }
                // Record types along the spine: the head gets the chosen
                // signature, each application node its remaining type.
                self.node_types.insert(head.id, inst.clone());
                let mut remaining = inst;
                for (apply_node, _) in spine {
                    let Type::Fun(_, ret) = remaining else {
                        unreachable!("peel succeeded above");
                    };
                    remaining = *ret;
                    self.node_types.insert(apply_node.id, remaining.clone());
                }
                Ok(self.ctx.resolve(ret))
            }
            _ => Err(Diagnostic::new(
                "VF4205",
                loc.clone(),
                &[("name", name.to_string())],
            )),
        }
    }

    // ── Operators ───────────────────────────────────────────────────────

    fn infer_binary(
        &mut self,
        env: &TypeEnv,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        use BinaryOp::*;
        let lhs_ty = self.infer_expr(env, lhs)?;
        let rhs_ty = self.infer_expr(env, rhs)?;

        match op {
            Add | Sub | Mul | IntDivide | FloatDivide | Mod => {
                let target = self.numeric_target(op, &lhs_ty, &rhs_ty, loc)?;
                self.unify_numeric(op, lhs_ty, target.clone(), loc)?;
                self.unify_numeric(op, rhs_ty, target.clone(), loc)?;
                Ok(target)
            }
            Lt | Le | Gt | Ge => {
                let target = self.numeric_target(op, &lhs_ty, &rhs_ty, loc)?;
                self.unify_numeric(op, lhs_ty, target.clone(), loc)?;
                self.unify_numeric(op, rhs_ty, target, loc)?;
                Ok(Type::bool())
            }
            Eq | Neq => {
                let shared = self.ctx.fresh_var();
                let left = self.ctx.resolve(lhs_ty.clone());
                let right = self.ctx.resolve(rhs_ty.clone());
                let unify_side = |checker: &mut Self, side: Type| {
                    checker.ctx.unify(side, shared.clone(), loc)
                };
                if unify_side(self, lhs_ty).is_err() || unify_side(self, rhs_ty).is_err() {
                    return Err(Diagnostic::new(
                        "VF4006",
                        loc.clone(),
                        &[
                            ("op", op.symbol().to_string()),
                            ("left", left.to_string()),
                            ("right", right.to_string()),
                        ],
                    ));
                }
                Ok(Type::bool())
            }
            And | Or => {
                for side in [lhs_ty, rhs_ty] {
                    let found = self.ctx.resolve(side.clone());
                    if self.ctx.unify(side, Type::bool(), loc).is_err() {
                        return Err(Diagnostic::new(
                            "VF4009",
                            loc.clone(),
                            &[
                                ("op", op.symbol().to_string()),
                                ("found", found.to_string()),
                            ],
                        ));
                    }
                }
                Ok(Type::bool())
            }
            Concat => {
                for side in [lhs_ty, rhs_ty] {
                    let found = self.ctx.resolve(side.clone());
                    if self.ctx.unify(side, Type::string(), loc).is_err() {
                        return Err(Diagnostic::new(
                            "VF4010",
                            loc.clone(),
                            &[("found", found.to_string())],
                        ));
                    }
                }
                Ok(Type::string())
            }
            Cons => {
                let elem = self.ctx.fresh_var();
                self.ctx.unify(lhs_ty.clone(), elem.clone(), loc)?;
                let list_ty = Type::list(elem);
                if self.ctx.unify(rhs_ty.clone(), list_ty.clone(), loc).is_err() {
                    let found = self.ctx.resolve(lhs_ty);
                    let expected = self.ctx.resolve(rhs_ty);
                    return Err(Diagnostic::new(
                        "VF4011",
                        loc.clone(),
                        &[
                            ("found", found.to_string()),
                            ("expected", expected.to_string()),
                        ],
                    ));
                }
                Ok(self.ctx.resolve(list_ty))
            }
            RefAssign => {
                let cell = self.ctx.fresh_var();
                if self
                    .ctx
                    .unify(lhs_ty.clone(), Type::reference(cell.clone()), loc)
                    .is_err()
                {
                    let found = self.ctx.resolve(lhs_ty);
                    return Err(Diagnostic::new(
                        "VF4701",
                        loc.clone(),
                        &[("found", found.to_string())],
                    ));
                }
                if self.ctx.unify(rhs_ty.clone(), cell.clone(), loc).is_err() {
                    let expected = self.ctx.resolve(cell);
                    let found = self.ctx.resolve(rhs_ty);
                    return Err(Diagnostic::new(
                        "VF4012",
                        loc.clone(),
                        &[
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                Ok(Type::unit())
            }
        }
    }

    /// Pick `Int` or `Float` for a numeric operator. `Int` is the default
    /// unless type-directed evidence (or the operator itself) says
    /// `Float`; mixing the two is never allowed.
    fn numeric_target(
        &mut self,
        op: BinaryOp,
        lhs: &Type,
        rhs: &Type,
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        let left = self.ctx.resolve(lhs.clone());
        let right = self.ctx.resolve(rhs.clone());
        if left.is_numeric() && right.is_numeric() && left.is_float() != right.is_float() {
            return Err(Diagnostic::new(
                "VF4008",
                loc.clone(),
                &[("op", op.symbol().to_string())],
            ));
        }
        match op {
            BinaryOp::IntDivide => Ok(Type::int()),
            BinaryOp::FloatDivide => Ok(Type::float()),
            _ if left.is_float() || right.is_float() => Ok(Type::float()),
            _ => Ok(Type::int()),
        }
    }

    fn unify_numeric(
        &mut self,
        op: BinaryOp,
        side: Type,
        target: Type,
        loc: &Location,
    ) -> Result<(), Diagnostic> {
        let found = self.ctx.resolve(side.clone());
        if self.ctx.unify(side, target, loc).is_err() {
            return Err(Diagnostic::new(
                "VF4007",
                loc.clone(),
                &[
                    ("op", op.symbol().to_string()),
                    ("found", found.to_string()),
                ],
            ));
        }
        Ok(())
    }

    fn infer_unary(
        &mut self,
        env: &TypeEnv,
        op: UnaryOp,
        operand: &Expr,
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        let operand_ty = self.infer_expr(env, operand)?;
        match op {
            UnaryOp::Negate => {
                let resolved = self.ctx.resolve(operand_ty.clone());
                let target = if resolved.is_float() {
                    Type::float()
                } else {
                    Type::int()
                };
                if self.ctx.unify(operand_ty, target.clone(), loc).is_err() {
                    return Err(Diagnostic::new(
                        "VF4014",
                        loc.clone(),
                        &[("found", resolved.to_string())],
                    ));
                }
                Ok(target)
            }
            UnaryOp::LogicalNot => {
                let resolved = self.ctx.resolve(operand_ty.clone());
                if self.ctx.unify(operand_ty, Type::bool(), loc).is_err() {
                    return Err(Diagnostic::new(
                        "VF4015",
                        loc.clone(),
                        &[("found", resolved.to_string())],
                    ));
                }
                Ok(Type::bool())
            }
            UnaryOp::Deref => {
                let inner = self.ctx.fresh_var();
                let resolved = self.ctx.resolve(operand_ty.clone());
                if self
                    .ctx
                    .unify(operand_ty, Type::reference(inner.clone()), loc)
                    .is_err()
                {
                    return Err(Diagnostic::new(
                        "VF4700",
                        loc.clone(),
                        &[("found", resolved.to_string())],
                    ));
                }
                Ok(self.ctx.resolve(inner))
            }
        }
    }

    // ── Records ─────────────────────────────────────────────────────────

    fn infer_record(
        &mut self,
        env: &TypeEnv,
        entries: &[RecordEntry],
    ) -> Result<Type, Diagnostic> {
        let mut fields: std::collections::BTreeMap<String, Type> = Default::default();
        for entry in entries {
            match entry {
                RecordEntry::Spread { value } => {
                    let spread_ty = self.infer_expr(env, value)?;
                    match self.ctx.resolve(spread_ty) {
                        Type::Record(spread_fields) => {
                            for (k, v) in spread_fields {
                                fields.insert(k, v);
                            }
                        }
                        other => {
                            return Err(Diagnostic::new(
                                "VF4013",
                                value.loc.clone(),
                                &[("found", other.to_string())],
                            ));
                        }
                    }
                }
                RecordEntry::Field { name, value } => {
                    let value_ty = self.infer_expr(env, value)?;
                    fields.insert(name.clone(), value_ty);
                }
            }
        }
        Ok(Type::Record(fields))
    }

    fn infer_field_access(
        &mut self,
        env: &TypeEnv,
        base: &Expr,
        field: &str,
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        let base_ty = self.infer_expr(env, base)?;
        match self.ctx.resolve(base_ty) {
            // Accessing a field of an unresolved type constrains it to a
            // minimal one-field record; width subtyping absorbs wider
            // actual records later.
            var @ Type::Var(_) => {
                let field_ty = self.ctx.fresh_var();
                let mut fields = std::collections::BTreeMap::new();
                fields.insert(field.to_string(), field_ty.clone());
                self.ctx.unify(var, Type::Record(fields), loc)?;
                Ok(field_ty)
            }
            Type::Record(fields) => match fields.get(field) {
                Some(ty) => Ok(ty.clone()),
                None => Err(Diagnostic::new(
                    "VF4501",
                    loc.clone(),
                    &[
                        ("record", Type::Record(fields.clone()).to_string()),
                        ("field", field.to_string()),
                    ],
                )),
            },
            other => Err(Diagnostic::new(
                "VF4500",
                loc.clone(),
                &[("found", other.to_string())],
            )),
        }
    }

    fn infer_record_update(
        &mut self,
        env: &TypeEnv,
        base: &Expr,
        updates: &[(String, Expr)],
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        let base_ty = self.infer_expr(env, base)?;
        let fields = match self.ctx.resolve(base_ty) {
            Type::Record(fields) => fields,
            other => {
                return Err(Diagnostic::new(
                    "VF4502",
                    loc.clone(),
                    &[("found", other.to_string())],
                ));
            }
        };
        for (name, value) in updates {
            let Some(field_ty) = fields.get(name).cloned() else {
                return Err(Diagnostic::new(
                    "VF4501",
                    value.loc.clone(),
                    &[
                        ("record", Type::Record(fields.clone()).to_string()),
                        ("field", name.clone()),
                    ],
                ));
            };
            let value_ty = self.infer_expr(env, value)?;
            if let Err(err) = self.ctx.unify(field_ty.clone(), value_ty.clone(), &value.loc) {
                if err.code() == "VF4024" {
                    let expected = self.ctx.resolve(field_ty);
                    let found = self.ctx.resolve(value_ty);
                    return Err(Diagnostic::new(
                        "VF4001",
                        value.loc.clone(),
                        &[
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
        }
        Ok(Type::Record(fields))
    }

    // ── Variants ────────────────────────────────────────────────────────

    fn infer_variant(
        &mut self,
        env: &TypeEnv,
        ctor: &str,
        args: &[Expr],
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
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

        let mapping: FxHashMap<TyVar, Type> = binding
            .params
            .iter()
            .map(|p| (*p, self.ctx.fresh_var()))
            .collect();
        for (arg, arg_ty) in args.iter().zip(&binding.arg_types) {
            let expected = remap_with_types(arg_ty, &mapping);
            let inferred = self.infer_expr(env, arg)?;
            if let Err(err) = self
                .ctx
                .unify_expected(expected.clone(), inferred.clone(), &arg.loc)
            {
                if err.code() == "VF4024" || err.code() == "VF4025" {
                    let expected = self.ctx.resolve(expected);
                    let found = self.ctx.resolve(inferred);
                    return Err(Diagnostic::new(
                        "VF4005",
                        arg.loc.clone(),
                        &[
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
        }
        Ok(Type::Variant {
            name: binding.type_name.clone(),
            args: binding
                .params
                .iter()
                .map(|p| self.ctx.resolve(mapping[p].clone()))
                .collect(),
        })
    }

    // ── Match ───────────────────────────────────────────────────────────

    fn infer_match(
        &mut self,
        env: &TypeEnv,
        scrutinee: &Expr,
        cases: &[vibefun_ast::MatchCase],
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        let scrutinee_ty = self.infer_expr(env, scrutinee)?;
        let result = self.ctx.fresh_var();
        let mut rows: Vec<(Pat, bool)> = Vec::new();

        for case in cases {
            let (bindings, abs) =
                check_pattern(&mut self.ctx, env, &case.pattern, &scrutinee_ty)?;
            let mut case_env = env.clone();
            for (name, ty) in bindings {
                case_env.insert_value(
                    name,
                    ValueBinding::Value {
                        scheme: Scheme::mono(ty),
                        loc: case.pattern.loc.clone(),
                    },
                );
            }
            if let Some(guard) = &case.guard {
                let guard_ty = self.infer_expr(&case_env, guard)?;
                let found = self.ctx.resolve(guard_ty.clone());
                if self.ctx.unify(guard_ty, Type::bool(), &guard.loc).is_err() {
                    return Err(Diagnostic::new(
                        "VF4401",
                        guard.loc.clone(),
                        &[("found", found.to_string())],
                    ));
                }
            }
            let body_ty = self.infer_expr(&case_env, &case.body)?;
            if let Err(err) = self.ctx.unify(result.clone(), body_ty.clone(), &case.body.loc) {
                if err.code() == "VF4024" || err.code() == "VF4025" {
                    let expected = self.ctx.resolve(result);
                    let found = self.ctx.resolve(body_ty);
                    return Err(Diagnostic::new(
                        "VF4002",
                        case.body.loc.clone(),
                        &[
                            ("expected", expected.to_string()),
                            ("found", found.to_string()),
                        ],
                    ));
                }
                return Err(err);
            }
            rows.push((abs, case.guard.is_some()));
        }

        // Exhaustiveness runs under the final substitution for this match.
        let resolved_scrutinee = self.ctx.resolve(scrutinee_ty);
        let mut shapes = ShapeSource { env };
        let analysis = analyze_match(&rows, &resolved_scrutinee, &mut shapes);
        if !analysis.missing.is_empty() {
            return Err(Diagnostic::new(
                "VF4400",
                loc.clone(),
                &[("missing", analysis.missing.join(", "))],
            ));
        }
        for index in analysis.unreachable {
            self.warnings.add(Diagnostic::new(
                "VF4900",
                cases[index].pattern.loc.clone(),
                &[],
            ));
        }
        Ok(self.ctx.resolve(result))
    }

    // ── Annotations ─────────────────────────────────────────────────────

    /// Convert an expression-site annotation. Lowercase names denote
    /// implicitly scoped type variables, fresh per annotation.
    fn convert_annotation(&mut self, env: &TypeEnv, te: &TypeExpr) -> Result<Type, Diagnostic> {
        let mut scope: FxHashMap<String, Type> = FxHashMap::default();
        self.convert_type_expr(env, te, &mut scope, true)
    }

    /// Convert a declaration-site type expression where `scope` fixes the
    /// declared parameters and unknown lowercase names are errors.
    fn convert_decl_type(
        &mut self,
        env: &TypeEnv,
        te: &TypeExpr,
        scope: &FxHashMap<String, Type>,
    ) -> Result<Type, Diagnostic> {
        let mut scope = scope.clone();
        self.convert_type_expr(env, te, &mut scope, false)
    }

    /// Convert an external signature, implicitly quantifying its lowercase
    /// names into a scheme.
    fn convert_external_signature(
        &mut self,
        env: &TypeEnv,
        te: &TypeExpr,
    ) -> Result<Scheme, Diagnostic> {
        let mut scope: FxHashMap<String, Type> = FxHashMap::default();
        let mut placeholders: Vec<TyVar> = Vec::new();
        let ty = self.convert_type_expr_with(env, te, &mut |name| {
            if let Some(existing) = scope.get(name) {
                return Ok(existing.clone());
            }
            let var = TyVar(placeholders.len() as u32);
            placeholders.push(var);
            let ty = Type::Var(var);
            scope.insert(name.to_string(), ty.clone());
            Ok(ty)
        })?;
        Ok(Scheme {
            vars: placeholders,
            ty,
        })
    }

    fn convert_type_expr(
        &mut self,
        env: &TypeEnv,
        te: &TypeExpr,
        scope: &mut FxHashMap<String, Type>,
        fresh_unknowns: bool,
    ) -> Result<Type, Diagnostic> {
        match &te.kind {
            TypeExprKind::Name { name, args } if is_type_param_name(name) => {
                if !args.is_empty() {
                    return Err(Diagnostic::new(
                        "VF4103",
                        te.loc.clone(),
                        &[
                            ("name", name.clone()),
                            ("expected", "0".to_string()),
                            ("found", args.len().to_string()),
                        ],
                    ));
                }
                if let Some(existing) = scope.get(name) {
                    return Ok(existing.clone());
                }
                if fresh_unknowns {
                    let fresh = self.ctx.fresh_var();
                    scope.insert(name.clone(), fresh.clone());
                    return Ok(fresh);
                }
                Err(Diagnostic::new(
                    "VF4101",
                    te.loc.clone(),
                    &[("name", name.clone()), ("suggestion", String::new())],
                )
                .without_hint())
            }
            TypeExprKind::Name { name, args } => {
                let mut converted = Vec::new();
                for arg in args {
                    converted.push(self.convert_type_expr(env, arg, scope, fresh_unknowns)?);
                }
                self.resolve_type_name(env, name, converted, &te.loc)
            }
            TypeExprKind::Fun { param, ret } => {
                let param = self.convert_type_expr(env, param, scope, fresh_unknowns)?;
                let ret = self.convert_type_expr(env, ret, scope, fresh_unknowns)?;
                Ok(Type::fun(param, ret))
            }
            TypeExprKind::Record { fields } => {
                let mut converted = std::collections::BTreeMap::new();
                for (name, field_te) in fields {
                    converted.insert(
                        name.clone(),
                        self.convert_type_expr(env, field_te, scope, fresh_unknowns)?,
                    );
                }
                Ok(Type::Record(converted))
            }
            TypeExprKind::Tuple { elems } => {
                let mut converted = Vec::new();
                for elem in elems {
                    converted.push(self.convert_type_expr(env, elem, scope, fresh_unknowns)?);
                }
                Ok(Type::Tuple(converted))
            }
            TypeExprKind::Ref { inner } => {
                let inner = self.convert_type_expr(env, inner, scope, fresh_unknowns)?;
                Ok(Type::reference(inner))
            }
            TypeExprKind::Union { members } => {
                let mut converted = Vec::new();
                for member in members {
                    converted.push(self.convert_type_expr(env, member, scope, fresh_unknowns)?);
                }
                Ok(Type::Union(converted))
            }
        }
    }

    /// Variant of conversion used for external signatures, where the
    /// lowercase-name handler is supplied by the caller.
    fn convert_type_expr_with(
        &mut self,
        env: &TypeEnv,
        te: &TypeExpr,
        on_param: &mut dyn FnMut(&str) -> Result<Type, Diagnostic>,
    ) -> Result<Type, Diagnostic> {
        match &te.kind {
            TypeExprKind::Name { name, args } if is_type_param_name(name) => {
                if !args.is_empty() {
                    return Err(Diagnostic::new(
                        "VF4103",
                        te.loc.clone(),
                        &[
                            ("name", name.clone()),
                            ("expected", "0".to_string()),
                            ("found", args.len().to_string()),
                        ],
                    ));
                }
                on_param(name)
            }
            TypeExprKind::Name { name, args } => {
                let mut converted = Vec::new();
                for arg in args {
                    converted.push(self.convert_type_expr_with(env, arg, on_param)?);
                }
                self.resolve_type_name(env, name, converted, &te.loc)
            }
            TypeExprKind::Fun { param, ret } => {
                let param = self.convert_type_expr_with(env, param, on_param)?;
                let ret = self.convert_type_expr_with(env, ret, on_param)?;
                Ok(Type::fun(param, ret))
            }
            TypeExprKind::Record { fields } => {
                let mut converted = std::collections::BTreeMap::new();
                for (name, field_te) in fields {
                    converted
                        .insert(name.clone(), self.convert_type_expr_with(env, field_te, on_param)?);
                }
                Ok(Type::Record(converted))
            }
            TypeExprKind::Tuple { elems } => {
                let mut converted = Vec::new();
                for elem in elems {
                    converted.push(self.convert_type_expr_with(env, elem, on_param)?);
                }
                Ok(Type::Tuple(converted))
            }
            TypeExprKind::Ref { inner } => {
                let inner = self.convert_type_expr_with(env, inner, on_param)?;
                Ok(Type::reference(inner))
            }
            TypeExprKind::Union { members } => {
                let mut converted = Vec::new();
                for member in members {
                    converted.push(self.convert_type_expr_with(env, member, on_param)?);
                }
                Ok(Type::Union(converted))
            }
        }
    }

    fn resolve_type_name(
        &mut self,
        env: &TypeEnv,
        name: &str,
        args: Vec<Type>,
        loc: &Location,
    ) -> Result<Type, Diagnostic> {
        let Some(binding) = env.lookup_type(name) else {
            let suggestion = suggest::closest(name, env.type_names());
            let diag = Diagnostic::new(
                "VF4101",
                loc.clone(),
                &[
                    ("name", name.to_string()),
                    ("suggestion", suggestion.unwrap_or_default().to_string()),
                ],
            );
            return Err(match suggestion {
                Some(_) => diag,
                None => diag.without_hint(),
            });
        };
        if binding.arity != args.len() {
            return Err(Diagnostic::new(
                "VF4103",
                loc.clone(),
                &[
                    ("name", name.to_string()),
                    ("expected", binding.arity.to_string()),
                    ("found", args.len().to_string()),
                ],
            ));
        }
        match &binding.kind {
            TypeDefKind::Opaque => {
                if name == "Ref" {
                    let inner = args.into_iter().next().expect("Ref has arity 1");
                    Ok(Type::Ref(Box::new(inner)))
                } else if name == "Never" {
                    Ok(Type::Never)
                } else if args.is_empty() {
                    Ok(Type::Con(crate::ty::TyCon::new(name)))
                } else {
                    Ok(Type::App(
                        Box::new(Type::Con(crate::ty::TyCon::new(name))),
                        args,
                    ))
                }
            }
            TypeDefKind::Alias { params, body } => {
                let mapping: FxHashMap<TyVar, Type> =
                    params.iter().copied().zip(args).collect();
                Ok(remap_with_types(body, &mapping))
            }
            TypeDefKind::RecordDef { params, fields } => {
                let mapping: FxHashMap<TyVar, Type> =
                    params.iter().copied().zip(args).collect();
                Ok(Type::Record(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), remap_with_types(v, &mapping)))
                        .collect(),
                ))
            }
            TypeDefKind::VariantDef { .. } => Ok(Type::Variant {
                name: name.to_string(),
                args,
            }),
        }
    }
}

/// Shape oracle over the environment's declared variants, used by the
/// exhaustiveness analysis.
struct ShapeSource<'a> {
    env: &'a TypeEnv,
}

impl TypeInfoSource for ShapeSource<'_> {
    fn shape_of(&mut self, ty: &Type) -> TypeShape {
        match ty {
            Type::Variant { name, args } => match self.env.variant_ctors(name) {
                Some((params, ctors)) => {
                    let mapping: FxHashMap<TyVar, Type> =
                        params.iter().copied().zip(args.iter().cloned()).collect();
                    TypeShape::Variant {
                        ctors: ctors
                            .iter()
                            .map(|(ctor, arg_types)| CtorSig {
                                name: ctor.clone(),
                                arg_types: arg_types
                                    .iter()
                                    .map(|t| remap_with_types(t, &mapping))
                                    .collect(),
                            })
                            .collect(),
                    }
                }
                None => TypeShape::Open,
            },
            Type::Con(c) if c.name == "Bool" => TypeShape::Bool,
            Type::Con(c) if c.name == "Unit" => TypeShape::Unit,
            Type::Tuple(elems) => TypeShape::Tuple(elems.clone()),
            Type::Record(fields) => TypeShape::Record(
                fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ),
            _ => TypeShape::Open,
        }
    }
}

/// The syntactic value predicate of the value restriction: literals,
/// variables, lambdas, bare constructor references, record/tuple literals
/// of values, and annotated values. Everything else -- applications
/// (including `ref(x)`), matches, record accesses and updates -- is not a
/// value and must not be generalized.
pub fn is_syntactic_value(e: &Expr) -> bool {
    match &e.kind {
        ExprKind::IntLit(_)
        | ExprKind::FloatLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::UnitLit
        | ExprKind::Var(_)
        | ExprKind::Lambda { .. } => true,
        ExprKind::Variant { args, .. } => args.is_empty(),
        ExprKind::Record { entries } => entries.iter().all(|entry| match entry {
            RecordEntry::Field { value, .. } => is_syntactic_value(value),
            RecordEntry::Spread { .. } => false,
        }),
        ExprKind::Tuple { elems } => elems.iter().all(is_syntactic_value),
        ExprKind::Annotated { expr, .. } => is_syntactic_value(expr),
        _ => false,
    }
}

/// Peel `n` curried parameters off a function type.
fn peel_params(ty: &Type, n: usize) -> Option<(Vec<Type>, Type)> {
    let mut params = Vec::with_capacity(n);
    let mut current = ty.clone();
    for _ in 0..n {
        match current {
            Type::Fun(mut ps, ret) => {
                params.push(ps.remove(0));
                current = *ret;
            }
            _ => return None,
        }
    }
    Some((params, current))
}

/// A dotted path of JavaScript identifiers.
fn is_valid_js_path(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}

fn is_type_param_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// Resolve and alpha-normalize a scheme for storage in module outputs.
///
/// A monomorphic scheme stays monomorphic: residual unification variables
/// in a value-restricted binding must not become quantifiers, or an
/// importer could instantiate them freshly and defeat the restriction.
fn normalize(ctx: &mut InferCtx, scheme: Scheme) -> Scheme {
    let resolved = ctx.resolve(scheme.ty);
    if scheme.vars.is_empty() {
        return Scheme::mono(resolved);
    }
    Scheme::normalize_from_type(resolved)
}
