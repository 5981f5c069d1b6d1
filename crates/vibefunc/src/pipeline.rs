//! The compilation pipeline.
//!
//! Drives load -> resolve -> type-check for a module universe:
//!
//! 1. Load and parse every reachable module, building the dependency
//!    graph (errors across the whole graph are collected, not fail-fast).
//! 2. Run cycle detection; self-imports are hard errors, value cycles
//!    warn and compilation proceeds.
//! 3. Type-check modules in topological order, feeding each module the
//!    exports of its dependencies, with one shared warning collector.
//!
//! Code generation consumes the resulting typed modules; it is a separate
//! collaborator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use vibefun_common::{Diagnostic, WarningCollector};
use vibefun_modules::{
    find_config, load_and_resolve_modules, resolve_import, LoadedConfig, LoadedModule,
    ModuleParser, ModuleResolution,
};
use vibefun_typeck::{typecheck_with_imports, ImportContext, ModuleExports, TypedModule};

/// A fully compiled program: the resolution plus every typed module in
/// compilation order.
#[derive(Debug)]
pub struct CompiledProgram {
    pub resolution: ModuleResolution,
    pub typed_modules: Vec<(PathBuf, TypedModule)>,
    pub warnings: Vec<Diagnostic>,
}

/// A failed compilation: everything that went wrong, plus any warnings
/// accumulated before the failure.
#[derive(Debug)]
pub struct CompileFailure {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Compile the program rooted at `entry`.
pub fn compile(entry: &Path, parser: &dyn ModuleParser) -> Result<CompiledProgram, CompileFailure> {
    let resolution = load_and_resolve_modules(entry, parser);
    let mut warnings = resolution.warnings.clone();

    if !resolution.errors.is_empty() {
        return Err(CompileFailure {
            errors: resolution.errors.clone(),
            warnings,
        });
    }

    let config = find_config(entry.parent().unwrap_or_else(|| Path::new(".")))
        .ok()
        .flatten();

    let mut collector = WarningCollector::new();
    let mut exports: BTreeMap<PathBuf, ModuleExports> = BTreeMap::new();
    let mut ordered: Vec<(PathBuf, TypedModule)> = Vec::new();

    for path in &resolution.compilation_order {
        let Some(loaded) = resolution.modules.get(path) else {
            continue;
        };
        let imports = match build_import_context(loaded, config.as_ref(), &exports) {
            Ok(imports) => imports,
            Err(diag) => {
                warnings.extend(collector.take());
                return Err(CompileFailure {
                    errors: vec![diag],
                    warnings,
                });
            }
        };
        match typecheck_with_imports(&loaded.module, &imports, &mut collector) {
            Ok(typed_module) => {
                exports.insert(path.clone(), typed_module.exports.clone());
                ordered.push((path.clone(), typed_module));
            }
            Err(diag) => {
                warnings.extend(collector.take());
                return Err(CompileFailure {
                    errors: vec![diag],
                    warnings,
                });
            }
        }
    }

    warnings.extend(collector.take());
    Ok(CompiledProgram {
        resolution,
        typed_modules: ordered,
        warnings,
    })
}

/// Bind the imports of one module from its dependencies' exports.
fn build_import_context(
    loaded: &LoadedModule,
    config: Option<&LoadedConfig>,
    exports: &BTreeMap<PathBuf, ModuleExports>,
) -> Result<ImportContext, Diagnostic> {
    let mut imports = ImportContext::default();
    let mut bound_names: Vec<String> = Vec::new();
    // Resolution already succeeded during loading; re-running it here is
    // a pure lookup, so its warnings are discarded.
    let mut scratch = WarningCollector::new();

    for (import, loc) in loaded.module.imports() {
        if import.side_effect_only {
            continue;
        }
        let target = resolve_import(&loaded.path, &import.source, config, loc, &mut scratch)?;
        let Some(target_exports) = exports.get(&target) else {
            // A dependency missing from the typed set means it sits in a
            // cycle ahead of us; its exports are simply not visible yet.
            continue;
        };
        for item in &import.items {
            let local = item.local_name().to_string();
            if bound_names.contains(&local) {
                return Err(Diagnostic::new(
                    "VF5102",
                    loc.clone(),
                    &[("name", local)],
                ));
            }
            bound_names.push(local.clone());
            bind_item(
                &mut imports,
                target_exports,
                &item.name,
                &local,
                item.type_only,
                &import.source,
                loc,
            )?;
        }
    }
    Ok(imports)
}

#[allow(clippy::too_many_arguments)]
fn bind_item(
    imports: &mut ImportContext,
    target: &ModuleExports,
    name: &str,
    local: &str,
    type_only: bool,
    source: &str,
    loc: &vibefun_common::Location,
) -> Result<(), Diagnostic> {
    let value = target.values.get(name);
    let ty = target.types.get(name);
    if value.is_none() && ty.is_none() {
        let mut available: Vec<&str> = target.names.iter().map(String::as_str).collect();
        available.sort_unstable();
        return Err(Diagnostic::new(
            "VF5101",
            loc.clone(),
            &[
                ("name", name.to_string()),
                ("path", source.to_string()),
                ("available", available.join(", ")),
            ],
        ));
    }
    if let Some(scheme) = value {
        if !type_only {
            imports.values.insert(
                local.to_string(),
                vibefun_typeck::env::ValueBinding::Value {
                    scheme: scheme.clone(),
                    loc: loc.clone(),
                },
            );
        }
    }
    if let Some(binding) = ty {
        imports.types.insert(local.to_string(), binding.clone());
        // A variant type travels with its constructors.
        if let vibefun_typeck::env::TypeDefKind::VariantDef { ctors, .. } = &binding.kind {
            for (ctor, _) in ctors {
                if let Some(ctor_binding) = target.ctors.get(ctor) {
                    imports.ctors.insert(ctor.clone(), ctor_binding.clone());
                }
                if !type_only {
                    if let Some(scheme) = target.values.get(ctor) {
                        imports.values.insert(
                            ctor.clone(),
                            vibefun_typeck::env::ValueBinding::Value {
                                scheme: scheme.clone(),
                                loc: loc.clone(),
                            },
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
