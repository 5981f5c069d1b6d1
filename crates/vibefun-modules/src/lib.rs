//! Module resolution for the vibefun compiler.
//!
//! Composes the loader, the dependency graph, and Tarjan cycle detection
//! into a single [`ModuleResolution`]: the module cache, a deterministic
//! compilation order (dependencies first), detected cycles and
//! self-imports, and every error and warning found along the way.
//!
//! Self-imports are errors; value cycles are warnings and compilation
//! proceeds; type-only cycles are safe and silent.

pub mod config;
pub mod cycles;
pub mod graph;
pub mod loader;
pub mod resolve;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use vibefun_common::{Diagnostic, WarningCollector};

pub use config::{find_config, LoadedConfig, ProjectConfig};
pub use cycles::{Cycle, GraphAnalysis, SelfImport};
pub use graph::{DependencyEdge, ModuleGraph};
pub use loader::{load_modules, LoadResult, LoadedModule, ModuleParser};
pub use resolve::resolve_import;

/// The full result of loading and resolving a module universe.
#[derive(Debug)]
pub struct ModuleResolution {
    pub modules: std::collections::BTreeMap<PathBuf, LoadedModule>,
    /// Compilation order: dependencies before dependents, ties broken by
    /// path. Members of value cycles are included (compilation proceeds
    /// for them).
    pub compilation_order: Vec<PathBuf>,
    pub cycles: Vec<Cycle>,
    pub self_imports: Vec<SelfImport>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
    pub graph: ModuleGraph,
}

/// Load every module reachable from `entry` and resolve the graph.
pub fn load_and_resolve_modules(entry: &Path, parser: &dyn ModuleParser) -> ModuleResolution {
    let mut warnings = WarningCollector::new();
    let load = load_modules(entry, parser, &mut warnings);
    let analysis = cycles::analyze(&load.graph);

    let mut errors = load.errors;
    for self_import in &analysis.self_imports {
        errors.push(Diagnostic::new(
            "VF5004",
            self_import.loc.clone(),
            &[("path", self_import.path.display().to_string())],
        ));
    }
    for cycle in &analysis.cycles {
        if cycle.all_type_only {
            continue;
        }
        let loc = cycle
            .locations
            .first()
            .cloned()
            .unwrap_or_else(|| vibefun_common::Location::new("<graph>", 1, 1, 0));
        warnings.add(Diagnostic::new(
            "VF5900",
            loc,
            &[("cycle", format_cycle(&cycle.path))],
        ));
    }

    ModuleResolution {
        modules: load.modules,
        compilation_order: analysis.order,
        cycles: analysis.cycles,
        self_imports: analysis.self_imports,
        warnings: warnings.take(),
        errors,
        graph: load.graph,
    }
}

/// Re-run graph analysis over an existing graph. Deterministic: equal
/// graphs produce equal analyses.
pub fn resolve_modules(graph: &ModuleGraph) -> GraphAnalysis {
    cycles::analyze(graph)
}

/// `a.vf -> b.vf -> c.vf -> a.vf`
fn format_cycle(members: &[PathBuf]) -> String {
    let mut parts: Vec<String> = members.iter().map(|p| p.display().to_string()).collect();
    if let Some(first) = parts.first().cloned() {
        parts.push(first);
    }
    parts.join(" -> ")
}

/// Whether the resolution carries hard errors.
pub fn has_errors(resolution: &ModuleResolution) -> bool {
    !resolution.errors.is_empty()
}

pub fn has_warnings(resolution: &ModuleResolution) -> bool {
    !resolution.warnings.is_empty()
}

/// Render every error, resolving source text per file when available.
pub fn format_errors(
    resolution: &ModuleResolution,
    sources: Option<&FxHashMap<String, String>>,
) -> String {
    format_diagnostics(&resolution.errors, sources)
}

pub fn format_warnings(
    resolution: &ModuleResolution,
    sources: Option<&FxHashMap<String, String>>,
) -> String {
    format_diagnostics(&resolution.warnings, sources)
}

fn format_diagnostics(
    diagnostics: &[Diagnostic],
    sources: Option<&FxHashMap<String, String>>,
) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        let source = sources
            .and_then(|m| m.get(&diag.location.file))
            .map(String::as_str);
        out.push_str(&diag.format(source));
    }
    out
}

/// Build a source map (file path -> text) from a resolution, for
/// diagnostic rendering.
pub fn source_map(resolution: &ModuleResolution) -> FxHashMap<String, String> {
    resolution
        .modules
        .values()
        .map(|m| (m.path.display().to_string(), m.source.clone()))
        .collect()
}
