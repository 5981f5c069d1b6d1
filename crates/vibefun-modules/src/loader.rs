//! Transitive module loading.
//!
//! Starting from an entry point, reads and parses every reachable module,
//! caching by real path so symlinked or differently spelled imports share
//! one entry. Parsing is delegated to the injected [`ModuleParser`] --
//! the parser itself is a collaborator, not part of this crate.
//!
//! Loading is deliberately not fail-fast: file-resolution and parse
//! errors across the whole import graph are collected so a single run can
//! report every missing file, not just the first.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use vibefun_ast::Module;
use vibefun_common::{Diagnostic, Location, WarningCollector};

use crate::config::{find_config, LoadedConfig};
use crate::graph::ModuleGraph;
use crate::resolve::resolve_import;

/// The parser the loader drives. Implementations return the Core AST for
/// a file, or the parse errors found in it.
pub trait ModuleParser {
    fn parse(&self, source: &str, path: &Path) -> Result<Module, Vec<Diagnostic>>;
}

/// One successfully loaded module.
#[derive(Debug)]
pub struct LoadedModule {
    pub path: PathBuf,
    pub source: String,
    pub module: Module,
}

/// Everything the loader found: the module cache, the dependency graph,
/// and every error met along the way.
#[derive(Debug, Default)]
pub struct LoadResult {
    pub modules: BTreeMap<PathBuf, LoadedModule>,
    pub graph: ModuleGraph,
    pub errors: Vec<Diagnostic>,
}

/// Load the transitive closure of modules reachable from `entry`.
pub fn load_modules(
    entry: &Path,
    parser: &dyn ModuleParser,
    warnings: &mut WarningCollector,
) -> LoadResult {
    let mut result = LoadResult::default();

    let entry_path = match validate_entry(entry) {
        Ok(path) => path,
        Err(diag) => {
            result.errors.push(diag);
            return result;
        }
    };

    let config = match find_config(entry_path.parent().unwrap_or_else(|| Path::new("."))) {
        Ok(config) => config,
        Err(diag) => {
            result.errors.push(diag);
            None
        }
    };

    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    queue.push_back(entry_path);

    while let Some(path) = queue.pop_front() {
        if result.modules.contains_key(&path) {
            continue;
        }
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                result.errors.push(Diagnostic::new(
                    "VF5001",
                    file_loc(&path),
                    &[
                        ("path", path.display().to_string()),
                        ("reason", err.to_string()),
                    ],
                ));
                continue;
            }
        };
        let module = match parser.parse(&source, &path) {
            Ok(module) => module,
            Err(mut parse_errors) => {
                result.errors.append(&mut parse_errors);
                continue;
            }
        };

        result.graph.add_node(path.clone());
        collect_dependencies(
            &path,
            &module,
            config.as_ref(),
            &mut result,
            &mut queue,
            warnings,
        );
        result.modules.insert(
            path.clone(),
            LoadedModule {
                path,
                source,
                module,
            },
        );
    }

    result
}

/// Resolve every import and re-export of a module, extending the graph
/// and the work queue. Resolution failures are collected, not raised.
fn collect_dependencies(
    path: &Path,
    module: &Module,
    config: Option<&LoadedConfig>,
    result: &mut LoadResult,
    queue: &mut VecDeque<PathBuf>,
    warnings: &mut WarningCollector,
) {
    for (import, loc) in module.imports() {
        // Side-effect-only imports are value edges; an item list is
        // type-only iff every item is a `type` import.
        let type_only =
            !import.side_effect_only && import.items.iter().all(|item| item.type_only);
        match resolve_import(path, &import.source, config, loc, warnings) {
            Ok(target) => {
                result
                    .graph
                    .add_dependency(path, &target, type_only, loc.clone());
                queue.push_back(target);
            }
            Err(diag) => result.errors.push(diag),
        }
    }
    // Re-exports are conservatively value edges.
    for (source, _items, loc) in module.reexports() {
        match resolve_import(path, source, config, loc, warnings) {
            Ok(target) => {
                result
                    .graph
                    .add_dependency(path, &target, false, loc.clone());
                queue.push_back(target);
            }
            Err(diag) => result.errors.push(diag),
        }
    }
}

/// Validate the entry point: a `.vf` file, or a directory containing
/// `index.vf`. Returns the real path.
fn validate_entry(entry: &Path) -> Result<PathBuf, Diagnostic> {
    let mut tried: Vec<PathBuf> = Vec::new();
    let candidate = if entry.is_dir() {
        tried.push(entry.join("index.vf"));
        entry.join("index.vf")
    } else {
        tried.push(entry.to_path_buf());
        entry.to_path_buf()
    };
    if candidate.is_file() {
        return candidate.canonicalize().map_err(|err| {
            Diagnostic::new(
                "VF5001",
                file_loc(&candidate),
                &[
                    ("path", candidate.display().to_string()),
                    ("reason", err.to_string()),
                ],
            )
        });
    }
    let tried_list = tried
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(Diagnostic::new(
        "VF5005",
        file_loc(entry),
        &[
            ("path", entry.display().to_string()),
            ("tried", tried_list),
        ],
    ))
}

fn file_loc(path: &Path) -> Location {
    Location::new(path.display().to_string(), 1, 1, 0)
}
