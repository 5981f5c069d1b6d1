//! End-to-end pipeline tests: load -> resolve -> type-check across
//! modules on a real directory tree, with a minimal line-based parser
//! standing in for the external parser.

use std::path::{Path, PathBuf};

use vibefun_ast::{DeclKind, Declaration, Expr, ExprKind, ImportDecl, ImportItem, Module, NodeId};
use vibefun_common::{Diagnostic, Location};
use vibefun_modules::ModuleParser;
use vibefunc::compile;

struct LineParser;

impl LineParser {
    fn items(list: &str) -> Vec<ImportItem> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|item| {
                let (type_only, item) = match item.strip_prefix("type ") {
                    Some(rest) => (true, rest.trim()),
                    None => (false, item),
                };
                ImportItem {
                    name: item.to_string(),
                    alias: None,
                    type_only,
                }
            })
            .collect()
    }

    fn braced(rest: &str) -> Option<(&str, &str)> {
        let open = rest.find('{')?;
        let close = rest.find('}')?;
        Some((&rest[open + 1..close], &rest[close + 1..]))
    }

    fn quoted(rest: &str) -> Option<String> {
        let start = rest.find('"')?;
        let end = rest[start + 1..].find('"')? + start + 1;
        Some(rest[start + 1..end].to_string())
    }

    fn value(rest: &str, id: u32, loc: &Location) -> Expr {
        let rest = rest.trim();
        let kind = if let Ok(n) = rest.parse::<i64>() {
            ExprKind::IntLit(n)
        } else if rest.starts_with('"') {
            ExprKind::StringLit(rest.trim_matches('"').to_string())
        } else {
            ExprKind::Var(rest.to_string())
        };
        Expr::new(NodeId(id), kind, loc.clone())
    }
}

impl ModuleParser for LineParser {
    fn parse(&self, source: &str, path: &Path) -> Result<Module, Vec<Diagnostic>> {
        let file = path.display().to_string();
        let mut declarations = Vec::new();
        let mut next_id = 0u32;
        for (i, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            let loc = Location::new(file.clone(), i as u32 + 1, 1, 0);
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("import ") {
                let rest = rest.trim();
                if rest.starts_with('"') {
                    declarations.push(Declaration::new(
                        DeclKind::Import(ImportDecl {
                            source: Self::quoted(rest).expect("specifier"),
                            items: vec![],
                            side_effect_only: true,
                        }),
                        loc,
                    ));
                } else {
                    let (list, tail) = Self::braced(rest).expect("import list");
                    declarations.push(Declaration::new(
                        DeclKind::Import(ImportDecl {
                            source: Self::quoted(tail).expect("source"),
                            items: Self::items(list),
                            side_effect_only: false,
                        }),
                        loc,
                    ));
                }
            } else if let Some(rest) = line.strip_prefix("export ") {
                let (list, _) = Self::braced(rest).expect("export list");
                declarations.push(Declaration::new(
                    DeclKind::Export {
                        names: Self::items(list).into_iter().map(|i| i.name).collect(),
                    },
                    loc,
                ));
            } else if let Some(rest) = line.strip_prefix("let ") {
                let (name, value) = rest.split_once('=').expect("let binding");
                let value = Self::value(value, next_id, &loc);
                next_id += 1;
                declarations.push(Declaration::new(
                    DeclKind::Let {
                        name: name.trim().to_string(),
                        mutable: false,
                        recursive: false,
                        value,
                    },
                    loc,
                ));
            }
        }
        Ok(Module::new(declarations, Location::new(file, 1, 1, 0)))
    }
}

fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn two_module_program_compiles_in_dependency_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(
        dir.path(),
        "a.vf",
        "import { x } from \"./b\"\nlet y = x\n",
    );
    write(dir.path(), "b.vf", "let x = 1\nexport { x }\n");

    let program = compile(&a, &LineParser).expect("program compiles");
    assert_eq!(program.typed_modules.len(), 2);
    assert!(
        program.typed_modules[0].0.ends_with("b.vf"),
        "dependency compiles first"
    );

    let (_, typed_a) = program
        .typed_modules
        .iter()
        .find(|(p, _)| p.ends_with("a.vf"))
        .unwrap();
    let y = typed_a
        .declaration_types
        .iter()
        .find(|(n, _)| n == "y")
        .unwrap();
    assert_eq!(y.1.ty.to_string(), "Int");
    assert!(program.warnings.is_empty());
}

#[test]
fn importing_a_name_that_is_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(
        dir.path(),
        "a.vf",
        "import { nope } from \"./b\"\nlet y = 1\n",
    );
    write(dir.path(), "b.vf", "let x = 1\nexport { x }\n");

    let failure = compile(&a, &LineParser).expect_err("import must fail");
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].code(), "VF5101");
    assert!(failure.errors[0]
        .hint
        .as_deref()
        .is_some_and(|h| h.contains('x')));
}

#[test]
fn duplicate_import_of_one_name() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(
        dir.path(),
        "a.vf",
        "import { x } from \"./b\"\nimport { x } from \"./c\"\n",
    );
    write(dir.path(), "b.vf", "let x = 1\nexport { x }\n");
    write(dir.path(), "c.vf", "let x = 2\nexport { x }\n");

    let failure = compile(&a, &LineParser).expect_err("duplicate import");
    assert_eq!(failure.errors[0].code(), "VF5102");
}

#[test]
fn self_import_aborts_compilation() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.vf", "import { x } from \"./a\"\nlet x = 1\n");

    let failure = compile(&a, &LineParser).expect_err("self import aborts");
    assert!(failure.errors.iter().any(|e| e.code() == "VF5004"));
}

#[test]
fn value_cycle_compiles_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.vf", "import \"./b\"\nlet ax = 1\n");
    write(dir.path(), "b.vf", "import \"./a\"\nlet bx = 1\n");

    let program = compile(&a, &LineParser).expect("cycle still compiles");
    assert_eq!(program.typed_modules.len(), 2);
    let codes: Vec<&str> = program.warnings.iter().map(|w| w.code()).collect();
    assert_eq!(codes, vec!["VF5900"]);
}

#[test]
fn type_error_fails_fast_with_load_context_intact() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.vf", "let y = missing\n");

    let failure = compile(&a, &LineParser).expect_err("unbound variable");
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].code(), "VF4100");
}

#[test]
fn missing_module_aborts_before_typechecking() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.vf", "import { x } from \"./nope\"\n");

    let failure = compile(&a, &LineParser).expect_err("missing module");
    assert_eq!(failure.errors[0].code(), "VF5000");
}
