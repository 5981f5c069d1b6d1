//! Import path resolution.
//!
//! Turns an import specifier into the real path of a module file:
//! - relative and absolute specifiers resolve against the importing file,
//!   trying `<path>.vf` then `<path>/index.vf` (file beats directory; a
//!   trailing slash means only the directory form)
//! - bare specifiers go through the config path mappings, then an upward
//!   `node_modules` walk
//! - URLs and non-`.vf` extensions are rejected
//!
//! Every resolved path is canonicalized, so symlinked and differently
//! spelled imports of one file share a cache entry.

use std::path::{Path, PathBuf};

use vibefun_common::{suggest, Diagnostic, Location, WarningCollector};

use crate::config::LoadedConfig;

/// Resolve `specifier` as imported from the file `from`.
pub fn resolve_import(
    from: &Path,
    specifier: &str,
    config: Option<&LoadedConfig>,
    loc: &Location,
    warnings: &mut WarningCollector,
) -> Result<PathBuf, Diagnostic> {
    if is_url_like(specifier) {
        return Err(unsupported(specifier, loc));
    }

    let from_dir = from.parent().unwrap_or_else(|| Path::new("."));

    if is_relative(specifier) || specifier.starts_with('/') {
        let base = if specifier.starts_with('/') {
            PathBuf::from(specifier)
        } else {
            from_dir.join(specifier)
        };
        let candidates = file_candidates(&base, specifier, loc)?;
        return finish(&candidates, from, specifier, loc, warnings);
    }

    // Bare specifier: path mappings first, then node_modules.
    let mut candidates = Vec::new();
    if let Some(config) = config {
        for target in config.path_mapping_candidates(specifier) {
            candidates.extend(file_candidates(&target, specifier, loc)?);
        }
    }
    if candidates.is_empty() {
        let mut dir = Some(from_dir);
        while let Some(current) = dir {
            let base = current.join("node_modules").join(specifier);
            candidates.push(with_vf_extension(&base));
            candidates.push(base.join("index.vf"));
            dir = current.parent();
        }
    }
    finish(&candidates, from, specifier, loc, warnings)
}

/// Candidate files for a path-shaped specifier.
fn file_candidates(
    base: &Path,
    specifier: &str,
    loc: &Location,
) -> Result<Vec<PathBuf>, Diagnostic> {
    if specifier.ends_with(".vf") {
        return Ok(vec![base.to_path_buf()]);
    }
    // A trailing slash means only the directory's index module.
    if specifier.ends_with('/') {
        return Ok(vec![base.join("index.vf")]);
    }
    // An explicit non-.vf extension is unsupported. Lone dots are path
    // segments, not extensions.
    let name = base.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name != "." && name != ".." {
        if let Some((_, ext)) = name.rsplit_once('.') {
            if !ext.is_empty() && ext != "vf" {
                return Err(unsupported(specifier, loc));
            }
        }
    }
    Ok(vec![with_vf_extension(base), base.join("index.vf")])
}

fn with_vf_extension(base: &Path) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(".vf");
    PathBuf::from(s)
}

/// Pick the first existing candidate, canonicalize it, and check casing.
fn finish(
    candidates: &[PathBuf],
    from: &Path,
    specifier: &str,
    loc: &Location,
    warnings: &mut WarningCollector,
) -> Result<PathBuf, Diagnostic> {
    let Some(found) = candidates.iter().find(|c| c.is_file()) else {
        return Err(not_found(candidates, from, specifier, loc));
    };

    check_casing(found, specifier, loc, warnings);

    match found.canonicalize() {
        Ok(real) => Ok(real),
        Err(err) if err.raw_os_error() == Some(libc_eloop()) => Err(Diagnostic::new(
            "VF5002",
            loc.clone(),
            &[("path", found.display().to_string())],
        )),
        Err(err) => Err(Diagnostic::new(
            "VF5001",
            loc.clone(),
            &[
                ("path", found.display().to_string()),
                ("reason", err.to_string()),
            ],
        )),
    }
}

/// ELOOP: too many levels of symbolic links.
fn libc_eloop() -> i32 {
    40
}

/// Warn when the import's spelling differs from the directory entry only
/// by case: it resolves here but not on a case-sensitive file system (or
/// the reverse).
fn check_casing(found: &Path, specifier: &str, loc: &Location, warnings: &mut WarningCollector) {
    let Some(name) = found.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    let Some(parent) = found.parent() else {
        return;
    };
    let Ok(entries) = std::fs::read_dir(parent) else {
        return;
    };
    let mut exact = false;
    let mut case_variant: Option<String> = None;
    for entry in entries.flatten() {
        let entry_name = entry.file_name();
        let Some(entry_name) = entry_name.to_str() else {
            continue;
        };
        if entry_name == name {
            exact = true;
        } else if entry_name.eq_ignore_ascii_case(name) {
            case_variant = Some(entry_name.to_string());
        }
    }
    if !exact {
        if let Some(actual) = case_variant {
            warnings.add(Diagnostic::new(
                "VF5901",
                loc.clone(),
                &[
                    ("specifier", specifier.to_string()),
                    ("actual", actual),
                ],
            ));
        }
    }
}

fn not_found(
    candidates: &[PathBuf],
    from: &Path,
    specifier: &str,
    loc: &Location,
) -> Diagnostic {
    // Suggest the nearest file name from the directory of the first
    // candidate.
    let suggestion = candidates
        .first()
        .and_then(|c| c.parent())
        .and_then(|dir| std::fs::read_dir(dir).ok())
        .and_then(|entries| {
            let target = candidates[0]
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(specifier)
                .to_string();
            let names: Vec<String> = entries
                .flatten()
                .filter_map(|e| {
                    let name = e.file_name();
                    let name = name.to_str()?;
                    Some(name.trim_end_matches(".vf").to_string())
                })
                .collect();
            suggest::closest(&target, names.iter().map(String::as_str)).map(str::to_string)
        });

    let diag = Diagnostic::new(
        "VF5000",
        loc.clone(),
        &[
            ("specifier", specifier.to_string()),
            ("from", from.display().to_string()),
            ("suggestion", suggestion.clone().unwrap_or_default()),
        ],
    );
    match suggestion {
        Some(_) => diag,
        None => diag.without_hint(),
    }
}

fn unsupported(specifier: &str, loc: &Location) -> Diagnostic {
    Diagnostic::new(
        "VF5003",
        loc.clone(),
        &[("specifier", specifier.to_string())],
    )
}

fn is_url_like(specifier: &str) -> bool {
    specifier.starts_with("http://")
        || specifier.starts_with("https://")
        || specifier.starts_with("file://")
}

fn is_relative(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}
