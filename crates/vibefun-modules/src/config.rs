//! Project configuration (`vibefun.json`).
//!
//! The config is discovered by walking upward from the entry point. Its
//! only compiler-relevant content is `compilerOptions.paths`: bare import
//! specifiers are matched against the patterns (glob `*` is a single
//! wildcard segment of the specifier) and rewritten to the mapped
//! targets, which are tried before any `node_modules` search.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use vibefun_common::{Diagnostic, Location};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub paths: Option<BTreeMap<String, Vec<String>>>,
}

/// A parsed config together with the directory it governs.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path of the `vibefun.json` file itself.
    pub path: PathBuf,
    pub config: ProjectConfig,
}

pub const CONFIG_FILE_NAME: &str = "vibefun.json";

/// Walk upward from `start_dir` looking for `vibefun.json`. Absent config
/// is not an error; a present but malformed one is.
pub fn find_config(start_dir: &Path) -> Result<Option<LoadedConfig>, Diagnostic> {
    let mut dir = Some(start_dir);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            let text = std::fs::read_to_string(&candidate).map_err(|err| {
                Diagnostic::new(
                    "VF5100",
                    config_loc(&candidate),
                    &[
                        ("path", candidate.display().to_string()),
                        ("reason", err.to_string()),
                    ],
                )
            })?;
            let config: ProjectConfig = serde_json::from_str(&text).map_err(|err| {
                Diagnostic::new(
                    "VF5100",
                    config_loc(&candidate),
                    &[
                        ("path", candidate.display().to_string()),
                        ("reason", err.to_string()),
                    ],
                )
            })?;
            return Ok(Some(LoadedConfig {
                path: candidate,
                config,
            }));
        }
        dir = current.parent();
    }
    Ok(None)
}

fn config_loc(path: &Path) -> Location {
    Location::new(path.display().to_string(), 1, 1, 0)
}

impl LoadedConfig {
    /// The directory the config lives in; mapped targets resolve against
    /// it.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Expand a bare specifier through the path mappings. Patterns are
    /// tried most-specific first (longest static prefix, exact patterns
    /// before wildcard ones); the first matching pattern wins and its
    /// targets are returned in declaration order.
    pub fn path_mapping_candidates(&self, specifier: &str) -> Vec<PathBuf> {
        let Some(paths) = self
            .config
            .compiler_options
            .as_ref()
            .and_then(|o| o.paths.as_ref())
        else {
            return Vec::new();
        };

        let mut patterns: Vec<(&String, &Vec<String>)> = paths.iter().collect();
        patterns.sort_by_key(|(pattern, _)| {
            let prefix_len = pattern.split('*').next().unwrap_or("").len();
            let is_exact = !pattern.contains('*');
            // Exact patterns first, then longest prefix.
            (std::cmp::Reverse(is_exact as usize), std::cmp::Reverse(prefix_len))
        });

        for (pattern, targets) in patterns {
            if let Some(captured) = match_pattern(pattern, specifier) {
                return targets
                    .iter()
                    .map(|target| {
                        let expanded = target.replacen('*', &captured, 1);
                        self.base_dir().join(expanded)
                    })
                    .collect();
            }
        }
        Vec::new()
    }
}

/// Match `specifier` against a pattern with at most one `*` wildcard.
/// Returns the captured text for the wildcard (empty for exact matches).
fn match_pattern(pattern: &str, specifier: &str) -> Option<String> {
    match pattern.split_once('*') {
        None => (pattern == specifier).then(String::new),
        Some((prefix, suffix)) => {
            if specifier.len() >= prefix.len() + suffix.len()
                && specifier.starts_with(prefix)
                && specifier.ends_with(suffix)
            {
                Some(specifier[prefix.len()..specifier.len() - suffix.len()].to_string())
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_paths(paths: &[(&str, &[&str])]) -> LoadedConfig {
        LoadedConfig {
            path: PathBuf::from("/project/vibefun.json"),
            config: ProjectConfig {
                compiler_options: Some(CompilerOptions {
                    paths: Some(
                        paths
                            .iter()
                            .map(|(k, v)| {
                                (k.to_string(), v.iter().map(|s| s.to_string()).collect())
                            })
                            .collect(),
                    ),
                }),
            },
        }
    }

    #[test]
    fn wildcard_pattern_expands_into_targets() {
        let config = config_with_paths(&[("@app/*", &["src/*"])]);
        let candidates = config.path_mapping_candidates("@app/utils");
        assert_eq!(candidates, vec![PathBuf::from("/project/src/utils")]);
    }

    #[test]
    fn exact_pattern_beats_wildcard() {
        let config = config_with_paths(&[
            ("@app/*", &["src/*"]),
            ("@app/special", &["vendor/special"]),
        ]);
        let candidates = config.path_mapping_candidates("@app/special");
        assert_eq!(candidates, vec![PathBuf::from("/project/vendor/special")]);
    }

    #[test]
    fn longest_prefix_wins_among_wildcards() {
        let config = config_with_paths(&[
            ("@app/*", &["src/*"]),
            ("@app/gen/*", &["generated/*"]),
        ]);
        let candidates = config.path_mapping_candidates("@app/gen/types");
        assert_eq!(candidates, vec![PathBuf::from("/project/generated/types")]);
    }

    #[test]
    fn targets_keep_declaration_order() {
        let config = config_with_paths(&[("lib/*", &["overrides/*", "fallback/*"])]);
        let candidates = config.path_mapping_candidates("lib/x");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/project/overrides/x"),
                PathBuf::from("/project/fallback/x"),
            ]
        );
    }

    #[test]
    fn unmatched_specifier_yields_nothing() {
        let config = config_with_paths(&[("@app/*", &["src/*"])]);
        assert!(config.path_mapping_candidates("other/thing").is_empty());
    }

    #[test]
    fn malformed_config_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let err = find_config(dir.path()).unwrap_err();
        assert_eq!(err.code(), "VF5100");
    }

    #[test]
    fn missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn config_found_in_ancestor_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "{ \"compilerOptions\": { \"paths\": { \"x\": [\"src/x\"] } } }",
        )
        .unwrap();
        let nested = dir.path().join("deep/inner");
        std::fs::create_dir_all(&nested).unwrap();
        let loaded = find_config(&nested).unwrap().expect("config found");
        assert_eq!(loaded.path, dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(
            loaded.path_mapping_candidates("x"),
            vec![dir.path().join("src/x")]
        );
    }
}
