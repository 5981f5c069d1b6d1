//! The diagnostic code registry.
//!
//! The registry is the only process-global state in the compiler. It is
//! built once, on first access, from the static catalog in `codes.rs` and
//! is read-only afterwards.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::codes::CATALOG;
use crate::diagnostic::{DiagnosticDefinition, Phase, Severity};

/// In-memory map from diagnostic code to its definition.
pub struct Registry {
    by_code: FxHashMap<&'static str, &'static DiagnosticDefinition>,
}

impl Registry {
    /// Build the registry from the static catalog.
    ///
    /// Panics on a duplicate code -- two definitions claiming the same
    /// code is a compiler bug caught at startup.
    fn build() -> Registry {
        let mut by_code = FxHashMap::default();
        for def in CATALOG {
            if by_code.insert(def.code, def).is_some() {
                panic!("internal error: duplicate diagnostic code {}", def.code);
            }
        }
        Registry { by_code }
    }

    /// Look up a definition by code.
    pub fn get(&self, code: &str) -> Option<&'static DiagnosticDefinition> {
        self.by_code.get(code).copied()
    }

    /// All definitions in a phase, sorted by code.
    pub fn by_phase(&self, phase: Phase) -> Vec<&'static DiagnosticDefinition> {
        let mut defs: Vec<_> = self
            .by_code
            .values()
            .copied()
            .filter(|d| d.phase == phase)
            .collect();
        defs.sort_by_key(|d| d.code);
        defs
    }

    /// All definitions with a severity, sorted by code.
    pub fn by_severity(&self, severity: Severity) -> Vec<&'static DiagnosticDefinition> {
        let mut defs: Vec<_> = self
            .by_code
            .values()
            .copied()
            .filter(|d| d.severity == severity)
            .collect();
        defs.sort_by_key(|d| d.code);
        defs
    }

    /// Render the documentation text for a code: title, explanation, and
    /// the bad/good example pair. Used by the CLI `explain` command.
    pub fn explain(&self, code: &str) -> Option<String> {
        let def = self.get(code)?;
        let mut out = String::new();
        out.push_str(&format!("{} -- {} ({})\n\n", def.code, def.title, def.severity));
        out.push_str(def.explanation);
        out.push_str("\n\nIncorrect:\n");
        for line in def.example.bad.lines() {
            out.push_str(&format!("    {line}\n"));
        }
        out.push_str("\nCorrect:\n");
        for line in def.example.good.lines() {
            out.push_str(&format!("    {line}\n"));
        }
        out.push_str(&format!("\n{}\n", def.example.description));
        if !def.related_codes.is_empty() {
            out.push_str(&format!("\nRelated: {}\n", def.related_codes.join(", ")));
        }
        Some(out)
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// The process-global registry, built on first access.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_is_well_formed() {
        for def in CATALOG {
            assert!(
                def.code.len() == 6 && def.code.starts_with("VF"),
                "malformed code {}",
                def.code
            );
            let digits: u32 = def.code[2..].parse().expect("code digits");
            let in_warning_band = (digits % 1000) >= 900;
            match def.severity {
                Severity::Warning => assert!(
                    in_warning_band,
                    "{} is a warning outside the x900-x999 band",
                    def.code
                ),
                Severity::Error => assert!(
                    !in_warning_band,
                    "{} is an error inside the warning band",
                    def.code
                ),
            }
        }
    }

    #[test]
    fn code_thousands_digit_matches_phase() {
        for def in CATALOG {
            let digits: u32 = def.code[2..].parse().unwrap();
            let expected = match digits / 1000 {
                1 => Phase::Lexer,
                2 => Phase::Parser,
                3 => Phase::Desugarer,
                4 => Phase::Typechecker,
                5 => Phase::Modules,
                6 => Phase::Codegen,
                7 => Phase::Runtime,
                other => panic!("code {} in unknown range {other}", def.code),
            };
            assert_eq!(def.phase, expected, "{} phase mismatch", def.code);
        }
    }

    #[test]
    fn registry_lookup_and_explain() {
        let reg = registry();
        assert!(reg.len() > 50);
        let def = reg.get("VF4400").expect("VF4400 registered");
        assert_eq!(def.phase, Phase::Typechecker);
        let doc = reg.explain("VF4400").unwrap();
        assert!(doc.contains("VF4400"));
        assert!(doc.contains("Incorrect:"));
    }

    #[test]
    fn by_phase_and_severity_are_sorted() {
        let reg = registry();
        let mods = reg.by_phase(Phase::Modules);
        assert!(!mods.is_empty());
        assert!(mods.windows(2).all(|w| w[0].code < w[1].code));
        let warnings = reg.by_severity(Severity::Warning);
        assert!(warnings.iter().any(|d| d.code == "VF5900"));
    }
}
