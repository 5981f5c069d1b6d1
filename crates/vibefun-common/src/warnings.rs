//! Warning accumulation.

use rustc_hash::FxHashMap;

use crate::diagnostic::Diagnostic;

/// Append-only collector for warning diagnostics.
///
/// Warnings never halt a phase; the orchestrator owns one collector per
/// compilation and reports its contents after each phase completes.
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<Diagnostic>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a warning.
    ///
    /// Panics if handed an error-severity diagnostic -- routing errors
    /// through the warning channel is a compiler bug.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        assert!(
            diagnostic.is_warning(),
            "internal error: {} is not a warning",
            diagnostic.code()
        );
        self.warnings.push(diagnostic);
    }

    pub fn get_warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
    }

    /// Drain the collected warnings, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// Render every warning, resolving source text per file when a source
    /// map is provided.
    pub fn format_all(&self, sources: Option<&FxHashMap<String, String>>) -> String {
        let mut out = String::new();
        for w in &self.warnings {
            let source = sources.and_then(|m| m.get(&w.location.file)).map(|s| s.as_str());
            out.push_str(&w.format(source));
        }
        out
    }
}
