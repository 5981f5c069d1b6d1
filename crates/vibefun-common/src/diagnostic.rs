//! Structured diagnostics.
//!
//! All user-facing compiler failures are [`Diagnostic`] values built from a
//! registered [`DiagnosticDefinition`]. Definitions carry message and hint
//! templates with `{placeholder}` slots; instances carry the interpolated
//! text plus the source [`Location`]. Internal invariant violations are
//! plain panics, never coded diagnostics.

use std::fmt;

use serde::Serialize;

use crate::location::Location;
use crate::registry::registry;

/// Diagnostic severity. Errors halt their phase; warnings accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The compiler phase a diagnostic code belongs to.
///
/// Codes are grouped by phase: VF1xxx lexer, VF2xxx parser, VF3xxx
/// desugarer, VF4xxx type system, VF5xxx modules, VF6xxx codegen,
/// VF7xxx runtime. Within a phase, x900-x999 are warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Lexer,
    Parser,
    Desugarer,
    Typechecker,
    Modules,
    Codegen,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Desugarer => "desugarer",
            Phase::Typechecker => "typechecker",
            Phase::Modules => "modules",
            Phase::Codegen => "codegen",
            Phase::Runtime => "runtime",
        };
        write!(f, "{name}")
    }
}

/// A bad/good source pair illustrating a diagnostic, used by the doc
/// generator and the `explain` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Example {
    pub bad: &'static str,
    pub good: &'static str,
    pub description: &'static str,
}

/// A registered diagnostic definition.
///
/// Definitions are static data: the registry is populated once at startup
/// and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticDefinition {
    /// Four-digit code, e.g. `"VF4024"`.
    pub code: &'static str,
    /// Short human title, e.g. `"Type mismatch"`.
    pub title: &'static str,
    /// Message template with `{placeholder}` slots.
    pub message_template: &'static str,
    pub severity: Severity,
    pub phase: Phase,
    /// Free-form grouping used by documentation, e.g. `"unification"`.
    pub category: &'static str,
    /// Optional hint template with `{placeholder}` slots.
    pub hint_template: Option<&'static str>,
    /// Longer prose explanation for `explain`.
    pub explanation: &'static str,
    pub example: Example,
    pub related_codes: &'static [&'static str],
    pub see_also: &'static [&'static str],
}

/// An instantiated diagnostic: a definition plus interpolated message,
/// location, and optional interpolated hint.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub definition: &'static DiagnosticDefinition,
    pub message: String,
    pub location: Location,
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Look up `code` in the registry and interpolate its templates.
    ///
    /// Panics if the code is unknown -- passing an unregistered code is a
    /// compiler bug, not a user error.
    pub fn new(code: &str, location: Location, params: &[(&str, String)]) -> Diagnostic {
        let definition = registry()
            .get(code)
            .unwrap_or_else(|| panic!("internal error: unknown diagnostic code {code}"));
        let message = interpolate(definition.message_template, params);
        let hint = definition.hint_template.map(|t| interpolate(t, params));
        Diagnostic {
            definition,
            message,
            location,
            hint,
        }
    }

    /// Drop the hint. Used by call sites whose hint template needs a
    /// parameter they could not produce (e.g. no typo suggestion exists).
    pub fn without_hint(mut self) -> Diagnostic {
        self.hint = None;
        self
    }

    pub fn code(&self) -> &'static str {
        self.definition.code
    }

    pub fn severity(&self) -> Severity {
        self.definition.severity
    }

    pub fn is_warning(&self) -> bool {
        self.definition.severity == Severity::Warning
    }

    /// Render this diagnostic as plain text.
    ///
    /// Without source: severity, code, message, location, and hint.
    /// With source: additionally the offending line with a caret under the
    /// column. Source lines longer than 120 characters are truncated
    /// around the column, with `...` standing in for the removed ends and
    /// the caret re-aimed so it stays visible.
    pub fn format(&self, source: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}[{}]: {}\n",
            self.definition.severity, self.definition.code, self.message
        ));
        out.push_str(&format!("  --> {}\n", self.location));
        if let Some(source) = source {
            if let Some(line) = source.lines().nth(self.location.line.saturating_sub(1) as usize) {
                let (shown, caret_col) = clip_line(line, self.location.column.saturating_sub(1));
                let line_no = self.location.line.to_string();
                let gutter = " ".repeat(line_no.len());
                out.push_str(&format!(" {line_no} | {shown}\n"));
                out.push_str(&format!(" {gutter} | {}^\n", " ".repeat(caret_col)));
            }
        }
        if let Some(hint) = &self.hint {
            out.push_str(&format!("  = hint: {hint}\n"));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(None).trim_end())
    }
}

impl std::error::Error for Diagnostic {}

/// Maximum rendered width of a source line before it is clipped.
const MAX_LINE_WIDTH: usize = 120;

/// Clip `line` to [`MAX_LINE_WIDTH`] characters around `caret` (a 0-based
/// column), returning the shown text and the caret's position within it.
fn clip_line(line: &str, caret: u32) -> (String, usize) {
    let chars: Vec<char> = line.chars().collect();
    let caret = (caret as usize).min(chars.len());
    if chars.len() <= MAX_LINE_WIDTH {
        return (line.to_string(), caret);
    }

    // Window of MAX_LINE_WIDTH chars centered on the caret, clamped to the
    // line, with `...` replacing the first/last three chars of any cut end.
    let half = MAX_LINE_WIDTH / 2;
    let start = caret.saturating_sub(half).min(chars.len() - MAX_LINE_WIDTH);
    let end = start + MAX_LINE_WIDTH;

    let mut shown: String = chars[start..end].iter().collect();
    if start > 0 {
        shown.replace_range(..shown.char_indices().nth(3).map(|(i, _)| i).unwrap_or(3), "...");
    }
    if end < chars.len() {
        let cut = shown
            .char_indices()
            .rev()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or_else(|| shown.len());
        shown.replace_range(cut.., "...");
    }
    (shown, caret - start)
}

/// Replace every `{name}` occurrence in `template` with its value from
/// `params`. Unmatched placeholders are preserved verbatim so a missing
/// parameter is visible in the output instead of silently vanishing.
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('}') {
            Some(close) => {
                let key = &tail[1..close];
                match params.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("test.vf", 1, 5, 4)
    }

    #[test]
    fn interpolate_replaces_placeholders() {
        let msg = interpolate(
            "expected `{expected}`, found `{found}`",
            &[("expected", "Int".into()), ("found", "String".into())],
        );
        assert_eq!(msg, "expected `Int`, found `String`");
    }

    #[test]
    fn interpolate_preserves_unmatched_placeholders() {
        let msg = interpolate("expected `{expected}`", &[]);
        assert_eq!(msg, "expected `{expected}`");
    }

    #[test]
    fn interpolate_is_idempotent_with_no_params() {
        let once = interpolate("a {x} b {y}", &[("x", "1".into())]);
        let twice = interpolate(&once, &[]);
        assert_eq!(once, twice);
    }

    #[test]
    fn diagnostic_new_interpolates_message() {
        let d = Diagnostic::new(
            "VF4024",
            loc(),
            &[("expected", "Int".into()), ("found", "String".into())],
        );
        assert_eq!(d.code(), "VF4024");
        assert_eq!(d.message, "expected `Int`, found `String`");
        assert_eq!(d.severity(), Severity::Error);
    }

    #[test]
    #[should_panic(expected = "unknown diagnostic code")]
    fn diagnostic_new_panics_on_unknown_code() {
        let _ = Diagnostic::new("VF9999", loc(), &[]);
    }

    #[test]
    fn format_without_source() {
        let d = Diagnostic::new(
            "VF4024",
            loc(),
            &[("expected", "Int".into()), ("found", "String".into())],
        );
        let rendered = d.format(None);
        assert!(rendered.starts_with("error[VF4024]: expected `Int`, found `String`\n"));
        assert!(rendered.contains("  --> test.vf:1:5\n"));
    }

    #[test]
    fn format_with_source_draws_caret() {
        let d = Diagnostic::new(
            "VF4024",
            Location::new("test.vf", 2, 9, 0),
            &[("expected", "Int".into()), ("found", "String".into())],
        );
        let source = "let a = 1\nlet x = \"hello\"\n";
        let rendered = d.format(Some(source));
        assert!(rendered.contains(" 2 | let x = \"hello\"\n"));
        // Caret under column 9 (0-based 8).
        assert!(rendered.contains(" | ")
            && rendered.lines().any(|l| l.ends_with("        ^")));
    }

    #[test]
    fn clip_short_line_is_unchanged() {
        let (shown, caret) = clip_line("let x = 1", 4);
        assert_eq!(shown, "let x = 1");
        assert_eq!(caret, 4);
    }

    #[test]
    fn clip_long_line_truncates_both_ends() {
        let line: String = std::iter::repeat('a').take(300).collect();
        let (shown, caret) = clip_line(&line, 150);
        assert_eq!(shown.chars().count(), MAX_LINE_WIDTH);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with("..."));
        // The caret stays inside the window.
        assert!(caret < MAX_LINE_WIDTH);
    }

    #[test]
    fn clip_long_line_start_keeps_head() {
        let line: String = std::iter::repeat('b').take(300).collect();
        let (shown, caret) = clip_line(&line, 0);
        assert!(!shown.starts_with("..."));
        assert!(shown.ends_with("..."));
        assert_eq!(caret, 0);
    }
}
