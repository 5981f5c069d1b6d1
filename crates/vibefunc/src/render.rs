//! Pretty diagnostic reports via ariadne.
//!
//! The core's `Diagnostic::format` is the plain, machine-stable
//! rendering; this module is the rich terminal presentation the driver
//! uses when the module source is on hand.

use ariadne::{Config, Label, Report, ReportKind, Source};

use vibefun_common::{Diagnostic, Severity};

/// Render one diagnostic against its source as an ariadne report.
///
/// Colorless output so the text is stable for logs and tests; the caller
/// decides whether to re-enable color for a TTY.
pub fn render_with_source(diagnostic: &Diagnostic, source: &str) -> String {
    let start = (diagnostic.location.offset as usize).min(source.len());
    let end = (start + 1).min(source.len()).max(start);
    let kind = match diagnostic.severity() {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let mut report = Report::<std::ops::Range<usize>>::build(kind, start..end)
        .with_config(Config::default().with_color(false))
        .with_message(format!("[{}] {}", diagnostic.code(), diagnostic.message))
        .with_label(Label::new(start..end).with_message(diagnostic.definition.title));
    if let Some(hint) = &diagnostic.hint {
        report = report.with_help(hint);
    }

    let mut buf = Vec::new();
    let _ = report.finish().write(Source::from(source), &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
