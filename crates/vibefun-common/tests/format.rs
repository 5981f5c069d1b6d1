//! Snapshot tests for diagnostic rendering.
//!
//! Each test builds a diagnostic from the registry, renders it through
//! `Diagnostic::format`, and snapshots the output with insta. These pin
//! the exact layout: severity/code header, location arrow, caret line,
//! and hint.

use vibefun_common::{Diagnostic, Location};

#[test]
fn test_mismatch_with_caret() {
    let diagnostic = Diagnostic::new(
        "VF4024",
        Location::new("demo.vf", 2, 9, 18),
        &[("expected", "Int".into()), ("found", "String".into())],
    );
    let output = diagnostic.format(Some("let a = 1\nlet x = \"hello\"\n"));
    insta::assert_snapshot!(output);
}

#[test]
fn test_exhaustiveness_hint() {
    let diagnostic = Diagnostic::new(
        "VF4400",
        Location::new("demo.vf", 1, 1, 0),
        &[("missing", "Blue".into())],
    );
    let output = diagnostic.format(None);
    insta::assert_snapshot!(output);
}

#[test]
fn test_cycle_warning() {
    let diagnostic = Diagnostic::new(
        "VF5900",
        Location::new("a.vf", 1, 1, 0),
        &[("cycle", "a.vf -> b.vf -> a.vf".into())],
    );
    let output = diagnostic.format(None);
    insta::assert_snapshot!(output);
}
