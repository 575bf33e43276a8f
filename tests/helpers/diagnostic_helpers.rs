//! Diagnostic assertion helpers for build tests.

use scraphand::{Diagnostics, Severity};

/// Codes of all diagnostics, in report order.
pub fn diagnostic_codes(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .iter()
        .filter_map(|d| d.code().map(str::to_string))
        .collect()
}

/// Assert a build reported no errors or warnings.
pub fn assert_clean(diagnostics: &Diagnostics) {
    let problems: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity != Severity::Info)
        .collect();
    assert!(
        problems.is_empty(),
        "Expected no errors or warnings, got {}:\n{}",
        problems.len(),
        problems
            .iter()
            .map(|d| format!("  {d}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
