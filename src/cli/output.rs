//! Handles all user-facing output for the CLI.
//!
//! Colored summaries and diffs go to stdout; diagnostics go to stderr through
//! `tracing` and `miette`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::pipeline::RewriteSummary;
use crate::report::{Report, FAILED_BANNER, PASSED_BANNER};

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints the one-line verdict of a check run.
pub fn print_check_summary(report: &Report, report_path: &std::path::Path) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let passed = report.passed();
    let color = if passed { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{}", if passed { PASSED_BANNER } else { FAILED_BANNER });
    let _ = stdout.reset();
    let _ = writeln!(
        stdout,
        "{} files checked, {} violations in {} files, {} unreadable. Report: {}",
        report.files.len() + report.unreadable.len(),
        report.violation_count(),
        report.files_with_violations(),
        report.unreadable.len(),
        report_path.display()
    );
}

/// Prints what a rewrite did, with colored diffs when they were kept.
pub fn print_rewrite_summary(action: &str, summary: &RewriteSummary) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for (path, before, after) in &summary.changes {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = writeln!(stdout, "--- {} ---", path.display());
        let _ = stdout.reset();
        let changeset = Changeset::new(before, after, "\n");
        print_diff(&mut stdout, &changeset.diffs);
    }

    for (path, reason) in &summary.conflicts {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = writeln!(stdout, "skipped {}: {reason}", path.display());
    }
    for (path, reason) in &summary.failed {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stdout, "failed {}: {reason}", path.display());
    }
    let _ = stdout.reset();

    let _ = writeln!(
        stdout,
        "{action}: {} rewritten, {} unchanged, {} skipped, {} failed",
        summary.rewritten.len(),
        summary.unchanged.len(),
        summary.conflicts.len(),
        summary.failed.len()
    );
}

/// Prints test-case names grouped by file.
pub fn print_cases(cases: &BTreeMap<PathBuf, Vec<String>>) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for (path, names) in cases {
        let _ = stdout.set_color(ColorSpec::new().set_bold(true));
        let _ = writeln!(stdout, "{}", path.display());
        let _ = stdout.reset();
        if names.is_empty() {
            let _ = writeln!(stdout, "  (no test cases)");
        }
        for name in names {
            let _ = writeln!(stdout, "  {name}");
        }
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        let (marker, color, text) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
        };
        for line in text.lines() {
            let _ = stdout.set_color(ColorSpec::new().set_fg(color));
            let _ = writeln!(stdout, "{marker}{line}");
        }
    }
    let _ = stdout.reset();
}
