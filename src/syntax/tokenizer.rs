//! Cell tokenizer.
//!
//! A physical line is split into cells on every maximal run of two or more
//! spaces. Tabs are expanded to four spaces first, so a single tab also acts
//! as a delimiter.

use once_cell::sync::Lazy;
use regex::Regex;

/// The cell that marks a continuation of the previous step.
pub const CONTINUATION_MARKER: &str = "...";

/// Number of spaces a tab expands to.
pub const TAB_WIDTH: usize = 4;

static CELL_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Replaces every tab with [`TAB_WIDTH`] spaces.
pub fn expand_tabs(line: &str) -> String {
    line.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Splits a line into trimmed, non-empty cells.
///
/// The line is expected to have its tabs expanded already; stray tabs are
/// expanded here anyway so the result never depends on the caller.
pub fn tokenize(line: &str) -> Vec<String> {
    let expanded;
    let line = if line.contains('\t') {
        expanded = expand_tabs(line);
        expanded.as_str()
    } else {
        line
    };

    CELL_DELIMITER
        .split(line)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the number of leading spaces of an already tab-expanded line.
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Returns the character column at which the second cell of a line starts.
///
/// Used to find where the value part of a `key    value` line begins.
pub fn value_column(line: &str) -> Option<usize> {
    let line = expand_tabs(line);
    let trimmed = line.trim_start();
    let offset = line.len() - trimmed.len();
    let found = CELL_DELIMITER.find(trimmed)?;
    if trimmed[found.end()..].trim().is_empty() {
        return None;
    }
    Some(line[..offset + found.end()].chars().count())
}
