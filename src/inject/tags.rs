use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::tokenizer::value_column;
use crate::syntax::{build_model, SectionKind, SourceFile, Step, CONTINUATION_MARKER};

/// Settings key of the directive that tags every test in a file.
pub const FORCE_TAGS: &str = "Force Tags";

const SETTINGS_HEADER: &str = "*** Settings ***";
const TAG_SEPARATOR: &str = "    ";

// =====================
// Tag directive
// =====================

/// An ordered, duplicate-free tag list and the column its values start at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective {
    pub tags: Vec<String>,
    pub column: usize,
}

impl TagDirective {
    pub fn new(column: usize) -> Self {
        Self {
            tags: Vec::new(),
            column,
        }
    }

    /// Reads the tags of an existing directive step.
    ///
    /// Cells are split on whitespace, so a tag written with single spaces
    /// becomes several tags.
    pub fn from_step(step: &Step, column: usize) -> Self {
        let mut directive = Self::new(column);
        let words = step
            .values()
            .flat_map(str::split_whitespace)
            .filter(|word| *word != CONTINUATION_MARKER)
            .map(str::to_string)
            .collect::<Vec<_>>();
        directive.merge(&words);
        directive
    }

    /// Appends tags not already present, keeping first-seen order.
    /// Returns how many were added.
    pub fn merge(&mut self, tags: &[String]) -> usize {
        let before = self.tags.len();
        for tag in tags {
            if !self.tags.contains(tag) {
                self.tags.push(tag.clone());
            }
        }
        self.tags.len() - before
    }

    /// Lays the directive out over as many lines as needed so that no line
    /// exceeds `max_line` characters. A line always holds at least one tag.
    pub fn render(&self, max_line: usize) -> Vec<String> {
        let mut rows: Vec<Vec<&str>> = Vec::new();
        for tag in &self.tags {
            let tag_len = tag.chars().count();
            match rows.last_mut() {
                Some(row) if self.row_len(row) + TAG_SEPARATOR.len() + tag_len <= max_line => {
                    row.push(tag);
                }
                _ => rows.push(vec![tag]),
            }
        }

        if rows.is_empty() {
            return vec![FORCE_TAGS.to_string()];
        }
        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                let key = if index == 0 { FORCE_TAGS } else { CONTINUATION_MARKER };
                let padding = self.column.saturating_sub(key.chars().count());
                format!("{key}{}{}", " ".repeat(padding), row.join(TAG_SEPARATOR))
            })
            .collect()
    }

    fn row_len(&self, row: &[&str]) -> usize {
        let tags: usize = row.iter().map(|tag| tag.chars().count()).sum();
        self.column + tags + TAG_SEPARATOR.len() * row.len().saturating_sub(1)
    }
}

// =====================
// Injector
// =====================

pub struct TagInjector {
    config: Arc<Config>,
}

impl TagInjector {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Merges `tags` into the file's `Force Tags` directive and returns the
    /// new text.
    ///
    /// - no Settings section: one is prepended together with the directive;
    /// - no directive: it is appended to the Settings section;
    /// - existing directive: tags are merged and the directive re-wrapped.
    ///
    /// Returns [`LintError::TagsAlreadyPresent`] when nothing would change.
    pub fn merge_tags(&self, path: &Path, text: &str, tags: &[String]) -> Result<String, LintError> {
        let file = SourceFile::new(path, text);
        let model = build_model(&file);
        let mut lines: Vec<String> = file.lines().to_vec();

        let Some(settings) = model.section(SectionKind::Settings) else {
            let mut directive = TagDirective::new(self.config.tags_min_column);
            directive.merge(tags);
            let mut new_lines = vec![SETTINGS_HEADER.to_string()];
            new_lines.extend(directive.render(self.config.tags_max_line));
            new_lines.push(String::new());
            new_lines.extend(lines);
            return Ok(join_lines(&new_lines, text));
        };

        let existing = settings
            .steps()
            .find(|step| step.head().is_some_and(|head| head.eq_ignore_ascii_case(FORCE_TAGS)));

        match existing {
            Some(step) => {
                let column = file
                    .line(step.line())
                    .and_then(value_column)
                    .unwrap_or(0)
                    .max(self.config.tags_min_column);
                let mut directive = TagDirective::from_step(step, column);
                if directive.merge(tags) == 0 {
                    return Err(LintError::TagsAlreadyPresent {
                        path: path.to_path_buf(),
                    });
                }
                let first = step.line() - 1;
                let last = step.last_line();
                // Comments between continuation lines move below the directive.
                let comments: Vec<String> = lines[first..last]
                    .iter()
                    .filter(|line| line.trim_start().starts_with('#'))
                    .cloned()
                    .collect();
                let mut rendered = directive.render(self.config.tags_max_line);
                rendered.extend(comments);
                lines.splice(first..last, rendered);
            }
            None => {
                let column = settings
                    .steps()
                    .filter_map(|step| file.line(step.line()).and_then(value_column))
                    .max()
                    .unwrap_or(0)
                    .max(self.config.tags_min_column);
                let mut directive = TagDirective::new(column);
                directive.merge(tags);
                let after = settings.last_content_line();
                lines.splice(after..after, directive.render(self.config.tags_max_line));
            }
        }

        Ok(join_lines(&lines, text))
    }
}

/// Joins lines, keeping the original text's trailing newline convention.
fn join_lines(lines: &[String], original: &str) -> String {
    let mut text = lines.join("\n");
    if original.is_empty() || original.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_wraps_at_budget() {
        let mut directive = TagDirective::new(14);
        let long_a = "a".repeat(60);
        let long_b = "b".repeat(60);
        directive.merge(&tags(&[&long_a, &long_b, "short"]));
        let lines = directive.render(120);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.chars().count() <= 120));
        assert_eq!(lines[0], format!("Force Tags    {long_a}"));
        assert_eq!(lines[1], format!("...{}{long_b}    short", " ".repeat(11)));
    }

    #[test]
    fn test_comments_inside_directive_are_kept() {
        let injector = TagInjector::new(Arc::new(Config::default()));
        let text = "*** Settings ***\nForce Tags    A\n# keep me\n...    B\n\n*** Test Cases ***\nTC_1\n    Log    x\n";
        let merged = injector
            .merge_tags(Path::new("a.robot"), text, &tags(&["C"]))
            .unwrap();
        assert!(merged.starts_with("*** Settings ***\nForce Tags    A    B    C\n# keep me\n\n"));
        assert!(merged.ends_with("*** Test Cases ***\nTC_1\n    Log    x\n"));
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let mut directive = TagDirective::new(14);
        directive.merge(&tags(&["A", "B"]));
        assert_eq!(directive.merge(&tags(&["B", "C", "A"])), 1);
        assert_eq!(directive.tags, tags(&["A", "B", "C"]));
    }
}
