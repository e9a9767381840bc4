//! Checks on the raw text: line length, file length, tabs.

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{Model, SourceFile};
use crate::validation::engine::{Rule, Violation};

/// Flags lines of `max_line_columns` characters or more.
pub struct LineLengthRule;

impl Rule for LineLengthRule {
    fn id(&self) -> &'static str {
        "line-length"
    }

    fn label(&self) -> &'static str {
        "Line Length"
    }

    fn title(&self, config: &Config) -> String {
        format!(
            "check robot line shall be shorter than {} columns",
            config.max_line_columns
        )
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        _model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let violations = file
            .numbered_lines()
            .filter_map(|(number, line)| {
                let length = line.chars().count();
                (length >= config.max_line_columns)
                    .then(|| self.violation(file, number, length.to_string()))
            })
            .collect();
        Ok(violations)
    }
}

/// Flags files longer than `max_file_lines` lines.
///
/// The violation points at the first line past the budget.
pub struct FileSizeRule;

impl Rule for FileSizeRule {
    fn id(&self) -> &'static str {
        "file-size"
    }

    fn label(&self) -> &'static str {
        "Line Count"
    }

    fn title(&self, config: &Config) -> String {
        format!(
            "check robot file counts no more than {}",
            config.max_file_lines
        )
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        _model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let count = file.line_count();
        if count <= config.max_file_lines {
            return Ok(Vec::new());
        }
        Ok(vec![self.violation(
            file,
            config.max_file_lines + 1,
            count.to_string(),
        )])
    }
}

/// Flags every line containing a tab character.
pub struct TabRule;

impl Rule for TabRule {
    fn id(&self) -> &'static str {
        "tab"
    }

    fn label(&self) -> &'static str {
        "Content"
    }

    fn title(&self, _config: &Config) -> String {
        "check if robot contains tab".to_string()
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        _model: &Model,
        _config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let violations = file
            .numbered_lines()
            .filter(|(_, line)| line.contains('\t'))
            .map(|(number, line)| self.violation(file, number, line.to_string()))
            .collect();
        Ok(violations)
    }
}
