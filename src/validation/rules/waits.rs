//! Hard-coded waits.

use regex::Regex;

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{expand_tabs, Model, SourceFile};
use crate::validation::engine::{Rule, Violation};

/// Flags calls to the wait keyword (`Sleep`), unless the previous line
/// mentions one of `wait_exceptions` (logging or traffic setup, where a
/// pause is expected).
pub struct DisallowedWaitRule;

impl DisallowedWaitRule {
    fn patterns(config: &Config) -> Result<(Regex, Option<Regex>), LintError> {
        let wait = Regex::new(&format!(r"(?i){}\s{{2,}}", regex::escape(&config.wait_keyword)))
            .map_err(|e| LintError::rule("disallowed-wait", e.to_string()))?;

        if config.wait_exceptions.is_empty() {
            return Ok((wait, None));
        }
        let alternatives: Vec<String> = config
            .wait_exceptions
            .iter()
            .map(|word| regex::escape(word))
            .collect();
        let exceptions = Regex::new(&format!("(?i)({})", alternatives.join("|")))
            .map_err(|e| LintError::rule("disallowed-wait", e.to_string()))?;
        Ok((wait, Some(exceptions)))
    }
}

impl Rule for DisallowedWaitRule {
    fn id(&self) -> &'static str {
        "disallowed-wait"
    }

    fn label(&self) -> &'static str {
        "Content"
    }

    fn title(&self, _config: &Config) -> String {
        "check if sleep is allowed".to_string()
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        _model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let (wait, exceptions) = Self::patterns(config)?;
        let mut violations = Vec::new();
        let mut previous = String::new();

        for (number, raw) in file.numbered_lines() {
            let line = expand_tabs(raw);
            if line.trim_start().starts_with('#') {
                continue;
            }
            let excused = exceptions
                .as_ref()
                .is_some_and(|exceptions| exceptions.is_match(&previous));
            if wait.is_match(&line) && !excused {
                violations.push(self.violation(file, number, line.trim().to_string()));
            }
            previous = line;
        }

        Ok(violations)
    }
}
