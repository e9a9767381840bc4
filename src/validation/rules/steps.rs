//! Complexity checks: steps per keyword, per test case, per for loop.

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{Block, Model, SourceFile, CONTINUATION_MARKER};
use crate::validation::engine::{Rule, Severity, Violation};

fn oversized<'a>(
    blocks: impl Iterator<Item = &'a Block>,
    limit: usize,
) -> impl Iterator<Item = (&'a Block, usize)> {
    blocks
        .map(|block| (block, block.steps.len()))
        .filter(move |(_, count)| *count > limit)
}

/// Reports keywords with more than `max_keyword_steps` steps.
///
/// Informational only: never fails the overall check.
pub struct KeywordStepsRule;

impl Rule for KeywordStepsRule {
    fn id(&self) -> &'static str {
        "keyword-steps"
    }

    fn label(&self) -> &'static str {
        "Step Number"
    }

    fn title(&self, config: &Config) -> String {
        format!("check keyword steps no more than {}", config.max_keyword_steps)
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let violations = oversized(model.keywords(), config.max_keyword_steps)
            .map(|(block, count)| self.violation(file, block.line, format!("{}: {count}", block.name)))
            .collect();
        Ok(violations)
    }
}

/// Flags test cases with more than `max_case_steps` steps.
pub struct CaseStepsRule;

impl Rule for CaseStepsRule {
    fn id(&self) -> &'static str {
        "case-steps"
    }

    fn label(&self) -> &'static str {
        "Step Number"
    }

    fn title(&self, config: &Config) -> String {
        format!("check case steps no more than {}", config.max_case_steps)
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let violations = oversized(model.test_cases(), config.max_case_steps)
            .map(|(block, count)| self.violation(file, block.line, format!("{}: {count}", block.name)))
            .collect();
        Ok(violations)
    }
}

/// Flags old-style `:FOR` loops whose body has more than
/// `max_for_loop_steps` lines.
///
/// The loop body is the run of lines starting with `\` right after the
/// loop header. Continuation lines neither count nor end the loop; any other
/// line ends it.
pub struct ForLoopStepsRule;

impl Rule for ForLoopStepsRule {
    fn id(&self) -> &'static str {
        "for-loop-steps"
    }

    fn label(&self) -> &'static str {
        "For loop steps number"
    }

    fn title(&self, config: &Config) -> String {
        format!("check for loop steps no more than {}", config.max_for_loop_steps)
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        _model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let mut violations = Vec::new();
        // (header line, body lines so far)
        let mut open: Option<(usize, usize)> = None;

        let mut close = |open: &mut Option<(usize, usize)>| {
            if let Some((header, count)) = open.take() {
                if count > config.max_for_loop_steps {
                    violations.push(self.violation(file, header, count.to_string()));
                }
            }
        };

        for (number, line) in file.numbered_lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(config.loop_start.as_str()) {
                close(&mut open);
                open = Some((number, 0));
                continue;
            }
            let Some((_, count)) = open.as_mut() else {
                continue;
            };
            if trimmed.starts_with(config.loop_body_prefix.as_str()) {
                *count += 1;
            } else if !trimmed.starts_with(CONTINUATION_MARKER) {
                close(&mut open);
            }
        }
        close(&mut open);

        Ok(violations)
    }
}
