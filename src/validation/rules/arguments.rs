//! Checks on `[Arguments]` option steps.

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{Model, SourceFile, Step};
use crate::validation::engine::{Rule, Violation};

const ARGUMENTS_OPTION: &str = "[Arguments]";

fn argument_steps(model: &Model) -> impl Iterator<Item = &Step> {
    model
        .sections
        .iter()
        .flat_map(|section| section.blocks.iter())
        .flat_map(|block| block.options.iter())
        .filter(|step| {
            step.head()
                .is_some_and(|head| head.eq_ignore_ascii_case(ARGUMENTS_OPTION))
        })
}

/// Flags keywords that take more than `max_keyword_arguments` arguments.
pub struct ArgumentCountRule;

impl Rule for ArgumentCountRule {
    fn id(&self) -> &'static str {
        "argument-count"
    }

    fn label(&self) -> &'static str {
        "Arguments Count"
    }

    fn title(&self, config: &Config) -> String {
        format!(
            "check keyword arguments no more than {}",
            config.max_keyword_arguments
        )
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let violations = argument_steps(model)
            .filter_map(|step| {
                let count = step.values().count();
                (count > config.max_keyword_arguments)
                    .then(|| self.violation(file, step.line(), count.to_string()))
            })
            .collect();
        Ok(violations)
    }
}

/// Flags arguments whose default value is a boolean literal.
pub struct BooleanArgumentRule;

impl Rule for BooleanArgumentRule {
    fn id(&self) -> &'static str {
        "boolean-argument"
    }

    fn label(&self) -> &'static str {
        "Argument has boolean value"
    }

    fn title(&self, _config: &Config) -> String {
        "check keyword arguments not boolean".to_string()
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let mut violations = Vec::new();
        for step in argument_steps(model) {
            for (index, line) in step.lines.iter().enumerate() {
                // The first cell of the first line is the option itself.
                let skip = usize::from(index == 0);
                for argument in line.cells.iter().skip(skip) {
                    let Some((name, default)) = split_default(argument) else {
                        continue;
                    };
                    let default = default.to_lowercase();
                    let is_boolean = config
                        .boolean_values
                        .iter()
                        .any(|value| value.to_lowercase() == default);
                    if is_boolean {
                        violations.push(self.violation(file, line.number, name.to_string()));
                    }
                }
            }
        }
        Ok(violations)
    }
}

/// Splits `${name}=default` into its name and default value.
fn split_default(argument: &str) -> Option<(&str, &str)> {
    let (name, _) = argument.split_once('=')?;
    let (_, default) = argument.rsplit_once('=')?;
    Some((name, default))
}
