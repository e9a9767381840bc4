//! Naming conventions for test cases, keywords, and variables.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{Model, SectionKind, SourceFile};
use crate::validation::engine::{Rule, Violation};
use crate::validation::keywords::{
    is_recommended_keyword, keyword_definitions, keyword_invocations,
};

const CASE_NAME_SYMBOLS: &str = "~!@#$%^&*(){}:\"<>?|`[];,./+=";

const VARIABLE_SIGILS: &[char] = &['$', '@', '&', '%'];

static SET_SCOPED_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)set[\s_](?:suite|global|test)[\s_]variable\s+(?P<var>[$@&%]\{.*?\})")
        .expect("valid regex")
});

/// Test case names are `Underscore_Separated` words, each starting uppercase
/// (or with a digit), with no spaces, hyphens, or symbols.
pub fn is_recommended_case_name(name: &str) -> bool {
    if name.contains([' ', '-']) {
        return false;
    }
    if name.chars().any(|c| CASE_NAME_SYMBOLS.contains(c)) {
        return false;
    }
    name.split('_')
        .all(|word| !word.chars().next().is_some_and(char::is_lowercase))
}

/// Global, suite, and test variables are fully uppercase with underscores.
pub fn is_recommended_variable(name: &str) -> bool {
    if name.contains(['-', ' ']) {
        return false;
    }
    let has_cased = name.chars().any(char::is_uppercase);
    has_cased && !name.chars().any(char::is_lowercase)
}

/// Flags test case titles that break the naming convention.
pub struct CaseNameRule;

impl Rule for CaseNameRule {
    fn id(&self) -> &'static str {
        "case-name"
    }

    fn label(&self) -> &'static str {
        "Case Name"
    }

    fn title(&self, _config: &Config) -> String {
        "check case name should be titled with underline and no special character".to_string()
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        _config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let violations = model
            .test_cases()
            .filter(|block| !is_recommended_case_name(&block.name))
            .map(|block| self.violation(file, block.line, block.name.clone()))
            .collect();
        Ok(violations)
    }
}

/// Flags keyword calls and keyword definitions that are not Title Cased.
pub struct KeywordNameRule;

impl Rule for KeywordNameRule {
    fn id(&self) -> &'static str {
        "keyword-name"
    }

    fn label(&self) -> &'static str {
        "Keyword"
    }

    fn title(&self, _config: &Config) -> String {
        "check keyword name should be titled with space".to_string()
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let mut found = keyword_definitions(model);
        found.extend(keyword_invocations(model, config));
        found.sort_by_key(|invocation| invocation.line);

        let violations = found
            .into_iter()
            .filter(|invocation| !is_recommended_keyword(invocation.name))
            .map(|invocation| self.violation(file, invocation.line, invocation.name.to_string()))
            .collect();
        Ok(violations)
    }
}

/// Flags variables declared in a Variables section, or promoted with
/// `Set Suite/Global/Test Variable`, that are not uppercase.
pub struct VariableNameRule;

impl Rule for VariableNameRule {
    fn id(&self) -> &'static str {
        "variable-name"
    }

    fn label(&self) -> &'static str {
        "Variable"
    }

    fn title(&self, _config: &Config) -> String {
        "check global/suite/test variables should be uppercase with underline".to_string()
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        _config: &Config,
    ) -> Result<Vec<Violation>, LintError> {
        let mut violations = Vec::new();

        for step in model
            .sections_of(SectionKind::Variables)
            .flat_map(|section| section.steps())
        {
            let Some(head) = step.head() else {
                continue;
            };
            if !head.starts_with(VARIABLE_SIGILS) {
                continue;
            }
            let name = head.trim_end_matches('=').trim_end();
            if !is_recommended_variable(name) {
                violations.push(self.violation(file, step.line(), name.to_string()));
            }
        }

        for (number, line) in file.numbered_lines() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let Some(captures) = SET_SCOPED_VARIABLE.captures(line) else {
                continue;
            };
            let name = &captures["var"];
            if !is_recommended_variable(name) {
                violations.push(self.violation(file, number, name.to_string()));
            }
        }

        violations.sort_by_key(|violation| violation.line);
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_names() {
        assert!(is_recommended_case_name("TC_001_Basic"));
        assert!(!is_recommended_case_name("tc_bad"));
        assert!(!is_recommended_case_name("TC Bad Name"));
        assert!(!is_recommended_case_name("TC-Bad"));
        assert!(!is_recommended_case_name("TC_Bad(1)"));
        assert!(!is_recommended_case_name("TC_Good_then_bad"));
    }

    #[test]
    fn test_variable_names() {
        assert!(is_recommended_variable("${GLOBAL_VAR}"));
        assert!(is_recommended_variable("@{LIST_1}"));
        assert!(!is_recommended_variable("${global_var}"));
        assert!(!is_recommended_variable("${MY VAR}"));
        assert!(!is_recommended_variable("${MY-VAR}"));
        assert!(!is_recommended_variable("${1}"));
    }
}
