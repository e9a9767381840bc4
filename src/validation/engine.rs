use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{Model, ParseWarning, SourceFile};

// =====================
// Core Data Structures
// =====================

/// How a violation affects the overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Reported, but never fails the check.
    Info,
    Error,
}

/// One rule hit at one line of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub rule: &'static str,
    pub label: &'static str,
    pub detail: String,
    pub severity: Severity,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line Index: {}, {}: {}", self.line, self.label, self.detail)
    }
}

/// Everything the engine found in one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Sorted by line; ties keep rule registration order.
    pub violations: Vec<Violation>,
    /// Ids of rules that could not be evaluated.
    pub failed_rules: Vec<String>,
    pub warnings: Vec<ParseWarning>,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// True when no error-severity rule fired.
    pub fn passed(&self) -> bool {
        self.violations
            .iter()
            .all(|violation| violation.severity == Severity::Info)
    }

    /// Violations produced by one rule.
    pub fn violations_of<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.rule == rule)
    }
}

// =====================
// Traits
// =====================

/// A single, stateless style or complexity check.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `line-length`.
    fn id(&self) -> &'static str;

    /// Label printed in front of each violation's detail.
    fn label(&self) -> &'static str;

    /// Heading printed above the rule's section of the report.
    fn title(&self, config: &Config) -> String;

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn evaluate(
        &self,
        file: &SourceFile,
        model: &Model,
        config: &Config,
    ) -> Result<Vec<Violation>, LintError>;

    /// Builds a violation stamped with this rule's identity.
    fn violation(&self, file: &SourceFile, line: usize, detail: String) -> Violation {
        Violation {
            path: file.path().to_path_buf(),
            line,
            rule: self.id(),
            label: self.label(),
            detail,
            severity: self.severity(),
        }
    }
}

// =====================
// Engine
// =====================

/// Ordered rule table plus the configuration every rule is evaluated with.
pub struct RuleEngine {
    config: Arc<Config>,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// An engine with no rules registered.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            rules: Vec::new(),
        }
    }

    /// An engine with the full default rule table.
    pub fn with_default_rules(config: Arc<Config>) -> Self {
        let mut engine = Self::new(config);
        engine.rules.extend(super::rules::default_rules());
        engine
    }

    pub fn register(&mut self, rule: impl Rule + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every rule against one file.
    ///
    /// A rule that returns an error or panics is logged and recorded in
    /// [`FileReport::failed_rules`]; the remaining rules still run.
    pub fn check(&self, file: &SourceFile, model: &Model) -> FileReport {
        let mut report = FileReport::new(file.path());
        report.warnings = model.warnings.clone();

        for rule in &self.rules {
            match self.evaluate_isolated(rule.as_ref(), file, model) {
                Ok(violations) => report.violations.extend(violations),
                Err(e) => {
                    error!(path = %file.path().display(), "{e}");
                    report.failed_rules.push(rule.id().to_string());
                }
            }
        }

        report.violations.sort_by_key(|violation| violation.line);
        debug!(
            path = %file.path().display(),
            violations = report.violations.len(),
            "checked file"
        );
        report
    }

    fn evaluate_isolated(
        &self,
        rule: &dyn Rule,
        file: &SourceFile,
        model: &Model,
    ) -> Result<Vec<Violation>, LintError> {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(file, model, &self.config)));
        match outcome {
            Ok(result) => result,
            Err(payload) => Err(LintError::rule(rule.id(), panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "rule panicked".to_string()
}
