//! robocheck error handling.
//!
//! One error enum covers every failure the tool can report. Each variant
//! carries a `miette` diagnostic code and, where useful, a help line, so the
//! CLI can render any of them with full diagnostics.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Error, Diagnostic, Debug)]
pub enum LintError {
    #[error("failed to access '{}': {source}", path.display())]
    #[diagnostic(code(robocheck::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not valid JSON: {source}", path.display())]
    #[diagnostic(
        code(robocheck::json),
        help("branch sidecar files must contain a single JSON object")
    )]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' is not a JSON object", path.display())]
    #[diagnostic(code(robocheck::json::not_an_object))]
    NotAnObject { path: PathBuf },

    #[error("invalid configuration in '{}': {source}", path.display())]
    #[diagnostic(code(robocheck::config))]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("given path is not a directory or does not exist: {}", path.display())]
    #[diagnostic(
        code(robocheck::invalid_root),
        help("pass the directory that contains your .robot files")
    )]
    InvalidRoot { path: PathBuf },

    #[error("failed to walk directory '{}': {message}", path.display())]
    #[diagnostic(code(robocheck::walk))]
    Walk { path: PathBuf, message: String },

    #[error("failed to start worker pool: {message}")]
    #[diagnostic(code(robocheck::workers))]
    WorkerPool { message: String },

    #[error("rule '{rule}' failed: {message}")]
    #[diagnostic(code(robocheck::rule))]
    RuleFailed { rule: String, message: String },

    #[error("branch '{branch}' already exists in {}", path.display())]
    #[diagnostic(code(robocheck::conflict::branch))]
    BranchExists { branch: String, path: PathBuf },

    #[error("all tags are already present in {}", path.display())]
    #[diagnostic(code(robocheck::conflict::tags))]
    TagsAlreadyPresent { path: PathBuf },

    #[error("could not find a branch starting with '{prefix}' in {}", path.display())]
    #[diagnostic(
        code(robocheck::branch::template),
        help("the trunk branch record is used as the template for new branches")
    )]
    TemplateNotFound { prefix: String, path: PathBuf },

    #[error("branch '{branch}' has no entry starting with '{marker}' in {}", path.display())]
    #[diagnostic(code(robocheck::branch::root))]
    RootEntryNotFound {
        branch: String,
        marker: String,
        path: PathBuf,
    },
}

/// Coarse grouping used to decide how a failure affects a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid arguments or configuration; aborts the command.
    Startup,
    /// A single rule could not be evaluated.
    Rule,
    /// A single file could not be read, parsed, or rewritten.
    Rewrite,
    /// The requested metadata is already present; safe to skip.
    Conflict,
}

impl LintError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleFailed {
            rule: rule.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. }
            | Self::InvalidRoot { .. }
            | Self::Walk { .. }
            | Self::WorkerPool { .. } => ErrorCategory::Startup,
            Self::RuleFailed { .. } => ErrorCategory::Rule,
            Self::BranchExists { .. } | Self::TagsAlreadyPresent { .. } => {
                ErrorCategory::Conflict
            }
            Self::Io { .. }
            | Self::Json { .. }
            | Self::NotAnObject { .. }
            | Self::TemplateNotFound { .. }
            | Self::RootEntryNotFound { .. } => ErrorCategory::Rewrite,
        }
    }

    /// Conflicts are idempotent-safe: the file is skipped with a warning.
    pub fn is_conflict(&self) -> bool {
        self.category() == ErrorCategory::Conflict
    }
}

/// Prints an error with full miette diagnostics.
pub fn print_error(error: LintError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
