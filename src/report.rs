//! Check-run report.
//!
//! [`Report`] aggregates the per-file results of a run in path order and
//! renders the human-readable report: one banner per rule, then every file
//! that rule fired in. [`ReportLog`] is the file the rendered text goes to.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

use crate::config::Config;
use crate::errors::LintError;
use crate::validation::{FileReport, Rule};

const BANNER_WIDTH: usize = 90;
const TITLE_STARS: &str = "********";

pub const PASSED_BANNER: &str = "Congratulations. All Check Points Passed...";
pub const FAILED_BANNER: &str =
    "!!!!!!!!!! You Got Check Points Failed, Please Check Carefully !!!!!!!!!!";

// =====================
// Report model
// =====================

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub files: BTreeMap<PathBuf, FileReport>,
    /// Files that could not be read, with the reason.
    pub unreadable: BTreeMap<PathBuf, String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report: FileReport) {
        self.files.insert(report.path.clone(), report);
    }

    pub fn insert_unreadable(&mut self, path: impl Into<PathBuf>, error: &LintError) {
        self.unreadable.insert(path.into(), error.to_string());
    }

    /// True when every file was read and no error-severity rule fired.
    pub fn passed(&self) -> bool {
        self.unreadable.is_empty() && self.files.values().all(FileReport::passed)
    }

    pub fn violation_count(&self) -> usize {
        self.files.values().map(|file| file.violations.len()).sum()
    }

    /// Files with at least one violation of any severity.
    pub fn files_with_violations(&self) -> usize {
        self.files
            .values()
            .filter(|file| !file.violations.is_empty())
            .count()
    }

    /// Renders the report in rule order.
    pub fn render(&self, rules: &[Box<dyn Rule>], config: &Config) -> String {
        let mut out = String::new();

        for rule in rules {
            out.push_str(&banner(&rule.title(config)));
            for file in self.files.values() {
                let mut hits = file.violations_of(rule.id()).peekable();
                if hits.peek().is_none() {
                    continue;
                }
                out.push_str(&format!("\nFile Name: {}\n", file.path.display()));
                for violation in hits {
                    out.push_str(&format!("{violation}\n"));
                }
            }
        }

        let troubled: Vec<&FileReport> = self
            .files
            .values()
            .filter(|file| !file.failed_rules.is_empty() || !file.warnings.is_empty())
            .collect();
        if !troubled.is_empty() || !self.unreadable.is_empty() {
            out.push_str(&banner("Files That Could Not Be Fully Checked"));
            for (path, reason) in &self.unreadable {
                out.push_str(&format!("\nFile Name: {}\nUnreadable: {reason}\n", path.display()));
            }
            for file in troubled {
                out.push_str(&format!("\nFile Name: {}\n", file.path.display()));
                for rule in &file.failed_rules {
                    out.push_str(&format!("Rule Failed: {rule}\n"));
                }
                for warning in &file.warnings {
                    out.push_str(&format!("Line Index: {}, Warning: {}\n", warning.line, warning.message));
                }
            }
        }

        let verdict = if self.passed() { PASSED_BANNER } else { FAILED_BANNER };
        out.push_str(&format!("\n{verdict}\n"));
        out
    }
}

fn banner(title: &str) -> String {
    let rule = "-".repeat(BANNER_WIDTH);
    format!("\n{rule}\n{TITLE_STARS} {title} {TITLE_STARS}\n{rule}\n")
}

// =====================
// Report log
// =====================

/// Append-only report file, truncated when created.
///
/// Appends are serialized, so the log can be shared between workers.
#[derive(Debug)]
pub struct ReportLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ReportLog {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| LintError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, text: &str) -> Result<(), LintError> {
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| LintError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{RuleEngine, Severity, Violation};
    use std::sync::Arc;

    fn violation(path: &str, line: usize, severity: Severity) -> Violation {
        Violation {
            path: PathBuf::from(path),
            line,
            rule: "line-length",
            label: "Line Length",
            detail: "151".into(),
            severity,
        }
    }

    #[test]
    fn test_render_groups_by_rule_then_file() {
        let engine = RuleEngine::with_default_rules(Arc::new(Config::default()));
        let mut report = Report::new();
        let mut file = FileReport::new("a.robot");
        file.violations.push(violation("a.robot", 3, Severity::Error));
        report.insert(file);
        report.insert(FileReport::new("b.robot"));

        let text = report.render(engine.rules(), engine.config());
        assert!(text.contains("\nFile Name: a.robot\nLine Index: 3, Line Length: 151\n"));
        assert!(!text.contains("b.robot"));
        assert!(text.contains(&"-".repeat(90)));
        assert!(text.trim_end().ends_with(FAILED_BANNER));
    }

    #[test]
    fn test_info_only_report_passes() {
        let mut report = Report::new();
        let mut file = FileReport::new("a.robot");
        file.violations.push(violation("a.robot", 1, Severity::Info));
        report.insert(file);
        assert!(report.passed());
        assert_eq!(report.violation_count(), 1);
    }

    #[test]
    fn test_log_is_truncated_on_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.log");
        std::fs::write(&path, "stale").unwrap();

        let log = ReportLog::create(&path).unwrap();
        log.append("one\n").unwrap();
        log.append("two\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
