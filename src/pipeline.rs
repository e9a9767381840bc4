//! Bounded parallel processing of many files.
//!
//! Every command fans out over a `rayon` pool, one file per task, with no
//! state shared between files. Results are collected in input order and
//! aggregated afterwards. Rewrites are atomic: the new text is written to a
//! temporary file beside the target and then persisted over it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::LintError;
use crate::format::Formatter;
use crate::inject::{BranchInjector, TagInjector};
use crate::report::Report;
use crate::syntax::{build_model, SourceFile};
use crate::validation::RuleEngine;

// ============================================================================
// OUTCOMES
// ============================================================================

/// What happened to one file during a rewrite.
#[derive(Debug)]
pub enum FileOutcome {
    Rewritten { before: String, after: String },
    Unchanged,
    /// The change was already applied; the file was left alone.
    Conflict(LintError),
    Failed(LintError),
}

/// Aggregate of a rewrite over many files, in input order.
#[derive(Debug, Default)]
pub struct RewriteSummary {
    pub rewritten: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub conflicts: Vec<(PathBuf, LintError)>,
    pub failed: Vec<(PathBuf, LintError)>,
    /// Old and new text of each rewritten file, kept only when requested.
    pub changes: Vec<(PathBuf, String, String)>,
}

impl RewriteSummary {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, path: PathBuf, outcome: FileOutcome, keep_changes: bool) {
        match outcome {
            FileOutcome::Rewritten { before, after } => {
                info!(path = %path.display(), "rewritten");
                if keep_changes {
                    self.changes.push((path.clone(), before, after));
                }
                self.rewritten.push(path);
            }
            FileOutcome::Unchanged => {
                debug!(path = %path.display(), "unchanged");
                self.unchanged.push(path);
            }
            FileOutcome::Conflict(e) => {
                warn!(path = %path.display(), "skipped: {e}");
                self.conflicts.push((path, e));
            }
            FileOutcome::Failed(e) => {
                error!(path = %path.display(), "{e}");
                self.failed.push((path, e));
            }
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    config: Arc<Config>,
    engine: RuleEngine,
    pool: ThreadPool,
}

impl Pipeline {
    /// Builds the worker pool. `config.workers` bounds the number of files
    /// processed at once; `None` lets rayon pick.
    pub fn new(config: Arc<Config>) -> Result<Self, LintError> {
        let mut builder = ThreadPoolBuilder::new();
        if let Some(workers) = config.workers {
            builder = builder.num_threads(workers.max(1));
        }
        let pool = builder.build().map_err(|e| LintError::WorkerPool {
            message: e.to_string(),
        })?;
        Ok(Self {
            engine: RuleEngine::with_default_rules(config.clone()),
            config,
            pool,
        })
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses and checks every file. Unreadable files are recorded in the
    /// report and do not stop the batch.
    pub fn check_files(&self, files: &[PathBuf]) -> Report {
        let results: Vec<(PathBuf, Result<_, LintError>)> = self.pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = SourceFile::read(path).map(|file| {
                        let model = build_model(&file);
                        self.engine.check(&file, &model)
                    });
                    (path.clone(), result)
                })
                .collect()
        });

        let mut report = Report::new();
        for (path, result) in results {
            match result {
                Ok(file_report) => report.insert(file_report),
                Err(e) => {
                    error!(path = %path.display(), "{e}");
                    report.insert_unreadable(path, &e);
                }
            }
        }
        report
    }

    /// Reformats every file in place.
    pub fn format_files(&self, files: &[PathBuf], keep_changes: bool) -> RewriteSummary {
        let formatter = Formatter::new(self.config.clone());
        self.rewrite_each(files, keep_changes, |path, text| {
            Ok(formatter.format_text(path, text))
        })
    }

    /// Merges `tags` into the `Force Tags` directive of every file.
    pub fn add_tags(&self, files: &[PathBuf], tags: &[String]) -> RewriteSummary {
        let injector = TagInjector::new(self.config.clone());
        self.rewrite_each(files, false, |path, text| injector.merge_tags(path, text, tags))
    }

    /// Clones the trunk branch record of every sidecar under `branch`.
    pub fn new_branch(&self, sidecars: &[PathBuf], branch: &str) -> RewriteSummary {
        let injector = BranchInjector::new(self.config.clone());
        self.rewrite_each(sidecars, false, |path, text| {
            injector.clone_branch_text(path, text, branch)
        })
    }

    fn rewrite_each<F>(&self, files: &[PathBuf], keep_changes: bool, transform: F) -> RewriteSummary
    where
        F: Fn(&Path, &str) -> Result<String, LintError> + Sync,
    {
        let outcomes: Vec<(PathBuf, FileOutcome)> = self.pool.install(|| {
            files
                .par_iter()
                .map(|path| (path.clone(), rewrite_file(path, &transform)))
                .collect()
        });

        let mut summary = RewriteSummary::default();
        for (path, outcome) in outcomes {
            summary.record(path, outcome, keep_changes);
        }
        summary
    }
}

fn rewrite_file<F>(path: &Path, transform: &F) -> FileOutcome
where
    F: Fn(&Path, &str) -> Result<String, LintError>,
{
    let before = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return FileOutcome::Failed(LintError::io(path, e)),
    };
    let after = match transform(path, &before) {
        Ok(text) => text,
        Err(e) if e.is_conflict() => return FileOutcome::Conflict(e),
        Err(e) => return FileOutcome::Failed(e),
    };
    if after == before {
        return FileOutcome::Unchanged;
    }
    match write_atomic(path, &after) {
        Ok(()) => FileOutcome::Rewritten { before, after },
        Err(e) => FileOutcome::Failed(e),
    }
}

/// Replaces `path` with `contents` without ever leaving a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), LintError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| LintError::io(dir, e))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| LintError::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| LintError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        let config = Config {
            workers: Some(2),
            ..Config::default()
        };
        Pipeline::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.robot");
        std::fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_missing_file_is_a_failure_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.robot");
        let summary = pipeline().format_files(&[missing.clone()], false);
        assert!(!summary.success());
        assert_eq!(summary.failed[0].0, missing);
    }

    #[test]
    fn test_second_tag_merge_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.robot");
        std::fs::write(&path, "*** Settings ***\nForce Tags    A\n").unwrap();

        let pipeline = pipeline();
        let tags = vec!["B".to_string()];
        let first = pipeline.add_tags(&[path.clone()], &tags);
        assert_eq!(first.rewritten, vec![path.clone()]);

        let second = pipeline.add_tags(&[path.clone()], &tags);
        assert!(second.success());
        assert_eq!(second.conflicts.len(), 1);
    }
}
