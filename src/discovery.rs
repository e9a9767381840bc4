use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::errors::LintError;
use crate::syntax::{build_model, Model, SourceFile};

static LEADING_FEATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+").expect("valid feature regex"));
static BRACKETED_FEATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\]([a-zA-Z0-9]+)").expect("valid feature regex"));

/// Finds the files a command operates on.
///
/// The flow is:
/// 1. Walk the root directory for `.robot` files
/// 2. Optionally keep only files that declare a listed test case
/// 3. Optionally keep only files inside a feature directory
/// 4. For branch cloning, map the kept files to their `.qc` sidecars
#[derive(Debug)]
pub struct FileDiscoverer {
    config: Arc<Config>,
}

impl FileDiscoverer {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    // =====================
    // Public API - File Discovery
    // =====================

    /// Recursively scans `root` for test files.
    ///
    /// The returned list is sorted so that runs are deterministic.
    pub fn discover_robot_files(&self, root: impl AsRef<Path>) -> Result<Vec<PathBuf>, LintError> {
        discover_files(root, &self.config.robot_extension)
    }

    /// Narrows `files` to the ones worth rewriting.
    ///
    /// With a case list, a file is kept only if it declares at least one of
    /// the listed cases. Files that cannot be read are skipped with a warning.
    pub fn select_candidates(&self, files: &[PathBuf], cases: Option<&BTreeSet<String>>) -> Vec<PathBuf> {
        let mut selected = Vec::new();
        for path in files {
            if !self.is_feature_path(path) {
                debug!(path = %path.display(), "outside feature directories");
                continue;
            }
            let Some(cases) = cases else {
                selected.push(path.clone());
                continue;
            };
            let file = match SourceFile::read(path) {
                Ok(file) => file,
                Err(e) => {
                    warn!(path = %path.display(), "skipping unreadable file: {e}");
                    continue;
                }
            };
            let model = build_model(&file);
            if case_names(&model).iter().any(|name| cases.contains(name)) {
                selected.push(path.clone());
            }
        }
        selected
    }

    /// True when no feature prefixes are configured, or the file's parent
    /// directory name starts with one of them.
    pub fn is_feature_path(&self, path: &Path) -> bool {
        if self.config.feature_prefixes.is_empty() {
            return true;
        }
        let Some(dir) = path.parent().and_then(Path::file_name).and_then(|n| n.to_str()) else {
            return false;
        };
        self.config
            .feature_prefixes
            .iter()
            .any(|prefix| dir.starts_with(prefix.as_str()))
    }

    /// The sidecar files living next to the given test files, de-duplicated
    /// and sorted. Directories without any are logged and skipped; directories
    /// that cannot be listed are recorded as failures.
    pub fn sidecars_for(&self, robot_files: &[PathBuf]) -> Gathered<Vec<PathBuf>> {
        let dirs: BTreeSet<&Path> = robot_files.iter().filter_map(|p| p.parent()).collect();
        let mut sidecars = BTreeSet::new();
        let mut failed = Vec::new();
        for dir in dirs {
            let found = match files_in_dir(dir, &self.config.sidecar_extension) {
                Ok(found) => found,
                Err(e) => {
                    warn!(dir = %dir.display(), "skipping unlistable directory: {e}");
                    failed.push(dir.to_path_buf());
                    continue;
                }
            };
            if found.is_empty() {
                warn!(dir = %dir.display(), "no .{} file found", self.config.sidecar_extension);
            }
            sidecars.extend(found);
        }
        Gathered {
            found: sidecars.into_iter().collect(),
            failed,
        }
    }

    /// Test-case names of every readable file, keyed by path. Unreadable
    /// files are skipped with a warning and recorded as failures.
    pub fn list_cases(&self, files: &[PathBuf]) -> Gathered<BTreeMap<PathBuf, Vec<String>>> {
        let mut cases = BTreeMap::new();
        let mut failed = Vec::new();
        for path in files {
            match SourceFile::read(path) {
                Ok(file) => {
                    cases.insert(path.clone(), case_names(&build_model(&file)));
                }
                Err(e) => {
                    warn!(path = %path.display(), "skipping unreadable file: {e}");
                    failed.push(path.clone());
                }
            }
        }
        Gathered { found: cases, failed }
    }
}

/// What a batch lookup produced, plus the paths it had to skip.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Gathered<T> {
    pub found: T,
    pub failed: Vec<PathBuf>,
}

impl<T> Gathered<T> {
    /// True when no path was skipped.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// =====================
// Helpers
// =====================

/// Recursively collects regular files with the given extension, sorted.
pub fn discover_files(root: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>, LintError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(LintError::InvalidRoot {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| LintError::Walk {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}

fn files_in_dir(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, LintError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| LintError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Names of the test cases a file declares, in source order.
pub fn case_names(model: &Model) -> Vec<String> {
    model.test_cases().map(|block| block.name.clone()).collect()
}

/// Reads a case list: one name per line, blank lines ignored.
pub fn load_case_list(path: impl AsRef<Path>) -> Result<BTreeSet<String>, LintError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| LintError::io(path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Feature names derived from case names: the leading alphanumeric run, or,
/// failing that, the run right after a `]` (`[CB]7777_Case` gives `7777`).
pub fn feature_names<'a>(cases: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    cases
        .into_iter()
        .filter_map(|case| {
            LEADING_FEATURE
                .find(case)
                .or_else(|| BRACKETED_FEATURE.captures(case).and_then(|c| c.get(1)))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}
