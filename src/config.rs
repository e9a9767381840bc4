//! Checker configuration.
//!
//! Every threshold and keyword list used by the rules, the formatter and the
//! injectors lives here. A [`Config`] is built once per invocation (defaults,
//! optionally overlaid by a YAML file and CLI flags) and handed to each
//! component at construction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::LintError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    // ------------------------------------------------------------------
    // Rule thresholds
    // ------------------------------------------------------------------
    pub max_keyword_arguments: usize,
    /// Lines of this many characters or more are flagged.
    pub max_line_columns: usize,
    pub max_file_lines: usize,
    pub max_keyword_steps: usize,
    pub max_case_steps: usize,
    pub max_for_loop_steps: usize,

    // ------------------------------------------------------------------
    // Keyword lists
    // ------------------------------------------------------------------
    /// Default values that make an argument a boolean flag. Compared lowercase.
    pub boolean_values: Vec<String>,
    /// Keywords that wrap another keyword call. Compared after lowercasing and
    /// mapping `_`/`-` to spaces.
    pub control_flow_keywords: Vec<String>,
    /// Bracketed options whose cells never name a keyword.
    pub keywordless_options: Vec<String>,
    /// Settings keys and block options whose values start with a keyword call.
    pub setup_teardown_settings: Vec<String>,
    /// Settings keys and block options whose value is a template keyword.
    pub template_settings: Vec<String>,
    pub wait_keyword: String,
    /// Words that, on the previous line, make a wait acceptable.
    pub wait_exceptions: Vec<String>,
    /// Cell prefix that opens an old-style for loop.
    pub loop_start: String,
    /// Prefix of each old-style for loop body line.
    pub loop_body_prefix: String,

    // ------------------------------------------------------------------
    // Metadata injection
    // ------------------------------------------------------------------
    pub tags_max_line: usize,
    pub tags_min_column: usize,
    pub trunk_prefix: String,
    pub root_marker: String,
    pub trunk_segment: String,
    pub regression_segment: String,
    pub branch_wildcard: String,
    pub branch_label_key: String,

    // ------------------------------------------------------------------
    // Discovery and output
    // ------------------------------------------------------------------
    pub robot_extension: String,
    pub sidecar_extension: String,
    /// When non-empty, tag/branch injection only touches files whose parent
    /// directory name starts with one of these prefixes.
    pub feature_prefixes: Vec<String>,
    pub report_path: PathBuf,
    /// Worker threads for per-file processing. `None` uses one per CPU.
    pub workers: Option<usize>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_keyword_arguments: 5,
            max_line_columns: 150,
            max_file_lines: 800,
            max_keyword_steps: 20,
            max_case_steps: 15,
            max_for_loop_steps: 5,

            boolean_values: strings(&["true", "${true}", "false", "${false}"]),
            control_flow_keywords: strings(&[
                "run keyword",
                "run keyword and continue on failure",
                "run keyword and expect error",
                "run keyword and ignore error",
                "run keyword and return",
                "run keyword and return if",
                "run keyword and return status",
                "run keyword and warn on failure",
                "run keyword if",
                "run keyword if all critical tests passed",
                "run keyword if all tests passed",
                "run keyword if any critical tests failed",
                "run keyword if any tests failed",
                "run keyword if test failed",
                "run keyword if test passed",
                "run keyword if timeout occurred",
                "run keyword unless",
                "run keywords",
                "wait until keyword succeeds",
                "repeat keyword",
                "else",
                "else if",
                "if",
                "for",
                "while",
                "try",
                "except",
                "finally",
                "end",
            ]),
            keywordless_options: strings(&["[Arguments]", "[Documentation]"]),
            setup_teardown_settings: strings(&[
                "Suite Setup",
                "Suite Teardown",
                "Test Setup",
                "Test Teardown",
                "[Setup]",
                "[Teardown]",
            ]),
            template_settings: strings(&["Test Template", "Task Template", "[Template]"]),
            wait_keyword: "sleep".to_string(),
            wait_exceptions: strings(&["log", "traffic", "trf_data_start"]),
            loop_start: ":FOR".to_string(),
            loop_body_prefix: "\\".to_string(),

            tags_max_line: 120,
            tags_min_column: 14,
            trunk_prefix: "5G_0.800".to_string(),
            root_marker: "Root".to_string(),
            trunk_segment: "Trunk".to_string(),
            regression_segment: "Regression".to_string(),
            branch_wildcard: ".*".to_string(),
            branch_label_key: "label".to_string(),

            robot_extension: "robot".to_string(),
            sidecar_extension: "qc".to_string(),
            feature_prefixes: Vec::new(),
            report_path: PathBuf::from("clean_code.log"),
            workers: None,
        }
    }
}

impl Config {
    /// Loads a configuration file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LintError::io(path, source))?;
        Self::from_yaml(&text).map_err(|source| LintError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Whether `keyword` (in any casing or `_`/`-` spelling) wraps another keyword.
    pub fn is_control_flow(&self, keyword: &str) -> bool {
        let normalized = normalize_keyword(keyword);
        self.control_flow_keywords
            .iter()
            .any(|known| normalize_keyword(known) == normalized)
    }

    /// Whether a settings key or option starts a setup/teardown keyword call.
    pub fn is_setup_teardown(&self, key: &str) -> bool {
        self.setup_teardown_settings
            .iter()
            .any(|known| known.eq_ignore_ascii_case(key))
    }

    pub fn is_template(&self, key: &str) -> bool {
        self.template_settings
            .iter()
            .any(|known| known.eq_ignore_ascii_case(key))
    }

    /// Whether the values of a settings key or option start with a keyword
    /// name: setup/teardown hooks and templates.
    pub fn names_keyword(&self, key: &str) -> bool {
        self.is_setup_teardown(key) || self.is_template(key)
    }

    pub fn is_keywordless_option(&self, option: &str) -> bool {
        self.keywordless_options
            .iter()
            .any(|known| known.eq_ignore_ascii_case(option))
    }
}

/// Lowercases a keyword name and maps `_` and `-` to single spaces.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
