use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::errors::LintError;

/// Clones the trunk branch record of a branch tree under a new branch name.
///
/// A branch tree is a JSON object whose top-level keys are branch patterns.
/// Each record maps a root path to its test sets, plus a `label` entry.
pub struct BranchInjector {
    config: Arc<Config>,
}

impl BranchInjector {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// The top-level key a branch is stored under, e.g. `5G21A_10.1800.*`.
    pub fn branch_key(&self, branch: &str) -> String {
        format!("{branch}{}", self.config.branch_wildcard)
    }

    /// The root path of the new record: the trunk segment of the template's
    /// root key is replaced by `<release>\Regression`, where the release is
    /// the branch name up to its first `_`.
    pub fn branch_root(&self, template_root: &str, branch: &str) -> String {
        let release = branch.split('_').next().unwrap_or(branch);
        let segment = format!("{release}\\{}", self.config.regression_segment);
        template_root.replace(&self.config.trunk_segment, &segment)
    }

    /// Inserts the new branch record into `tree` and returns its key.
    ///
    /// The template record is left untouched. Fails with
    /// [`LintError::BranchExists`] if the branch is already present.
    pub fn clone_branch(
        &self,
        path: &Path,
        tree: &mut Map<String, Value>,
        branch: &str,
    ) -> Result<String, LintError> {
        let key = self.branch_key(branch);
        if tree.contains_key(&key) {
            return Err(LintError::BranchExists {
                branch: key,
                path: path.to_path_buf(),
            });
        }

        let mut candidates: Vec<&String> = tree
            .keys()
            .filter(|name| name.starts_with(&self.config.trunk_prefix))
            .collect();
        candidates.sort();
        let Some(template) = candidates.first().map(|name| name.to_string()) else {
            return Err(LintError::TemplateNotFound {
                prefix: self.config.trunk_prefix.clone(),
                path: path.to_path_buf(),
            });
        };

        let root_missing = || LintError::RootEntryNotFound {
            branch: template.clone(),
            marker: self.config.root_marker.clone(),
            path: path.to_path_buf(),
        };
        let record = tree
            .get(&template)
            .and_then(Value::as_object)
            .ok_or_else(root_missing)?;
        let mut roots: Vec<(&String, &Value)> = record
            .iter()
            .filter(|(name, _)| name.starts_with(&self.config.root_marker))
            .collect();
        roots.sort_by(|a, b| a.0.cmp(b.0));
        let (root, test_sets) = roots.first().copied().ok_or_else(root_missing)?;

        let mut new_record = Map::new();
        new_record.insert(
            self.config.branch_label_key.clone(),
            Value::String(self.config.branch_wildcard.clone()),
        );
        new_record.insert(self.branch_root(root, branch), test_sets.clone());

        tree.insert(key.clone(), Value::Object(new_record));
        Ok(key)
    }

    /// Parses a sidecar document, clones the branch, and re-serializes it.
    pub fn clone_branch_text(&self, path: &Path, text: &str, branch: &str) -> Result<String, LintError> {
        let document: Value = serde_json::from_str(text).map_err(|source| LintError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let Value::Object(mut tree) = document else {
            return Err(LintError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        self.clone_branch(path, &mut tree, branch)?;
        to_pretty_json(&Value::Object(tree)).map_err(|source| LintError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Serializes with sorted keys and four-space indentation.
pub fn to_pretty_json(value: &Value) -> Result<String, serde_json::Error> {
    let sorted = sort_keys(value);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(Vec::new(), formatter);
    sorted.serialize(&mut serializer)?;
    let mut text = String::from_utf8(serializer.into_inner()).unwrap_or_default();
    text.push('\n');
    Ok(text)
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key.clone(), sort_keys(value)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_root_substitution() {
        let injector = BranchInjector::new(Arc::new(Config::default()));
        assert_eq!(
            injector.branch_root("Root\\Trunk\\Path", "5G21A_10.1800"),
            "Root\\5G21A\\Regression\\Path"
        );
    }

    #[test]
    fn test_pretty_json_is_sorted_and_indented() {
        let value: Value = serde_json::from_str(r#"{"b": 1, "a": {"d": [1], "c": 2}}"#).unwrap();
        let text = to_pretty_json(&value).unwrap();
        assert_eq!(
            text,
            "{\n    \"a\": {\n        \"c\": 2,\n        \"d\": [\n            1\n        ]\n    },\n    \"b\": 1\n}\n"
        );
    }
}
