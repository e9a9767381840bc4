// tests/inject_tests.rs

use std::path::Path;
use std::sync::Arc;

use robocheck::config::Config;
use robocheck::inject::{BranchInjector, TagInjector};
use robocheck::LintError;
use serde_json::{json, Value};

fn tag_injector() -> TagInjector {
    TagInjector::new(Arc::new(Config::default()))
}

fn branch_injector() -> BranchInjector {
    BranchInjector::new(Arc::new(Config::default()))
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---
// Force Tags merge
// ---

#[test]
fn test_merge_into_existing_directive() {
    let text = "*** Settings ***\nForce Tags    5G00    CRT\n\n*** Test Cases ***\nTC_1\n    Log    a\n";
    let merged = tag_injector()
        .merge_tags(Path::new("a.robot"), text, &tags(&["CRT", "master_classicalbts_all"]))
        .unwrap();
    assert_eq!(
        merged,
        "*** Settings ***\nForce Tags    5G00    CRT    master_classicalbts_all\n\n*** Test Cases ***\nTC_1\n    Log    a\n"
    );
    assert!(merged.lines().all(|line| line.chars().count() <= 120));
}

#[test]
fn test_merge_without_settings_section_prepends_one() {
    let text = "*** Test Cases ***\nTC_1\n    Log    a\n";
    let merged = tag_injector()
        .merge_tags(Path::new("a.robot"), text, &tags(&["A", "B"]))
        .unwrap();
    assert_eq!(
        merged,
        "*** Settings ***\nForce Tags    A    B\n\n*** Test Cases ***\nTC_1\n    Log    a\n"
    );
}

#[test]
fn test_merge_without_directive_appends_to_settings() {
    let text = "*** Settings ***\nLibrary    Collections\nResource    common.robot\n\n*** Test Cases ***\nTC_1\n    Log    a\n";
    let merged = tag_injector()
        .merge_tags(Path::new("a.robot"), text, &tags(&["NEW"]))
        .unwrap();
    let lines: Vec<&str> = merged.lines().collect();
    assert_eq!(lines[3], "Force Tags    NEW");
    assert_eq!(lines[4], "");
}

#[test]
fn test_merge_rewraps_long_directive() {
    let existing: Vec<String> = (0..12).map(|i| format!("TAG_{i:02}_ABCDEFGH")).collect();
    let text = format!("*** Settings ***\nForce Tags    {}\n", existing.join("    "));
    let merged = tag_injector()
        .merge_tags(Path::new("a.robot"), &text, &tags(&["EXTRA"]))
        .unwrap();

    let lines: Vec<&str> = merged.lines().collect();
    assert!(lines.len() > 2);
    assert!(lines.iter().all(|line| line.chars().count() <= 120));
    assert!(lines[1].starts_with("Force Tags    TAG_00_ABCDEFGH"));
    assert!(lines[2].starts_with("...           "));
    assert!(merged.trim_end().ends_with("EXTRA"));
}

#[test]
fn test_merge_is_a_conflict_when_nothing_changes() {
    let text = "*** Settings ***\nForce Tags    A    B\n";
    let error = tag_injector()
        .merge_tags(Path::new("a.robot"), text, &tags(&["B", "A"]))
        .unwrap_err();
    assert!(matches!(error, LintError::TagsAlreadyPresent { .. }));
    assert!(error.is_conflict());
}

// ---
// Branch clone
// ---

#[test]
fn test_clone_branch_example() {
    let text = r#"{"5G_0.800_Trunk": {"Root\\Trunk\\Path": ["t1", "t2"]}}"#;
    let output = branch_injector()
        .clone_branch_text(Path::new("a.qc"), text, "5G21A_10.1800")
        .unwrap();
    let tree: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(
        tree["5G21A_10.1800.*"],
        json!({"label": ".*", "Root\\5G21A\\Regression\\Path": ["t1", "t2"]})
    );
    assert_eq!(
        tree["5G_0.800_Trunk"],
        json!({"Root\\Trunk\\Path": ["t1", "t2"]})
    );
    assert!(output.starts_with("{\n    \"5G21A_10.1800.*\": {\n"));
}

#[test]
fn test_clone_same_branch_twice_is_a_conflict() {
    let injector = branch_injector();
    let mut tree = json!({"5G_0.800_Trunk": {"Root\\Trunk": ["t1"]}})
        .as_object()
        .cloned()
        .unwrap();

    injector
        .clone_branch(Path::new("a.qc"), &mut tree, "5G21A_1")
        .unwrap();
    let snapshot = tree.clone();

    let error = injector
        .clone_branch(Path::new("a.qc"), &mut tree, "5G21A_1")
        .unwrap_err();
    assert!(matches!(error, LintError::BranchExists { .. }));
    assert!(error.is_conflict());
    assert_eq!(tree, snapshot);
}

#[test]
fn test_clone_without_template_fails() {
    let error = branch_injector()
        .clone_branch_text(Path::new("a.qc"), r#"{"Other": {}}"#, "5G21A_1")
        .unwrap_err();
    assert!(matches!(error, LintError::TemplateNotFound { .. }));
    assert!(!error.is_conflict());
}

#[test]
fn test_clone_rejects_non_object_documents() {
    let injector = branch_injector();
    assert!(matches!(
        injector.clone_branch_text(Path::new("a.qc"), "[1, 2]", "X"),
        Err(LintError::NotAnObject { .. })
    ));
    assert!(matches!(
        injector.clone_branch_text(Path::new("a.qc"), "{not json", "X"),
        Err(LintError::Json { .. })
    ));
}
