//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use robocheck::config::Config;
use robocheck::syntax::{parse_source, Model, SourceFile};
use robocheck::validation::{FileReport, RuleEngine};

/// A small suite exercising every section kind.
pub const SAMPLE_SUITE: &str = "\
*** Settings ***
Library    Collections
Suite Setup    setup_env
Force Tags    5G00    CRT

*** Variables ***
${HOST}    localhost
@{LIST}    a    b
...    c

*** Test Cases ***
TC_001_Basic
    [Documentation]    doc
    log_message    hello
    # checks equality
    Should Be Equal    ${HOST}    localhost

*** Keywords ***
log_message
    [Arguments]    ${msg}
    Log    ${msg}
";

/// A suite whose template keyword is spelled with a hyphen.
pub const TEMPLATE_SUITE: &str = "\
*** Settings ***
Test Template    do-it

*** Test Cases ***
TC_1
    [Template]    do-it
    1    2

*** Keywords ***
do-it
    [Arguments]    ${a}    ${b}
    Log    ${a}
";

/// A suite every default rule accepts.
pub const CLEAN_SUITE: &str = "\
*** Test Cases ***
TC_001_Basic
    Log    hello
";

pub fn parse(text: &str) -> (SourceFile, Model) {
    parse_source("test.robot", text)
}

pub fn check(text: &str) -> FileReport {
    check_with(Config::default(), text)
}

pub fn check_with(config: Config, text: &str) -> FileReport {
    let engine = RuleEngine::with_default_rules(Arc::new(config));
    let (file, model) = parse(text);
    engine.check(&file, &model)
}

/// Line numbers at which `rule` fired.
pub fn lines_of(report: &FileReport, rule: &str) -> Vec<usize> {
    report.violations_of(rule).map(|v| v.line).collect()
}

/// A keyword section holding one keyword with `steps` action steps.
pub fn keyword_with_steps(steps: usize) -> String {
    let mut text = String::from("*** Keywords ***\nLong Keyword\n");
    for _ in 0..steps {
        text.push_str("    Log    step\n");
    }
    text
}

/// A test case section holding one case with `steps` action steps.
pub fn case_with_steps(steps: usize) -> String {
    let mut text = String::from("*** Test Cases ***\nTC_Long\n");
    for _ in 0..steps {
        text.push_str("    Log    step\n");
    }
    text
}

/// Writes `text` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, text: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, text).unwrap();
    path
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
