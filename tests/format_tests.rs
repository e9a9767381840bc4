// tests/format_tests.rs

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{SAMPLE_SUITE, TEMPLATE_SUITE};
use robocheck::config::Config;
use robocheck::format::Formatter;

fn format(text: &str) -> String {
    Formatter::new(Arc::new(Config::default())).format_text(Path::new("suite.robot"), text)
}

#[test]
fn test_sample_suite_canonical_output() {
    let expected = "\
*** Settings ***
Library        Collections
Suite Setup    Setup Env
Force Tags     5G00    CRT

*** Variables ***
${HOST}    localhost
@{LIST}    a    b
...        c

*** Test Cases ***
TC_001_Basic
    [Documentation]    doc
    Log Message    hello
    # checks equality
    Should Be Equal    ${HOST}    localhost

*** Keywords ***
Log Message
    [Arguments]    ${msg}
    Log    ${msg}
";
    assert_eq!(format(SAMPLE_SUITE), expected);
}

#[test]
fn test_format_is_idempotent() {
    let messy = "*** setting ***\nLibrary\tString\n\n\n***keywords***\nmy_kw    log  x\n  # note\n\t[Arguments]  ${a}\n  ...   ${b}\n*** Test Case ***\nTC_1\n  my_kw  1  2\n";
    let once = format(messy);
    let twice = format(&once);
    assert_eq!(once, twice);

    let sample_once = format(SAMPLE_SUITE);
    assert_eq!(format(&sample_once), sample_once);
}

#[test]
fn test_variables_are_not_renamed() {
    let text = "*** Test Cases ***\nTC_1\n    do_it    ${do_it}\n*** Keywords ***\ndo_it\n    [Arguments]    ${x}\n    Log    ${x}\n";
    let formatted = format(text);
    assert!(formatted.contains("    Do It    ${do_it}\n"));
    assert!(formatted.contains("\nDo It\n"));
}

#[test]
fn test_template_references_follow_the_renamed_keyword() {
    let formatted = format(TEMPLATE_SUITE);
    assert!(formatted.contains("Test Template    Do It\n"));
    assert!(formatted.contains("    [Template]    Do It\n"));
    assert!(formatted.contains("\nDo It\n"));
    assert!(!formatted.contains("do-it"));
    assert_eq!(format(&formatted), formatted);
}

#[test]
fn test_library_prefix_is_kept() {
    let text = "*** Test Cases ***\nTC_1\n    Collections.append_to_list    ${L}    1\n";
    assert!(format(text).contains("    Collections.Append To List    ${L}    1\n"));
}

#[test]
fn test_sections_and_block_order_are_preserved() {
    let text = "*** Keywords ***\nB Keyword\n    Log    b\nA Keyword\n    Log    a\n*** Test Cases ***\nTC_1\n    A Keyword\n";
    let formatted = format(text);
    let b = formatted.find("B Keyword\n").unwrap();
    let a = formatted.find("A Keyword\n    Log").unwrap();
    let cases = formatted.find("*** Test Cases ***").unwrap();
    assert!(b < a && a < cases);
}
