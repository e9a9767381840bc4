// Regression tests for the robocheck binary: exit codes, report file,
// rewrites, and miette-rendered startup errors.

mod common;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{read, write_file, CLEAN_SUITE, SAMPLE_SUITE};

fn robocheck() -> Command {
    Command::cargo_bin("robocheck").unwrap()
}

#[test]
fn cli_reports_miette_diagnostics_for_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    robocheck()
        .arg("check")
        .arg(dir.path().join("nope"))
        .assert()
        .code(2)
        .stderr(contains("robocheck::invalid_root").or(contains("not a directory")));
}

#[test]
fn cli_check_clean_tree_passes() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "suite/a.robot", CLEAN_SUITE);
    let report = dir.path().join("report.log");

    robocheck()
        .arg("--report")
        .arg(&report)
        .arg("check")
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(contains("All Check Points Passed"));
    assert!(read(&report).contains("Congratulations. All Check Points Passed..."));
}

#[test]
fn cli_check_violations_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "suite/a.robot", SAMPLE_SUITE);
    let report = dir.path().join("report.log");

    robocheck()
        .arg("--report")
        .arg(&report)
        .arg("check")
        .arg(dir.path())
        .arg("--json")
        .assert()
        .code(1)
        .stdout(contains("\"keyword-name\""));
    let text = read(&report);
    assert!(text.contains("Line Index: 3, Keyword: setup_env"));
    assert!(text.contains("You Got Check Points Failed"));
}

#[test]
fn cli_format_rewrites_and_prints_diff() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "a.robot", SAMPLE_SUITE);

    robocheck()
        .arg("--report")
        .arg(dir.path().join("report.log"))
        .arg("format")
        .arg(dir.path())
        .arg("--diff")
        .assert()
        .code(1)
        .stdout(contains("+Suite Setup    Setup Env").and(contains("1 rewritten")));
    assert!(read(&path).contains("\nLog Message\n"));
}

#[test]
fn cli_add_tags_with_case_list() {
    let dir = tempfile::tempdir().unwrap();
    let tagged = write_file(
        dir.path(),
        "5GC000001/a.robot",
        "*** Test Cases ***\n5GC000001_Attach\n    Log    a\n",
    );
    let untouched = write_file(
        dir.path(),
        "5GC000002/b.robot",
        "*** Test Cases ***\n5GC000002_Detach\n    Log    b\n",
    );
    let cases = write_file(dir.path(), "cases.txt", "5GC000001_Attach\n\n");

    robocheck()
        .arg("add-tags")
        .arg("--root")
        .arg(dir.path())
        .arg("--cases")
        .arg(&cases)
        .arg("REGRESSION")
        .assert()
        .success()
        .stdout(contains("1 rewritten"));

    assert!(read(&tagged).starts_with("*** Settings ***\nForce Tags    REGRESSION\n"));
    assert!(!read(&untouched).contains("Force Tags"));
}

#[test]
fn cli_new_branch_twice_skips_the_second_time() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "suite/a.robot", CLEAN_SUITE);
    let sidecar = write_file(
        dir.path(),
        "suite/a.qc",
        r#"{"5G_0.800_Trunk": {"Root\\Trunk\\Path": ["t1"]}}"#,
    );

    for expected in ["1 rewritten", "1 skipped"] {
        robocheck()
            .arg("new-branch")
            .arg("--root")
            .arg(dir.path())
            .arg("5G21A_10.1800")
            .assert()
            .success()
            .stdout(contains(expected));
    }
    assert!(read(&sidecar).contains("Root\\\\5G21A\\\\Regression\\\\Path"));
}

#[test]
fn cli_unreadable_case_list_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.robot", CLEAN_SUITE);
    robocheck()
        .arg("add-tags")
        .arg("--root")
        .arg(dir.path())
        .arg("--cases")
        .arg(dir.path().join("missing.txt"))
        .arg("X")
        .assert()
        .code(2);
}

#[test]
fn cli_list_cases_as_json() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.robot", SAMPLE_SUITE);
    robocheck()
        .arg("list-cases")
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(contains("\"TC_001_Basic\""));
}

#[test]
fn cli_list_cases_keeps_going_past_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.robot", CLEAN_SUITE);
    std::fs::write(dir.path().join("b.robot"), [0xff, 0xfe, 0x00]).unwrap();
    robocheck()
        .arg("list-cases")
        .arg(dir.path())
        .assert()
        .code(2)
        .stdout(contains("a.robot").and(contains("TC_001_Basic")));
}

#[test]
fn cli_bad_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "robocheck.yaml", "no_such_option: 1\n");
    robocheck()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(contains("robocheck::config").or(contains("invalid configuration")));
}
