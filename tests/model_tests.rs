// tests/model_tests.rs

mod common;

use common::{parse, SAMPLE_SUITE};
use robocheck::syntax::{tokenize, SectionKind};

#[test]
fn test_tokenize_splits_on_runs_of_spaces() {
    assert_eq!(tokenize("A  B   C"), vec!["A", "B", "C"]);
    assert_eq!(tokenize("Log Message  hello world"), vec!["Log Message", "hello world"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn test_sample_suite_structure() {
    let (file, model) = parse(SAMPLE_SUITE);
    assert_eq!(file.line_count(), 21);

    let kinds: Vec<SectionKind> = model.sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Settings,
            SectionKind::Variables,
            SectionKind::TestCases,
            SectionKind::Keywords
        ]
    );
    assert!(model.warnings.is_empty());

    let settings = model.section(SectionKind::Settings).unwrap();
    assert_eq!(settings.blocks.len(), 1);
    assert!(settings.blocks[0].is_implicit());
    assert_eq!(settings.steps().count(), 3);
    assert_eq!(
        model.setting("force tags").unwrap().values().collect::<Vec<_>>(),
        vec!["5G00", "CRT"]
    );
}

#[test]
fn test_continuation_joins_the_previous_step() {
    let (_, model) = parse(SAMPLE_SUITE);
    let list = model
        .section(SectionKind::Variables)
        .unwrap()
        .steps()
        .find(|step| step.head() == Some("@{LIST}"))
        .unwrap();
    assert_eq!(list.lines.len(), 2);
    assert_eq!((list.line(), list.last_line()), (8, 9));
    assert_eq!(list.values().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn test_blocks_split_steps_options_and_comments() {
    let (_, model) = parse(SAMPLE_SUITE);
    let case = model.test_cases().next().unwrap();
    assert_eq!(case.name, "TC_001_Basic");
    assert_eq!(case.line, 12);
    assert_eq!(case.steps.len(), 2);
    assert_eq!(case.options.len(), 1);
    assert!(case.option("[documentation]").is_some());
    assert_eq!(case.comments.len(), 1);
    assert_eq!(case.comments[0].text, "# checks equality");

    let keyword = model.keywords().next().unwrap();
    assert_eq!(keyword.name, "log_message");
    assert_eq!(keyword.steps.len(), 1);
    assert_eq!(keyword.options[0].head(), Some("[Arguments]"));
}

#[test]
fn test_tabs_are_cell_separators() {
    let (_, model) = parse("*** Test Cases ***\nTC_1\n\tLog\thello\n");
    let case = model.test_cases().next().unwrap();
    assert_eq!(case.steps[0].cells().collect::<Vec<_>>(), vec!["Log", "hello"]);
}

#[test]
fn test_inline_step_on_title_line() {
    let (_, model) = parse("*** Keywords ***\nMy Keyword    Log    hi\n    No Operation\n");
    let keyword = model.keywords().next().unwrap();
    assert_eq!(keyword.name, "My Keyword");
    assert_eq!(keyword.steps.len(), 2);
    assert_eq!(keyword.steps[0].head(), Some("Log"));
}

#[test]
fn test_preamble_and_unknown_sections_are_kept() {
    let text = "# leading comment\n*** Comments ***\nanything  goes\n*** Test Cases ***\nTC_1\n    Log    a\n";
    let (_, model) = parse(text);
    assert_eq!(model.preamble.len(), 1);
    let unknown = model.section(SectionKind::Unknown).unwrap();
    assert_eq!(unknown.raw.len(), 1);
    assert_eq!(unknown.raw[0].text, "anything  goes");
    assert_eq!(model.test_cases().count(), 1);
}

#[test]
fn test_step_before_any_title_is_a_warning() {
    let (_, model) = parse("*** Test Cases ***\n    Log    orphan\nTC_1\n    Log    a\n");
    assert_eq!(model.warnings.len(), 1);
    assert_eq!(model.warnings[0].line, 2);
    // The orphan lives in an implicit block, so it is not a test case.
    assert_eq!(model.test_cases().count(), 1);
}
