//! Keyword-invocation detection, shared by the keyword-name rule and the
//! formatter's keyword renaming.
//!
//! There is no grammar telling a keyword cell apart from an argument cell.
//! The binding contract is symbol exclusion: a cell containing any of
//! `= $ @ & : [ ] \ | / % * ^`, starting with a digit, or consisting of a
//! bare separator token is never a keyword.

use crate::config::Config;
use crate::syntax::{Model, SectionKind, Step};

const NON_KEYWORD_CELLS: &[&str] = &["_", ";", ".", "\\", "..."];

const NON_KEYWORD_CHARS: &[char] = &[
    '=', '$', '@', '&', ':', '[', ']', '\\', '|', '/', '%', '*', '^',
];

/// A keyword name found in a step, with the line it was written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub line: usize,
    pub name: &'a str,
}

/// Whether a cell could name a keyword.
pub fn is_keyword_like(cell: &str) -> bool {
    let Some(first) = cell.chars().next() else {
        return false;
    };
    if first.is_numeric() || NON_KEYWORD_CELLS.contains(&cell) {
        return false;
    }
    !cell.contains(NON_KEYWORD_CHARS)
}

/// Keyword names are Title Cased words separated by single spaces.
///
/// A library prefix (`Collections.`) is ignored.
pub fn is_recommended_keyword(name: &str) -> bool {
    let name = without_library(name);
    if name.contains(['_', '-']) {
        return false;
    }
    name.split_whitespace()
        .all(|word| !word.chars().next().is_some_and(char::is_lowercase))
}

/// The recommended spelling of a keyword name: `do_something` → `Do Something`.
///
/// The library prefix, if any, is kept as written.
pub fn recommended_keyword(name: &str) -> String {
    let (prefix, bare) = match name.rfind('.') {
        Some(dot) => name.split_at(dot + 1),
        None => ("", name),
    };
    let words: Vec<String> = bare
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect();
    format!("{prefix}{}", words.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn without_library(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Finds the keyword invoked by a sequence of `(line, cell)` pairs.
///
/// Control-flow wrappers such as `Run Keyword If` are skipped so that the
/// wrapped keyword is reported instead. At most one name is returned.
fn invoked_keyword<'a>(
    cells: impl IntoIterator<Item = (usize, &'a str)>,
    config: &Config,
) -> Option<Invocation<'a>> {
    for (line, cell) in cells {
        if cell.starts_with('#') {
            break;
        }
        if !is_keyword_like(cell) || config.is_control_flow(cell) {
            continue;
        }
        return Some(Invocation { line, name: cell });
    }
    None
}

fn numbered_cells(step: &Step) -> impl Iterator<Item = (usize, &str)> {
    step.lines.iter().flat_map(|line| {
        line.cells
            .iter()
            .map(move |cell| (line.number, cell.as_str()))
    })
}

/// The keyword a step invokes, if it invokes one.
///
/// Setup/teardown and template options contribute the cells after their
/// key; other bracketed options never invoke a keyword.
pub fn step_invocation<'a>(step: &'a Step, config: &Config) -> Option<Invocation<'a>> {
    let head = step.head()?;
    if step.is_option() || head.starts_with('.') {
        if config.is_keywordless_option(head) || !config.names_keyword(head) {
            return None;
        }
        return invoked_keyword(numbered_cells(step).skip(1), config);
    }
    invoked_keyword(numbered_cells(step), config)
}

/// Every keyword invocation in the file, ordered by line.
pub fn keyword_invocations<'a>(model: &'a Model, config: &Config) -> Vec<Invocation<'a>> {
    let mut found = Vec::new();
    for section in &model.sections {
        match section.kind {
            SectionKind::Settings => {
                for step in section.steps() {
                    let names_keyword = step.head().is_some_and(|key| config.names_keyword(key));
                    if !names_keyword {
                        continue;
                    }
                    found.extend(invoked_keyword(numbered_cells(step).skip(1), config));
                }
            }
            SectionKind::TestCases | SectionKind::Keywords => {
                for block in &section.blocks {
                    let steps = block.steps.iter().chain(&block.options);
                    found.extend(steps.filter_map(|step| step_invocation(step, config)));
                }
            }
            SectionKind::Variables | SectionKind::Unknown => {}
        }
    }
    found.sort_by_key(|invocation| invocation.line);
    found
}

/// Titles of keyword definitions that read like plain keyword names.
pub fn keyword_definitions(model: &Model) -> Vec<Invocation<'_>> {
    model
        .keywords()
        .filter(|block| is_keyword_like(&block.name))
        .map(|block| Invocation {
            line: block.line,
            name: block.name.as_str(),
        })
        .collect()
}
