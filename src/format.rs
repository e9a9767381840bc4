//! Deterministic reformatter.
//!
//! The formatter never edits text in place: it parses the file, renames
//! non-recommended keywords in the model, and re-emits every section with
//! canonical spacing. Sections, blocks, and steps keep their order, so
//! formatting only changes surface layout and keyword casing, and applying
//! it twice gives the same result as applying it once.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::syntax::{
    build_model, expand_tabs, Block, Comment, Model, PhysicalLine, Section, SectionKind,
    SourceFile, Step, CONTINUATION_MARKER,
};
use crate::validation::keywords::{
    is_recommended_keyword, keyword_definitions, keyword_invocations, recommended_keyword,
};

/// Cell separator and indentation used in formatted output.
pub const SEPARATOR: &str = "    ";

// ============================================================================
// PUBLIC API
// ============================================================================

pub struct Formatter {
    config: Arc<Config>,
}

impl Formatter {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Formats raw text. `path` is only used for diagnostics.
    pub fn format_text(&self, path: &Path, text: &str) -> String {
        let expanded: Vec<String> = text.lines().map(expand_tabs).collect();
        let file = SourceFile::new(path, &expanded.join("\n"));
        self.format_file(&file)
    }

    /// Formats an already loaded file.
    pub fn format_file(&self, file: &SourceFile) -> String {
        let mut model = build_model(file);
        let renames = self.keyword_renames(&model);
        if !renames.is_empty() {
            apply_renames(&mut model, &renames, &self.config);
        }
        render(&model)
    }

    /// Maps each non-recommended keyword name (library prefix removed) to its
    /// recommended spelling.
    pub fn keyword_renames(&self, model: &Model) -> BTreeMap<String, String> {
        let mut found = keyword_definitions(model);
        found.extend(keyword_invocations(model, &self.config));

        found
            .into_iter()
            .filter(|invocation| !is_recommended_keyword(invocation.name))
            .map(|invocation| {
                let bare = bare_name(invocation.name);
                (bare.to_string(), recommended_keyword(bare))
            })
            .collect()
    }
}

// ============================================================================
// KEYWORD RENAMING
// ============================================================================

fn bare_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Renames a cell that names a flagged keyword, with or without a library prefix.
fn renamed_cell(cell: &str, renames: &BTreeMap<String, String>) -> Option<String> {
    if let Some(new) = renames.get(cell) {
        return Some(new.clone());
    }
    let dot = cell.rfind('.')?;
    let (prefix, bare) = cell.split_at(dot + 1);
    renames.get(bare).map(|new| format!("{prefix}{new}"))
}

fn rename_cells(cells: &mut [String], renames: &BTreeMap<String, String>) {
    for cell in cells {
        if let Some(new) = renamed_cell(cell, renames) {
            *cell = new;
        }
    }
}

fn rename_step(step: &mut Step, skip_key: bool, renames: &BTreeMap<String, String>) {
    for (index, line) in step.lines.iter_mut().enumerate() {
        let start = usize::from(skip_key && index == 0 && !line.continuation);
        let start = start.min(line.cells.len());
        rename_cells(&mut line.cells[start..], renames);
    }
}

/// Applies renames wherever a keyword name can appear: keyword titles,
/// action steps, and the values of setup/teardown and template settings and
/// options.
fn apply_renames(model: &mut Model, renames: &BTreeMap<String, String>, config: &Config) {
    for section in &mut model.sections {
        match section.kind {
            SectionKind::Settings => {
                for step in section.blocks.iter_mut().flat_map(|b| b.steps.iter_mut()) {
                    if step.head().is_some_and(|key| config.names_keyword(key)) {
                        rename_step(step, true, renames);
                    }
                }
            }
            SectionKind::TestCases | SectionKind::Keywords => {
                let is_keywords = section.kind == SectionKind::Keywords;
                for block in &mut section.blocks {
                    if is_keywords {
                        if let Some(new) = renames.get(&block.name) {
                            block.name = new.clone();
                        }
                    }
                    for step in &mut block.steps {
                        rename_step(step, false, renames);
                    }
                    for option in &mut block.options {
                        if option.head().is_some_and(|head| config.names_keyword(head)) {
                            rename_step(option, true, renames);
                        }
                    }
                }
            }
            SectionKind::Variables | SectionKind::Unknown => {}
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Re-emits a model with canonical layout.
pub fn render(model: &Model) -> String {
    let mut out: Vec<String> = model.preamble.iter().map(|c| c.text.clone()).collect();

    for section in &model.sections {
        if !out.is_empty() {
            out.push(String::new());
        }
        let header = section
            .kind
            .canonical_header()
            .map_or_else(|| section.header.clone(), str::to_string);
        out.push(header);

        match section.kind {
            SectionKind::Settings | SectionKind::Variables => render_table(section, &mut out),
            SectionKind::TestCases | SectionKind::Keywords => render_blocks(section, &mut out),
            SectionKind::Unknown => out.extend(section.raw.iter().map(|c| c.text.clone())),
        }
    }

    if out.is_empty() {
        return String::new();
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// One output line tagged with the source line it came from, for ordering.
type Numbered = (usize, String);

fn render_table(section: &Section, out: &mut Vec<String>) {
    let key_width = section
        .steps()
        .filter_map(|step| step.lines.first())
        .filter(|line| !line.continuation)
        .filter_map(|line| line.cells.first())
        .map(|key| key.chars().count())
        .max()
        .unwrap_or(0);
    let column = key_width + SEPARATOR.len();

    let mut lines: Vec<Numbered> = section
        .comments
        .iter()
        .map(|c| (c.line, c.text.clone()))
        .collect();
    for block in &section.blocks {
        lines.extend(block.comments.iter().map(|c| (c.line, c.text.clone())));
        for line in block.steps.iter().flat_map(|step| step.lines.iter()) {
            lines.push((line.number, table_line(line, column)));
        }
    }
    lines.sort_by_key(|(number, _)| *number);
    out.extend(lines.into_iter().map(|(_, text)| text));
}

fn table_line(line: &PhysicalLine, column: usize) -> String {
    let (key, values) = if line.continuation {
        (CONTINUATION_MARKER, line.cells.as_slice())
    } else {
        match line.cells.split_first() {
            Some((key, values)) => (key.as_str(), values),
            None => return String::new(),
        }
    };
    if values.is_empty() {
        return key.to_string();
    }
    let padding = column.saturating_sub(key.chars().count()).max(SEPARATOR.len());
    format!("{key}{}{}", " ".repeat(padding), values.join(SEPARATOR))
}

fn render_blocks(section: &Section, out: &mut Vec<String>) {
    let mut leading: Vec<Numbered> = section
        .comments
        .iter()
        .map(|c| (c.line, c.text.clone()))
        .collect();
    for block in section.blocks.iter().filter(|b| b.is_implicit()) {
        leading.extend(block_body(block));
    }
    leading.sort_by_key(|(number, _)| *number);
    out.extend(leading.into_iter().map(|(_, text)| text));

    for (index, block) in section.blocks.iter().filter(|b| !b.is_implicit()).enumerate() {
        if index > 0 {
            out.push(String::new());
        }
        out.push(block.name.clone());
        out.extend(block_body(block).into_iter().map(|(_, text)| text));
    }
}

/// Steps, options, and comments of a block, indented, in source order.
fn block_body(block: &Block) -> Vec<Numbered> {
    let mut lines: Vec<Numbered> = block
        .comments
        .iter()
        .map(|Comment { line, text }| (*line, format!("{SEPARATOR}{text}")))
        .collect();
    for line in block
        .steps
        .iter()
        .chain(&block.options)
        .flat_map(|step| step.lines.iter())
    {
        lines.push((line.number, step_line(line)));
    }
    // Stable: an inline step shares its title's line number but follows it.
    lines.sort_by_key(|(number, _)| *number);
    lines
}

fn step_line(line: &PhysicalLine) -> String {
    let mut cells: Vec<&str> = Vec::with_capacity(line.cells.len() + 1);
    if line.continuation {
        cells.push(CONTINUATION_MARKER);
    }
    cells.extend(line.cells.iter().map(String::as_str));
    format!("{SEPARATOR}{}", cells.join(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> String {
        Formatter::new(Arc::new(Config::default())).format_text(Path::new("t.robot"), text)
    }

    #[test]
    fn test_settings_are_aligned() {
        let text = "*** Settings ***\nLibrary  Collections\nSuite Setup  Setup Env\n";
        assert_eq!(
            format(text),
            "*** Settings ***\nLibrary        Collections\nSuite Setup    Setup Env\n"
        );
    }

    #[test]
    fn test_blocks_are_separated_and_indented() {
        let text = "*** Test Cases ***\nTC_1\n  Log  a\nTC_2\n\tLog  b\n";
        assert_eq!(
            format(text),
            "*** Test Cases ***\nTC_1\n    Log    a\n\nTC_2\n    Log    b\n"
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(format(""), "");
    }
}
