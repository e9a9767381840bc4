//! Section/Block model builder.
//!
//! A single pass over the lines drives a small state machine keyed by the
//! kind of the current section. The builder never fails: anything it cannot
//! place is recorded as a [`ParseWarning`] and parsed on a best-effort basis.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::warn;

use crate::syntax::model::{
    is_bracketed, Block, Comment, Model, ParseWarning, PhysicalLine, Section, SectionKind,
    SourceFile, Step,
};
use crate::syntax::tokenizer::{expand_tabs, indentation, tokenize, CONTINUATION_MARKER};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Builds the structural model of a file.
pub fn build_model(file: &SourceFile) -> Model {
    let mut builder = ModelBuilder::default();
    for (number, raw) in file.numbered_lines() {
        builder.feed(number, raw);
    }
    let model = builder.finish();
    for warning in &model.warnings {
        warn!(path = %file.path().display(), "{warning}");
    }
    model
}

/// Convenience wrapper: wraps `text` in a [`SourceFile`] and builds its model.
pub fn parse_source(path: impl Into<PathBuf>, text: &str) -> (SourceFile, Model) {
    let file = SourceFile::new(path, text);
    let model = build_model(&file);
    (file, model)
}

// ============================================================================
// BUILDER STATE
// ============================================================================

/// Which step list the most recent step was pushed to.
#[derive(Debug, Clone, Copy)]
enum LastStep {
    Action,
    Option,
}

#[derive(Default)]
struct ModelBuilder {
    model: Model,
    current: Option<Section>,
    last_step: Option<LastStep>,
    seen: HashSet<SectionKind>,
}

impl ModelBuilder {
    fn feed(&mut self, number: usize, raw: &str) {
        let line = expand_tabs(raw);
        if line.trim().is_empty() {
            return;
        }

        if let Some(kind) = SectionKind::from_header(&line) {
            self.open_section(kind, number, &line);
            return;
        }

        let Some(kind) = self.current.as_ref().map(|section| section.kind) else {
            self.model.preamble.push(Comment {
                line: number,
                text: line.trim_end().to_string(),
            });
            return;
        };

        if kind == SectionKind::Unknown {
            self.section_mut().raw.push(Comment {
                line: number,
                text: line.trim_end().to_string(),
            });
            return;
        }

        if line.trim_start().starts_with('#') {
            self.push_comment(number, line.trim());
            return;
        }

        let cells = tokenize(&line);
        if kind.is_table() {
            self.feed_table_line(number, cells);
        } else {
            self.feed_block_line(number, indentation(&line), cells);
        }
    }

    fn finish(mut self) -> Model {
        self.close_section();
        self.model
    }

    // ========================================================================
    // SECTIONS
    // ========================================================================

    fn open_section(&mut self, kind: SectionKind, number: usize, header: &str) {
        self.close_section();
        if kind != SectionKind::Unknown && !self.seen.insert(kind) {
            self.warn(number, format!("duplicate {kind} section"));
        }
        self.current = Some(Section::new(kind, number, header));
    }

    fn close_section(&mut self) {
        if let Some(section) = self.current.take() {
            self.model.sections.push(section);
        }
        self.last_step = None;
    }

    fn section_mut(&mut self) -> &mut Section {
        self.current
            .as_mut()
            .expect("section_mut is only called inside a section")
    }

    fn warn(&mut self, line: usize, message: impl Into<String>) {
        self.model.warnings.push(ParseWarning {
            line,
            message: message.into(),
        });
    }

    // ========================================================================
    // LINE KINDS
    // ========================================================================

    fn push_comment(&mut self, number: usize, text: &str) {
        let comment = Comment {
            line: number,
            text: text.to_string(),
        };
        let section = self.section_mut();
        match section.blocks.last_mut() {
            Some(block) => block.comments.push(comment),
            None if section.kind.is_table() => {
                let mut block = Block::implicit(section.line);
                block.comments.push(comment);
                section.blocks.push(block);
            }
            None => section.comments.push(comment),
        }
    }

    /// Settings/Variables: every line is a step of the implicit block.
    fn feed_table_line(&mut self, number: usize, cells: Vec<String>) {
        let (continuation, cells) = split_marker(cells);
        if continuation && self.continue_step(number, cells.clone()) {
            return;
        }
        if continuation {
            self.warn(number, "continuation marker without a preceding step");
        }

        let section = self.section_mut();
        if section.blocks.is_empty() {
            section.blocks.push(Block::implicit(section.line));
        }
        let step = Step::new(PhysicalLine {
            number,
            continuation,
            cells,
        });
        if let Some(block) = section.blocks.last_mut() {
            block.steps.push(step);
        }
        self.last_step = Some(LastStep::Action);
    }

    /// Test Cases/Keywords: title lines open blocks, indented lines are steps.
    fn feed_block_line(&mut self, number: usize, indent: usize, cells: Vec<String>) {
        if indent == 0 {
            self.open_block(number, cells);
            return;
        }

        if self.section_mut().blocks.is_empty() {
            self.warn(number, "step outside of any test case or keyword");
            let line = self.section_mut().line;
            self.section_mut().blocks.push(Block::implicit(line));
        }

        let (continuation, cells) = split_marker(cells);
        if continuation && self.continue_step(number, cells.clone()) {
            return;
        }
        if continuation {
            self.warn(number, "continuation marker without a preceding step");
        }
        self.push_block_step(PhysicalLine {
            number,
            continuation,
            cells,
        });
    }

    fn open_block(&mut self, number: usize, mut cells: Vec<String>) {
        let name = cells.remove(0);
        self.section_mut().blocks.push(Block::named(&name, number));
        self.last_step = None;

        if !cells.is_empty() {
            let (continuation, cells) = split_marker(cells);
            self.push_block_step(PhysicalLine {
                number,
                continuation,
                cells,
            });
        }
    }

    fn push_block_step(&mut self, line: PhysicalLine) {
        let is_option = line.cells.first().is_some_and(|cell| is_bracketed(cell));
        let step = Step::new(line);
        let Some(block) = self.section_mut().blocks.last_mut() else {
            return;
        };
        if is_option {
            block.options.push(step);
            self.last_step = Some(LastStep::Option);
        } else {
            block.steps.push(step);
            self.last_step = Some(LastStep::Action);
        }
    }

    /// Appends a continuation line to the most recent step, if there is one.
    fn continue_step(&mut self, number: usize, cells: Vec<String>) -> bool {
        let Some(last) = self.last_step else {
            return false;
        };
        let Some(block) = self.section_mut().blocks.last_mut() else {
            return false;
        };
        let step = match last {
            LastStep::Action => block.steps.last_mut(),
            LastStep::Option => block.options.last_mut(),
        };
        let Some(step) = step else {
            return false;
        };
        step.lines.push(PhysicalLine {
            number,
            continuation: true,
            cells,
        });
        true
    }
}

/// Strips a leading continuation marker from a line's cells.
fn split_marker(mut cells: Vec<String>) -> (bool, Vec<String>) {
    if cells.first().is_some_and(|cell| cell == CONTINUATION_MARKER) {
        cells.remove(0);
        (true, cells)
    } else {
        (false, cells)
    }
}
