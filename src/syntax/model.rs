//! Structural model: File → Sections → Blocks → Steps → Cells.
//!
//! Every type here is transient. A [`Model`] is rebuilt from raw text on each
//! parse and carries 1-indexed line numbers back into its [`SourceFile`].

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::LintError;

// ============================================================================
// SOURCE FILE
// ============================================================================

/// A file's path and its raw lines, exactly as read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Reads a file from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LintError::io(path, source))?;
        Ok(Self::new(path, &text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw lines without their terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Iterates `(line_number, line)` pairs, numbering from 1.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index + 1, line.as_str()))
    }

    /// Returns the 1-indexed line, if present.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

static KNOWN_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\*{3}\s*(settings?|variables?|test\s+cases?|keywords?)\s*\*{3}")
        .expect("valid regex")
});

static ANY_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*{3}").expect("valid regex"));

/// The kind of a top-level section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionKind {
    Settings,
    Variables,
    TestCases,
    Keywords,
    Unknown,
}

impl SectionKind {
    /// Classifies a line as a section header, returning `None` for any other line.
    pub fn from_header(line: &str) -> Option<Self> {
        if let Some(captures) = KNOWN_HEADER.captures(line) {
            let name = captures[1].to_ascii_lowercase();
            let kind = if name.starts_with("setting") {
                Self::Settings
            } else if name.starts_with("variable") {
                Self::Variables
            } else if name.starts_with("keyword") {
                Self::Keywords
            } else {
                Self::TestCases
            };
            return Some(kind);
        }
        ANY_HEADER.is_match(line).then_some(Self::Unknown)
    }

    /// The canonical header line emitted by the formatter.
    pub fn canonical_header(self) -> Option<&'static str> {
        match self {
            Self::Settings => Some("*** Settings ***"),
            Self::Variables => Some("*** Variables ***"),
            Self::TestCases => Some("*** Test Cases ***"),
            Self::Keywords => Some("*** Keywords ***"),
            Self::Unknown => None,
        }
    }

    /// Sections made of named blocks rather than key/value entries.
    pub fn has_named_blocks(self) -> bool {
        matches!(self, Self::TestCases | Self::Keywords)
    }

    /// Sections made of key/value entries.
    pub fn is_table(self) -> bool {
        matches!(self, Self::Settings | Self::Variables)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Settings => "Settings",
            Self::Variables => "Variables",
            Self::TestCases => "Test Cases",
            Self::Keywords => "Keywords",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// A top-level region of a file, opened by a header line.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// Line number of the header.
    pub line: usize,
    /// Header text as written, trimmed.
    pub header: String,
    pub blocks: Vec<Block>,
    /// Comments that precede the first block of the section.
    pub comments: Vec<Comment>,
    /// Raw body lines of an [`SectionKind::Unknown`] section.
    pub raw: Vec<Comment>,
}

impl Section {
    pub fn new(kind: SectionKind, line: usize, header: &str) -> Self {
        Self {
            kind,
            line,
            header: header.trim().to_string(),
            blocks: Vec::new(),
            comments: Vec::new(),
            raw: Vec::new(),
        }
    }

    /// All steps of all blocks, in order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.blocks.iter().flat_map(|block| block.steps.iter())
    }

    /// The last line number that belongs to this section's content.
    pub fn last_content_line(&self) -> usize {
        let block_lines = self.blocks.iter().map(Block::last_line);
        let comment_lines = self.comments.iter().chain(&self.raw).map(|c| c.line);
        block_lines.chain(comment_lines).fold(self.line, usize::max)
    }
}

// ============================================================================
// BLOCKS, STEPS, CELLS
// ============================================================================

/// A named test case or keyword, or the implicit block of a table section.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Block title. Empty for implicit blocks.
    pub name: String,
    /// Title line number (header line for implicit blocks).
    pub line: usize,
    /// Action steps, in order.
    pub steps: Vec<Step>,
    /// Bracketed option steps such as `[Arguments]` or `[Documentation]`.
    pub options: Vec<Step>,
    pub comments: Vec<Comment>,
}

impl Block {
    pub fn named(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            ..Self::default()
        }
    }

    pub fn implicit(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.name.is_empty()
    }

    /// Finds an option step by its bracketed name, case-insensitively.
    pub fn option(&self, name: &str) -> Option<&Step> {
        self.options
            .iter()
            .find(|step| step.head().is_some_and(|head| head.eq_ignore_ascii_case(name)))
    }

    pub fn last_line(&self) -> usize {
        let steps = self.steps.iter().chain(&self.options).map(Step::last_line);
        let comments = self.comments.iter().map(|c| c.line);
        steps.chain(comments).fold(self.line, usize::max)
    }
}

/// One physical line of a step, with the continuation marker removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalLine {
    pub number: usize,
    /// Whether the line started with the continuation marker.
    pub continuation: bool,
    pub cells: Vec<String>,
}

/// One logical instruction, possibly spanning continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub lines: Vec<PhysicalLine>,
}

impl Step {
    pub fn new(first: PhysicalLine) -> Self {
        Self { lines: vec![first] }
    }

    /// Line number of the first physical line.
    pub fn line(&self) -> usize {
        self.lines.first().map_or(0, |line| line.number)
    }

    pub fn last_line(&self) -> usize {
        self.lines.last().map_or(0, |line| line.number)
    }

    /// All cells across physical lines, continuation markers excluded.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .flat_map(|line| line.cells.iter().map(String::as_str))
    }

    pub fn head(&self) -> Option<&str> {
        self.cells().next()
    }

    /// Cells after the first one.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells().skip(1)
    }

    /// Whether the step is a bracketed option such as `[Arguments]`.
    pub fn is_option(&self) -> bool {
        self.head().is_some_and(is_bracketed)
    }
}

/// A comment line, or a raw line kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub line: usize,
    pub text: String,
}

/// Returns true for cells written as `[Name]`.
pub fn is_bracketed(cell: &str) -> bool {
    cell.len() >= 2 && cell.starts_with('[') && cell.ends_with(']')
}

// ============================================================================
// MODEL
// ============================================================================

/// A recoverable oddity found while building the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// The structural tree of one file.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Lines before the first section header.
    pub preamble: Vec<Comment>,
    pub sections: Vec<Section>,
    pub warnings: Vec<ParseWarning>,
}

impl Model {
    /// The first section of the given kind.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |section| section.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }

    /// Named blocks of every section of the given kind.
    pub fn blocks_of(&self, kind: SectionKind) -> impl Iterator<Item = &Block> {
        self.sections_of(kind)
            .flat_map(|section| section.blocks.iter())
            .filter(|block| !block.is_implicit())
    }

    pub fn test_cases(&self) -> impl Iterator<Item = &Block> {
        self.blocks_of(SectionKind::TestCases)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &Block> {
        self.blocks_of(SectionKind::Keywords)
    }

    /// Finds a table-section step by its key, case-insensitively.
    pub fn setting(&self, key: &str) -> Option<&Step> {
        self.sections_of(SectionKind::Settings)
            .flat_map(Section::steps)
            .find(|step| step.head().is_some_and(|head| head.eq_ignore_ascii_case(key)))
    }
}
