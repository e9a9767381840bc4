//! Structural syntax for Robot Framework style test-definition files.
//!
//! The format has no formal grammar: structure is inferred from section
//! headers, indentation, and the two-or-more-spaces cell delimiter. This
//! module turns raw text into a [`Model`] of sections, blocks, steps, and
//! cells that the checker, formatter, and injectors all share.

pub mod builder;
pub mod model;
pub mod tokenizer;

pub use builder::{build_model, parse_source};
pub use model::{
    Block, Comment, Model, ParseWarning, PhysicalLine, Section, SectionKind, SourceFile, Step,
};
pub use tokenizer::{expand_tabs, tokenize, CONTINUATION_MARKER};
