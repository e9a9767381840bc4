//! Metadata injection.
//!
//! Two independent rewrites: merging tags into a `.robot` file's
//! `Force Tags` directive, and cloning the trunk branch record of a `.qc`
//! JSON sidecar under a new branch name. Both are pure text-to-text
//! functions; writing the result back is the pipeline's job.

pub mod branch;
pub mod tags;

pub use branch::{to_pretty_json, BranchInjector};
pub use tags::{TagDirective, TagInjector, FORCE_TAGS};
