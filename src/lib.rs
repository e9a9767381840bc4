pub use crate::config::Config;
pub use crate::errors::LintError;

pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod format;
pub mod inject;
pub mod pipeline;
pub mod report;
pub mod syntax;
pub mod validation;
