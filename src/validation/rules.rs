//! The default rule table.
//!
//! Rules are grouped by what they look at: argument lists, raw layout,
//! naming, step counts, and waits.

pub mod arguments;
pub mod layout;
pub mod naming;
pub mod steps;
pub mod waits;

use crate::validation::engine::Rule;

pub use arguments::{ArgumentCountRule, BooleanArgumentRule};
pub use layout::{FileSizeRule, LineLengthRule, TabRule};
pub use naming::{CaseNameRule, KeywordNameRule, VariableNameRule};
pub use steps::{CaseStepsRule, ForLoopStepsRule, KeywordStepsRule};
pub use waits::DisallowedWaitRule;

/// Every built-in rule, in report order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ArgumentCountRule),
        Box::new(BooleanArgumentRule),
        Box::new(LineLengthRule),
        Box::new(FileSizeRule),
        Box::new(CaseNameRule),
        Box::new(KeywordNameRule),
        Box::new(VariableNameRule),
        Box::new(KeywordStepsRule),
        Box::new(CaseStepsRule),
        Box::new(ForLoopStepsRule),
        Box::new(DisallowedWaitRule),
        Box::new(TabRule),
    ]
}
