//! Rule checking over the structural model.
//!
//! [`RuleEngine`] owns an ordered table of [`Rule`]s and runs each of them
//! independently against one file at a time. The default table is built by
//! [`rules::default_rules`].

pub mod engine;
pub mod keywords;
pub mod rules;

pub use engine::{FileReport, Rule, RuleEngine, Severity, Violation};
pub use keywords::{
    is_keyword_like, is_recommended_keyword, keyword_definitions, keyword_invocations,
    recommended_keyword, Invocation,
};
