//! Record key rename agent.
//!
//! Rewrites the keys of structured, arbitrarily nested records with an
//! ordered list of regex rules:
//!
//! - `rename_rule<N>`: replace the whole key with a template built from the match
//! - `replace_rule<N>`: substitute every match inside the key
//! - `${md[N]}` placeholders for the whole match and capture groups
//! - Recursive rewriting of nested objects and arrays of objects
//! - Tag rewriting for re-emitted batches
//!
//! ## Configuration Example
//!
//! ```yaml
//! deep_rename: true
//! append_tag: key_renamed
//! rename_rule1: '^\$(.+) x$${md[1]}'
//! replace_rule1: '[\s()]'
//! ```
//!
//! Rules of each kind are applied in ascending order of `N`; the first
//! matching rule wins.

pub mod agent;
pub mod config;
pub mod matcher;
pub mod placeholder;
pub mod rule;
pub mod transformer;

pub use agent::{AgentError, AgentStats, Emission, RenameKeyAgent};
pub use config::RenameKeyConfig;
pub use matcher::{apply_rename, apply_replace, KeyMatcher};
pub use rule::{
    compile_rename_rules, compile_replace_rules, ConfigError, RenameRuleSet, ReplaceRuleSet,
    Rule, RuleSet,
};
pub use transformer::{rename_record, replace_record, Record, RecordTransformer};
