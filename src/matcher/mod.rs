//! Key matchers.
//!
//! A matcher maps one record key to its new name. Both rule set kinds
//! implement [`KeyMatcher`], which is what the record walker is generic over.

mod rename;
mod replace;

pub use rename::apply_rename;
pub use replace::apply_replace;

use crate::rule::{RenameRuleSet, ReplaceRuleSet};

/// Trait for rewriting a single record key.
pub trait KeyMatcher: Send + Sync {
    /// Return the new key. Keys that match nothing come back unchanged.
    fn apply(&self, key: &str) -> String;

    /// Get the matcher name for debugging.
    fn name(&self) -> &'static str;
}

impl KeyMatcher for RenameRuleSet {
    fn apply(&self, key: &str) -> String {
        apply_rename(key, self)
    }

    fn name(&self) -> &'static str {
        "rename_matcher"
    }
}

impl KeyMatcher for ReplaceRuleSet {
    fn apply(&self, key: &str) -> String {
        apply_replace(key, self)
    }

    fn name(&self) -> &'static str {
        "replace_matcher"
    }
}
