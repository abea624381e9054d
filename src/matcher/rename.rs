//! Whole-key renaming.

use crate::placeholder;
use crate::rule::RenameRuleSet;
use tracing::trace;

/// Rename `key` with the first matching rule.
///
/// The new key is the rule's resolved template in full; text of `key` outside
/// the match is dropped.
pub fn apply_rename(key: &str, rules: &RenameRuleSet) -> String {
    match rules.find_match(key) {
        Some((rule, captures)) => {
            let new_key = placeholder::resolve(rule.template(), &captures);
            trace!(rule = rule.name(), key, new_key = %new_key, "Renamed key");
            new_key
        }
        None => key.to_string(),
    }
}
