//! In-key substring replacement.

use crate::placeholder;
use crate::rule::ReplaceRuleSet;
use regex::NoExpand;
use tracing::trace;

/// Replace every occurrence of the first matching rule's pattern in `key`.
///
/// The replacement is resolved once, against the first match, and then
/// inserted literally at each occurrence. Only `${md[N]}` is substituted;
/// `$1`, `${1}`, `\1` and `\0` end up in the key as written.
pub fn apply_replace(key: &str, rules: &ReplaceRuleSet) -> String {
    match rules.find_match(key) {
        Some((rule, captures)) => {
            let replacement = placeholder::resolve(rule.template(), &captures);
            let new_key = rule
                .pattern()
                .replace_all(key, NoExpand(&replacement))
                .into_owned();
            trace!(rule = rule.name(), key, new_key = %new_key, "Replaced key");
            new_key
        }
        None => key.to_string(),
    }
}
