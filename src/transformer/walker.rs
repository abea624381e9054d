//! Recursive key rewriting over nested records.

use super::Record;
use crate::matcher::KeyMatcher;
use crate::rule::{RenameRuleSet, ReplaceRuleSet};
use serde_json::Value as JsonValue;

/// Build a new record whose keys have been rewritten by `matcher`.
///
/// With `deep` set, nested objects and objects inside arrays are rewritten
/// too; other array elements (including nested arrays) are copied as-is.
/// When two keys map to the same new key the later value wins and keeps the
/// position of the first.
pub fn transform<M: KeyMatcher + ?Sized>(record: &Record, matcher: &M, deep: bool) -> Record {
    let mut new_record = Record::new();

    for (key, value) in record {
        let new_key = matcher.apply(key);
        let new_value = if deep {
            transform_value(value, matcher)
        } else {
            value.clone()
        };
        new_record.insert(new_key, new_value);
    }

    new_record
}

fn transform_value<M: KeyMatcher + ?Sized>(value: &JsonValue, matcher: &M) -> JsonValue {
    match value {
        JsonValue::Object(map) => JsonValue::Object(transform(map, matcher, true)),
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::Object(map) => JsonValue::Object(transform(map, matcher, true)),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Rename the keys of `record` with a rename rule set.
pub fn rename_record(record: &Record, rules: &RenameRuleSet, deep: bool) -> Record {
    transform(record, rules, deep)
}

/// Replace within the keys of `record` with a replace rule set.
pub fn replace_record(record: &Record, rules: &ReplaceRuleSet, deep: bool) -> Record {
    transform(record, rules, deep)
}
