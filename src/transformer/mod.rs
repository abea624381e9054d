//! Record transformers.

mod walker;

pub use walker::{rename_record, replace_record, transform};

use crate::config::RenameKeyConfig;
use crate::rule::{
    compile_rename_rules, compile_replace_rules, ConfigError, RenameRuleSet, ReplaceRuleSet,
};
use serde_json::Value as JsonValue;

/// A record: string keys to JSON values, in insertion order.
pub type Record = serde_json::Map<String, JsonValue>;

/// Applies the configured rename rules, then the replace rules, to records.
#[derive(Debug, Clone, Default)]
pub struct RecordTransformer {
    rename: RenameRuleSet,
    replace: ReplaceRuleSet,
    deep: bool,
}

impl RecordTransformer {
    /// Create a transformer from compiled rule sets.
    pub fn new(rename: RenameRuleSet, replace: ReplaceRuleSet, deep: bool) -> Self {
        Self {
            rename,
            replace,
            deep,
        }
    }

    /// Compile both rule sets from configuration.
    pub fn from_config(config: &RenameKeyConfig) -> Result<Self, ConfigError> {
        let rename = compile_rename_rules(&config.rules)?;
        let replace = compile_replace_rules(&config.rules)?;
        Ok(Self::new(rename, replace, config.deep_rename))
    }

    pub fn rename_rules(&self) -> &RenameRuleSet {
        &self.rename
    }

    pub fn replace_rules(&self) -> &ReplaceRuleSet {
        &self.replace
    }

    pub fn is_deep(&self) -> bool {
        self.deep
    }

    /// Whether neither rule set has any rules.
    pub fn is_empty(&self) -> bool {
        self.rename.is_empty() && self.replace.is_empty()
    }

    /// Transform one record. Empty rule sets are skipped.
    pub fn transform(&self, record: &Record) -> Record {
        match (self.rename.is_empty(), self.replace.is_empty()) {
            (false, false) => replace_record(
                &rename_record(record, &self.rename, self.deep),
                &self.replace,
                self.deep,
            ),
            (false, true) => rename_record(record, &self.rename, self.deep),
            (true, false) => replace_record(record, &self.replace, self.deep),
            (true, true) => record.clone(),
        }
    }
}
