//! Configuration types for the rename key agent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Tag suffix used when `append_tag` is not configured.
pub const DEFAULT_APPEND_TAG: &str = "key_renamed";

/// Main configuration for the rename key agent.
///
/// Rules are flat entries next to the settings:
///
/// ```yaml
/// deep_rename: true
/// append_tag: key_renamed
/// rename_rule1: '^\$(.+) x$${md[1]}'
/// replace_rule1: '[\s()]'
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameKeyConfig {
    /// Rewrite keys of nested objects and of objects inside arrays
    pub deep_rename: bool,
    /// Suffix appended to the tag of emitted records
    pub append_tag: String,
    /// Prefix removed from the incoming tag before appending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_tag_prefix: Option<String>,
    /// Rule declarations (`rename_rule<N>`, `replace_rule<N>`) and any other
    /// scalar keys. Nested values and nulls are dropped.
    #[serde(flatten, deserialize_with = "scalar_entries")]
    pub rules: HashMap<String, String>,
}

/// Collect the remaining entries, keeping scalars as text.
fn scalar_entries<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = HashMap::<String, JsonValue>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            JsonValue::String(s) => Some((key, s)),
            JsonValue::Number(n) => Some((key, n.to_string())),
            JsonValue::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect())
}

impl Default for RenameKeyConfig {
    fn default() -> Self {
        Self {
            deep_rename: true,
            append_tag: DEFAULT_APPEND_TAG.to_string(),
            remove_tag_prefix: None,
            rules: HashMap::new(),
        }
    }
}

impl RenameKeyConfig {
    /// Add a rule declaration, e.g. `("rename_rule1", "^a b")`.
    pub fn with_rule(mut self, name: impl Into<String>, declaration: impl Into<String>) -> Self {
        self.rules.insert(name.into(), declaration.into());
        self
    }

    pub fn with_deep_rename(mut self, deep_rename: bool) -> Self {
        self.deep_rename = deep_rename;
        self
    }

    pub fn with_append_tag(mut self, append_tag: impl Into<String>) -> Self {
        self.append_tag = append_tag.into();
        self
    }

    pub fn with_remove_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.remove_tag_prefix = Some(prefix.into());
        self
    }
}
