//! Rename key agent implementation.

use crate::config::RenameKeyConfig;
use crate::rule::ConfigError;
use crate::transformer::{Record, RecordTransformer};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace};

/// Rename Key Agent.
///
/// Compiles the configured rules once and rewrites the keys of every record
/// it is handed, re-emitting batches under a rewritten tag.
pub struct RenameKeyAgent {
    /// Configuration
    config: RenameKeyConfig,
    /// Compiled rename and replace rules
    transformer: RecordTransformer,
    /// Metrics: total batches processed.
    batches_total: AtomicU64,
    /// Metrics: total records processed.
    records_total: AtomicU64,
    /// Metrics: records with at least one rewritten key.
    records_renamed: AtomicU64,
}

/// A transformed batch and the tag it is emitted under.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub tag: String,
    pub records: Vec<Record>,
}

/// Snapshot of the agent counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentStats {
    pub batches_total: u64,
    pub records_total: u64,
    pub records_renamed: u64,
}

impl RenameKeyAgent {
    /// Create a new agent from configuration.
    ///
    /// Fails if a rule is invalid or if no rules are configured at all.
    pub fn new(config: RenameKeyConfig) -> Result<Self, ConfigError> {
        let transformer = RecordTransformer::from_config(&config)?;
        if transformer.is_empty() {
            return Err(ConfigError::NoRules);
        }

        info!(
            rename_rules = transformer.rename_rules().len(),
            replace_rules = transformer.replace_rules().len(),
            deep_rename = config.deep_rename,
            append_tag = %config.append_tag,
            "Rename key agent initialized"
        );

        Ok(Self {
            config,
            transformer,
            batches_total: AtomicU64::new(0),
            records_total: AtomicU64::new(0),
            records_renamed: AtomicU64::new(0),
        })
    }

    /// Create from a YAML configuration string.
    pub fn from_yaml(yaml: &str) -> Result<Self, AgentError> {
        let config: RenameKeyConfig = serde_yaml::from_str(yaml)?;
        Self::new(config).map_err(AgentError::from)
    }

    /// Create from a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self, AgentError> {
        let config: RenameKeyConfig = serde_json::from_str(json)?;
        Self::new(config).map_err(AgentError::from)
    }

    pub fn config(&self) -> &RenameKeyConfig {
        &self.config
    }

    pub fn transformer(&self) -> &RecordTransformer {
        &self.transformer
    }

    /// Tag that records received under `tag` are emitted with.
    ///
    /// `remove_tag_prefix` (and one `.` after it) is stripped first, then
    /// `.<append_tag>` is appended. An empty `append_tag` leaves the stripped
    /// tag as is, with no trailing `.`.
    pub fn rewrite_tag(&self, tag: &str) -> String {
        let base = match self.config.remove_tag_prefix.as_deref() {
            Some(prefix) => tag
                .strip_prefix(prefix)
                .map(|rest| rest.strip_prefix('.').unwrap_or(rest))
                .unwrap_or(tag),
            None => tag,
        };

        match (base.is_empty(), self.config.append_tag.is_empty()) {
            (true, _) => self.config.append_tag.clone(),
            (false, true) => base.to_string(),
            (false, false) => format!("{}.{}", base, self.config.append_tag),
        }
    }

    /// Rewrite the keys of a single record.
    pub fn transform_record(&self, record: &Record) -> Record {
        self.records_total.fetch_add(1, Ordering::Relaxed);

        let new_record = self.transformer.transform(record);
        if new_record != *record {
            self.records_renamed.fetch_add(1, Ordering::Relaxed);
            trace!("Record keys rewritten");
        }
        new_record
    }

    /// Transform a batch received under `tag`.
    pub fn process(&self, tag: &str, records: &[Record]) -> Emission {
        self.batches_total.fetch_add(1, Ordering::Relaxed);

        let new_tag = self.rewrite_tag(tag);
        let records: Vec<Record> = records.iter().map(|r| self.transform_record(r)).collect();

        debug!(tag, new_tag = %new_tag, records = records.len(), "Processed batch");

        Emission {
            tag: new_tag,
            records,
        }
    }

    /// Current counter values.
    pub fn stats(&self) -> AgentStats {
        AgentStats {
            batches_total: self.batches_total.load(Ordering::Relaxed),
            records_total: self.records_total.load(Ordering::Relaxed),
            records_renamed: self.records_renamed.load(Ordering::Relaxed),
        }
    }
}

/// Errors that can occur when creating the agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rule error: {0}")]
    Rule(#[from] ConfigError),
}
