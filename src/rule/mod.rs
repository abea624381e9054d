//! Key rules and compiled rule sets.
//!
//! Rules are declared as flat configuration entries:
//!
//! ```text
//! rename_rule1  ^\$(.+) x$${md[1]}
//! replace_rule1 [\s()]
//! ```
//!
//! The numeric suffix orders the rules; the value is a pattern followed by an
//! optional template (required for rename rules).

mod compiler;

pub use compiler::{compile_rename_rules, compile_replace_rules, compile_rules};

use regex::{Captures, Regex};
use std::fmt;
use std::marker::PhantomData;

/// A compiled key rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Declaring configuration key (e.g. `rename_rule3`)
    name: String,
    /// Compiled key pattern
    pattern: Regex,
    /// New key (rename) or replacement fragment (replace), may contain placeholders
    template: String,
}

impl Rule {
    /// Create a rule from an already compiled pattern.
    pub fn new(name: impl Into<String>, pattern: Regex, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern,
            template: template.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.pattern.as_str(), self.template)
    }
}

mod private {
    pub trait Sealed {}
}

/// The kind of a rule set, fixing its configuration prefix and declaration syntax.
pub trait RuleKind: private::Sealed + fmt::Debug + Send + Sync + 'static {
    /// Configuration key prefix, followed by the rule index.
    const PREFIX: &'static str;
    /// Human readable kind, used in log lines.
    const NAME: &'static str;

    /// Split a declaration value into pattern text and template.
    fn parse(value: &str) -> Option<(&str, &str)>;
}

/// Rename rules replace the whole key with the resolved template.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rename;

/// Replace rules substitute every match inside the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Replace;

impl private::Sealed for Rename {}
impl private::Sealed for Replace {}

impl RuleKind for Rename {
    const PREFIX: &'static str = "rename_rule";
    const NAME: &'static str = "rename";

    fn parse(value: &str) -> Option<(&str, &str)> {
        compiler::parse_rename_rule(value)
    }
}

impl RuleKind for Replace {
    const PREFIX: &'static str = "replace_rule";
    const NAME: &'static str = "replace";

    fn parse(value: &str) -> Option<(&str, &str)> {
        compiler::parse_replace_rule(value).map(|(pattern, replacement)| {
            (pattern, replacement.unwrap_or_default())
        })
    }
}

/// Ordered, immutable set of rules of one kind.
#[derive(Debug, Clone)]
pub struct RuleSet<K> {
    rules: Vec<Rule>,
    kind: PhantomData<K>,
}

/// Rules declared with `rename_rule<N>`.
pub type RenameRuleSet = RuleSet<Rename>;

/// Rules declared with `replace_rule<N>`.
pub type ReplaceRuleSet = RuleSet<Replace>;

impl<K: RuleKind> RuleSet<K> {
    /// Build a rule set from rules already in precedence order.
    ///
    /// Fails if two rules share the same pattern source text.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let mut set = Self::default();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }

    fn push(&mut self, rule: Rule) -> Result<(), ConfigError> {
        if self.contains_pattern(rule.pattern.as_str()) {
            return Err(ConfigError::Duplicate {
                rule: rule.name,
                pattern: rule.pattern.as_str().to_string(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Whether a rule with exactly this pattern source text exists.
    pub fn contains_pattern(&self, pattern: &str) -> bool {
        self.rules.iter().any(|r| r.pattern.as_str() == pattern)
    }

    /// First rule whose pattern matches anywhere in `key`, with its captures.
    pub fn find_match<'k>(&self, key: &'k str) -> Option<(&Rule, Captures<'k>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pattern.captures(key).map(|caps| (rule, caps)))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K> Default for RuleSet<K> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            kind: PhantomData,
        }
    }
}

impl<'a, K: RuleKind> IntoIterator for &'a RuleSet<K> {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors raised while compiling rule declarations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse: {rule} {value}")]
    Malformed { rule: String, value: String },

    #[error("Duplicated rules for key {pattern}: {rule}")]
    Duplicate { rule: String, pattern: String },

    #[error("Invalid regex pattern in {rule}: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("No rename or replace rules are given")]
    NoRules,
}
