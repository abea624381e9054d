//! Match-data placeholders for rule templates.
//!
//! A template may reference the text of the rule's match with `${md[N]}`:
//! `${md[0]}` is the whole match and `${md[1]}`, `${md[2]}`, ... are the
//! capture groups in declaration order.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for matching placeholders like ${md[1]}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{md\[(\d+)\]\}").unwrap());

/// Text of each group of one match, indexed by group number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders<'h> {
    groups: Vec<&'h str>,
}

impl<'h> Placeholders<'h> {
    /// Collect group texts from a match. Groups that did not participate are empty.
    pub fn from_captures(captures: &Captures<'h>) -> Self {
        Self {
            groups: captures
                .iter()
                .map(|group| group.map_or("", |m| m.as_str()))
                .collect(),
        }
    }

    /// Text for group `index`, empty if the pattern has no such group.
    pub fn get(&self, index: usize) -> &'h str {
        self.groups.get(index).copied().unwrap_or_default()
    }

    /// Number of groups, including the whole match.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Substitute every `${md[N]}` in `template`.
    ///
    /// Substituted text is not scanned again.
    pub fn interpolate(&self, template: &str) -> String {
        PLACEHOLDER_REGEX
            .replace_all(template, |caps: &Captures<'_>| {
                caps[1].parse::<usize>().map_or("", |index| self.get(index))
            })
            .into_owned()
    }
}

/// Resolve the placeholders of `template` against one match.
pub fn resolve(template: &str, captures: &Captures<'_>) -> String {
    Placeholders::from_captures(captures).interpolate(template)
}
