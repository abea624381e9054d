//! Rule declaration parsing and rule set compilation.

use super::{
    ConfigError, Rename, RenameRuleSet, Replace, ReplaceRuleSet, Rule, RuleKind, RuleSet,
};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::info;

/// `<pattern> <new_key>`, both required. The new key may span lines.
static RENAME_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\S+)\s+(.+)$").unwrap());

/// `<pattern>` with an optional ` <replacement>`.
static REPLACE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\S+)(?:\s+(.*))?$").unwrap());

/// Drop the line terminators a YAML block scalar leaves at the end of a value.
fn trim_line_end(value: &str) -> &str {
    value.trim_end_matches(['\r', '\n'])
}

/// Split a rename declaration into `(pattern, new_key)`.
pub(crate) fn parse_rename_rule(value: &str) -> Option<(&str, &str)> {
    let caps = RENAME_DECLARATION.captures(trim_line_end(value))?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Split a replace declaration into `(pattern, replacement)`.
///
/// A missing or blank replacement is `None`.
pub(crate) fn parse_replace_rule(value: &str) -> Option<(&str, Option<&str>)> {
    let caps = REPLACE_DECLARATION.captures(trim_line_end(value))?;
    let replacement = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|r| !r.trim().is_empty());
    Some((caps.get(1)?.as_str(), replacement))
}

/// Compile all `rename_rule<N>` entries of a configuration map.
pub fn compile_rename_rules(
    config: &HashMap<String, String>,
) -> Result<RenameRuleSet, ConfigError> {
    compile_rules::<Rename>(config)
}

/// Compile all `replace_rule<N>` entries of a configuration map.
pub fn compile_replace_rules(
    config: &HashMap<String, String>,
) -> Result<ReplaceRuleSet, ConfigError> {
    compile_rules::<Replace>(config)
}

/// Compile the declarations of one rule kind, ordered by their numeric index.
///
/// Keys that do not look like `<prefix><digits>` are ignored, so the same map
/// can carry both rule kinds and unrelated settings.
pub fn compile_rules<K: RuleKind>(
    config: &HashMap<String, String>,
) -> Result<RuleSet<K>, ConfigError> {
    let mut declarations: Vec<(&str, &str, &str)> = config
        .iter()
        .filter_map(|(key, value)| {
            let index = rule_index(key, K::PREFIX)?;
            Some((key.as_str(), index, value.as_str()))
        })
        .collect();

    declarations.sort_by(|(a_key, a_index, _), (b_key, b_index, _)| {
        compare_indices(a_index, b_index).then_with(|| a_key.cmp(b_key))
    });

    let mut set = RuleSet::<K>::default();

    for (name, _, value) in declarations {
        let (pattern_text, template) = K::parse(value).ok_or_else(|| ConfigError::Malformed {
            rule: name.to_string(),
            value: value.to_string(),
        })?;

        if set.contains_pattern(pattern_text) {
            return Err(ConfigError::Duplicate {
                rule: name.to_string(),
                pattern: pattern_text.to_string(),
            });
        }

        let pattern = Regex::new(pattern_text).map_err(|source| ConfigError::InvalidPattern {
            rule: name.to_string(),
            source,
        })?;

        let rule = Rule::new(name, pattern, template);
        info!(rule = %rule, "Added {} key rule", K::NAME);
        set.push(rule)?;
    }

    Ok(set)
}

/// Digits following `prefix`, if `key` is exactly `<prefix><digits>`.
fn rule_index<'k>(key: &'k str, prefix: &str) -> Option<&'k str> {
    let index = key.strip_prefix(prefix)?;
    (!index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())).then_some(index)
}

/// Compare two decimal digit strings by numeric value, without overflow.
fn compare_indices(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn names<K: RuleKind>(set: &RuleSet<K>) -> Vec<&str> {
        set.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_parse_rename_rule() {
        let parsed = parse_rename_rule("(reg)(exp) ${md[1]} ${md[2]}").unwrap();
        assert_eq!(parsed, ("(reg)(exp)", "${md[1]} ${md[2]}"));
    }

    #[test]
    fn test_parse_rename_rule_requires_template() {
        assert!(parse_rename_rule(r"^\$(.+?)").is_none());
        assert!(parse_rename_rule("").is_none());
        assert!(parse_rename_rule(" leading").is_none());
    }

    #[test]
    fn test_parse_replace_rule_with_replacement() {
        // Hyphens to underscores
        let parsed = parse_replace_rule("- _").unwrap();
        assert_eq!(parsed, ("-", Some("_")));
    }

    #[test]
    fn test_parse_replace_rule_without_replacement() {
        let parsed = parse_replace_rule(r"[()\s-]").unwrap();
        assert_eq!(parsed, (r"[()\s-]", None));
    }

    #[test]
    fn test_trailing_newline_ignored() {
        assert_eq!(parse_rename_rule("^a b\n"), Some(("^a", "b")));
        assert_eq!(parse_rename_rule("^a b\r\n"), Some(("^a", "b")));
        assert_eq!(parse_replace_rule("[()]\n"), Some(("[()]", None)));
        assert_eq!(parse_replace_rule("- _\n"), Some(("-", Some("_"))));
    }

    #[test]
    fn test_embedded_newline_kept_in_template() {
        assert_eq!(parse_rename_rule("a b\nc"), Some(("a", "b\nc")));
        assert_eq!(parse_replace_rule("a b\nc"), Some(("a", Some("b\nc"))));
        // Whitespace run spanning lines still separates pattern and template
        assert_eq!(parse_rename_rule("a\n  b"), Some(("a", "b")));
    }

    #[test]
    fn test_blank_replacement_is_none() {
        assert_eq!(parse_replace_rule("a   "), Some(("a", None)));
        assert_eq!(parse_replace_rule("a \n \t"), Some(("a", None)));
    }

    #[test]
    fn test_multiline_declarations_compile() {
        let cfg = config(&[
            ("rename_rule1", "a b\nc"),
            ("replace_rule1", "[()]\n"),
            ("replace_rule2", "- _\n"),
        ]);

        let rename = compile_rename_rules(&cfg).unwrap();
        assert_eq!(rename.rules()[0].pattern().as_str(), "a");
        assert_eq!(rename.rules()[0].template(), "b\nc");

        let replace = compile_replace_rules(&cfg).unwrap();
        assert_eq!(replace.rules()[0].template(), "");
        assert_eq!(replace.rules()[1].pattern().as_str(), "-");
        assert_eq!(replace.rules()[1].template(), "_");
    }

    #[test]
    fn test_replace_kind_defaults_to_empty_replacement() {
        assert_eq!(Replace::parse("[()]"), Some(("[()]", "")));
    }

    #[test]
    fn test_rule_index() {
        assert_eq!(rule_index("rename_rule12", "rename_rule"), Some("12"));
        assert_eq!(rule_index("rename_rule", "rename_rule"), None);
        assert_eq!(rule_index("rename_rule1a", "rename_rule"), None);
        assert_eq!(rule_index("xrename_rule1", "rename_rule"), None);
        assert_eq!(rule_index("replace_rule1", "rename_rule"), None);
    }

    #[test]
    fn test_compare_indices_numeric() {
        assert_eq!(compare_indices("2", "10"), Ordering::Less);
        assert_eq!(compare_indices("10", "9"), Ordering::Greater);
        assert_eq!(compare_indices("007", "7"), Ordering::Equal);
        assert_eq!(
            compare_indices("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_rules_sorted_numerically() {
        let set = compile_rename_rules(&config(&[
            ("rename_rule10", "ten x"),
            ("rename_rule2", "two x"),
            ("rename_rule1", "one x"),
        ]))
        .unwrap();
        assert_eq!(
            names(&set),
            vec!["rename_rule1", "rename_rule2", "rename_rule10"]
        );
    }

    #[test]
    fn test_kinds_are_selected_separately() {
        let cfg = config(&[
            ("rename_rule1", r"^\$(.+) x${md[1]}"),
            ("replace_rule1", r"^\$ x"),
            ("replace_rule2", "[()]"),
            ("deep_rename", "false"),
        ]);

        let rename = compile_rename_rules(&cfg).unwrap();
        let replace = compile_replace_rules(&cfg).unwrap();
        assert_eq!(names(&rename), vec!["rename_rule1"]);
        assert_eq!(names(&replace), vec!["replace_rule1", "replace_rule2"]);
        assert_eq!(replace.rules()[1].template(), "");
    }

    #[test]
    fn test_no_declarations_yields_empty_set() {
        let set = compile_rename_rules(&config(&[("append_tag", "renamed")])).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_rename_without_template_is_error() {
        let err = compile_rename_rules(&config(&[("rename_rule1", r"^$(.+?)")])).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert_eq!(err.to_string(), r"Failed to parse: rename_rule1 ^$(.+?)");
    }

    #[test]
    fn test_replace_without_pattern_is_error() {
        let err = compile_replace_rules(&config(&[("replace_rule1", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_duplicate_patterns_rejected() {
        let err = compile_rename_rules(&config(&[
            ("rename_rule1", r"^\$(.+) ${md[1]}"),
            ("rename_rule2", r"^\$(.+) ${md[1]} something"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::Duplicate { rule, pattern } => {
                assert_eq!(rule, "rename_rule2");
                assert_eq!(pattern, r"^\$(.+)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_pattern_in_different_kinds_allowed() {
        let cfg = config(&[("rename_rule1", "^a b"), ("replace_rule1", "^a b")]);
        assert_eq!(compile_rename_rules(&cfg).unwrap().len(), 1);
        assert_eq!(compile_replace_rules(&cfg).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_regex_is_error() {
        let err = compile_replace_rules(&config(&[("replace_rule3", "(unclosed")])).unwrap_err();
        match err {
            ConfigError::InvalidPattern { rule, .. } => assert_eq!(rule, "replace_rule3"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_equal_indices_ordered_by_key() {
        let cfg = config(&[("replace_rule01", "b"), ("replace_rule1", "a")]);
        let set = compile_replace_rules(&cfg).unwrap();
        assert_eq!(names(&set), vec!["replace_rule01", "replace_rule1"]);
    }

    #[test]
    fn test_template_keeps_inner_whitespace() {
        let set = compile_rename_rules(&config(&[(
            "rename_rule1",
            r"(\w+)\s(\w+)\s(\w+)   ${md[3]} ${md[2]} ${md[1]}",
        )]))
        .unwrap();
        assert_eq!(set.rules()[0].template(), "${md[3]} ${md[2]} ${md[1]}");
    }
}
