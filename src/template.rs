//! Message templates with `[placeholder]` markers.
//!
//! A template such as `Write a [language] function that [task]` is filled
//! from a `key=value` list given on the command line.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("placeholder pattern is valid"));

/// Distinct placeholder names in `content`, in order of first occurrence.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(content) {
        let name = &cap[1];
        if !vars.iter().any(|v| v == name) {
            vars.push(name.to_string());
        }
    }
    vars
}

/// Parses `key1=value1,key2=value2` into a map.
///
/// Keys and values are trimmed. Pairs without exactly one `=` or with an
/// empty key are ignored. A repeated key keeps its last value.
pub fn parse_vars(spec: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for pair in spec.split(',') {
        let mut parts = pair.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), value.trim().to_string());
    }
    vars
}

/// Replaces every `[key]` in `content` with its value. Placeholders with no
/// value are left as they are.
pub fn apply(content: &str, vars: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(content, |cap: &regex::Captures<'_>| match vars.get(&cap[1]) {
            Some(value) => value.clone(),
            None => cap[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_variables_dedupes_in_order() {
        let vars = extract_variables("Review this [language] code for [goal], in [language]:\n[code]");
        assert_eq!(vars, vec!["language", "goal", "code"]);
        assert!(extract_variables("no placeholders").is_empty());
    }

    #[test]
    fn test_parse_vars_trims_and_skips_malformed() {
        let vars = parse_vars(" language = Python ,task=sort a list, broken, a=b=c, =x");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["language"], "Python");
        assert_eq!(vars["task"], "sort a list");
    }

    #[test]
    fn test_apply_fills_known_placeholders_only() {
        let vars = parse_vars("language=Rust,task=parses YAML");
        let filled = apply(
            "Write a [language] function that [task]. Use [style].",
            &vars,
        );
        assert_eq!(filled, "Write a Rust function that parses YAML. Use [style].");
    }

    #[test]
    fn test_apply_replaces_every_occurrence() {
        let vars = parse_vars("x=1");
        assert_eq!(apply("[x] + [x] = 2", &vars), "1 + 1 = 2");
    }
}
