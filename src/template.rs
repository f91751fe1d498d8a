//! Environment interpolation for fetch profiles
//!
//! Handles `${VARIABLE}` placeholders so that secrets (client secrets,
//! tokens) can stay out of profile files.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching placeholders: ${NAME}
static VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}").unwrap()
});

/// Render a template, resolving each variable through `lookup`
///
/// Every unresolved name is reported in a single configuration error.
pub fn render_with<F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();

    let rendered = VARIABLE_REGEX.replace_all(template, |cap: &regex::Captures<'_>| {
        let name = &cap[1];
        lookup(name).unwrap_or_else(|| {
            missing.push(name.to_string());
            String::new()
        })
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::config(format!(
            "Undefined environment variable(s): {}",
            missing.join(", ")
        )))
    }
}

/// Render a template against the process environment
pub fn render_env(template: &str) -> Result<String> {
    render_with(template, |name| std::env::var(name).ok())
}

/// Check if a string contains placeholders
pub fn has_variables(s: &str) -> bool {
    VARIABLE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    VARIABLE_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let env = vars(&[("GRAPH_TOKEN", "eyJ0")]);
        let result = render_with("Bearer ${GRAPH_TOKEN}", |n| env.get(n).cloned()).unwrap();
        assert_eq!(result, "Bearer eyJ0");
    }

    #[test]
    fn test_multiple_substitutions() {
        let env = vars(&[("HOST", "graph.example.com"), ("VERSION", "beta")]);
        let result = render_with("https://${HOST}/${VERSION}/devices", |n| {
            env.get(n).cloned()
        })
        .unwrap();
        assert_eq!(result, "https://graph.example.com/beta/devices");
    }

    #[test]
    fn test_undefined_variables_reported_together() {
        let err = render_with("${A}-${B}", |_| None).unwrap_err();
        assert!(err.is_config());
        let msg = err.to_string();
        assert!(msg.contains('A'));
        assert!(msg.contains('B'));
    }

    #[test]
    fn test_no_variables() {
        let result = render_with("plain string", |_| None).unwrap();
        assert_eq!(result, "plain string");
    }

    #[test]
    fn test_whitespace_in_placeholder() {
        let env = vars(&[("KEY", "v")]);
        assert_eq!(render_with("${KEY}", |n| env.get(n).cloned()).unwrap(), "v");
        assert_eq!(render_with("${ KEY }", |n| env.get(n).cloned()).unwrap(), "v");
    }

    #[test]
    fn test_has_variables() {
        assert!(has_variables("${CLIENT_SECRET}"));
        assert!(has_variables("prefix ${X} suffix"));
        assert!(!has_variables("$NOT_BRACED"));
        assert!(!has_variables("no placeholders"));
    }

    #[test]
    fn test_extract_variables() {
        let names = extract_variables("${TENANT_ID} and ${CLIENT_ID}");
        assert_eq!(names, vec!["TENANT_ID", "CLIENT_ID"]);
    }

    #[test]
    fn test_render_env_reads_process_environment() {
        // PATH is set in every test environment
        let rendered = render_env("${PATH}").unwrap();
        assert_eq!(rendered, std::env::var("PATH").unwrap());
    }
}
