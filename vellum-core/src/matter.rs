//! Front-matter extraction from content sources.

use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static MATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn matter_regex() -> &'static Regex {
    MATTER_REGEX.get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n?(.*)$").unwrap())
}

/// Split a Markdown/MDX document into raw front-matter and body.
///
/// Returns a tuple of (front-matter, body). If no front-matter is present,
/// returns an empty mapping with the full content as body.
///
/// # Example
///
/// ```
/// use vellum_core::matter::split;
///
/// let content = "---\ntitle: My Post\ndate: 2025-01-01\n---\n# Hello World\n";
///
/// let (matter, body) = split(content).unwrap();
/// assert_eq!(matter["title"].as_str(), Some("My Post"));
/// assert!(body.trim().starts_with("# Hello World"));
/// ```
pub fn split(content: &str) -> Result<(Value, String), MatterError> {
    let re = matter_regex();

    if let Some(captures) = re.captures(content) {
        let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        let body = captures.get(2).map(|m| m.as_str()).unwrap_or("");

        let matter: Value = serde_yaml::from_str(yaml)?;
        let matter = match matter {
            Value::Null => Value::Mapping(Default::default()),
            other => other,
        };

        Ok((matter, body.to_string()))
    } else {
        // No front-matter, return an empty mapping with full content as body
        Ok((Value::Mapping(Default::default()), content.to_string()))
    }
}

/// Parse a standalone YAML source (no body).
pub fn parse_yaml(content: &str) -> Result<Value, MatterError> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_valid_front_matter() {
        let content = r#"---
title: Test Post
description: A test post
date: 2025-01-01
draft: true
---

# Hello World

This is the content."#;

        let (matter, body) = split(content).unwrap();
        assert_eq!(matter["title"].as_str(), Some("Test Post"));
        assert_eq!(matter["description"].as_str(), Some("A test post"));
        assert_eq!(matter["date"].as_str(), Some("2025-01-01"));
        assert_eq!(matter["draft"].as_bool(), Some(true));
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_split_with_list_field() {
        let content = r#"---
title: Tagged Post
tags:
  - rust
  - programming
---

Content."#;

        let (matter, _) = split(content).unwrap();
        let tags: Vec<&str> = matter["tags"]
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(tags, vec!["rust", "programming"]);
    }

    #[test]
    fn test_split_no_front_matter() {
        let content = "# Just Content\n\nNo front-matter here.";
        let (matter, body) = split(content).unwrap();
        assert!(matter.as_mapping().unwrap().is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_empty_front_matter_block() {
        let content = "---\n\n---\nBody only.";
        let (matter, body) = split(content).unwrap();
        assert!(matter.as_mapping().unwrap().is_empty());
        assert!(body.contains("Body only."));
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(split(content).is_err());
    }

    #[test]
    fn test_parse_yaml_mapping() {
        let value = parse_yaml("name: Journal\nslug: journal\n").unwrap();
        assert_eq!(value["name"].as_str(), Some("Journal"));
    }

    #[test]
    fn test_parse_yaml_sequence() {
        let value = parse_yaml("- name: One\n- name: Two\n").unwrap();
        assert_eq!(value.as_sequence().unwrap().len(), 2);
    }
}
