//! Frontmatter extraction and parsing.

use serde_json::{Map, Value};

/// Metadata mapping parsed from a frontmatter block.
pub type Metadata = Map<String, Value>;

/// Extract YAML frontmatter from a document.
///
/// Returns the parsed metadata (empty when the document has no frontmatter)
/// and the remaining body after the closing delimiter.
pub fn extract_frontmatter(source: &str) -> Result<(Metadata, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((Metadata::new(), source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // Drop the rest of the closing delimiter line
    let remaining = match remaining.find('\n') {
        Some(newline) if remaining[..newline].trim().is_empty() => &remaining[newline + 1..],
        Some(_) => remaining,
        None => "",
    };

    if yaml_content.is_empty() {
        return Ok((Metadata::new(), remaining.trim_start()));
    }

    let metadata: Metadata = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((metadata, remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Attention Is Enough
date: 2024-03-01
tags: [ml, notes]
---

# Heading
"#;

        let (meta, content) = extract_frontmatter(source).unwrap();

        assert_eq!(meta["title"], "Attention Is Enough");
        assert_eq!(meta["date"], "2024-03-01");
        assert_eq!(meta["tags"][1], "notes");
        assert!(content.starts_with("# Heading"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (meta, content) = extract_frontmatter(source).unwrap();

        assert!(meta.is_empty());
        assert_eq!(content, source);
    }

    #[test]
    fn handles_empty_frontmatter() {
        let (meta, content) = extract_frontmatter("---\n---\nBody").unwrap();

        assert!(meta.is_empty());
        assert_eq!(content, "Body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_non_mapping_yaml() {
        let result = extract_frontmatter("---\n- just\n- a list\n---\nbody");

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
