//! Frontmatter extraction and parsing.

use serde::{Deserialize, Serialize};

/// Parsed frontmatter of a post.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Frontmatter {
    /// Post title (required)
    pub title: String,

    /// Summary for listings and SEO
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date as written, e.g. `2025-10-04`
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Drafts are skipped by the builder unless asked for
    #[serde(default)]
    pub draft: bool,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,
}

/// Line that opens and closes a frontmatter block.
const DELIMITER: &str = "---";

/// Split YAML frontmatter off the top of a document.
///
/// The block must start on the first line. A `---` followed by a blank line
/// or by nothing at all is a Markdown thematic break, not frontmatter, and the
/// source is returned untouched.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, source));
    };
    if first.trim_end() != DELIMITER {
        return Ok((None, source));
    }

    let mut offset = first.len();
    let yaml_start = offset;
    let mut opened = false;

    for line in lines {
        if !opened {
            if line.trim().is_empty() {
                // thematic break
                return Ok((None, source));
            }
            opened = true;
        }

        if line.trim_end() == DELIMITER {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            if yaml.trim().is_empty() {
                return Ok((None, body.trim_start()));
            }
            let frontmatter: Frontmatter = serde_yaml::from_str(yaml)
                .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;
            return Ok((Some(frontmatter), body.trim_start()));
        }
        offset += line.len();
    }

    if opened {
        Err(FrontmatterError::Unclosed)
    } else {
        Ok((None, source))
    }
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Frontmatter block is never closed with ---")]
    Unclosed,

    #[error("Frontmatter is not valid YAML: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Shipping rfmt
description: Notes on a Ruby formatter
date: 2025-10-04
tags: [ruby, rust]
---

# Shipping rfmt
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "Shipping rfmt");
        assert_eq!(
            fm.description,
            Some("Notes on a Ruby formatter".to_string())
        );
        assert_eq!(fm.date.as_deref(), Some("2025-10-04"));
        assert_eq!(fm.tags, vec!["ruby".to_string(), "rust".to_string()]);
        assert!(!fm.draft);
        assert!(content.starts_with("# Shipping rfmt"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn reads_draft_flag() {
        let (fm, _) = extract_frontmatter("---\ntitle: WIP\ndraft: true\n---\nbody").unwrap();
        assert!(fm.unwrap().draft);
    }

    #[test]
    fn leading_thematic_break_is_not_frontmatter() {
        let source = "---\n\nA post that opens with a rule.\n\n---\n\nMore.\n";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn lone_rule_is_not_frontmatter() {
        let (fm, content) = extract_frontmatter("---\n").unwrap();
        assert!(fm.is_none());
        assert_eq!(content, "---\n");
    }

    #[test]
    fn empty_block_has_no_frontmatter() {
        let (fm, content) = extract_frontmatter("---\n---\n# Title\n").unwrap();
        assert!(fm.is_none());
        assert_eq!(content, "# Title\n");
    }

    #[test]
    fn closing_delimiter_must_be_own_line() {
        let source = "---\ntitle: a---b\n---\nbody";
        let (fm, content) = extract_frontmatter(source).unwrap();
        assert_eq!(fm.unwrap().title, "a---b");
        assert_eq!(content, "body");
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
}
