//! Code block nodes.

use pulldown_cmark::CodeBlockKind;
use quill_highlight::transformers::filename::filename_from_meta;
use quill_highlight::BlockOptions;
use serde::Serialize;

/// A code block collapsed into a single tree node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeNode {
    /// Language tag, the first word of the fence info string
    pub lang: Option<String>,

    /// Everything after the language tag
    pub meta: Option<String>,

    /// Raw code
    pub value: String,
}

impl CodeNode {
    /// Create a node from a fence info string.
    pub fn from_info(info: &str) -> Self {
        let (lang, meta) = parse_info(info);
        Self {
            lang,
            meta,
            value: String::new(),
        }
    }

    /// Create an empty node for a pulldown-cmark code block.
    pub fn from_kind(kind: &CodeBlockKind<'_>) -> Self {
        match kind {
            CodeBlockKind::Fenced(info) => Self::from_info(info),
            CodeBlockKind::Indented => Self::default(),
        }
    }

    /// Options handed to the highlighter for this block.
    pub fn options(&self) -> BlockOptions {
        BlockOptions::new(self.lang.as_deref(), self.meta.as_deref())
    }

    /// Filename carried in the metadata, if any.
    pub fn filename(&self) -> Option<&str> {
        self.meta.as_deref().and_then(filename_from_meta)
    }
}

/// Split a fence info string into language and metadata.
///
/// ```
/// use quill_mdx::parse_info;
///
/// assert_eq!(
///     parse_info("rust  {1,3}"),
///     (Some("rust".to_string()), Some("{1,3}".to_string()))
/// );
/// assert_eq!(parse_info(""), (None, None));
/// ```
pub fn parse_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }

    match info.split_once(char::is_whitespace) {
        Some((lang, rest)) => {
            let rest = rest.trim();
            let meta = (!rest.is_empty()).then(|| rest.to_string());
            (Some(lang.to_string()), meta)
        }
        None => (Some(info.to_string()), None),
    }
}

/// Summary of a rendered code block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlockInfo {
    pub lang: Option<String>,
    pub filename: Option<String>,
}

impl From<&CodeNode> for CodeBlockInfo {
    fn from(node: &CodeNode) -> Self {
        Self {
            lang: node.lang.clone(),
            filename: node.filename().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_lang_and_meta() {
        let node = CodeNode::from_info("tsx title=x showLineNumbers");
        assert_eq!(node.lang.as_deref(), Some("tsx"));
        assert_eq!(node.meta.as_deref(), Some("title=x showLineNumbers"));
    }

    #[test]
    fn lang_only() {
        let node = CodeNode::from_info("bash");
        assert_eq!(node.lang.as_deref(), Some("bash"));
        assert_eq!(node.meta, None);
    }

    #[test]
    fn indented_block_has_no_lang() {
        let node = CodeNode::from_kind(&CodeBlockKind::Indented);
        assert_eq!(node, CodeNode::default());
    }

    #[test]
    fn reads_filename_from_meta() {
        let node = CodeNode::from_info(r#"ts filename="app.ts""#);
        assert_eq!(node.filename(), Some("app.ts"));
        assert_eq!(
            CodeBlockInfo::from(&node),
            CodeBlockInfo {
                lang: Some("ts".to_string()),
                filename: Some("app.ts".to_string()),
            }
        );
    }
}
