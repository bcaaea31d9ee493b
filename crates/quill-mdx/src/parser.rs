//! Document processor: frontmatter, tree plugins, highlighting and HTML.

use pulldown_cmark::Options;
use quill_highlight::{FilenameTransformer, HighlightConfig, HighlightError, Highlighter};

use crate::code_filename::CodeFilename;
use crate::codeblock::CodeBlockInfo;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::plugin::TreePlugin;
use crate::tree::{TocEntry, Tree};

/// A processed document.
#[derive(Debug, Clone)]
pub struct RenderedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Rendered HTML fragment
    pub html: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Code blocks as seen after tree plugins ran
    pub code_blocks: Vec<CodeBlockInfo>,
}

/// Errors that can occur when processing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Highlight error: {0}")]
    Highlight(#[from] HighlightError),
}

/// Runs documents through tree plugins and the highlighter.
pub struct Processor {
    plugins: Vec<Box<dyn TreePlugin>>,
    highlighter: Highlighter,
    gfm: bool,
}

impl Processor {
    /// Create a processor with no tree plugins and GFM enabled.
    pub fn new(highlighter: Highlighter) -> Self {
        Self {
            plugins: Vec::new(),
            highlighter,
            gfm: true,
        }
    }

    /// Create the standard pipeline: the fence filename splitter feeding the
    /// highlighter's filename transformer.
    pub fn standard(config: &HighlightConfig) -> Result<Self, HighlightError> {
        let highlighter = Highlighter::new(config)?.with_transformer(FilenameTransformer::new());
        Ok(Self::new(highlighter).with_plugin(CodeFilename::new()))
    }

    /// Add a tree plugin. Plugins run in registration order.
    pub fn with_plugin<P: TreePlugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Names of the registered tree plugins.
    pub fn plugin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.iter().map(|p| p.name())
    }

    /// Parser options for the current settings.
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Process one document.
    pub fn process(&self, source: &str) -> Result<RenderedDoc, ParseError> {
        let (frontmatter, content) = extract_frontmatter(source)?;

        let mut tree = Tree::parse(content, self.parser_options());
        for plugin in &self.plugins {
            tracing::trace!(plugin = plugin.name(), "Running tree plugin");
            plugin.run(&mut tree);
        }

        let toc = tree.assign_heading_ids();
        let code_blocks = tree.code_blocks().map(CodeBlockInfo::from).collect();
        let html = tree.render(&self.highlighter)?;

        Ok(RenderedDoc {
            frontmatter,
            html,
            toc,
            code_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn processor() -> Processor {
        Processor::standard(&HighlightConfig::default()).unwrap()
    }

    #[test]
    fn processes_complete_post() {
        let source = r#"---
title: Deploying the site
description: How the blog ships
---

# Deploying

```sh:scripts/deploy.sh
./scripts/deploy.sh --prod
```

## Config

```ts:app.ts
export const site = "https://sorafujitani.me";
```

```bash
echo done
```
"#;

        let doc = processor().process(source).unwrap();

        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.title, "Deploying the site");

        assert_eq!(
            doc.code_blocks,
            vec![
                CodeBlockInfo {
                    lang: Some("sh".to_string()),
                    filename: Some("scripts/deploy.sh".to_string()),
                },
                CodeBlockInfo {
                    lang: Some("ts".to_string()),
                    filename: Some("app.ts".to_string()),
                },
                CodeBlockInfo {
                    lang: Some("bash".to_string()),
                    filename: None,
                },
            ]
        );

        assert!(doc.html.contains(r#"data-filename="scripts/deploy.sh""#));
        assert!(doc.html.contains(r#"data-filename="app.ts""#));
        assert!(doc.html.contains(r#"data-language="ts""#));
        assert_eq!(doc.html.matches("data-filename").count(), 2);

        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].id, "deploying");
        assert_eq!(doc.toc[1].level, 2);
    }

    #[test]
    fn block_without_filename_after_one_with_filename() {
        let doc = processor()
            .process("```ts:app.ts\na\n```\n\n```ts\nb\n```\n")
            .unwrap();

        let pres: Vec<_> = doc.html.split("<pre ").skip(1).collect();
        assert_eq!(pres.len(), 2);
        assert!(pres[0].contains(r#"data-filename="app.ts""#));
        assert!(!pres[1].contains("data-filename"));
    }

    #[test]
    fn without_plugin_colon_tag_is_kept() {
        let highlighter = Highlighter::new(&HighlightConfig::default())
            .unwrap()
            .with_transformer(FilenameTransformer::new());
        let doc = Processor::new(highlighter)
            .process("```ts:app.ts\na\n```\n")
            .unwrap();

        assert_eq!(doc.code_blocks[0].lang.as_deref(), Some("ts:app.ts"));
        assert!(!doc.html.contains("data-filename"));
    }

    #[test]
    fn gfm_tables_toggle() {
        let table = "| a | b |\n|---|---|\n| 1 | 2 |\n";

        let with = processor().process(table).unwrap();
        assert!(with.html.contains("<table>"));

        let without = processor().with_gfm(false).process(table).unwrap();
        assert!(!without.html.contains("<table>"));
    }

    #[test]
    fn leading_rule_renders_as_hr() {
        let doc = processor()
            .process("---\n\nOpening remarks.\n")
            .unwrap();

        assert!(doc.frontmatter.is_none());
        assert!(doc.html.starts_with("<hr />"));
        assert!(doc.html.contains("<p>Opening remarks.</p>"));
    }

    #[test]
    fn reports_frontmatter_errors() {
        let result = processor().process("---\ntitle: x\n");
        assert!(matches!(result, Err(ParseError::Frontmatter(_))));
    }

    #[test]
    fn standard_pipeline_names() {
        let p = processor();
        assert_eq!(p.plugin_names().collect::<Vec<_>>(), vec!["code-filename"]);
    }
}
