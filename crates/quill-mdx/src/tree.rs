//! Document tree built from pulldown-cmark events.

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use quill_highlight::{HighlightError, Highlighter};
use serde::Serialize;

use crate::codeblock::CodeNode;

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// Any Markdown event other than those making up a code block
    Event(Event<'a>),
    /// A whole code block, by index into [`Tree::code_blocks`]
    Code(usize),
}

/// Parsed document.
///
/// The event stream is kept flat, except that the start, text and end events
/// of each code block are collapsed into one [`CodeNode`] so plugins can
/// edit a block as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree<'a> {
    nodes: Vec<Node<'a>>,
    code: Vec<CodeNode>,
}

impl<'a> Tree<'a> {
    /// Parse Markdown with the given parser options.
    pub fn parse(markdown: &'a str, options: Options) -> Self {
        let mut nodes = Vec::new();
        let mut blocks = Vec::new();
        let mut code: Option<CodeNode> = None;

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some(CodeNode::from_kind(&kind));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(node) = code.take() {
                        nodes.push(Node::Code(blocks.len()));
                        blocks.push(node);
                    }
                }
                Event::Text(text) if code.is_some() => {
                    if let Some(node) = code.as_mut() {
                        node.value.push_str(&text);
                    }
                }
                other => nodes.push(Node::Event(other)),
            }
        }

        Self {
            nodes,
            code: blocks,
        }
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    /// Code blocks in document order.
    pub fn code_blocks(&self) -> std::slice::Iter<'_, CodeNode> {
        self.code.iter()
    }

    /// Mutable access to code blocks in document order.
    pub fn code_blocks_mut(&mut self) -> std::slice::IterMut<'_, CodeNode> {
        self.code.iter_mut()
    }

    /// Give every heading an anchor id and return the table of contents.
    ///
    /// Repeated titles get `-1`, `-2`, ... suffixes.
    pub fn assign_heading_ids(&mut self) -> Vec<TocEntry> {
        let mut toc = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut pending: Vec<(usize, String)> = Vec::new();
        let mut current: Option<(usize, u8, String)> = None; // (node index, level, text)

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Event(Event::Start(Tag::Heading { level, .. })) => {
                    current = Some((i, *level as u8, String::new()));
                }
                Node::Event(Event::Text(text) | Event::Code(text)) => {
                    if let Some((_, _, ref mut title)) = current {
                        title.push_str(text);
                    }
                }
                Node::Event(Event::End(TagEnd::Heading(_))) => {
                    let Some((start, level, title)) = current.take() else {
                        continue;
                    };

                    let existing = match &self.nodes[start] {
                        Node::Event(Event::Start(Tag::Heading { id: Some(id), .. })) => {
                            Some(id.to_string())
                        }
                        _ => None,
                    };

                    let id = match existing {
                        Some(id) => id,
                        None => {
                            let base = slugify(&title);
                            let count = seen.entry(base.clone()).or_insert(0);
                            let slug = if *count == 0 {
                                base
                            } else {
                                format!("{base}-{count}")
                            };
                            *count += 1;
                            pending.push((start, slug.clone()));
                            slug
                        }
                    };

                    toc.push(TocEntry { title, id, level });
                }
                _ => {}
            }
        }

        for (index, slug) in pending {
            if let Node::Event(Event::Start(Tag::Heading { id, .. })) = &mut self.nodes[index] {
                *id = Some(CowStr::from(slug));
            }
        }

        toc
    }

    /// Render to HTML, sending code blocks through `highlighter`.
    pub fn render(self, highlighter: &Highlighter) -> Result<String, HighlightError> {
        let Tree { nodes, code } = self;
        let mut events = Vec::with_capacity(nodes.len());

        for node in nodes {
            match node {
                Node::Event(event) => events.push(event),
                Node::Code(index) => {
                    let block = &code[index];
                    let mut block = highlighter.highlight(&block.value, &block.options())?;
                    block.push('\n');
                    events.push(Event::Html(CowStr::from(block)));
                }
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_highlight::HighlightConfig;

    fn parse(src: &str) -> Tree<'_> {
        Tree::parse(src, Options::empty())
    }

    #[test]
    fn collapses_code_blocks() {
        let tree = parse("intro\n\n```rust {1}\nfn a() {}\nfn b() {}\n```\n\n    indented\n");
        let blocks: Vec<_> = tree.code_blocks().collect();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lang.as_deref(), Some("rust"));
        assert_eq!(blocks[0].meta.as_deref(), Some("{1}"));
        assert_eq!(blocks[0].value, "fn a() {}\nfn b() {}\n");
        assert_eq!(blocks[1].lang, None);
        assert_eq!(blocks[1].value, "indented\n");

        let code_nodes: Vec<_> = tree
            .nodes()
            .iter()
            .filter(|n| matches!(n, Node::Code(_)))
            .collect();
        assert_eq!(code_nodes, vec![&Node::Code(0), &Node::Code(1)]);
        assert!(!tree
            .nodes()
            .iter()
            .any(|n| matches!(n, Node::Event(Event::Start(Tag::CodeBlock(_))))));
    }

    #[test]
    fn code_blocks_mut_edits_in_place() {
        let mut tree = parse("```js\nx\n```\n");
        for block in tree.code_blocks_mut() {
            block.lang = Some("ts".to_string());
        }
        assert_eq!(tree.code_blocks().next().unwrap().lang.as_deref(), Some("ts"));
    }

    #[test]
    fn assigns_heading_ids() {
        let mut tree = parse("# Intro\n\n## Setup `cargo`\n\n## Setup cargo\n");
        let toc = tree.assign_heading_ids();

        assert_eq!(
            toc,
            vec![
                TocEntry {
                    title: "Intro".to_string(),
                    id: "intro".to_string(),
                    level: 1
                },
                TocEntry {
                    title: "Setup cargo".to_string(),
                    id: "setup-cargo".to_string(),
                    level: 2
                },
                TocEntry {
                    title: "Setup cargo".to_string(),
                    id: "setup-cargo-1".to_string(),
                    level: 2
                },
            ]
        );
    }

    #[test]
    fn renders_headings_and_code() {
        let highlighter = Highlighter::new(&HighlightConfig::default()).unwrap();
        let mut tree = parse("# Title\n\n```bash\necho hi\n```\n\nafter\n");
        tree.assign_heading_ids();
        let html = tree.render(&highlighter).unwrap();

        assert!(html.contains(r#"<h1 id="title">Title</h1>"#));
        assert!(html.contains(r#"<pre class="quill-code custom-biome-theme""#));
        assert!(html.contains(r#"data-language="bash""#));
        assert!(html.contains("<p>after</p>"));
        assert!(!html.contains("<code class=\"language-bash\">"));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
