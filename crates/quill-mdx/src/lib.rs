//! MDX/Markdown processing for quill.
//!
//! A document goes through these stages:
//!
//! 1. frontmatter is split off ([`frontmatter`])
//! 2. the body is parsed into a [`Tree`] where each code block is a single
//!    [`CodeNode`]
//! 3. tree plugins such as [`CodeFilename`] rewrite nodes in place
//! 4. code blocks are rendered by a [`quill_highlight::Highlighter`] and the
//!    rest by pulldown-cmark's HTML writer ([`Processor`])

pub mod code_filename;
pub mod codeblock;
pub mod frontmatter;
pub mod parser;
pub mod plugin;
pub mod tree;

pub use code_filename::CodeFilename;
pub use codeblock::{parse_info, CodeBlockInfo, CodeNode};
pub use frontmatter::Frontmatter;
pub use parser::{ParseError, Processor, RenderedDoc};
pub use plugin::TreePlugin;
pub use tree::{Node, TocEntry, Tree};
