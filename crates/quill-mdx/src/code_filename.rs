//! Turn `lang:filename` fence tags into filename metadata.
//!
//! A fence written as
//!
//! ````markdown
//! ```sh:scripts/deploy.sh
//! ./deploy
//! ```
//! ````
//!
//! becomes a block with language `sh` and `filename="scripts/deploy.sh"`
//! appended to its metadata, which the highlighter's filename transformer
//! later turns into a `data-filename` attribute.

use crate::codeblock::CodeNode;
use crate::plugin::TreePlugin;
use crate::tree::Tree;

/// Separator between the language and the filename in a fence tag.
pub const SEPARATOR: char = ':';

/// Tree plugin that splits `lang:filename` fence tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeFilename;

impl CodeFilename {
    pub fn new() -> Self {
        Self
    }
}

impl TreePlugin for CodeFilename {
    fn name(&self) -> &'static str {
        "code-filename"
    }

    fn run(&self, tree: &mut Tree<'_>) {
        let mut split = 0usize;
        for node in tree.code_blocks_mut() {
            if split_fence_tag(node) {
                split += 1;
            }
        }
        if split > 0 {
            tracing::debug!("Split filename from {} code fence tag(s)", split);
        }
    }
}

/// Split one node's language tag on the first separator.
///
/// Returns `true` if the node was rewritten. Only the first separator counts;
/// later ones stay part of the filename. A trailing separator yields an empty
/// filename, which is written as `filename=""`.
pub fn split_fence_tag(node: &mut CodeNode) -> bool {
    let Some(lang) = node.lang.as_deref() else {
        return false;
    };
    let Some((lang, filename)) = lang.split_once(SEPARATOR) else {
        return false;
    };

    let token = format!(r#"filename="{filename}""#);
    let lang = lang.to_string();

    node.meta = Some(match node.meta.take() {
        Some(meta) if !meta.is_empty() => format!("{meta} {token}"),
        _ => token,
    });
    node.lang = Some(lang);
    true
}
