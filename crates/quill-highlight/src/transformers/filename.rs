//! Attach a fence filename to the rendered `<pre>` element.

use std::sync::LazyLock;

use regex::Regex;

use crate::element::Element;
use crate::transformer::{BlockContext, BlockOptions, Transformer};

/// Context key holding the filename captured for the current block.
pub const FILENAME_KEY: &str = "filename";

/// Attribute set on the `<pre>` element.
pub const DATA_FILENAME: &str = "data-filename";

static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="([^"]+)""#).expect("Invalid filename regex"));

/// Extract the value of a `filename="..."` token from a metadata string.
///
/// An empty value does not count as a filename.
pub fn filename_from_meta(meta: &str) -> Option<&str> {
    FILENAME_RE
        .captures(meta)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Reads `filename="..."` from block metadata and sets `data-filename` on the
/// block's `<pre>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameTransformer;

impl FilenameTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for FilenameTransformer {
    fn name(&self) -> &'static str {
        "transformer-filename"
    }

    fn preprocess(
        &self,
        _code: &str,
        options: &BlockOptions,
        ctx: &mut BlockContext,
    ) -> Option<String> {
        let meta = options.meta.as_deref().unwrap_or("");
        if let Some(filename) = filename_from_meta(meta) {
            ctx.insert(FILENAME_KEY, filename);
        }
        None
    }

    fn pre(&self, node: &mut Element, ctx: &BlockContext) {
        if let Some(filename) = ctx.get(FILENAME_KEY) {
            node.set_property(DATA_FILENAME, filename);
        }
    }
}
