//! Transformer hooks invoked by the highlighter for each code block.

use std::collections::HashMap;

use crate::element::Element;

/// Per-block options handed to transformers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockOptions {
    /// Language tag of the block (already split from any filename suffix)
    pub lang: Option<String>,

    /// Raw metadata string following the language tag
    pub meta: Option<String>,
}

impl BlockOptions {
    /// Create options for a block.
    pub fn new(lang: Option<&str>, meta: Option<&str>) -> Self {
        Self {
            lang: lang.map(str::to_owned),
            meta: meta.map(str::to_owned),
        }
    }
}

/// State shared between the hooks of a single block.
///
/// A new context is created for every block and dropped once the block is
/// rendered, so nothing captured for one block is visible to the next.
#[derive(Debug, Default)]
pub struct BlockContext {
    values: HashMap<&'static str, String>,
}

impl BlockContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`.
    pub fn insert(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Read a value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A hook set run by the highlighter for every code block.
///
/// Hooks are called in a fixed order: [`preprocess`](Self::preprocess) before
/// tokenizing, then [`pre`](Self::pre) once the root `<pre>` element exists.
pub trait Transformer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect the raw code before tokenizing.
    ///
    /// Returning `Some` replaces the code for the remaining transformers and
    /// the tokenizer. The default leaves the code untouched.
    fn preprocess(
        &self,
        _code: &str,
        _options: &BlockOptions,
        _ctx: &mut BlockContext,
    ) -> Option<String> {
        None
    }

    /// Decorate the root `<pre>` element of the block.
    fn pre(&self, _node: &mut Element, _ctx: &BlockContext) {}
}
