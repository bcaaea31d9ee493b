//! Themed syntax highlighting with per-block transformer hooks.
//!
//! A [`Highlighter`] turns one code block into a `<pre>` element. Before the
//! code is tokenized every registered [`Transformer`] gets a `preprocess` call,
//! and once the root element exists each one gets a `pre` call to decorate it.
//! State shared between the two calls lives in a [`BlockContext`] that is
//! created fresh for every block.

pub mod element;
pub mod highlighter;
pub mod theme;
pub mod transformer;
pub mod transformers;

pub use element::Element;
pub use highlighter::{HighlightConfig, HighlightError, Highlighter};
pub use theme::{ThemeDefinition, ThemeError, ThemeKind};
pub use transformer::{BlockContext, BlockOptions, Transformer};
pub use transformers::FilenameTransformer;
