//! Built-in transformers.

pub mod filename;

pub use filename::FilenameTransformer;
