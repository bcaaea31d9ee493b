//! Content builder for quill.
//!
//! Turns a directory of Markdown/MDX posts into HTML fragments, a
//! `manifest.json` listing them, and the stylesheet for highlighted code.

pub mod assets;
pub mod builder;

pub use builder::{BuildConfig, BuildError, BuildResult, ManifestEntry, StaticBuilder};
