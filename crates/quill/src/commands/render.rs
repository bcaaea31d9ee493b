//! Render a single document.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use quill_static::StaticBuilder;

use crate::config::ConfigFile;

/// Run the render command.
pub async fn run(config_path: &Path, file: &Path) -> Result<()> {
    let config = ConfigFile::load(config_path)?.build_config(None, true)?;
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let doc = StaticBuilder::new(config)?
        .render(&source)
        .with_context(|| format!("Failed to render {}", file.display()))?;

    for block in doc.code_blocks.iter().filter(|b| b.filename.is_some()) {
        tracing::debug!(
            "Code block {} ({})",
            block.filename.as_deref().unwrap_or_default(),
            block.lang.as_deref().unwrap_or("plain")
        );
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(doc.html.as_bytes())
        .context("Failed to write to stdout")?;

    Ok(())
}
