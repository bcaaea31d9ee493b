//! Content build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quill_static::StaticBuilder;

use crate::config::ConfigFile;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, drafts: bool) -> Result<()> {
    tracing::info!("Building content...");

    let file_config = ConfigFile::load(config_path)?;
    let config = file_config
        .build_config(output, drafts)
        .context("Invalid configuration")?;

    let site = &file_config.site;
    tracing::debug!(
        "Site {} ({}), github {}, theme {}",
        site.name,
        site.url,
        site.github_username,
        config.highlight.theme.name
    );
    tracing::debug!(
        "Pull requests since {}: {} own repos, {} hidden",
        site.pulls.since,
        site.pulls.own_repos.len(),
        site.pulls.hidden_repos.len()
    );

    let result = StaticBuilder::new(config)?.build().await?;

    tracing::info!(
        "Built {} documents with {} code blocks in {}ms ({} drafts skipped)",
        result.documents,
        result.code_blocks,
        result.duration_ms,
        result.skipped
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
