//! Print a theme definition.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use quill_highlight::ThemeDefinition;

use crate::config::ConfigFile;

/// Run the theme command.
pub async fn run(config_path: &Path, name: Option<&str>) -> Result<()> {
    let config = ConfigFile::load(config_path)?;

    let theme = match name {
        Some(name) => match &config.highlight.custom {
            Some(custom) if custom.name == name => custom.clone(),
            _ => ThemeDefinition::builtin(name).with_context(|| {
                format!(
                    "Available themes: {}",
                    ThemeDefinition::builtin_names().join(", ")
                )
            })?,
        },
        None => config.theme()?,
    };

    let text = toml::to_string_pretty(&theme).context("Failed to serialize theme")?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;

    Ok(())
}
