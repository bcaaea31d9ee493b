//! Configuration file (`quill.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use quill_highlight::{HighlightConfig, ThemeDefinition, ThemeError};
use quill_static::BuildConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SINCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

/// Errors raised while loading or resolving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid pulls.since '{0}': expected YYYY-MM-DD")]
    InvalidSince(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightSettings,
}

/// Site identity.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_github_username")]
    pub github_username: String,
    #[serde(default)]
    pub pulls: PullsConfig,
}

/// Repositories and cutoff date for the pull request listing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PullsConfig {
    /// Repositories never listed
    #[serde(default)]
    pub hidden_repos: Vec<String>,
    /// Own repositories, listed separately from contributions elsewhere
    #[serde(default = "default_own_repos")]
    pub own_repos: Vec<String>,
    /// Only pull requests created on or after this date
    #[serde(default = "default_since")]
    pub since: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContentConfig {
    #[serde(default = "default_content_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub drafts: bool,
    #[serde(default = "default_true")]
    pub minify: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MarkdownConfig {
    #[serde(default = "default_true")]
    pub gfm: bool,
    /// Split `lang:filename` fence tags
    #[serde(default = "default_true")]
    pub code_filename: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HighlightSettings {
    /// Built-in theme name, or the name of `custom`
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub wrap: bool,
    /// Inline theme definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<ThemeDefinition>,
}

fn default_site_url() -> String {
    "https://sorafujitani.me".to_string()
}
fn default_site_name() -> String {
    "Sora Fujitani".to_string()
}
fn default_github_username() -> String {
    "sorafujitani".to_string()
}
fn default_own_repos() -> Vec<String> {
    [
        "sorafujitani/rfmt",
        "sorafujitani/tech-event-scheduler",
        "sorafujitani/neovimdot",
        "sorafujitani/sorafujitani.me",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_since() -> String {
    "2025-10-04".to_string()
}
fn default_content_dir() -> String {
    "content".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_theme() -> String {
    quill_highlight::theme::DEFAULT_THEME.to_string()
}
fn default_true() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
            github_username: default_github_username(),
            pulls: PullsConfig::default(),
        }
    }
}

impl Default for PullsConfig {
    fn default() -> Self {
        Self {
            hidden_repos: Vec::new(),
            own_repos: default_own_repos(),
            since: default_since(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            output: default_output(),
            drafts: false,
            minify: true,
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            code_filename: true,
        }
    }
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            wrap: true,
            custom: None,
        }
    }
}

impl ConfigFile {
    /// Load configuration from `path` if it exists, defaults otherwise.
    /// Returns an error if the file exists but is malformed or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SINCE_RE.is_match(&self.site.pulls.since) {
            return Err(ConfigError::InvalidSince(self.site.pulls.since.clone()));
        }
        self.theme()?;
        Ok(())
    }

    /// Resolve the configured theme.
    pub fn theme(&self) -> Result<ThemeDefinition, ConfigError> {
        if let Some(custom) = &self.highlight.custom {
            if custom.name == self.highlight.theme {
                custom.to_syntect()?;
                return Ok(custom.clone());
            }
        }
        Ok(ThemeDefinition::builtin(&self.highlight.theme)?)
    }

    /// Turn the file settings into a builder configuration.
    pub fn build_config(
        &self,
        output: Option<PathBuf>,
        drafts: bool,
    ) -> Result<BuildConfig, ConfigError> {
        Ok(BuildConfig {
            content_dir: PathBuf::from(&self.content.dir),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.content.output)),
            include_drafts: drafts || self.content.drafts,
            minify: self.content.minify,
            gfm: self.markdown.gfm,
            code_filename: self.markdown.code_filename,
            highlight: HighlightConfig {
                theme: self.theme()?,
                wrap: self.highlight.wrap,
            },
        })
    }
}
