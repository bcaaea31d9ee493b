//! Content builder.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use quill_highlight::{HighlightConfig, Highlighter};
use quill_mdx::{Frontmatter, Processor, RenderedDoc};

use crate::assets::AssetPipeline;

/// Configuration for building content.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source content directory
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Build documents marked `draft: true`
    pub include_drafts: bool,

    /// Minify generated CSS
    pub minify: bool,

    /// Enable GitHub Flavored Markdown extensions
    pub gfm: bool,

    /// Split `lang:filename` fence tags and expose `data-filename`
    pub code_filename: bool,

    /// Highlighter settings
    pub highlight: HighlightConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            include_drafts: false,
            minify: true,
            gfm: true,
            code_filename: true,
            highlight: HighlightConfig::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of documents written
    pub documents: usize,

    /// Number of drafts skipped
    pub skipped: usize,

    /// Number of code blocks rendered
    pub code_blocks: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read content directory: {0}")]
    ReadError(String),

    #[error("Failed to process document: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid slug '{slug}' in {path}: must be a single path segment")]
    InvalidSlug { path: String, slug: String },

    #[error("Failed to set up highlighter: {0}")]
    HighlightError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A source document found in the content directory.
#[derive(Debug, Clone)]
struct Source {
    path: PathBuf,
    relative_path: PathBuf,
}

/// One entry of `manifest.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    /// Output path relative to the output directory
    pub path: String,
    /// Filenames declared on code fences, in document order
    pub filenames: Vec<String>,
}

/// A processed document waiting to be written.
struct Rendered {
    source: PathBuf,
    output: PathBuf,
    html: String,
    entry: ManifestEntry,
    code_blocks: usize,
}

enum Outcome {
    Rendered(Rendered),
    Skipped,
}

/// Builds HTML fragments from a content directory.
pub struct StaticBuilder {
    config: BuildConfig,
    processor: Processor,
}

impl StaticBuilder {
    /// Create a new builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let processor = if config.code_filename {
            Processor::standard(&config.highlight)
        } else {
            Highlighter::new(&config.highlight).map(Processor::new)
        };
        let processor = processor
            .map_err(|e| BuildError::HighlightError(e.to_string()))?
            .with_gfm(config.gfm);

        Ok(Self { config, processor })
    }

    /// Process a single document without writing anything.
    pub fn render(&self, source: &str) -> Result<RenderedDoc, BuildError> {
        self.processor
            .process(source)
            .map_err(|e| BuildError::ParseError {
                path: "<input>".to_string(),
                message: e.to_string(),
            })
    }

    /// Build all documents.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let sources = self.discover_sources()?;
        tracing::debug!("Found {} documents", sources.len());

        // Documents share no mutable state, so they can be processed in parallel
        let outcomes: Vec<Result<Outcome, BuildError>> = sources
            .par_iter()
            .map(|source| self.render_document(source))
            .collect();

        let mut rendered = Vec::new();
        let mut skipped = 0;

        for outcome in outcomes {
            match outcome? {
                Outcome::Rendered(doc) => rendered.push(doc),
                Outcome::Skipped => skipped += 1,
            }
        }

        check_unique_outputs(&rendered)?;

        rendered.par_iter().try_for_each(|doc| {
            let path = self.config.output_dir.join(&doc.output);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::write(&path, &doc.html)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
        })?;

        let code_blocks = rendered.iter().map(|doc| doc.code_blocks).sum();
        let mut manifest: Vec<ManifestEntry> = rendered.into_iter().map(|doc| doc.entry).collect();

        // Newest first, undated last
        manifest.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path)));

        self.generate_assets()?;
        self.generate_manifest(&manifest)?;

        Ok(BuildResult {
            documents: manifest.len(),
            skipped,
            code_blocks,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Find all `.md` and `.mdx` files in the content directory.
    fn discover_sources(&self) -> Result<Vec<Source>, BuildError> {
        if !self.config.content_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Content directory not found: {}",
                self.config.content_dir.display()
            )));
        }

        let mut sources = Vec::new();

        for entry in WalkDir::new(&self.config.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "mdx" && ext != "md" {
                continue;
            }

            let relative_path = path
                .strip_prefix(&self.config.content_dir)
                .unwrap_or(path)
                .to_path_buf();

            sources.push(Source {
                path: path.to_path_buf(),
                relative_path,
            });
        }

        sources.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(sources)
    }

    /// Process a single document. Nothing is written yet.
    fn render_document(&self, source: &Source) -> Result<Outcome, BuildError> {
        let content = fs::read_to_string(&source.path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", source.path.display(), e)))?;

        let doc = self
            .processor
            .process(&content)
            .map_err(|e| BuildError::ParseError {
                path: source.path.display().to_string(),
                message: e.to_string(),
            })?;

        let frontmatter = doc.frontmatter.clone().unwrap_or_default();
        if frontmatter.draft && !self.config.include_drafts {
            tracing::debug!("Skipping draft {}", source.path.display());
            return Ok(Outcome::Skipped);
        }

        if let Some(slug) = frontmatter.slug.as_deref() {
            if !is_valid_slug(slug) {
                return Err(BuildError::InvalidSlug {
                    path: source.path.display().to_string(),
                    slug: slug.to_string(),
                });
            }
        }

        let relative_output = output_path(&source.relative_path, &frontmatter);

        let title = if frontmatter.title.is_empty() {
            doc.toc
                .first()
                .map(|entry| entry.title.clone())
                .unwrap_or_else(|| "Untitled".to_string())
        } else {
            frontmatter.title.clone()
        };

        let entry = ManifestEntry {
            title,
            description: frontmatter.description,
            date: frontmatter.date,
            tags: frontmatter.tags,
            path: relative_output.to_string_lossy().replace('\\', "/"),
            filenames: doc
                .code_blocks
                .iter()
                .filter_map(|b| b.filename.clone())
                .collect(),
        };

        Ok(Outcome::Rendered(Rendered {
            source: source.path.clone(),
            output: relative_output,
            code_blocks: doc.code_blocks.len(),
            html: doc.html,
            entry,
        }))
    }

    /// Write the code block stylesheet.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css(&self.config.highlight.theme);
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Failed to minify code.css: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("code.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Write `manifest.json`.
    fn generate_manifest(&self, entries: &[ManifestEntry]) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("manifest.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// A slug replaces the file stem, so it must be one plain path segment.
fn is_valid_slug(slug: &str) -> bool {
    let mut components = Path::new(slug).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !slug.contains(['/', '\\'])
}

/// Fail if two documents would be written to the same file.
fn check_unique_outputs(rendered: &[Rendered]) -> Result<(), BuildError> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for doc in rendered {
        if let Some(first) = seen.insert(&doc.entry.path, &doc.source) {
            return Err(BuildError::WriteError(format!(
                "{} and {} both write {}",
                first.display(),
                doc.source.display(),
                doc.entry.path
            )));
        }
    }
    Ok(())
}

/// Output path of a document relative to the output directory.
///
/// `posts/hello.mdx` becomes `posts/hello.html`; a frontmatter slug replaces
/// the file stem.
fn output_path(relative: &Path, frontmatter: &Frontmatter) -> PathBuf {
    let parent = relative.parent().unwrap_or(Path::new(""));
    let stem = match &frontmatter.slug {
        Some(slug) => slug.as_str(),
        None => relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index"),
    };
    parent.join(format!("{stem}.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(root: &Path) -> BuildConfig {
        BuildConfig {
            content_dir: root.join("content"),
            output_dir: root.join("dist"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_posts_with_filenames() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        let posts = config.content_dir.join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("deploy.mdx"),
            "---\ntitle: Deploy\ndate: 2025-10-04\n---\n# Deploy\n\n```sh:scripts/deploy.sh\n./deploy\n```\n",
        )
        .unwrap();

        let out = config.output_dir.clone();
        let result = StaticBuilder::new(config).unwrap().build().await.unwrap();

        assert_eq!(result.documents, 1);
        assert_eq!(result.code_blocks, 1);

        let html = fs::read_to_string(out.join("posts/deploy.html")).unwrap();
        assert!(html.contains(r#"data-filename="scripts/deploy.sh""#));

        let manifest = fs::read_to_string(out.join("manifest.json")).unwrap();
        assert!(manifest.contains("\"posts/deploy.html\""));
        assert!(manifest.contains("scripts/deploy.sh"));
        assert!(out.join("assets/code.css").exists());
    }

    #[tokio::test]
    async fn skips_drafts_unless_requested() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        fs::create_dir_all(&config.content_dir).unwrap();
        fs::write(
            config.content_dir.join("wip.md"),
            "---\ntitle: WIP\ndraft: true\n---\nbody\n",
        )
        .unwrap();
        fs::write(config.content_dir.join("notes.txt"), "ignored").unwrap();

        let result = StaticBuilder::new(config.clone())
            .unwrap()
            .build()
            .await
            .unwrap();
        assert_eq!(result.documents, 0);
        assert_eq!(result.skipped, 1);
        assert!(!config.output_dir.join("wip.html").exists());

        config.include_drafts = true;
        let result = StaticBuilder::new(config.clone())
            .unwrap()
            .build()
            .await
            .unwrap();
        assert_eq!(result.documents, 1);
        assert!(config.output_dir.join("wip.html").exists());
    }

    #[tokio::test]
    async fn disabling_code_filename_keeps_tags() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config.code_filename = false;
        fs::create_dir_all(&config.content_dir).unwrap();
        fs::write(config.content_dir.join("a.md"), "```ts:app.ts\nx\n```\n").unwrap();

        let out = config.output_dir.clone();
        StaticBuilder::new(config).unwrap().build().await.unwrap();

        let html = fs::read_to_string(out.join("a.html")).unwrap();
        assert!(!html.contains("data-filename"));
        assert!(html.contains(r#"data-language="ts:app.ts""#));
    }

    #[tokio::test]
    async fn missing_content_dir_is_an_error() {
        let temp = tempdir().unwrap();
        let builder = StaticBuilder::new(config(temp.path())).unwrap();
        assert!(matches!(
            builder.build().await,
            Err(BuildError::ReadError(_))
        ));
    }

    #[tokio::test]
    async fn slug_cannot_leave_output_dir() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        fs::create_dir_all(&config.content_dir).unwrap();
        fs::write(
            config.content_dir.join("post.md"),
            "---\ntitle: Escape\nslug: ../escaped\n---\nbody\n",
        )
        .unwrap();

        let result = StaticBuilder::new(config).unwrap().build().await;

        assert!(matches!(result, Err(BuildError::InvalidSlug { .. })));
        assert!(!temp.path().join("escaped.html").exists());
    }

    #[tokio::test]
    async fn duplicate_slugs_are_an_error() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        fs::create_dir_all(&config.content_dir).unwrap();
        for name in ["a.md", "b.md"] {
            fs::write(
                config.content_dir.join(name),
                format!("---\ntitle: {name}\nslug: same\n---\nbody\n"),
            )
            .unwrap();
        }

        let out = config.output_dir.clone();
        let result = StaticBuilder::new(config).unwrap().build().await;

        match result {
            Err(BuildError::WriteError(message)) => {
                assert!(message.contains("a.md"), "{message}");
                assert!(message.contains("b.md"), "{message}");
                assert!(message.contains("same.html"), "{message}");
            }
            other => panic!("expected write error, got {other:?}"),
        }
        assert!(!out.join("same.html").exists());
    }

    #[test]
    fn slug_must_be_one_segment() {
        for good in ["hello-world", "2025.10.04", "a_b"] {
            assert!(is_valid_slug(good), "{good}");
        }
        for bad in ["", ".", "..", "../escaped", "a/b", "/abs", "a\\b"] {
            assert!(!is_valid_slug(bad), "{bad}");
        }
    }

    #[test]
    fn output_path_uses_slug() {
        let fm = Frontmatter {
            slug: Some("hello-world".to_string()),
            ..Default::default()
        };
        assert_eq!(
            output_path(Path::new("posts/2025-hello.mdx"), &fm),
            PathBuf::from("posts/hello-world.html")
        );
        assert_eq!(
            output_path(Path::new("about.md"), &Frontmatter::default()),
            PathBuf::from("about.html")
        );
    }

    #[test]
    fn render_single_document() {
        let builder = StaticBuilder::new(BuildConfig::default()).unwrap();
        let doc = builder.render("```ts:app.ts\nx\n```\n").unwrap();
        assert!(doc.html.contains(r#"data-filename="app.ts""#));
    }
}
