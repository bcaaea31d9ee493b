//! Initialize quill in a site directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing quill...");

    let posts_dir = Path::new("content").join("posts");

    if posts_dir.exists() {
        if !yes {
            tracing::warn!("content/posts already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&posts_dir).context("Failed to create content directory")?;
    }

    // Create default config
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    // Create sample post
    let post_path = posts_dir.join("hello-quill.mdx");
    if !post_path.exists() || yes {
        fs::write(&post_path, DEFAULT_POST).context("Failed to write hello-quill.mdx")?;
        tracing::info!("Created {}", post_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quill build' to render your posts.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# quill configuration

[site]
url = "https://sorafujitani.me"
name = "Sora Fujitani"
github_username = "sorafujitani"

[site.pulls]
hidden_repos = []
own_repos = [
  "sorafujitani/rfmt",
  "sorafujitani/tech-event-scheduler",
  "sorafujitani/neovimdot",
  "sorafujitani/sorafujitani.me",
]
since = "2025-10-04"

[content]
# Source directory for posts
dir = "content"

# Output directory for rendered fragments
output = "dist"

# Render posts marked `draft: true`
drafts = false

# Minify generated CSS
minify = true

[markdown]
gfm = true

# Turn ```lang:filename fences into data-filename attributes
code_filename = true

[highlight]
# custom-biome-theme or custom-biome-theme-light
theme = "custom-biome-theme"
wrap = true
"#;

const DEFAULT_POST: &str = r#"---
title: Hello, quill
description: Named code fences and themed highlighting
date: 2025-10-04
tags: [meta]
---

# Hello, quill

Add a filename after the language with a colon:

```sh:scripts/deploy.sh
#!/bin/sh
set -e
./build && ./upload dist
```

The rendered `<pre>` carries `data-filename="scripts/deploy.sh"`.

```ts:src/lib/constants.ts
export const SITE_URL = 'https://sorafujitani.me';
```

Fences without a filename render as usual:

```bash
quill build
```
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    #[test]
    fn default_config_parses_to_defaults() {
        let config = ConfigFile::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn sample_post_uses_named_fences() {
        let builder = quill_static::StaticBuilder::new(Default::default()).unwrap();
        let doc = builder.render(DEFAULT_POST).unwrap();

        let filenames: Vec<_> = doc
            .code_blocks
            .iter()
            .filter_map(|b| b.filename.as_deref())
            .collect();
        assert_eq!(filenames, vec!["scripts/deploy.sh", "src/lib/constants.ts"]);
        assert_eq!(doc.frontmatter.unwrap().title, "Hello, quill");
    }
}
