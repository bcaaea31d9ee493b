//! Stylesheet for highlighted code blocks.

use quill_highlight::ThemeDefinition;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the code block stylesheet for a theme.
    ///
    /// Blocks carrying `data-filename` get a title bar showing the filename.
    pub fn generate_css(theme: &ThemeDefinition) -> String {
        CODE_CSS
            .replace("{{background}}", &theme.colors.background)
            .replace("{{foreground}}", &theme.colors.foreground)
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const CODE_CSS: &str = r#"/* quill code blocks */
.quill-code {
  background-color: {{background}};
  color: {{foreground}};
  border-radius: 0.5rem;
  padding: 1rem;
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.875rem;
  line-height: 1.6;
}

.quill-code .line {
  display: inline;
}

.quill-code[data-filename] {
  padding-top: 0;
}

.quill-code[data-filename]::before {
  content: attr(data-filename);
  display: block;
  margin: 0 -1rem 1rem;
  padding: 0.5rem 1rem;
  border-bottom: 1px solid rgba(255, 255, 255, 0.1);
  color: {{foreground}};
  opacity: 0.7;
  font-size: 0.75rem;
}
"#;
