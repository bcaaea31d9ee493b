//! syntect-backed highlighter with a transformer chain.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::element::Element;
use crate::theme::{ThemeDefinition, ThemeError};
use crate::transformer::{BlockContext, BlockOptions, Transformer};

/// Class always present on the root `<pre>`.
pub const ROOT_CLASS: &str = "quill-code";

/// Highlighter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightConfig {
    /// Theme used to colorize tokens
    pub theme: ThemeDefinition,

    /// Wrap long lines instead of scrolling
    pub wrap: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: ThemeDefinition::default(),
            wrap: true,
        }
    }
}

/// Errors that can occur while highlighting.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),

    #[error("Highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

/// Converts code blocks into themed `<pre>` elements.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    theme_name: String,
    wrap: bool,
    transformers: Vec<Box<dyn Transformer>>,
}

impl Highlighter {
    /// Create a highlighter with no transformers.
    pub fn new(config: &HighlightConfig) -> Result<Self, HighlightError> {
        let theme = config.theme.to_syntect()?;
        Ok(Self {
            syntaxes: two_face::syntax::extra_newlines(),
            theme,
            theme_name: config.theme.name.clone(),
            wrap: config.wrap,
            transformers: Vec::new(),
        })
    }

    /// Register a transformer. Transformers run in registration order.
    pub fn with_transformer<T: Transformer + 'static>(mut self, transformer: T) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Names of the registered transformers.
    pub fn transformer_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transformers.iter().map(|t| t.name())
    }

    /// Highlight one code block and return its serialized `<pre>`.
    pub fn highlight(&self, code: &str, options: &BlockOptions) -> Result<String, HighlightError> {
        Ok(self.highlight_element(code, options)?.to_html())
    }

    /// Highlight one code block and return the root element.
    pub fn highlight_element(
        &self,
        code: &str,
        options: &BlockOptions,
    ) -> Result<Element, HighlightError> {
        let mut ctx = BlockContext::new();

        let mut code = code.to_string();
        for transformer in &self.transformers {
            if let Some(replaced) = transformer.preprocess(&code, options, &mut ctx) {
                tracing::trace!(transformer = transformer.name(), "Code replaced in preprocess");
                code = replaced;
            }
        }

        let syntax = self.resolve_syntax(options.lang.as_deref());
        let lines = self.highlight_lines(&code, syntax)?;

        let mut pre = Element::new("pre", format!("<code>{lines}</code>"));
        pre.set_property("class", format!("{ROOT_CLASS} {}", self.theme_name));
        pre.set_property("style", self.root_style());
        pre.set_property("tabindex", "0");
        if let Some(lang) = options.lang.as_deref().filter(|l| !l.is_empty()) {
            pre.set_property("data-language", lang);
        }

        for transformer in &self.transformers {
            transformer.pre(&mut pre, &ctx);
        }

        Ok(pre)
    }

    fn resolve_syntax(&self, lang: Option<&str>) -> &SyntaxReference {
        let found = lang.filter(|l| !l.is_empty()).and_then(|l| {
            self.syntaxes
                .find_syntax_by_token(l)
                .or_else(|| self.syntaxes.find_syntax_by_name(l))
        });

        match found {
            Some(syntax) => syntax,
            None => {
                if let Some(lang) = lang.filter(|l| !l.is_empty()) {
                    tracing::debug!("No syntax for '{}', rendering as plain text", lang);
                }
                self.syntaxes.find_syntax_plain_text()
            }
        }
    }

    /// Render each source line as `<span class="line">`, joined by newlines.
    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<String, HighlightError> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntaxes)?;
            let trimmed: Vec<_> = regions
                .iter()
                .map(|(style, text)| (*style, text.trim_end_matches(['\n', '\r'])))
                .filter(|(_, text)| !text.is_empty())
                .collect();
            let html = styled_line_to_highlighted_html(&trimmed, IncludeBackground::No)?;
            lines.push(format!(r#"<span class="line">{html}</span>"#));
        }

        Ok(lines.join("\n"))
    }

    fn root_style(&self) -> String {
        let mut style = String::new();
        if let Some(bg) = self.theme.settings.background {
            style.push_str(&format!("background-color:{};", hex(bg)));
        }
        if let Some(fg) = self.theme.settings.foreground {
            style.push_str(&format!("color:{};", hex(fg)));
        }
        style.push_str(" overflow-x: auto;");
        if self.wrap {
            style.push_str(" white-space: pre-wrap; word-wrap: break-word;");
        }
        style
    }
}

fn hex(color: Color) -> String {
    if color.a == 0xff {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.r, color.g, color.b, color.a
        )
    }
}
