//! Declarative color themes.
//!
//! Themes are written as a table of token rules (scope selectors mapped to a
//! foreground color and font style), the same shape editors use for TextMate
//! themes. [`ThemeDefinition::to_syntect`] compiles one into a syntect theme.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use syntect::highlighting::{
    Color, FontStyle, ScopeSelectors, StyleModifier, Theme, ThemeItem, ThemeSettings,
};

/// Name of the default dark theme.
pub const DEFAULT_THEME: &str = "custom-biome-theme";

/// Name of the light variant.
pub const LIGHT_THEME: &str = "custom-biome-theme-light";

/// Errors raised while compiling a theme definition.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Invalid color '{0}': expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Invalid font style '{0}'")]
    InvalidFontStyle(String),

    #[error("Invalid scope selector '{scope}': {message}")]
    InvalidScope { scope: String, message: String },

    #[error("Unknown theme: {0}")]
    Unknown(String),
}

/// Whether a theme is meant for a dark or light background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

/// Editor-level colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(rename = "editor.background")]
    pub background: String,

    #[serde(rename = "editor.foreground")]
    pub foreground: String,
}

/// Style applied to tokens matching a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,

    /// Space separated list of `italic`, `bold`, `underline`, or `normal`
    #[serde(
        default,
        rename = "fontStyle",
        alias = "font_style",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_style: Option<String>,
}

/// One token rule of a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenColor {
    /// Scope selectors, e.g. `comment` or `source.shell keyword`
    pub scope: Vec<String>,

    pub settings: TokenSettings,
}

/// A named color theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: ThemeKind,

    pub colors: ThemeColors,

    #[serde(rename = "tokenColors", alias = "token_colors", default)]
    pub token_colors: Vec<TokenColor>,
}

impl ThemeDefinition {
    /// Look up a built-in theme by name.
    pub fn builtin(name: &str) -> Result<Self, ThemeError> {
        match name {
            DEFAULT_THEME => Ok(biome_dark()),
            LIGHT_THEME => Ok(biome_light()),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }

    /// Names of all built-in themes.
    pub fn builtin_names() -> &'static [&'static str] {
        &[DEFAULT_THEME, LIGHT_THEME]
    }

    /// Compile into a syntect theme.
    pub fn to_syntect(&self) -> Result<Theme, ThemeError> {
        let settings = ThemeSettings {
            foreground: Some(parse_color(&self.colors.foreground)?),
            background: Some(parse_color(&self.colors.background)?),
            ..ThemeSettings::default()
        };

        let scopes = self
            .token_colors
            .iter()
            .map(TokenColor::to_theme_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Theme {
            name: Some(self.name.clone()),
            author: None,
            settings,
            scopes,
        })
    }
}

impl Default for ThemeDefinition {
    fn default() -> Self {
        biome_dark()
    }
}

impl TokenColor {
    fn to_theme_item(&self) -> Result<ThemeItem, ThemeError> {
        let selector = self.scope.join(", ");
        let scope =
            ScopeSelectors::from_str(&selector).map_err(|e| ThemeError::InvalidScope {
                scope: selector.clone(),
                message: e.to_string(),
            })?;

        let foreground = self
            .settings
            .foreground
            .as_deref()
            .map(parse_color)
            .transpose()?;
        let font_style = self
            .settings
            .font_style
            .as_deref()
            .map(parse_font_style)
            .transpose()?;

        Ok(ThemeItem {
            scope,
            style: StyleModifier {
                foreground,
                background: None,
                font_style,
            },
        })
    }
}

/// Parse a `#rrggbb` or `#rrggbbaa` color.
pub fn parse_color(value: &str) -> Result<Color, ThemeError> {
    let invalid = || ThemeError::InvalidColor(value.to_string());

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let a = if hex.len() == 8 { channel(6)? } else { 0xff };

    Ok(Color {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
        a,
    })
}

/// Parse a font style list such as `bold italic`.
pub fn parse_font_style(value: &str) -> Result<FontStyle, ThemeError> {
    let mut style = FontStyle::empty();
    for word in value.split_whitespace() {
        match word {
            "italic" => style |= FontStyle::ITALIC,
            "bold" => style |= FontStyle::BOLD,
            "underline" => style |= FontStyle::UNDERLINE,
            "normal" => {}
            other => return Err(ThemeError::InvalidFontStyle(other.to_string())),
        }
    }
    Ok(style)
}

fn rule(scope: &[&str], foreground: &str, font_style: Option<&str>) -> TokenColor {
    TokenColor {
        scope: scope.iter().map(|s| s.to_string()).collect(),
        settings: TokenSettings {
            foreground: Some(foreground.to_string()),
            font_style: font_style.map(str::to_string),
        },
    }
}

/// Colors for each slot of the biome token table.
struct Palette {
    background: &'static str,
    foreground: &'static str,
    comment: &'static str,
    keyword: &'static str,
    function: &'static str,
    string: &'static str,
    number: &'static str,
    punctuation: &'static str,
}

fn biome(name: &str, kind: ThemeKind, p: &Palette) -> ThemeDefinition {
    ThemeDefinition {
        name: name.to_string(),
        kind,
        colors: ThemeColors {
            background: p.background.to_string(),
            foreground: p.foreground.to_string(),
        },
        token_colors: vec![
            rule(
                &["comment", "punctuation.definition.comment"],
                p.comment,
                Some("italic"),
            ),
            rule(&["source.shell", "text.shell"], p.foreground, None),
            rule(
                &[
                    "keyword",
                    "storage.type",
                    "storage.modifier",
                    "keyword.control",
                    "keyword.operator.new",
                ],
                p.keyword,
                Some("bold"),
            ),
            // Shell commands read as plain text rather than keywords
            rule(
                &["source.shell keyword", "source.shell support.function"],
                p.foreground,
                Some("normal"),
            ),
            rule(&["entity.name.function", "support.function"], p.function, None),
            rule(&["string", "string.quoted"], p.string, None),
            rule(&["constant.numeric", "constant.language"], p.number, None),
            rule(&["variable", "variable.other"], p.foreground, None),
            rule(
                &["entity.name.type", "entity.name.class", "support.class"],
                p.keyword,
                None,
            ),
            rule(&["punctuation", "meta.brace"], p.punctuation, None),
            rule(&["constant.other"], p.number, None),
        ],
    }
}

fn biome_dark() -> ThemeDefinition {
    biome(
        DEFAULT_THEME,
        ThemeKind::Dark,
        &Palette {
            background: "#161b22",
            foreground: "#e1e4e8",
            comment: "#6e7681",
            keyword: "#00d8ff",
            function: "#58a6ff",
            string: "#7ee787",
            number: "#79c0ff",
            punctuation: "#c9d1d9",
        },
    )
}

fn biome_light() -> ThemeDefinition {
    biome(
        LIGHT_THEME,
        ThemeKind::Light,
        &Palette {
            background: "#f6f8fa",
            foreground: "#24292f",
            comment: "#6e7781",
            keyword: "#0550ae",
            function: "#8250df",
            string: "#0a3069",
            number: "#0550ae",
            punctuation: "#57606a",
        },
    )
}
