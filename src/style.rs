//! Terminal styles loaded from JSON style documents.
//!
//! Style documents use the element names of glamour style files (`document`,
//! `heading`, `h1`, `code_block`, ...), so existing glamour JSON styles load
//! as-is.  Keys this renderer does not understand are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Directory searched for `{style}.json`.
pub const DEFAULT_STYLES_DIR: &str = "styles";

const ANSI_RESET: &str = "\x1b[0m";

/// Styling for one Markdown element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StylePrimitive {
    /// Foreground color: an ANSI-256 index like `"39"` or `"#rrggbb"`.
    pub color: Option<String>,
    /// Background color, same format as `color`.
    pub background_color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub crossed_out: Option<bool>,
    /// Text placed before the element, inside the styling.
    pub prefix: Option<String>,
    /// Text placed after the element, inside the styling.
    pub suffix: Option<String>,
    /// Text placed before the element's block, unstyled.
    pub block_prefix: Option<String>,
    /// Text placed after the element's block, unstyled.
    pub block_suffix: Option<String>,
    /// Left margin in columns.
    pub margin: Option<usize>,
    /// Indent repeat count for block quotes.
    pub indent: Option<usize>,
    /// Token repeated `indent` times in front of quoted lines.
    pub indent_token: Option<String>,
    /// Extra indent per list nesting level.
    pub level_indent: Option<usize>,
    /// Literal text for horizontal rules.
    pub format: Option<String>,
}

impl StylePrimitive {
    /// A primitive with only a foreground color.
    pub fn fg(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Returns this primitive with bold enabled.
    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// Only the character attributes: colors, bold, italic, underline, crossed out.
    pub fn attributes(&self) -> StylePrimitive {
        StylePrimitive {
            color: self.color.clone(),
            background_color: self.background_color.clone(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            crossed_out: self.crossed_out,
            ..StylePrimitive::default()
        }
    }

    /// Overlays `over` on `self`; set fields of `over` win.
    pub fn merged(&self, over: &StylePrimitive) -> StylePrimitive {
        fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }
        StylePrimitive {
            color: pick(&self.color, &over.color),
            background_color: pick(&self.background_color, &over.background_color),
            bold: pick(&self.bold, &over.bold),
            italic: pick(&self.italic, &over.italic),
            underline: pick(&self.underline, &over.underline),
            crossed_out: pick(&self.crossed_out, &over.crossed_out),
            prefix: pick(&self.prefix, &over.prefix),
            suffix: pick(&self.suffix, &over.suffix),
            block_prefix: pick(&self.block_prefix, &over.block_prefix),
            block_suffix: pick(&self.block_suffix, &over.block_suffix),
            margin: pick(&self.margin, &over.margin),
            indent: pick(&self.indent, &over.indent),
            indent_token: pick(&self.indent_token, &over.indent_token),
            level_indent: pick(&self.level_indent, &over.level_indent),
            format: pick(&self.format, &over.format),
        }
    }

    /// The SGR escape sequence selecting this primitive's attributes, if any.
    pub fn sgr(&self) -> Option<String> {
        let mut codes = Vec::new();
        if self.bold == Some(true) {
            codes.push("1".to_string());
        }
        if self.italic == Some(true) {
            codes.push("3".to_string());
        }
        if self.underline == Some(true) {
            codes.push("4".to_string());
        }
        if self.crossed_out == Some(true) {
            codes.push("9".to_string());
        }
        if let Some(fg) = self.color.as_deref().and_then(|c| color_code(c, 38)) {
            codes.push(fg);
        }
        if let Some(bg) = self
            .background_color
            .as_deref()
            .and_then(|c| color_code(c, 48))
        {
            codes.push(bg);
        }
        if codes.is_empty() {
            None
        } else {
            Some(format!("\x1b[{}m", codes.join(";")))
        }
    }

    /// Renders `text` with prefix, suffix and, when `use_color`, the SGR attributes.
    pub fn apply(&self, text: &str, use_color: bool) -> String {
        let body = format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            text,
            self.suffix.as_deref().unwrap_or("")
        );
        match self.sgr() {
            Some(sgr) if use_color && !body.is_empty() => format!("{sgr}{body}{ANSI_RESET}"),
            _ => body,
        }
    }
}

/// Maps a color spec to an SGR parameter; `base` is 38 for foreground, 48 for background.
fn color_code(spec: &str, base: u8) -> Option<String> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(format!("{base};2;{r};{g};{b}"));
    }
    let index: u8 = spec.parse().ok()?;
    Some(format!("{base};5;{index}"))
}

/// A complete style document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub document: StylePrimitive,
    pub block_quote: StylePrimitive,
    pub paragraph: StylePrimitive,
    pub list: StylePrimitive,
    pub heading: StylePrimitive,
    pub h1: StylePrimitive,
    pub h2: StylePrimitive,
    pub h3: StylePrimitive,
    pub h4: StylePrimitive,
    pub h5: StylePrimitive,
    pub h6: StylePrimitive,
    pub text: StylePrimitive,
    pub strikethrough: StylePrimitive,
    pub emph: StylePrimitive,
    pub strong: StylePrimitive,
    pub hr: StylePrimitive,
    pub item: StylePrimitive,
    pub enumeration: StylePrimitive,
    pub code: StylePrimitive,
    pub code_block: StylePrimitive,
    pub table: StylePrimitive,
    pub link: StylePrimitive,
    pub link_text: StylePrimitive,
    pub image_text: StylePrimitive,
}

impl StyleConfig {
    /// Parses a style document.
    pub fn from_json(name: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| Error::style(name, err.to_string()))
    }

    /// Loads `{dir}/{name}.json`.
    pub fn load<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self> {
        let path = style_path(dir.as_ref(), name);
        let text = fs::read_to_string(&path)
            .map_err(|err| Error::style(name, format!("{}: {err}", path.display())))?;
        Self::from_json(name, &text)
    }

    /// The style for a heading of the given depth, layered over `heading`.
    pub fn heading_level(&self, depth: u8) -> StylePrimitive {
        let level = match depth {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            _ => &self.h6,
        };
        self.heading.merged(level)
    }
}

/// Path of the style document named `name` under `dir`.
pub fn style_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_for_256_and_hex() {
        let style = StylePrimitive::fg("39").bold();
        assert_eq!(style.sgr().as_deref(), Some("\x1b[1;38;5;39m"));

        let style = StylePrimitive {
            color: Some("#ff8000".to_string()),
            background_color: Some("236".to_string()),
            ..StylePrimitive::default()
        };
        assert_eq!(style.sgr().as_deref(), Some("\x1b[38;2;255;128;0;48;5;236m"));
    }

    #[test]
    fn invalid_colors_are_ignored() {
        assert_eq!(StylePrimitive::fg("blue").sgr(), None);
        assert_eq!(StylePrimitive::fg("#fff").sgr(), None);
        assert_eq!(StylePrimitive::fg("256").sgr(), None);
        // six bytes but not six hex digits
        assert_eq!(StylePrimitive::fg("#aééb").sgr(), None);
    }

    #[test]
    fn non_ascii_color_in_document_renders_plain() {
        let style = StyleConfig::from_json("x", r##"{"document":{"color":"#aééb"}}"##).unwrap();
        assert_eq!(style.document.sgr(), None);
        let out = crate::markdown::render_markdown("hi", &style, 100, true);
        assert_eq!(out, "hi\n");
    }

    #[test]
    fn apply_with_and_without_color() {
        let style = StylePrimitive {
            prefix: Some("<".to_string()),
            suffix: Some(">".to_string()),
            ..StylePrimitive::fg("178")
        };
        assert_eq!(style.apply("x", false), "<x>");
        assert_eq!(style.apply("x", true), "\x1b[38;5;178m<x>\x1b[0m");
        assert_eq!(StylePrimitive::default().apply("plain", true), "plain");
    }

    #[test]
    fn merged_prefers_overlay() {
        let base = StylePrimitive::fg("39").bold();
        let over = StylePrimitive {
            prefix: Some("## ".to_string()),
            color: Some("200".to_string()),
            ..StylePrimitive::default()
        };
        let merged = base.merged(&over);
        assert_eq!(merged.color.as_deref(), Some("200"));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.prefix.as_deref(), Some("## "));
    }

    #[test]
    fn parses_glamour_style_document() {
        let json = r###"{
            "document": {"block_prefix": "\n", "block_suffix": "\n", "color": "252", "margin": 2},
            "block_quote": {"indent": 1, "indent_token": "│ "},
            "heading": {"block_suffix": "\n", "color": "39", "bold": true},
            "h2": {"prefix": "## "},
            "code_block": {"color": "244", "margin": 2, "chroma": {"text": {"color": "#C4C4C4"}}},
            "list": {"level_indent": 2}
        }"###;
        let style = StyleConfig::from_json("dark", json).unwrap();
        assert_eq!(style.document.margin, Some(2));
        assert_eq!(style.block_quote.indent_token.as_deref(), Some("│ "));
        assert_eq!(style.list.level_indent, Some(2));

        let h2 = style.heading_level(2);
        assert_eq!(h2.prefix.as_deref(), Some("## "));
        assert_eq!(h2.color.as_deref(), Some("39"));
    }

    #[test]
    fn load_missing_style_fails() {
        let err = StyleConfig::load("/nonexistent/styles", "nope").unwrap_err();
        assert!(err.is_style());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn malformed_style_fails() {
        assert!(StyleConfig::from_json("bad", "[1, 2").unwrap_err().is_style());
    }
}
