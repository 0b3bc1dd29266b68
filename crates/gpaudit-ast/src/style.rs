//! Formatting attributes shared by blocks and table cells
//!
//! Alignment, weight, slant, color and font size travel with every text
//! block and are mapped by each renderer onto its own styling system.

use serde::{Deserialize, Serialize};

/// Paragraph-level alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    /// Lowercase name as used by CSS and the editor format API
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }

    /// Parse a CSS `text-align` value; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" | "end" => Some(Align::Right),
            "justify" => Some(Align::Justify),
            _ => None,
        }
    }

    pub fn is_left(&self) -> bool {
        *self == Align::Left
    }
}

/// Table cell alignment (cells cannot be justified)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl CellAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            CellAlign::Left => "left",
            CellAlign::Center => "center",
            CellAlign::Right => "right",
        }
    }
}

impl From<CellAlign> for Align {
    fn from(align: CellAlign) -> Self {
        match align {
            CellAlign::Left => Align::Left,
            CellAlign::Center => Align::Center,
            CellAlign::Right => Align::Right,
        }
    }
}

impl From<Align> for CellAlign {
    /// `Justify` collapses to `Left` for cells
    fn from(align: Align) -> Self {
        match align {
            Align::Center => CellAlign::Center,
            Align::Right => CellAlign::Right,
            Align::Left | Align::Justify => CellAlign::Left,
        }
    }
}

/// A text color as written by the user (`#rgb`, `#rrggbb` or a CSS color name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to an RGB triple, `None` when the value is not understood
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let value = self.0.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        match value.to_ascii_lowercase().as_str() {
            "black" => Some((0, 0, 0)),
            "white" => Some((255, 255, 255)),
            "red" => Some((255, 0, 0)),
            "green" => Some((0, 128, 0)),
            "blue" => Some((0, 0, 255)),
            "gray" | "grey" => Some((128, 128, 128)),
            "navy" => Some((0, 0, 128)),
            "maroon" => Some((128, 0, 0)),
            "silver" => Some((192, 192, 192)),
            "orange" => Some((255, 165, 0)),
            "yellow" => Some((255, 255, 0)),
            "lime" => Some((0, 255, 0)),
            "olive" => Some((128, 128, 0)),
            "teal" => Some((0, 128, 128)),
            "aqua" | "cyan" => Some((0, 255, 255)),
            "purple" => Some((128, 0, 128)),
            "fuchsia" | "magenta" => Some((255, 0, 255)),
            "brown" => Some((165, 42, 42)),
            "pink" => Some((255, 192, 203)),
            "gold" => Some((255, 215, 0)),
            "indigo" => Some((75, 0, 130)),
            "darkred" => Some((139, 0, 0)),
            "darkgreen" => Some((0, 100, 0)),
            "darkblue" => Some((0, 0, 139)),
            "darkgray" | "darkgrey" => Some((169, 169, 169)),
            "lightgray" | "lightgrey" => Some((211, 211, 211)),
            _ => None,
        }
    }

    /// Uppercase `RRGGBB` form used by WordprocessingML
    pub fn hex(&self) -> Option<String> {
        self.rgb()
            .map(|(r, g, b)| format!("{:02X}{:02X}{:02X}", r, g, b))
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut chars = hex.chars().map(|c| c.to_string().repeat(2));
            let r = channel(&chars.next()?)?;
            let g = channel(&chars.next()?)?;
            let b = channel(&chars.next()?)?;
            Some((r, g, b))
        }
        6 => Some((
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Block-level formatting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Align::is_left")]
    pub align: Align,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Font size in pixels; `None` means the renderer's per-type default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TextStyle {
    pub fn aligned(align: Align) -> Self {
        Self {
            align,
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(Color::new(color));
        self
    }

    pub fn with_font_size(mut self, px: f32) -> Self {
        self.font_size = Some(px);
        self
    }

    /// Font size, falling back to the supplied default
    pub fn font_size_or(&self, default_px: f32) -> f32 {
        self.font_size.unwrap_or(default_px)
    }
}
