//! Unicode font resource
//!
//! The font is read once per export, before anything is drawn. A page whose
//! text needs a glyph the font does not have cannot be exported.

use std::path::Path;

use typst::foundations::Bytes;
use typst::text::Font;
use tracing::debug;

use crate::error::{PdfError, Result};

/// A loaded font file
#[derive(Debug, Clone)]
pub struct FontResource {
    data: Vec<u8>,
    family: String,
    font: Font,
}

impl FontResource {
    /// Read and parse a font file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            PdfError::Font(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        let resource = Self::from_bytes(data)
            .map_err(|_| PdfError::Font(format!("Not a usable font file: {}", path.display())))?;
        debug!(family = %resource.family, path = %path.display(), "loaded font");
        Ok(resource)
    }

    /// Parse font bytes (first face of a collection)
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = Font::new(Bytes::new(data.clone()), 0)
            .ok_or_else(|| PdfError::Font("Font data could not be parsed".to_string()))?;
        let family = font.info().family.clone();
        Ok(Self { data, family, font })
    }

    /// Family name declared by the font
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph-advance metrics of this font
    pub fn metrics(&self) -> TextMetrics {
        TextMetrics {
            font: Some(self.font.clone()),
        }
    }

    /// Fail with [`PdfError::Font`] if any character of `text` has no glyph
    pub fn ensure_covers(&self, text: &str) -> Result<()> {
        let missing = missing_chars(text, |c| self.font.info().coverage.contains(c as u32));
        if missing.is_empty() {
            return Ok(());
        }
        let listed: String = missing
            .iter()
            .map(|c| format!("U+{:04X}", *c as u32))
            .collect::<Vec<_>>()
            .join(", ");
        Err(PdfError::Font(format!(
            "{} has no glyph for {}",
            self.family, listed
        )))
    }
}

/// Distinct characters in `text` that need a glyph and fail `has_glyph`
///
/// Whitespace and zero-width joiners are shaped without a visible glyph and
/// are never reported.
pub fn missing_chars(text: &str, has_glyph: impl Fn(char) -> bool) -> Vec<char> {
    let mut missing: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace() && !is_zero_width(*c))
        .filter(|c| !has_glyph(*c))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    missing
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

/// Advance used for characters the font cannot measure, in em
const FALLBACK_ADVANCE_EM: f32 = 0.55;

/// Horizontal text measurement used for line wrapping
///
/// With a font, widths are the sum of the glyphs' horizontal advances.
/// Without one, every spacing character is assumed to be 0.55em wide and
/// combining marks take no space.
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    font: Option<Font>,
}

impl TextMetrics {
    /// Fixed-ratio estimate for when no font is loaded
    pub fn estimated() -> Self {
        Self::default()
    }

    /// Width of `text` in pixels at `size_px`
    pub fn width(&self, text: &str, size_px: f32) -> f32 {
        text.chars().map(|c| self.char_width(c, size_px)).sum()
    }

    pub fn char_width(&self, c: char, size_px: f32) -> f32 {
        if is_zero_width(c) {
            return 0.0;
        }
        let em = match &self.font {
            Some(font) => font
                .ttf()
                .glyph_index(c)
                .and_then(|glyph| font.x_advance(glyph.0))
                .map(|advance| advance.get() as f32)
                .unwrap_or(FALLBACK_ADVANCE_EM),
            None if is_combining(c) => 0.0,
            None => FALLBACK_ADVANCE_EM,
        };
        em * size_px
    }
}

/// Marks that attach to the preceding character
pub fn is_combining(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0C00}'..='\u{0C04}'
            | '\u{0C3C}'
            | '\u{0C3E}'..='\u{0C56}'
            | '\u{0C62}'..='\u{0C63}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_chars_skips_whitespace_and_joiners() {
        let text = "ab a\u{200C}b\nc";
        let missing = missing_chars(text, |c| c == 'a');
        assert_eq!(missing, vec!['b', 'c']);
    }

    #[test]
    fn test_missing_chars_empty_when_covered() {
        assert!(missing_chars("రూ. 1,00,000/-", |_| true).is_empty());
    }

    #[test]
    fn test_estimated_widths_skip_marks() {
        let metrics = TextMetrics::estimated();
        // క + ్ + ష: the virama is a combining mark
        assert!((metrics.width("క్ష", 10.0) - 11.0).abs() < 1e-4);
        assert!((metrics.width("ab\u{200C}", 10.0) - 11.0).abs() < 1e-4);
        assert_eq!(metrics.char_width('\u{0C3F}', 10.0), 0.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = FontResource::load(Path::new("/nonexistent/NotoSansTelugu.ttf"));
        assert!(matches!(result, Err(PdfError::Font(_))));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = FontResource::from_bytes(b"not a font".to_vec());
        assert!(matches!(result, Err(PdfError::Font(_))));
    }
}
