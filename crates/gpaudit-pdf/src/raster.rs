//! Rasterization of staging surfaces
//!
//! Uses resvg to render the SVG surface into a pixmap at a supersampling
//! scale, then encodes it as PNG.

use std::sync::Arc;

use crate::error::{PdfError, Result};
use crate::staging::{PAGE_HEIGHT_PX, PAGE_WIDTH_PX};

/// Renders staging surfaces with a fixed set of fonts
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl Rasterizer {
    /// Create a rasterizer that only knows the given fonts
    pub fn new(fonts: &[&[u8]], font_family: impl Into<String>) -> Self {
        let mut db = fontdb::Database::new();
        for font in fonts {
            db.load_font_data(font.to_vec());
        }
        if db.is_empty() {
            tracing::warn!("no fonts loaded, staged text will not be drawn");
        }
        Self {
            fontdb: Arc::new(db),
            font_family: font_family.into(),
        }
    }

    /// Render one page surface to PNG bytes
    ///
    /// `page` is only used to label errors.
    pub fn rasterize(&self, svg: &str, scale: f32, page: usize) -> Result<Vec<u8>> {
        let fail = |reason: String| PdfError::Raster { page, reason };

        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_family: self.font_family.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| fail(format!("SVG parsing failed: {}", e)))?;

        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let width = (PAGE_WIDTH_PX as f32 * scale).round() as u32;
        let height = (PAGE_HEIGHT_PX as f32 * scale).round() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| fail(format!("Failed to create pixmap ({}x{})", width, height)))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| fail(format!("PNG encoding failed: {}", e)))
    }
}
