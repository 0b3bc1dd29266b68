//! gpaudit-pdf - PDF export via Typst
//!
//! Two strategies turn a report [`Document`] into a PDF:
//!
//! 1. **Direct** - every text block is placed at a fixed position on a
//!    vector page (tables are not drawn)
//! 2. **Raster** - every page is staged as an SVG surface, rasterized and
//!    embedded as one image per PDF page
//!
//! Both read the Unicode font before drawing anything; a missing or
//! unusable font aborts the export.
//!
//! # Example
//!
//! ```ignore
//! use gpaudit_pdf::{render_pdf, PdfOptions, PdfStrategy};
//!
//! let options = PdfOptions {
//!     strategy: PdfStrategy::Raster,
//!     ..PdfOptions::default()
//! };
//! let pdf_bytes = render_pdf(&doc, &options)?;
//! ```

mod compiler;
mod error;
mod font;
pub mod placement;
mod raster;
pub mod staging;

use std::path::PathBuf;

use gpaudit_ast::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use compiler::Compiler;
pub use error::{PdfError, Result};
pub use font::{missing_chars, FontResource, TextMetrics};
pub use raster::Rasterizer;
pub use staging::{StagingStyle, StagingSurface};

/// PDF generation approach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfStrategy {
    /// Vector text at fixed positions
    #[default]
    Direct,
    /// One rasterized image per page
    Raster,
}

/// Options for PDF generation
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub strategy: PdfStrategy,
    /// Unicode font file covering the report's script
    pub font_path: PathBuf,
    /// Family name override; defaults to the family declared by the font
    pub font_family: Option<String>,
    /// Supersampling scale for rasterization
    pub scale: f32,
    /// Default heading size in pixels (raster only)
    pub heading_px: f32,
    /// Default paragraph size in pixels (raster only)
    pub paragraph_px: f32,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            strategy: PdfStrategy::default(),
            font_path: PathBuf::from("fonts/NotoSansTelugu-Regular.ttf"),
            font_family: None,
            scale: 2.0,
            heading_px: 18.0,
            paragraph_px: 14.0,
        }
    }
}

/// Render a document to PDF bytes
pub fn render_pdf(doc: &Document, options: &PdfOptions) -> Result<Vec<u8>> {
    let font = FontResource::load(&options.font_path)?;
    let family = options
        .font_family
        .clone()
        .unwrap_or_else(|| font.family().to_string());

    info!(strategy = ?options.strategy, pages = doc.len(), "rendering PDF");
    match options.strategy {
        PdfStrategy::Direct => render_direct(doc, &font, &family),
        PdfStrategy::Raster => render_raster(doc, &font, &family, options),
    }
}

fn render_direct(doc: &Document, font: &FontResource, family: &str) -> Result<Vec<u8>> {
    for page in &doc.pages {
        font.ensure_covers(&placement::drawn_text(page))?;
    }
    let markup = placement::direct_markup(doc, family);
    Compiler::compile(&markup, &[font.data()])
}

fn render_raster(
    doc: &Document,
    font: &FontResource,
    family: &str,
    options: &PdfOptions,
) -> Result<Vec<u8>> {
    let style = StagingStyle {
        font_family: family.to_string(),
        heading_px: options.heading_px,
        paragraph_px: options.paragraph_px,
        metrics: font.metrics(),
    };
    let rasterizer = Rasterizer::new(&[font.data()], family);

    let mut files = Vec::with_capacity(doc.len());
    for page in &doc.pages {
        // The surface lives only for this capture
        let svg = StagingSurface::stage(page, &style);
        let png = rasterizer.rasterize(&svg, options.scale, page.number)?;
        debug!(page = page.number, bytes = png.len(), "captured page");
        files.push((format!("page-{}.png", page.number), png));
    }

    let names: Vec<String> = files.iter().map(|(name, _)| name.clone()).collect();
    let markup = placement::raster_markup(doc, &names);
    Compiler::compile_with_files(&markup, &[], files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpaudit_ast::{Block, TextStyle};

    fn doc() -> Document {
        Document::from_pages([vec![Block::paragraph("నమస్కారం", TextStyle::default())]])
    }

    #[test]
    fn test_default_options() {
        let options = PdfOptions::default();
        assert_eq!(options.strategy, PdfStrategy::Direct);
        assert_eq!(options.scale, 2.0);
        assert!(options.font_family.is_none());
    }

    #[test]
    fn test_missing_font_aborts_both_strategies() {
        for strategy in [PdfStrategy::Direct, PdfStrategy::Raster] {
            let options = PdfOptions {
                strategy,
                font_path: PathBuf::from("/nonexistent/font.ttf"),
                ..Default::default()
            };
            assert!(matches!(render_pdf(&doc(), &options), Err(PdfError::Font(_))));
        }
    }
}
