//! Error types for PDF generation

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur during PDF generation
#[derive(Error, Debug)]
pub enum PdfError {
    /// Typst compilation error
    #[error("Typst compilation failed: {0}")]
    Compilation(String),

    /// Font missing, unreadable, or lacking glyphs for the page text
    #[error("Font error: {0}")]
    Font(String),

    /// Staging surface could not be rasterized
    #[error("Rasterization failed on page {page}: {reason}")]
    Raster { page: usize, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
