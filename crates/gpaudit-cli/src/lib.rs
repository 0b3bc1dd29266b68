//! gpaudit CLI - Command-line interface library
//!
//! This library provides the CLI functionality for gpaudit, including:
//! - Fields: show the effective form values
//! - Preview: write the HTML preview of the three report pages
//! - Edit: write editable pages that can be exported later
//! - Export: produce the PDF or DOCX report
//!
//! # Library Usage
//!
//! ```ignore
//! use gpaudit_cli::{export_command, load_fields, ExportFormat, Settings};
//!
//! let settings = Settings::load(None)?;
//! let fields = load_fields(None, &["income=1,00,000".to_string()])?;
//! let path = export_command(ExportFormat::Docx, &fields, &settings)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Preview with one field changed
//! gpaudit --set gpName="రావులపాలెం" preview --output preview.html
//!
//! # Export the PDF with the rasterizing strategy
//! gpaudit export --format pdf --strategy raster
//!
//! # Edit pages, then export the edited content
//! gpaudit edit
//! gpaudit export --format docx --source editor
//! ```

pub mod app;
pub mod config;

// Re-export main entry point and types
pub use app::{
    blocks_command, edit_command, edited_page_path, export_command, export_document,
    fields_command, load_fields, preview_command,
};
pub use app::{run_cli, ExportFormat, DOCX_FILE_NAME, PDF_FILE_NAME};
pub use config::{ExportSettings, FontSettings, Settings, DEFAULT_CONFIG_FILE};
