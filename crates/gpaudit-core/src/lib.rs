//! gpaudit-core - Report model for the panchayat audit report
//!
//! This crate holds everything between the form and the exporters:
//!
//! - [`fields`]: the named values a user types in
//! - [`templates`]: the three page templates and their memoization
//! - [`preview`]: the on-screen HTML preview
//! - [`editor`]: the rich-text editing surface and its block bridge
//!
//! # Example
//!
//! ```
//! use gpaudit_core::{build_document, Field, FieldState};
//!
//! let fields = FieldState::default().with(Field::Income, "1,00,000");
//! let doc = build_document(&fields);
//! assert_eq!(doc.len(), 3);
//! ```

pub mod editor;
pub mod error;
pub mod fields;
pub mod preview;
pub mod templates;

pub use editor::{extract_html, EditSession, EditorConfig, ExportSource};
pub use error::{CoreError, Result};
pub use fields::{Field, FieldState};
pub use preview::{PreviewRenderer, Typography, EMPTY_PAGE_MESSAGE};
pub use templates::{build_document, BlockCache, PageTemplate, PAGES, REPORT_TITLE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
