//! gpaudit-ooxml - DOCX generation for the panchayat audit report
//!
//! This crate turns a [`gpaudit_ast::Document`] into a complete WordprocessingML
//! package: paragraphs and tables in block order, a forced page break between
//! logical pages, A4 pages with half-inch margins.
//!
//! # Example
//!
//! ```
//! use gpaudit_ast::{Block, Document, TextStyle};
//! use gpaudit_ooxml::{DocxOptions, DocxWriter};
//!
//! let doc = Document::from_pages([vec![Block::paragraph("నమస్కారం", TextStyle::default())]]);
//! let bytes = DocxWriter::generate(&doc, &DocxOptions::default()).unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

pub mod archive;
pub mod error;
pub mod package;
pub mod writer;

pub use archive::OoxmlArchive;
pub use error::{OoxmlError, Result};
pub use writer::{half_points, jc_value, DocxOptions, DocxWriter};
