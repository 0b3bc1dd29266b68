//! Typst to PDF compiler
//!
//! Compiles Typst markup to PDF bytes using typst-as-lib. Fonts and binary
//! files (page images) are handed to the engine from memory.

use typst_as_lib::TypstEngine;

use crate::error::{PdfError, Result};

/// Compiler for converting Typst markup to PDF
pub struct Compiler;

impl Compiler {
    /// Compile markup with the given font files
    pub fn compile(markup: &str, fonts: &[&[u8]]) -> Result<Vec<u8>> {
        Self::compile_with_files(markup, fonts, Vec::new())
    }

    /// Compile markup that references in-memory files by name
    ///
    /// # Arguments
    /// * `markup` - Typst markup string
    /// * `fonts` - Font file contents
    /// * `files` - `(path, bytes)` pairs resolvable from the markup
    pub fn compile_with_files(
        markup: &str,
        fonts: &[&[u8]],
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<u8>> {
        let mut builder = TypstEngine::builder().main_file(markup.to_string());

        for font in fonts {
            builder = builder.fonts([font.to_vec()]);
        }

        let engine = builder
            .with_static_file_resolver(files.iter().map(|(path, bytes)| (path.as_str(), bytes.clone())))
            .build();

        // compiled is Warned<Result<Document, Error>>
        let compiled = engine.compile();
        let document = compiled
            .output
            .map_err(|e| PdfError::Compilation(format!("{:?}", e)))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf_bytes = typst_pdf::pdf(&document, &options)
            .map_err(|e| PdfError::Compilation(format!("PDF generation failed: {:?}", e)))?;

        Ok(pdf_bytes.into())
    }
}
