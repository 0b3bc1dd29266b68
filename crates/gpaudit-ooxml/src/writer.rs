//! DOCX Writer - generates a DOCX package from a report document
//!
//! Each block becomes either a paragraph (runs with weight, slant, color,
//! font and size; paragraph alignment and spacing) or a bordered table.
//! A forced page break follows every logical page except the last.

use std::io::Cursor;

use gpaudit_ast::{Align, Block, Document, Table, TextBlock, TextStyle};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::archive::OoxmlArchive;
use crate::error::Result;
use crate::package;

/// A4 width minus two 720-twip margins
const CONTENT_WIDTH_TWIPS: u32 = 11906 - 2 * 720;

/// Options for DOCX generation
#[derive(Debug, Clone)]
pub struct DocxOptions {
    /// Font family written to every run
    pub font_family: String,
    /// Default heading size in pixels
    pub heading_px: f32,
    /// Default paragraph and table size in pixels
    pub paragraph_px: f32,
    /// Optional .dotx/.docx whose `word/styles.xml` replaces the built-in styles
    pub template: Option<Vec<u8>>,
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            font_family: "Noto Sans Telugu".to_string(),
            heading_px: 18.0,
            paragraph_px: 14.0,
            template: None,
        }
    }
}

/// Formatting of one run
struct RunProps<'a> {
    bold: bool,
    italic: bool,
    color: Option<String>,
    half_points: u32,
    font: &'a str,
}

/// DOCX Writer for generating DOCX files from a report document
pub struct DocxWriter {
    /// XML output buffer
    output: String,
    options: DocxOptions,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new(DocxOptions::default())
    }
}

impl DocxWriter {
    /// Create a new DocxWriter
    pub fn new(options: DocxOptions) -> Self {
        Self {
            output: String::new(),
            options,
        }
    }

    /// Generate a complete DOCX package
    ///
    /// Either the whole package is produced or an error is returned; there
    /// is no partial output.
    pub fn generate(doc: &Document, options: &DocxOptions) -> Result<Vec<u8>> {
        let mut archive = OoxmlArchive::new();
        package::write_parts(
            &mut archive,
            doc.title.as_deref(),
            &options.font_family,
            options.heading_px,
            options.paragraph_px,
        );

        if let Some(template) = &options.template {
            let template = OoxmlArchive::from_reader(Cursor::new(template.as_slice()))?;
            let styles = template.styles_xml()?;
            check_well_formed(styles)?;
            debug!("using styles from template");
            archive.set("word/styles.xml", styles.to_vec());
        }

        let mut writer = DocxWriter::new(options.clone());
        archive.set_string("word/document.xml", writer.generate_document_xml(doc));

        let mut output = Cursor::new(Vec::new());
        archive.write_to(&mut output)?;
        Ok(output.into_inner())
    }

    /// Generate the complete document.xml content
    pub fn generate_document_xml(&mut self, doc: &Document) -> String {
        self.output.clear();

        self.output
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        self.output.push('\n');
        self.output.push_str("<w:body>\n");

        let last = doc.pages.len().saturating_sub(1);
        for (index, page) in doc.pages.iter().enumerate() {
            debug!(page = page.number, blocks = page.blocks.len(), "writing page");
            for block in &page.blocks {
                self.generate_block(block);
            }
            if index < last {
                self.generate_page_break();
            }
        }

        self.generate_section_properties();
        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");

        std::mem::take(&mut self.output)
    }

    fn generate_block(&mut self, block: &Block) {
        match block {
            Block::Heading(b) => self.generate_text_block(b, true),
            Block::Paragraph(b) => self.generate_text_block(b, false),
            Block::Table(t) => self.generate_table(t),
        }
    }

    /// Generate XML for a heading or paragraph
    fn generate_text_block(&mut self, block: &TextBlock, heading: bool) {
        let default_px = if heading {
            self.options.heading_px
        } else {
            self.options.paragraph_px
        };

        self.output.push_str("<w:p>\n<w:pPr>\n");
        if heading {
            self.output.push_str("<w:pStyle w:val=\"Heading2\"/>\n");
        }
        self.output.push_str("<w:spacing w:after=\"240\"/>\n");
        self.output
            .push_str(&format!("<w:jc w:val=\"{}\"/>\n", jc_value(block.style.align)));
        self.output.push_str("</w:pPr>\n");

        let font = self.options.font_family.clone();
        let props = run_props(&block.style, default_px, &font);
        self.generate_run(&block.text, &props);

        self.output.push_str("</w:p>\n");
    }

    /// Generate a run; embedded newlines become line breaks
    fn generate_run(&mut self, text: &str, props: &RunProps<'_>) {
        let font = escape_xml(props.font);
        self.output.push_str("<w:r>\n<w:rPr>\n");
        self.output.push_str(&format!(
            "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>\n"
        ));
        if props.bold {
            self.output.push_str("<w:b/>\n<w:bCs/>\n");
        }
        if props.italic {
            self.output.push_str("<w:i/>\n<w:iCs/>\n");
        }
        if let Some(color) = &props.color {
            self.output
                .push_str(&format!("<w:color w:val=\"{}\"/>\n", color));
        }
        self.output.push_str(&format!(
            "<w:sz w:val=\"{0}\"/>\n<w:szCs w:val=\"{0}\"/>\n",
            props.half_points
        ));
        self.output.push_str("</w:rPr>\n");

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.output.push_str("<w:br/>\n");
            }
            self.output.push_str(&format!(
                "<w:t xml:space=\"preserve\">{}</w:t>\n",
                escape_xml(line)
            ));
        }
        self.output.push_str("</w:r>\n");
    }

    /// Generate XML for a table
    ///
    /// The grid is as wide as the widest row; shorter rows are padded with
    /// empty cells so every row keeps its own values in its own cells.
    fn generate_table(&mut self, table: &Table) {
        let columns = table.grid_width();
        if columns == 0 {
            warn!(rows = table.rows.len(), "skipping table without cells");
            return;
        }
        if !table.is_rectangular() {
            warn!(columns, "table rows have differing lengths, padding short rows");
        }

        let column_width = CONTENT_WIDTH_TWIPS / columns as u32;
        self.output.push_str("<w:tbl>\n<w:tblPr>\n");
        self.output.push_str("<w:tblStyle w:val=\"TableGrid\"/>\n");
        self.output
            .push_str("<w:tblW w:w=\"5000\" w:type=\"pct\"/>\n");
        self.output.push_str("<w:tblBorders>\n");
        for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            self.output.push_str(&format!(
                "<w:{side} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\n"
            ));
        }
        self.output.push_str("</w:tblBorders>\n</w:tblPr>\n");

        self.output.push_str("<w:tblGrid>\n");
        for _ in 0..columns {
            self.output
                .push_str(&format!("<w:gridCol w:w=\"{}\"/>\n", column_width));
        }
        self.output.push_str("</w:tblGrid>\n");

        let font = self.options.font_family.clone();
        let base = run_props(&table.style, self.options.paragraph_px, &font);

        for row in &table.rows {
            self.output.push_str("<w:tr>\n");
            for cell in &row.cells {
                self.open_cell(column_width);
                self.output.push_str("<w:p>\n<w:pPr>\n");
                self.output.push_str(&format!(
                    "<w:jc w:val=\"{}\"/>\n",
                    jc_value(cell.align_or_default().into())
                ));
                self.output.push_str("</w:pPr>\n");
                let props = RunProps {
                    bold: cell.bold || base.bold,
                    color: base.color.clone(),
                    ..base
                };
                self.generate_run(&cell.text, &props);
                self.output.push_str("</w:p>\n</w:tc>\n");
            }
            for _ in row.cells.len()..columns {
                self.open_cell(column_width);
                self.output.push_str("<w:p/>\n</w:tc>\n");
            }
            self.output.push_str("</w:tr>\n");
        }

        self.output.push_str("</w:tbl>\n");
        // Keep consecutive tables from merging
        self.output.push_str("<w:p/>\n");
    }

    fn open_cell(&mut self, width: u32) {
        self.output.push_str(&format!(
            "<w:tc>\n<w:tcPr>\n<w:tcW w:w=\"{}\" w:type=\"dxa\"/>\n</w:tcPr>\n",
            width
        ));
    }

    /// Generate a forced page break paragraph
    fn generate_page_break(&mut self) {
        self.output
            .push_str("<w:p>\n<w:r>\n<w:br w:type=\"page\"/>\n</w:r>\n</w:p>\n");
    }

    /// A4 portrait with 0.5 inch margins
    fn generate_section_properties(&mut self) {
        self.output.push_str("<w:sectPr>\n");
        self.output
            .push_str("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>\n");
        self.output.push_str(
            "<w:pgMar w:top=\"720\" w:right=\"720\" w:bottom=\"720\" w:left=\"720\" w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/>\n",
        );
        self.output.push_str("</w:sectPr>\n");
    }
}

fn run_props<'a>(style: &TextStyle, default_px: f32, font: &'a str) -> RunProps<'a> {
    RunProps {
        bold: style.bold,
        italic: style.italic,
        color: style.color.as_ref().and_then(|c| c.hex()),
        half_points: half_points(style.font_size_or(default_px)),
        font,
    }
}

/// Paragraph justification value for an alignment
pub fn jc_value(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
        Align::Justify => "both",
    }
}

/// Font size in the format's native half-point unit
pub fn half_points(px: f32) -> u32 {
    (px * 2.0).round().max(1.0) as u32
}

/// Fail if `xml` is not well-formed
fn check_well_formed(xml: &[u8]) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => return Ok(()),
            _ => buf.clear(),
        }
    }
}

/// Escape special XML characters and drop those XML 1.0 does not allow
///
/// Control characters (other than tab and line ends) pasted into a field
/// would otherwise make Word reject the whole package.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// `Char` production of XML 1.0
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}
