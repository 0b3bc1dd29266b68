//! Off-screen staging surface for rasterized pages
//!
//! One surface is built per page capture: an SVG document of A4 at 96 dpi
//! that mirrors every block of the page. Text is wrapped into lines
//! measured with the export font before it is placed; tables become a
//! bordered cell grid. The surface is consumed by [`StagingSurface::finish`]
//! and never reused.

use std::fmt::Write as _;

use gpaudit_ast::{Align, Block, CellAlign, Page, Table, TextBlock, TextStyle};
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

use crate::font::{is_combining, TextMetrics};

/// Pixels per millimetre at 96 dpi
pub const PX_PER_MM: f32 = 3.7795;
/// A4 width in pixels
pub const PAGE_WIDTH_PX: u32 = 794;
/// A4 height in pixels
pub const PAGE_HEIGHT_PX: u32 = 1123;

const PADDING_X_PX: f32 = 12.0 * PX_PER_MM;
const PADDING_Y_PX: f32 = 15.0 * PX_PER_MM;
const HEADING_GAP_PX: f32 = 24.0;
const BLOCK_GAP_PX: f32 = 16.0;
const CELL_PADDING_PX: f32 = 8.0;
const BORDER_COLOR: &str = "#cbd5e1";
const VIRAMA: char = '\u{0C4D}';

/// Default sizes, family and metrics for staged text
#[derive(Debug, Clone)]
pub struct StagingStyle {
    pub font_family: String,
    pub heading_px: f32,
    pub paragraph_px: f32,
    /// Must describe the font the surface is rasterized with
    pub metrics: TextMetrics,
}

impl Default for StagingStyle {
    fn default() -> Self {
        Self {
            font_family: "Noto Sans Telugu".to_string(),
            heading_px: 18.0,
            paragraph_px: 14.0,
            metrics: TextMetrics::estimated(),
        }
    }
}

/// SVG staging surface for one page
pub struct StagingSurface<'a> {
    style: &'a StagingStyle,
    body: String,
    cursor_y: f32,
}

impl<'a> StagingSurface<'a> {
    pub fn new(style: &'a StagingStyle) -> Self {
        Self {
            style,
            body: String::new(),
            cursor_y: PADDING_Y_PX,
        }
    }

    /// Build the surface for a whole page
    pub fn stage(page: &Page, style: &'a StagingStyle) -> String {
        let mut surface = Self::new(style);
        for block in &page.blocks {
            surface.push_block(block);
        }
        surface.finish()
    }

    fn content_width() -> f32 {
        PAGE_WIDTH_PX as f32 - 2.0 * PADDING_X_PX
    }

    /// Append a block below the previous one
    pub fn push_block(&mut self, block: &Block) {
        match block {
            Block::Heading(b) => {
                self.push_text(b, self.style.heading_px, 1.4);
                self.cursor_y += HEADING_GAP_PX;
            }
            Block::Paragraph(b) => {
                self.push_text(b, self.style.paragraph_px, 1.75);
                self.cursor_y += BLOCK_GAP_PX;
            }
            Block::Table(t) => {
                self.push_table(t);
                self.cursor_y += BLOCK_GAP_PX;
            }
        }
    }

    fn push_text(&mut self, block: &TextBlock, default_px: f32, line_factor: f32) {
        let size = block.style.font_size_or(default_px);
        let line_height = size * line_factor;
        let width = Self::content_width();
        let lines = wrap_lines(&block.text, width, size, &self.style.metrics);
        let last = lines.len().saturating_sub(1);

        for (index, line) in lines.iter().enumerate() {
            // Baseline sits where a CSS line box of this height would put it
            let baseline = self.cursor_y + (line_height + size * 0.7) / 2.0;
            let justify = block.style.align == Align::Justify
                && index < last
                && line.contains(' ')
                && self.style.metrics.width(line, size) <= width;
            self.push_line(
                line,
                &block.style,
                size,
                PADDING_X_PX,
                width,
                baseline,
                justify,
            );
            self.cursor_y += line_height;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_line(
        &mut self,
        line: &str,
        style: &TextStyle,
        size: f32,
        left: f32,
        width: f32,
        baseline: f32,
        justify: bool,
    ) {
        if line.is_empty() {
            return;
        }
        let (x, anchor) = match style.align {
            Align::Left | Align::Justify => (left, "start"),
            Align::Center => (left + width / 2.0, "middle"),
            Align::Right => (left + width, "end"),
        };
        let fill = style
            .color
            .as_ref()
            .and_then(|c| c.hex())
            .unwrap_or_else(|| "000000".to_string());

        let _ = write!(
            self.body,
            r##"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="#{}" text-anchor="{}""##,
            x,
            baseline,
            escape_xml(&self.style.font_family),
            size,
            if style.bold { 600 } else { 400 },
            if style.italic { "italic" } else { "normal" },
            fill,
            anchor
        );
        if justify {
            let _ = write!(
                self.body,
                r#" textLength="{:.2}" lengthAdjust="spacing""#,
                width
            );
        }
        let _ = writeln!(self.body, ">{}</text>", escape_xml(line));
    }

    fn push_table(&mut self, table: &Table) {
        let columns = table.grid_width();
        if columns == 0 {
            return;
        }
        let size = table.style.font_size_or(self.style.paragraph_px);
        let line_height = size * 1.5;
        let cell_width = Self::content_width() / columns as f32;
        let text_width = cell_width - 2.0 * CELL_PADDING_PX;

        for row in &table.rows {
            let wrapped: Vec<Vec<String>> = row
                .cells
                .iter()
                .map(|cell| wrap_lines(&cell.text, text_width, size, &self.style.metrics))
                .collect();
            let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let row_height = max_lines as f32 * line_height + 2.0 * CELL_PADDING_PX;

            for column in 0..columns {
                let left = PADDING_X_PX + cell_width * column as f32;
                let _ = writeln!(
                    self.body,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="1"/>"#,
                    left, self.cursor_y, cell_width, row_height, BORDER_COLOR
                );

                let (Some(cell), Some(lines)) = (row.cells.get(column), wrapped.get(column)) else {
                    continue;
                };
                let style = TextStyle {
                    align: match cell.align_or_default() {
                        CellAlign::Left => Align::Left,
                        CellAlign::Center => Align::Center,
                        CellAlign::Right => Align::Right,
                    },
                    bold: cell.bold || table.style.bold,
                    ..table.style.clone()
                };
                for (index, line) in lines.iter().enumerate() {
                    let top = self.cursor_y + CELL_PADDING_PX + line_height * index as f32;
                    let baseline = top + (line_height + size * 0.7) / 2.0;
                    self.push_line(
                        line,
                        &style,
                        size,
                        left + CELL_PADDING_PX,
                        text_width,
                        baseline,
                        false,
                    );
                }
            }
            self.cursor_y += row_height;
        }
    }

    /// Close the surface into a standalone SVG document
    pub fn finish(self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                "\n",
                r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##,
                "\n{body}</svg>\n"
            ),
            w = PAGE_WIDTH_PX,
            h = PAGE_HEIGHT_PX,
            body = self.body
        )
    }
}

/// A word, or part of a word too wide for a line, with its measured width
#[derive(Debug)]
struct Piece<'a> {
    text: &'a str,
    width: f64,
    /// Width of the space that follows; zero inside a broken word
    space: f64,
}

impl Fragment for Piece<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.space
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Split on hard breaks, then wrap each line to `width_px`
///
/// Words are measured with `metrics`; a single word wider than the line is
/// broken between character clusters.
pub fn wrap_lines(text: &str, width_px: f32, size_px: f32, metrics: &TextMetrics) -> Vec<String> {
    let space = f64::from(metrics.char_width(' ', size_px));
    let mut lines = Vec::new();

    for line in text.split('\n') {
        let mut pieces = Vec::new();
        for word in line.split_whitespace() {
            split_word(word, width_px, size_px, metrics, &mut pieces);
            if let Some(last) = pieces.last_mut() {
                last.space = space;
            }
        }
        if pieces.is_empty() {
            lines.push(String::new());
            continue;
        }

        for wrapped in wrap_first_fit(&pieces, &[f64::from(width_px)]) {
            let mut out = String::new();
            for (index, piece) in wrapped.iter().enumerate() {
                out.push_str(piece.text);
                if piece.space > 0.0 && index + 1 < wrapped.len() {
                    out.push(' ');
                }
            }
            lines.push(out);
        }
    }
    lines
}

/// Push `word` as one piece, or as several if it is wider than `width_px`
///
/// Breaks only fall between clusters: a spacing character together with
/// the marks after it, and with any consonant joined to it by a virama.
fn split_word<'a>(
    word: &'a str,
    width_px: f32,
    size_px: f32,
    metrics: &TextMetrics,
    pieces: &mut Vec<Piece<'a>>,
) {
    let mut clusters: Vec<(usize, f32)> = Vec::new();
    let mut previous: Option<char> = None;
    for (index, c) in word.char_indices() {
        let advance = metrics.char_width(c, size_px);
        let starts = !is_combining(c) && advance > 0.0 && previous != Some(VIRAMA);
        let joined = if starts { None } else { clusters.last_mut() };
        match joined {
            Some(last) => last.1 += advance,
            None => clusters.push((index, advance)),
        }
        previous = Some(c);
    }

    let mut start = 0;
    let mut current = 0.0_f32;
    for (index, width) in clusters {
        if index > start && current + width > width_px {
            pieces.push(Piece {
                text: &word[start..index],
                width: f64::from(current),
                space: 0.0,
            });
            start = index;
            current = 0.0;
        }
        current += width;
    }
    pieces.push(Piece {
        text: &word[start..],
        width: f64::from(current),
        space: 0.0,
    });
}

/// Escape for SVG text and attributes, dropping characters XML rejects
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < ' ' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
