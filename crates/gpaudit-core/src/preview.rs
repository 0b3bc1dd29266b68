//! HTML preview renderer
//!
//! Renders a [`Document`] as a self-contained HTML page with one fixed
//! A4-proportioned sheet per logical page. Blocks are laid out top to
//! bottom with inline styles for alignment, weight, slant, color and size;
//! tables become bordered grids with per-cell alignment and weight.

use std::fmt::Write as _;

use gpaudit_ast::{Block, Color, Document, Page, Table, TextBlock, TextStyle};
use serde::{Deserialize, Serialize};

/// Placeholder shown for a page without blocks
pub const EMPTY_PAGE_MESSAGE: &str = "page is empty";

/// Default font sizes per block type, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub heading_px: f32,
    pub paragraph_px: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading_px: 18.0,
            paragraph_px: 14.0,
        }
    }
}

impl Typography {
    /// Default size for a block's type
    pub fn default_px(&self, block: &Block) -> f32 {
        if block.is_heading() {
            self.heading_px
        } else {
            self.paragraph_px
        }
    }
}

/// Renderer for the on-screen preview
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    typography: Typography,
}

impl PreviewRenderer {
    pub fn new(typography: Typography) -> Self {
        Self { typography }
    }

    /// Render the whole document as an HTML page
    pub fn render_document(&self, doc: &Document) -> String {
        let title = doc.title.as_deref().unwrap_or("Preview");
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{}</title>
<style>
body {{ background: #e2e8f0; margin: 0; padding: 2rem 0; font-family: 'Noto Sans Telugu', Arial, sans-serif; }}
.page {{ width: 210mm; height: 297mm; margin: 0 auto 2rem; background: #fff; border: 1px solid #cbd5e1; box-shadow: 0 4px 12px rgba(0,0,0,0.12); display: flex; flex-direction: column; box-sizing: border-box; }}
.page-body {{ flex: 1; overflow-y: auto; padding: 15mm 12mm; }}
.page-footer {{ text-align: center; font-size: 12px; color: #94a3b8; padding: 12px 0; }}
.page-empty {{ color: #94a3b8; text-align: center; padding-top: 40%; }}
h2 {{ margin: 0 0 24px; }}
p {{ margin: 0 0 16px; white-space: pre-line; line-height: 1.75; }}
table {{ width: 100%; border-collapse: collapse; margin-bottom: 16px; }}
td {{ border: 1px solid #cbd5e1; padding: 8px; }}
</style>
</head>
<body>
"#,
            escape_html(title)
        );

        for page in &doc.pages {
            out.push_str(&self.render_page(page));
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    /// Render a single page sheet
    pub fn render_page(&self, page: &Page) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<div class="page" data-page="{}">"#, page.number);
        out.push_str("<div class=\"page-body\">\n");

        if page.blocks.is_empty() {
            let _ = writeln!(out, r#"<div class="page-empty">{}</div>"#, EMPTY_PAGE_MESSAGE);
        } else {
            for block in &page.blocks {
                out.push_str(&self.render_block(block));
            }
        }

        out.push_str("</div>\n");
        let _ = writeln!(out, r#"<div class="page-footer">Page {}</div>"#, page.number);
        out.push_str("</div>\n");
        out
    }

    /// Render one block
    pub fn render_block(&self, block: &Block) -> String {
        let default_px = self.typography.default_px(block);
        match block {
            Block::Heading(b) => self.render_text("h2", b, default_px),
            Block::Paragraph(b) => self.render_text("p", b, default_px),
            Block::Table(t) => self.render_table(t, default_px),
        }
    }

    fn render_text(&self, tag: &str, block: &TextBlock, default_px: f32) -> String {
        format!(
            "<{tag} style=\"{}\">{}</{tag}>\n",
            text_css(&block.style, default_px),
            escape_html(&block.text)
        )
    }

    fn render_table(&self, table: &Table, default_px: f32) -> String {
        let mut out = String::from("<table>\n<tbody>\n");
        for row in &table.rows {
            out.push_str("<tr>");
            for cell in &row.cells {
                let _ = write!(
                    out,
                    "<td style=\"text-align: {}; font-weight: {}; font-size: {}px\">{}</td>",
                    cell.align_or_default().as_str(),
                    if cell.bold { 600 } else { 400 },
                    format_px(table.style.font_size_or(default_px)),
                    escape_html(&cell.text)
                );
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
        out
    }
}

/// Inline CSS for a text block
fn text_css(style: &TextStyle, default_px: f32) -> String {
    let color = style
        .color
        .as_ref()
        .and_then(css_color)
        .unwrap_or_else(|| "inherit".to_string());
    format!(
        "text-align: {}; font-weight: {}; font-style: {}; color: {}; font-size: {}px",
        style.align.as_str(),
        if style.bold { 600 } else { 400 },
        if style.italic { "italic" } else { "normal" },
        color,
        format_px(style.font_size_or(default_px))
    )
}

/// Resolved colors as lowercase hex; anything else the browser may still
/// understand (`rgb(...)`, rarer names) is passed through if it cannot
/// break out of the style attribute
fn css_color(color: &Color) -> Option<String> {
    if let Some(hex) = color.hex() {
        return Some(format!("#{}", hex.to_ascii_lowercase()));
    }
    let raw = color.as_str().trim();
    let safe = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    safe.then(|| raw.to_string())
}

/// Format a pixel size without a trailing `.0`
pub(crate) fn format_px(px: f32) -> String {
    if px.fract() == 0.0 {
        format!("{}", px as i64)
    } else {
        format!("{}", px)
    }
}

/// Escape special HTML characters
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpaudit_ast::{Align, Cell, CellAlign, Row};

    #[test]
    fn test_empty_page_shows_placeholder() {
        let renderer = PreviewRenderer::default();
        let html = renderer.render_page(&Page::new(4, vec![]));
        assert!(html.contains(EMPTY_PAGE_MESSAGE));
        assert!(html.contains("Page 4"));
    }

    #[test]
    fn test_heading_style() {
        let renderer = PreviewRenderer::default();
        let block = Block::heading(
            "శీర్షిక",
            TextStyle::aligned(Align::Center).bold().with_color("#1E40AF"),
        );
        let html = renderer.render_block(&block);
        assert!(html.starts_with("<h2 "));
        assert!(html.contains("text-align: center"));
        assert!(html.contains("font-weight: 600"));
        assert!(html.contains("color: #1e40af"));
        assert!(html.contains("font-size: 18px"));
    }

    #[test]
    fn test_text_colors() {
        let css = |color: &str| text_css(&TextStyle::default().with_color(color), 14.0);
        assert!(css("orange").contains("color: #ffa500"));
        assert!(css("rgb(10, 20, 30)").contains("color: rgb(10, 20, 30)"));
        assert!(css("rebeccapurple").contains("color: rebeccapurple"));
        assert!(css("red\" onmouseover=\"x").contains("color: inherit"));
        assert!(css("red; background: url(x)").contains("color: inherit"));
        assert!(text_css(&TextStyle::default(), 14.0).contains("color: inherit"));
    }

    #[test]
    fn test_paragraph_escapes_and_sizes() {
        let renderer = PreviewRenderer::new(Typography {
            heading_px: 20.0,
            paragraph_px: 13.5,
        });
        let block = Block::paragraph("a < b & c", TextStyle::default().italic());
        let html = renderer.render_block(&block);
        assert!(html.contains("a &lt; b &amp; c"));
        assert!(html.contains("font-style: italic"));
        assert!(html.contains("font-size: 13.5px"));
    }

    #[test]
    fn test_table_cells_carry_alignment_and_weight() {
        let renderer = PreviewRenderer::default();
        let block = Block::table(vec![Row::new(vec![
            Cell::new("H").bold().aligned(CellAlign::Center),
            Cell::new("v"),
        ])]);
        let html = renderer.render_block(&block);
        assert!(html.contains("text-align: center; font-weight: 600"));
        assert!(html.contains("text-align: left; font-weight: 400"));
        assert_eq!(html.matches("<td").count(), 2);
    }

    #[test]
    fn test_document_renders_every_page() {
        let doc = Document::from_pages([vec![], vec![Block::paragraph("x", TextStyle::default())]]);
        let html = PreviewRenderer::default().render_document(&doc);
        assert_eq!(html.matches("class=\"page\"").count(), 2);
        assert!(html.contains("Page 2"));
        assert!(html.contains(EMPTY_PAGE_MESSAGE));
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(14.0), "14");
        assert_eq!(format_px(10.5), "10.5");
    }
}
