//! Typst markup for both PDF strategies
//!
//! Direct placement puts each block's text at an absolute position: the
//! cursor starts 780pt above the bottom edge and moves down a fixed 50pt per
//! block regardless of how many lines the block wraps to. Centered blocks
//! start at x = 150pt, everything else at x = 50pt. Tables are skipped.

use std::fmt::Write as _;

use gpaudit_ast::{Align, Block, Document, Page};

/// Page width in points
pub const PAGE_WIDTH_PT: f32 = 595.0;
/// Page height in points
pub const PAGE_HEIGHT_PT: f32 = 842.0;
/// First baseline, measured from the bottom edge
pub const START_Y_PT: f32 = 780.0;
/// Vertical advance per block
pub const BLOCK_ADVANCE_PT: f32 = 50.0;
/// Left offset for centered blocks
pub const CENTER_X_PT: f32 = 150.0;
/// Left offset for all other blocks
pub const DEFAULT_X_PT: f32 = 50.0;
/// Maximum text width
pub const MAX_WIDTH_PT: f32 = 495.0;
/// Text size
pub const TEXT_SIZE_PT: f32 = 12.0;
/// Line height
pub const LINE_HEIGHT_PT: f32 = 16.0;

/// Absolute position of one placed block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Offset from the left edge
    pub x: f32,
    /// Offset from the top edge
    pub y: f32,
}

/// Positions of the text blocks of a page, in block order
pub fn placements(page: &Page) -> Vec<(Placement, &str)> {
    page.blocks
        .iter()
        .filter_map(|block| match block {
            Block::Table(_) => None,
            other => other.text().map(|text| (other.align(), text)),
        })
        .enumerate()
        .map(|(index, (align, text))| {
            let from_bottom = START_Y_PT - BLOCK_ADVANCE_PT * index as f32;
            let x = if align == Align::Center {
                CENTER_X_PT
            } else {
                DEFAULT_X_PT
            };
            (
                Placement {
                    x,
                    y: PAGE_HEIGHT_PT - from_bottom,
                },
                text,
            )
        })
        .collect()
}

/// Every character drawn on a page by direct placement
pub fn drawn_text(page: &Page) -> String {
    placements(page)
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markup for the direct placement strategy
pub fn direct_markup(doc: &Document, font_family: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#set page(width: {}pt, height: {}pt, margin: 0pt)",
        PAGE_WIDTH_PT, PAGE_HEIGHT_PT
    );
    let _ = writeln!(
        out,
        "#set text(font: {}, size: {}pt, fill: black)",
        typst_string(font_family),
        TEXT_SIZE_PT
    );
    let _ = writeln!(
        out,
        "#set par(leading: {}pt)",
        LINE_HEIGHT_PT - TEXT_SIZE_PT
    );
    write_title(&mut out, doc);

    for (index, page) in doc.pages.iter().enumerate() {
        if index > 0 {
            out.push_str("#pagebreak()\n");
        }
        let placed = placements(page);
        if placed.is_empty() {
            // An empty page still needs content to be emitted
            out.push_str("#box()\n");
        }
        for (at, text) in placed {
            let _ = writeln!(
                out,
                "#place(top + left, dx: {}pt, dy: {}pt, block(width: {}pt)[{}])",
                at.x,
                at.y,
                MAX_WIDTH_PT,
                text_content(text)
            );
        }
    }
    out
}

/// Markup placing one PNG per page on A4 with a 10mm margin
pub fn raster_markup(doc: &Document, images: &[String]) -> String {
    let mut out = String::from("#set page(paper: \"a4\", margin: 10mm)\n");
    write_title(&mut out, doc);
    for (index, image) in images.iter().enumerate() {
        if index > 0 {
            out.push_str("#pagebreak()\n");
        }
        let _ = writeln!(
            out,
            "#image({}, width: 100%, height: 100%, fit: \"contain\")",
            typst_string(image)
        );
    }
    out
}

fn write_title(out: &mut String, doc: &Document) {
    if let Some(title) = &doc.title {
        let _ = writeln!(out, "#set document(title: {})", typst_string(title));
    }
}

/// Content for a block: one string literal per line joined by line breaks
fn text_content(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("#{}", typst_string(line)))
        .collect::<Vec<_>>()
        .join("#linebreak()")
}

/// Typst string literal
pub fn typst_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpaudit_ast::{Row, TextStyle};

    fn page(blocks: Vec<Block>) -> Page {
        Page::new(1, blocks)
    }

    #[test]
    fn test_fixed_advance_per_block() {
        let p = page(vec![
            Block::heading("a", TextStyle::aligned(Align::Center)),
            Block::paragraph("b\nvery long second line", TextStyle::default()),
            Block::table(vec![Row::from_plain(["x"])]),
            Block::paragraph("c", TextStyle::aligned(Align::Right)),
        ]);
        let placed = placements(&p);
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[0].0, Placement { x: 150.0, y: 62.0 });
        assert_eq!(placed[1].0, Placement { x: 50.0, y: 112.0 });
        // Tables take no slot; right alignment shares the default offset
        assert_eq!(placed[2].0, Placement { x: 50.0, y: 162.0 });
        assert_eq!(placed[2].1, "c");
    }

    #[test]
    fn test_justify_uses_default_offset() {
        let p = page(vec![Block::paragraph("j", TextStyle::aligned(Align::Justify))]);
        assert_eq!(placements(&p)[0].0.x, DEFAULT_X_PT);
    }

    #[test]
    fn test_direct_markup_structure() {
        let doc = Document::from_pages([
            vec![Block::paragraph("రూ. \"1\"\nరెండు", TextStyle::default())],
            vec![],
        ]);
        let markup = direct_markup(&doc, "Noto Sans Telugu");
        assert!(markup.contains("#set page(width: 595pt, height: 842pt, margin: 0pt)"));
        assert!(markup.contains("font: \"Noto Sans Telugu\""));
        assert!(markup.contains("dx: 50pt, dy: 62pt, block(width: 495pt)"));
        assert!(markup.contains("[#\"రూ. \\\"1\\\"\"#linebreak()#\"రెండు\"]"));
        assert_eq!(markup.matches("#pagebreak()").count(), 1);
        assert!(markup.contains("#box()"));
    }

    #[test]
    fn test_raster_markup() {
        let doc = Document::with_title("T");
        let markup = raster_markup(&doc, &["page-1.png".into(), "page-2.png".into()]);
        assert!(markup.starts_with("#set page(paper: \"a4\", margin: 10mm)"));
        assert!(markup.contains("#set document(title: \"T\")"));
        assert!(markup.contains("#image(\"page-2.png\""));
        assert_eq!(markup.matches("#pagebreak()").count(), 1);
    }

    #[test]
    fn test_drawn_text_excludes_tables() {
        let p = page(vec![
            Block::paragraph("a", TextStyle::default()),
            Block::table(vec![Row::from_plain(["cell"])]),
        ]);
        assert_eq!(drawn_text(&p), "a");
    }

    #[test]
    fn test_typst_string_escapes() {
        assert_eq!(typst_string("a\\b\"c\n"), "\"a\\\\b\\\"c\\n\"");
    }
}
