//! End-to-end checks against the bundled typst fonts

use std::io::Write;

use gpaudit_ast::{Align, Block, Cell, Document, Page, Row, TextStyle};
use gpaudit_pdf::{
    placement, render_pdf, staging, Compiler, FontResource, PdfError, PdfOptions, PdfStrategy,
    Rasterizer, StagingStyle, StagingSurface,
};
use tempfile::NamedTempFile;

/// A Latin-only font from typst-assets, written out like a user's font file
fn bundled_font() -> (NamedTempFile, FontResource) {
    let data = typst_assets::fonts()
        .find(|data| {
            FontResource::from_bytes(data.to_vec())
                .map(|font| font.family() == "DejaVu Sans Mono")
                .unwrap_or(false)
        })
        .or_else(|| typst_assets::fonts().next())
        .expect("typst-assets ships fonts");
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    let font = FontResource::from_bytes(data.to_vec()).unwrap();
    (file, font)
}

fn options_for(file: &NamedTempFile, strategy: PdfStrategy) -> PdfOptions {
    PdfOptions {
        strategy,
        font_path: file.path().to_path_buf(),
        ..Default::default()
    }
}

fn latin_document() -> Document {
    Document::from_pages([
        vec![
            Block::heading("Audit \"2024\" report", TextStyle::aligned(Align::Center).bold()),
            Block::paragraph("Path a\\b, #hash and $dollar", TextStyle::default()),
        ],
        vec![],
        vec![Block::paragraph("Closing remarks", TextStyle::aligned(Align::Right))],
    ])
}

fn report_page() -> Page {
    Page::new(
        3,
        vec![
            Block::heading("ఆదాయ–వ్యయ సారాంశం", TextStyle::aligned(Align::Center).bold()),
            Block::table(vec![
                Row::new(vec![Cell::new("వివరాలు").bold(), Cell::new("మొత్తం").bold()]),
                Row::from_plain(["మొత్తం ఆదాయం", "రూ. 1,00,000/-"]),
            ]),
        ],
    )
}

#[test]
fn unparsable_font_file_is_a_font_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"definitely not a font").unwrap();

    let options = PdfOptions {
        strategy: PdfStrategy::Raster,
        font_path: file.path().to_path_buf(),
        ..Default::default()
    };
    let doc = Document::from_pages([report_page().blocks]);
    assert!(matches!(render_pdf(&doc, &options), Err(PdfError::Font(_))));
}

#[test]
fn raster_pages_assemble_into_pdf() {
    let style = StagingStyle::default();
    let rasterizer = Rasterizer::new(&[], style.font_family.clone());

    let doc = Document::from_pages([report_page().blocks, vec![]]);
    let mut files = Vec::new();
    for page in &doc.pages {
        let svg = StagingSurface::stage(page, &style);
        let png = rasterizer.rasterize(&svg, 1.0, page.number).unwrap();
        files.push((format!("page-{}.png", page.number), png));
    }
    let names: Vec<String> = files.iter().map(|(n, _)| n.clone()).collect();

    let pdf = Compiler::compile_with_files(&placement::raster_markup(&doc, &names), &[], files)
        .unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn staged_surface_mirrors_blocks() {
    let svg = StagingSurface::stage(&report_page(), &StagingStyle::default());
    assert!(svg.contains("ఆదాయ–వ్యయ సారాంశం"));
    assert!(svg.contains("రూ. 1,00,000/-"));
    assert_eq!(svg.matches("<rect").count(), 1 + 4);
}

#[test]
fn direct_render_is_repeatable() {
    let (file, _) = bundled_font();
    let options = options_for(&file, PdfStrategy::Direct);
    let doc = latin_document();

    let first = render_pdf(&doc, &options).unwrap();
    let second = render_pdf(&doc, &options).unwrap();
    assert!(first.starts_with(b"%PDF"));
    assert_eq!(first, second);
}

#[test]
fn direct_render_rejects_uncovered_text() {
    let (file, _) = bundled_font();
    let options = options_for(&file, PdfStrategy::Direct);
    let doc = Document::from_pages([report_page().blocks]);

    match render_pdf(&doc, &options) {
        Err(PdfError::Font(message)) => assert!(message.contains("U+0C"), "{}", message),
        other => panic!("expected a font error, got {:?}", other.map(|pdf| pdf.len())),
    }
}

#[test]
fn raster_render_is_repeatable() {
    let (file, _) = bundled_font();
    let options = PdfOptions {
        scale: 1.0,
        ..options_for(&file, PdfStrategy::Raster)
    };
    let doc = latin_document();

    let first = render_pdf(&doc, &options).unwrap();
    assert!(first.starts_with(b"%PDF"));
    assert_eq!(first, render_pdf(&doc, &options).unwrap());
}

#[test]
fn wrapped_text_stays_inside_the_margins() {
    let (_file, font) = bundled_font();
    let style = StagingStyle {
        font_family: font.family().to_string(),
        metrics: font.metrics(),
        ..Default::default()
    };
    let text = "WWWWW MMMMM ".repeat(40);
    let content_width = staging::PAGE_WIDTH_PX as f32 - 2.0 * 12.0 * staging::PX_PER_MM;

    let lines = staging::wrap_lines(&text, content_width, style.paragraph_px, &style.metrics);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(style.metrics.width(line, style.paragraph_px) <= content_width, "{}", line);
    }

    let page = Page::new(
        1,
        vec![
            Block::paragraph(text.clone(), TextStyle::default()),
            Block::paragraph(text, TextStyle::aligned(Align::Justify)),
        ],
    );
    let svg = StagingSurface::stage(&page, &style);
    let png = Rasterizer::new(&[font.data()], font.family())
        .rasterize(&svg, 1.0, 1)
        .unwrap();
    let pixmap = tiny_skia::Pixmap::decode_png(&png).unwrap();

    // Nothing is inked in the right margin
    let right_edge = (staging::PAGE_WIDTH_PX as f32 - 12.0 * staging::PX_PER_MM).ceil() as u32 + 2;
    let width = pixmap.width();
    let inked = pixmap
        .pixels()
        .iter()
        .enumerate()
        .filter(|(index, _)| (*index as u32 % width) >= right_edge)
        .filter(|(_, pixel)| pixel.red() < 128)
        .count();
    assert_eq!(inked, 0);
}
