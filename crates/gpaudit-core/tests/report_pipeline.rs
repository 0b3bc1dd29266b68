//! Report pipeline tests: fields -> blocks -> preview / editor -> blocks

use gpaudit_ast::{Block, Document};
use gpaudit_core::{
    build_document, extract_html, BlockCache, EditSession, EditorConfig, Field, FieldState,
    PreviewRenderer, Typography, EMPTY_PAGE_MESSAGE,
};

fn all_text(doc: &Document) -> String {
    let mut out = String::new();
    for block in doc.blocks() {
        match block {
            Block::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        out.push_str(&cell.text);
                        out.push('\n');
                    }
                }
            }
            other => {
                out.push_str(other.text().unwrap_or_default());
                out.push('\n');
            }
        }
    }
    out
}

#[test]
fn test_every_field_reaches_the_document() {
    let mut fields = FieldState::default();
    for (index, field) in Field::ALL.into_iter().enumerate() {
        fields.set(field, format!("value-{}", index));
    }
    let text = all_text(&build_document(&fields));
    for index in 0..Field::ALL.len() {
        assert!(text.contains(&format!("value-{}", index)), "field {} missing", index);
    }
}

#[test]
fn test_empty_field_values_still_build() {
    let mut fields = FieldState::default();
    for field in Field::ALL {
        fields.set(field, "");
    }
    let doc = build_document(&fields);
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.page_breaks(), 2);
}

#[test]
fn test_preview_follows_field_changes() {
    let renderer = PreviewRenderer::new(Typography::default());
    let fields = FieldState::default().with(Field::Income, "99,99,999");
    let html = renderer.render_document(&build_document(&fields));
    assert!(html.contains("99,99,999"));
    assert_eq!(html.matches("Page ").count(), 3);
    assert!(!html.contains(EMPTY_PAGE_MESSAGE));
}

#[test]
fn test_cache_matches_fresh_build() {
    let mut cache = BlockCache::new();
    let mut fields = FieldState::default();
    assert_eq!(cache.document(&fields), build_document(&fields));

    fields.set(Field::FinalDate, "01-04-2025");
    assert_eq!(cache.document(&fields), build_document(&fields));
}

#[test]
fn test_edited_pages_export_what_was_edited() {
    let doc = build_document(&FieldState::default());
    for page in &doc.pages {
        let mut session = EditSession::new(EditorConfig::default());
        assert!(session.populate(&page.blocks));
        assert!(!session.populate(&[]));

        let extracted = extract_html(&session.to_html()).unwrap();
        assert_eq!(extracted, session.to_blocks());
        assert_eq!(extracted.len(), page.blocks.len());
    }
}

#[test]
fn test_heading_nodes_round_trip_as_headings() {
    let doc = build_document(&FieldState::default());
    let mut session = EditSession::new(EditorConfig {
        heading_nodes: true,
    });
    session.populate(&doc.pages[0].blocks);

    let extracted = extract_html(&session.to_html()).unwrap();
    assert!(extracted[0].is_heading());
}
