//! Integration tests for gpaudit CLI
//!
//! These tests drive the command functions the binary dispatches to:
//! fields -> edit -> export, with both export sources.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use gpaudit_cli::{
    blocks_command, edit_command, edited_page_path, export_command, export_document,
    fields_command, load_fields, preview_command, ExportFormat, Settings, DOCX_FILE_NAME,
};
use gpaudit_core::{ExportSource, FieldState};
use tempfile::TempDir;
use zip::ZipArchive;

fn settings_in(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.export.output_dir = dir.join("out");
    settings.export.edited_dir = dir.join("edit");
    settings
}

fn document_xml(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn test_load_fields_from_file_and_overrides() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("fields.toml");
    fs::write(&path, "income = \"10,000\"\nexpense = \"9,000\"\n").unwrap();

    let fields = load_fields(Some(&path), &["expense=8,500".to_string()]).unwrap();
    assert_eq!(fields.income, "10,000");
    assert_eq!(fields.expense, "8,500");
    assert_eq!(fields.mandal, FieldState::default().mandal);
}

#[test]
fn test_unknown_override_is_rejected() {
    let result = load_fields(None, &["village=x".to_string()]);
    assert!(result.is_err());
}

#[test]
fn test_fields_output_reloads() {
    let fields = load_fields(None, &["gpName=పెదపూడి".to_string()]).unwrap();
    let toml = fields_command(&fields).unwrap();
    assert_eq!(FieldState::from_toml_str(&toml).unwrap(), fields);
}

#[test]
fn test_blocks_json_has_three_pages() {
    let json = blocks_command(&FieldState::default(), None).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pages"].as_array().unwrap().len(), 3);
    assert_eq!(value["pages"][0]["blocks"][0]["type"], "heading");

    let page = blocks_command(&FieldState::default(), Some(3)).unwrap();
    let blocks: serde_json::Value = serde_json::from_str(&page).unwrap();
    assert!(blocks.as_array().unwrap().iter().any(|b| b["type"] == "table"));
}

#[test]
fn test_preview_writes_html() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("nested").join("preview.html");
    let fields = FieldState::default();

    preview_command(&fields, &Settings::default(), &output).unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains(&fields.gp_name));
}

#[test]
fn test_edit_writes_pages_once() {
    let temp = TempDir::new().unwrap();
    let settings = settings_in(temp.path());
    let dir = settings.export.edited_dir.clone();
    let fields = FieldState::default();

    let written = edit_command(&fields, &settings, &dir, false).unwrap();
    assert_eq!(written.len(), 3);
    for number in 1..=3 {
        assert!(edited_page_path(&dir, number).exists());
    }

    // A second run keeps what the user edited
    fs::write(edited_page_path(&dir, 1), "<p>edited</p>").unwrap();
    let written = edit_command(&fields, &settings, &dir, false).unwrap();
    assert!(written.is_empty());
    assert_eq!(
        fs::read_to_string(edited_page_path(&dir, 1)).unwrap(),
        "<p>edited</p>"
    );

    let written = edit_command(&fields, &settings, &dir, true).unwrap();
    assert_eq!(written.len(), 3);
}

#[test]
fn test_export_docx_from_fields() {
    let temp = TempDir::new().unwrap();
    let settings = settings_in(temp.path());
    let fields = load_fields(None, &["income=12,34,567".to_string()]).unwrap();

    let path = export_command(ExportFormat::Docx, &fields, &settings).unwrap();

    assert_eq!(path, settings.export.output_dir.join(DOCX_FILE_NAME));
    let xml = document_xml(&path);
    assert!(xml.contains("12,34,567"));
    assert!(xml.contains(&fields.gp_name));
    // Three pages, two forced breaks
    assert_eq!(xml.matches("<w:br w:type=\"page\"/>").count(), 2);
}

#[test]
fn test_control_characters_in_fields_export_cleanly() {
    let temp = TempDir::new().unwrap();
    let settings = settings_in(temp.path());
    let fields = load_fields(None, &["income=1\u{1}00".to_string()]).unwrap();
    let fields = FieldState {
        secretary: "శ్రీ\u{B}ఎం.\u{C}".to_string(),
        ..fields
    };

    let path = export_command(ExportFormat::Docx, &fields, &settings).unwrap();

    let xml = document_xml(&path);
    assert!(xml.contains("రూ. 100/-"));
    assert!(xml.contains("శ్రీఎం."));
    assert!(!xml.contains(['\u{1}', '\u{B}', '\u{C}']));
}

#[test]
fn test_export_docx_from_edited_pages() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings_in(temp.path());
    let fields = FieldState::default();
    let dir = settings.export.edited_dir.clone();
    edit_command(&fields, &settings, &dir, false).unwrap();

    let page = edited_page_path(&dir, 1);
    let html = fs::read_to_string(&page).unwrap();
    assert!(html.contains(&fields.gp_name));
    fs::write(&page, html.replace(&fields.gp_name, "సవరించిన పేరు")).unwrap();

    // Field-sourced exports ignore edits
    let path = export_command(ExportFormat::Docx, &fields, &settings).unwrap();
    assert!(!document_xml(&path).contains("సవరించిన పేరు"));

    settings.export.source = ExportSource::Editor;
    let path = export_command(ExportFormat::Docx, &fields, &settings).unwrap();
    assert!(document_xml(&path).contains("సవరించిన పేరు"));
}

#[test]
fn test_edited_document_keeps_page_structure() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings_in(temp.path());
    settings.export.source = ExportSource::Editor;
    let fields = FieldState::default();
    let dir = settings.export.edited_dir.clone();
    edit_command(&fields, &settings, &dir, false).unwrap();

    let doc = export_document(&fields, &settings).unwrap();
    assert_eq!(doc.len(), 3);
    assert!(doc.title.is_some());
    assert!(doc.pages.iter().all(|p| !p.is_empty()));
}

#[test]
fn test_missing_edited_pages_fail_the_export() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings_in(temp.path());
    settings.export.source = ExportSource::Editor;

    let err = export_command(ExportFormat::Docx, &FieldState::default(), &settings).unwrap_err();
    assert_eq!(err.to_string(), "export failed");
    assert!(!settings.export.output_dir.join(DOCX_FILE_NAME).exists());
}

#[test]
fn test_missing_font_fails_without_partial_file() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings_in(temp.path());
    settings.fonts.path = temp.path().join("missing.ttf");
    fs::create_dir_all(&settings.export.output_dir).unwrap();

    let err = export_command(ExportFormat::Pdf, &FieldState::default(), &settings).unwrap_err();
    assert_eq!(err.to_string(), "export failed");
    let leftovers = fs::read_dir(&settings.export.output_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_missing_template_fails_the_export() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings_in(temp.path());
    settings.export.docx_template = Some(temp.path().join("missing.dotx"));

    assert!(export_command(ExportFormat::Docx, &FieldState::default(), &settings).is_err());
}

#[test]
fn test_config_file_is_loaded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("gpaudit.toml");
    fs::write(&path, "[export]\nsource = \"editor\"\nscale = 3.0\n").unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.export.source, ExportSource::Editor);
    assert_eq!(settings.pdf_options().scale, 3.0);
}
