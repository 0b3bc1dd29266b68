//! HTML serialization of the editor tree and extraction of blocks from HTML
//!
//! Extraction accepts loosely formed fragments: end tags are not checked
//! against their start tags, void elements need no closing tag and HTML
//! style attributes (unquoted or valueless) are tolerated.

use std::fmt::Write as _;

use gpaudit_ast::{Align, Block, Cell, CellAlign, Color, Row, TextBlock, TextStyle};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use super::tree::{EditorTree, NodeId, NodeKind, TextFormat};
use crate::error::Result;
use crate::preview::escape_html;

impl EditorTree {
    /// Current content as an HTML fragment
    pub fn to_html(&self) -> String {
        render_html(self)
    }
}

/// Serialize the tree's current content as an HTML fragment
pub fn render_html(tree: &EditorTree) -> String {
    tree.read(|t| {
        let mut out = String::new();
        for node in t.children(t.root()) {
            write_node(t, *node, &mut out);
        }
        out
    })
}

fn write_node(tree: &EditorTree, node: NodeId, out: &mut String) {
    match tree.kind(node) {
        NodeKind::Root => {
            for child in tree.children(node) {
                write_node(tree, *child, out);
            }
        }
        NodeKind::Paragraph => write_element(tree, node, "p", out),
        NodeKind::Heading(tag) => write_element(tree, node, tag.as_str(), out),
        NodeKind::Table => {
            out.push_str("<table><tbody>");
            for row in tree.children(node) {
                write_node(tree, *row, out);
            }
            out.push_str("</tbody></table>");
        }
        NodeKind::TableRow => {
            out.push_str("<tr>");
            for cell in tree.children(node) {
                write_node(tree, *cell, out);
            }
            out.push_str("</tr>");
        }
        NodeKind::TableCell { header } => {
            let tag = if *header { "th" } else { "td" };
            let _ = write!(out, "<{tag}>");
            for child in tree.children(node) {
                write_node(tree, *child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
        NodeKind::Text { text, format } => write_run(text, *format, out),
    }
}

fn write_element(tree: &EditorTree, node: NodeId, tag: &str, out: &mut String) {
    match tree.align(node) {
        Some(align) if !align.is_left() => {
            let _ = write!(out, "<{tag} style=\"text-align: {};\">", align.as_str());
        }
        _ => {
            let _ = write!(out, "<{tag}>");
        }
    }
    if tree.text_content(node).is_empty() {
        out.push_str("<br>");
    } else {
        for child in tree.children(node) {
            write_node(tree, *child, out);
        }
    }
    let _ = write!(out, "</{tag}>");
}

fn write_run(text: &str, format: TextFormat, out: &mut String) {
    let mut open = Vec::new();
    for (bit, tag) in [
        (TextFormat::BOLD, "strong"),
        (TextFormat::ITALIC, "em"),
        (TextFormat::UNDERLINE, "u"),
    ] {
        if format.contains(bit) {
            let _ = write!(out, "<{tag}>");
            open.push(tag);
        }
    }
    out.push_str(&escape_html(text).replace('\n', "<br>"));
    for tag in open.iter().rev() {
        let _ = write!(out, "</{tag}>");
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "col", "wbr"];

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "table", "ul", "ol", "div", "section", "article",
    "blockquote",
];

#[derive(Debug)]
enum Dom {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<Dom>,
    },
    Text(String),
}

impl Dom {
    fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Dom::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Dom::Text(_) => None,
        }
    }

    fn is_block(&self) -> bool {
        matches!(self, Dom::Element { name, .. } if BLOCK_ELEMENTS.contains(&name.as_str()))
    }
}

/// Convert an HTML fragment into blocks
///
/// `p` and `h1`..`h6` map to paragraphs and headings, `table` to a table,
/// list items to bullet paragraphs. Other containers are walked through.
pub fn extract_html(fragment: &str) -> Result<Vec<Block>> {
    let dom = parse_dom(fragment)?;
    let mut blocks = Vec::new();
    collect_blocks(&dom, &mut blocks);
    Ok(blocks)
}

fn parse_dom(fragment: &str) -> Result<Vec<Dom>> {
    let mut reader = Reader::from_str(fragment);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    // (name, attrs, children) of open elements; index 0 is the document
    let mut stack: Vec<(String, Vec<(String, String)>, Vec<Dom>)> =
        vec![(String::new(), Vec::new(), Vec::new())];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(e.name().as_ref());
                let attrs = read_attrs(&e);
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    push_child(&mut stack, Dom::Element { name, attrs, children: Vec::new() });
                } else {
                    stack.push((name, attrs, Vec::new()));
                }
            }
            Event::Empty(e) => {
                let name = tag_name(e.name().as_ref());
                let attrs = read_attrs(&e);
                push_child(&mut stack, Dom::Element { name, attrs, children: Vec::new() });
            }
            Event::End(e) => {
                let name = tag_name(e.name().as_ref());
                // Close up to the nearest matching open element; stray ends are dropped
                if let Some(pos) = stack.iter().rposition(|(n, _, _)| *n == name) {
                    if pos > 0 {
                        while stack.len() > pos {
                            close_top(&mut stack);
                        }
                    }
                } else {
                    trace!(tag = %name, "ignoring unmatched end tag");
                }
            }
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(&e).into_owned();
                let text = e
                    .unescape_with(resolve_entity)
                    .map(|t| t.into_owned())
                    .unwrap_or(raw);
                push_child(&mut stack, Dom::Text(text));
            }
            Event::CData(e) => {
                push_child(&mut stack, Dom::Text(String::from_utf8_lossy(&e).into_owned()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    Ok(stack.pop().map(|(_, _, children)| children).unwrap_or_default())
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or(match entity {
        "nbsp" => Some("\u{a0}"),
        _ => None,
    })
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn read_attrs(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.html_attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            let key = tag_name(a.key.as_ref());
            let value = a
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned());
            (key, value)
        })
        .collect()
}

fn push_child(stack: &mut [(String, Vec<(String, String)>, Vec<Dom>)], node: Dom) {
    if let Some((_, _, children)) = stack.last_mut() {
        children.push(node);
    }
}

fn close_top(stack: &mut Vec<(String, Vec<(String, String)>, Vec<Dom>)>) {
    if let Some((name, attrs, children)) = stack.pop() {
        push_child(stack, Dom::Element { name, attrs, children });
    }
}

fn collect_blocks(nodes: &[Dom], blocks: &mut Vec<Block>) {
    for node in nodes {
        let Dom::Element { name, children, .. } = node else {
            continue;
        };
        match name.as_str() {
            "p" => blocks.push(Block::Paragraph(text_block(node))),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                blocks.push(Block::Heading(text_block(node)))
            }
            "table" => blocks.push(table_block(node)),
            "ul" | "ol" => {
                for item in children {
                    if matches!(item, Dom::Element { name, .. } if name == "li") {
                        let mut block = text_block(item);
                        block.text = format!("• {}", block.text);
                        blocks.push(Block::Paragraph(block));
                    }
                }
            }
            "div" | "section" | "article" | "blockquote" => {
                if children.iter().any(Dom::is_block) {
                    collect_blocks(children, blocks);
                } else {
                    let block = text_block(node);
                    if !block.text.is_empty() {
                        blocks.push(Block::Paragraph(block));
                    }
                }
            }
            "br" | "hr" | "img" | "style" | "script" | "head" | "title" => {}
            _ => collect_blocks(children, blocks),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct InlineState {
    bold: bool,
    italic: bool,
}

#[derive(Debug)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
}

fn collect_runs(nodes: &[Dom], state: InlineState, runs: &mut Vec<Run>) {
    for node in nodes {
        match node {
            Dom::Text(text) => runs.push(Run {
                text: collapse_whitespace(text),
                bold: state.bold,
                italic: state.italic,
            }),
            Dom::Element { name, children, .. } => {
                if name == "br" {
                    runs.push(Run {
                        text: "\n".to_string(),
                        bold: state.bold,
                        italic: state.italic,
                    });
                    continue;
                }
                let css = InlineCss::of(node);
                let inner = InlineState {
                    bold: state.bold
                        || matches!(name.as_str(), "strong" | "b" | "th")
                        || css.bold == Some(true),
                    italic: state.italic
                        || matches!(name.as_str(), "em" | "i")
                        || css.italic == Some(true),
                };
                // Nested blocks (paragraphs inside a cell) start on a new line
                let block = node.is_block();
                if block && runs.iter().any(|r| !r.text.trim().is_empty()) {
                    runs.push(Run {
                        text: "\n".to_string(),
                        bold: inner.bold,
                        italic: inner.italic,
                    });
                }
                collect_runs(children, inner, runs);
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Join runs, trim each line and fold non-breaking spaces
fn runs_text(runs: &[Run]) -> String {
    let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
    joined
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .replace('\u{a0}', " ")
}

fn every_run(runs: &[Run], flag: impl Fn(&Run) -> bool) -> bool {
    let mut visible = runs.iter().filter(|r| !r.text.trim().is_empty()).peekable();
    visible.peek().is_some() && visible.all(flag)
}

fn text_block(node: &Dom) -> TextBlock {
    let Dom::Element { children, .. } = node else {
        return TextBlock::default();
    };
    let css = InlineCss::of(node);
    let base = InlineState {
        bold: css.bold == Some(true),
        italic: css.italic == Some(true),
    };
    let mut runs = Vec::new();
    collect_runs(children, base, &mut runs);

    TextBlock {
        text: runs_text(&runs),
        style: TextStyle {
            align: css.align.unwrap_or_default(),
            bold: every_run(&runs, |r| r.bold),
            italic: every_run(&runs, |r| r.italic),
            color: css.color.map(Color::new),
            font_size: css.font_size,
        },
    }
}

fn table_block(table: &Dom) -> Block {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    Block::table(rows)
}

fn collect_rows(node: &Dom, rows: &mut Vec<Row>) {
    let Dom::Element { children, .. } = node else {
        return;
    };
    for child in children {
        match child {
            Dom::Element { name, children: cells, .. } if name == "tr" => {
                rows.push(Row::new(
                    cells
                        .iter()
                        .filter(|c| matches!(c, Dom::Element { name, .. } if name == "td" || name == "th"))
                        .map(table_cell)
                        .collect(),
                ));
            }
            Dom::Element { name, .. } if name == "thead" || name == "tbody" || name == "tfoot" => {
                collect_rows(child, rows);
            }
            _ => {}
        }
    }
}

fn table_cell(node: &Dom) -> Cell {
    let Dom::Element { name, children, .. } = node else {
        return Cell::default();
    };
    let css = InlineCss::of(node);
    let base = InlineState {
        bold: name == "th" || css.bold == Some(true),
        italic: false,
    };
    let mut runs = Vec::new();
    collect_runs(children, base, &mut runs);

    // Alignment lives on the cell or on its first paragraph
    let align = css.align.or_else(|| {
        children
            .iter()
            .find(|c| matches!(c, Dom::Element { .. }))
            .and_then(|c| InlineCss::of(c).align)
    });

    Cell {
        text: runs_text(&runs),
        bold: every_run(&runs, |r| r.bold),
        align: align.map(CellAlign::from),
    }
}

/// The subset of inline CSS and presentational attributes that maps to block styles
#[derive(Debug, Default)]
struct InlineCss {
    align: Option<Align>,
    bold: Option<bool>,
    italic: Option<bool>,
    color: Option<String>,
    font_size: Option<f32>,
}

impl InlineCss {
    fn of(node: &Dom) -> Self {
        let mut css = InlineCss {
            align: node.attr("align").and_then(Align::parse),
            ..Default::default()
        };
        let Some(style) = node.attr("style") else {
            return css;
        };
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match property.trim().to_ascii_lowercase().as_str() {
                "text-align" => css.align = Align::parse(value).or(css.align),
                "font-weight" => {
                    css.bold = Some(
                        value.eq_ignore_ascii_case("bold")
                            || value.eq_ignore_ascii_case("bolder")
                            || value.parse::<u32>().is_ok_and(|w| w >= 600),
                    )
                }
                "font-style" => css.italic = Some(value.eq_ignore_ascii_case("italic")),
                "color" => css.color = Some(value.to_string()),
                "font-size" => {
                    css.font_size = value
                        .strip_suffix("px")
                        .and_then(|px| px.trim().parse::<f32>().ok())
                }
                _ => {}
            }
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditSession, EditorConfig};
    use crate::fields::FieldState;
    use crate::templates::{page_one, page_three, page_two};

    #[test]
    fn test_extract_paragraph_styles() {
        let blocks = extract_html(
            r#"<p style="text-align: center"><strong>శీర్షిక</strong></p><p><em>a</em><br><em>b</em></p>"#,
        )
        .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), Some("శీర్షిక"));
        assert_eq!(blocks[0].align(), Align::Center);
        assert!(blocks[0].style().bold);
        assert_eq!(blocks[1].text(), Some("a\nb"));
        assert!(blocks[1].style().italic);
        assert!(!blocks[1].style().bold);
    }

    #[test]
    fn test_mixed_runs_are_not_bold() {
        let blocks = extract_html("<p><b>label</b> : value</p>").unwrap();
        assert_eq!(blocks[0].text(), Some("label : value"));
        assert!(!blocks[0].style().bold);
    }

    #[test]
    fn test_lenient_markup() {
        let html = "<div><p align=center>one<br>two</div><p>three&nbsp;four &amp; more</b>";
        let blocks = extract_html(html).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), Some("one\ntwo"));
        assert_eq!(blocks[0].align(), Align::Center);
        assert_eq!(blocks[1].text(), Some("three four & more"));
    }

    #[test]
    fn test_headings_lists_and_inline_css() {
        let html = r#"<h1>Title</h1><ul><li>x</li><li>y</li></ul>
            <p style="font-weight: 700; font-style: italic; color: #1E40AF; font-size: 16px">s</p>"#;
        let blocks = extract_html(html).unwrap();
        assert!(blocks[0].is_heading());
        assert_eq!(blocks[1].text(), Some("• x"));
        assert_eq!(blocks[2].text(), Some("• y"));
        let style = blocks[3].style();
        assert!(style.bold && style.italic);
        assert_eq!(style.color.as_ref().map(|c| c.as_str()), Some("#1E40AF"));
        assert_eq!(style.font_size, Some(16.0));
    }

    #[test]
    fn test_extract_table() {
        let html = "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
                    <tbody><tr><td style=\"text-align:right\">1</td><td><p>x</p><p>y</p></td></tr></tbody></table>";
        let blocks = extract_html(html).unwrap();
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].cells[0].bold);
        assert_eq!(table.rows[1].cells[0].align, Some(CellAlign::Right));
        assert_eq!(table.rows[1].cells[1].text, "x\ny");
    }

    #[test]
    fn test_render_marks_runs_and_alignment() {
        let mut session = EditSession::new(EditorConfig::default());
        session.populate(&[Block::paragraph(
            "a < b\nc",
            TextStyle::aligned(Align::Right).bold(),
        )]);
        assert_eq!(
            session.to_html(),
            r#"<p style="text-align: right;"><strong>a &lt; b<br>c</strong></p>"#
        );
    }

    #[test]
    fn test_empty_paragraph_renders_break() {
        let mut session = EditSession::new(EditorConfig::default());
        session.populate(&[Block::paragraph("", TextStyle::default())]);
        assert_eq!(session.to_html(), "<p><br></p>");
        let blocks = extract_html(&session.to_html()).unwrap();
        assert_eq!(blocks[0].text(), Some(""));
    }

    #[test]
    fn test_report_pages_roundtrip_through_html() {
        let fields = FieldState::default();
        for page in [page_one(&fields), page_two(&fields), page_three(&fields)] {
            let mut session = EditSession::new(EditorConfig::default());
            session.populate(&page);
            let expected = session.tree().to_blocks();
            let extracted = extract_html(&session.tree().to_html()).unwrap();
            assert_eq!(expected, extracted);
        }
    }
}
