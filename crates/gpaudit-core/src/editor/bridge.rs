//! Conversion between the block model and the editor tree
//!
//! Populate direction: clear the tree and append one native node per block.
//! Serialize direction: read the tree back into blocks. Both run inside the
//! tree's own transaction boundary.

use gpaudit_ast::{Align, Block, Cell, CellAlign, Row, Table, TextBlock, TextStyle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tree::{EditorTree, HeadingTag, NodeId, NodeKind, TextFormat, Transaction};

/// Editor node-set configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Register heading nodes; when off, headings become bold paragraph runs
    pub heading_nodes: bool,
}

/// Where exports take their blocks from while an edit session exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportSource {
    /// Re-derive blocks from field state, discarding in-editor edits
    #[default]
    Fields,
    /// Export the edited content extracted from the editor
    Editor,
}

/// Clear the tree and append one node per block
pub fn populate(tx: &mut Transaction<'_>, blocks: &[Block], config: &EditorConfig) {
    let root = tx.root();
    tx.clear(root);

    for block in blocks {
        let node = match block {
            Block::Table(table) => populate_table(tx, table),
            Block::Heading(b) => {
                let element = if config.heading_nodes {
                    tx.create_heading(HeadingTag::H2)
                } else {
                    tx.create_paragraph()
                };
                // Headings always carry a bold run
                append_run(tx, element, &b.text, true, b.style.italic);
                apply_align(tx, element, b.style.align);
                element
            }
            Block::Paragraph(b) => {
                let element = tx.create_paragraph();
                append_run(tx, element, &b.text, b.style.bold, b.style.italic);
                apply_align(tx, element, b.style.align);
                element
            }
        };
        tx.append(root, node);
    }
}

fn append_run(tx: &mut Transaction<'_>, element: NodeId, text: &str, bold: bool, italic: bool) {
    let run = tx.create_text(text);
    if bold {
        tx.toggle_format(run, TextFormat::BOLD);
    }
    if italic {
        tx.toggle_format(run, TextFormat::ITALIC);
    }
    tx.append(element, run);
}

fn apply_align(tx: &mut Transaction<'_>, element: NodeId, align: Align) {
    if align != Align::Left {
        tx.set_align(element, align);
    }
}

/// Dimensions come from the row count and the first row's width; shorter
/// rows leave trailing cells empty and extra cells are dropped
fn populate_table(tx: &mut Transaction<'_>, table: &Table) -> NodeId {
    let rows = table.rows.len();
    let columns = table.column_count().max(1);
    let node = tx.create_table_with_dimensions(rows, columns);

    let row_nodes = tx.tree().children(node).to_vec();
    for (row, row_node) in table.rows.iter().zip(row_nodes) {
        let cell_nodes = tx.tree().children(row_node).to_vec();
        if row.cells.len() > cell_nodes.len() {
            debug!(
                dropped = row.cells.len() - cell_nodes.len(),
                "table row wider than first row"
            );
        }
        for (cell, cell_node) in row.cells.iter().zip(cell_nodes) {
            let Some(paragraph) = tx.tree().first_child(cell_node) else {
                continue;
            };
            if *tx.tree().kind(paragraph) != NodeKind::Paragraph {
                continue;
            }
            tx.clear(paragraph);
            append_run(tx, paragraph, &cell.text, cell.bold, false);
            if let Some(align) = cell.align {
                tx.set_align(paragraph, align.into());
            }
        }
    }
    node
}

impl EditorTree {
    /// Current content as blocks
    pub fn to_blocks(&self) -> Vec<Block> {
        to_blocks(self)
    }
}

/// Read the tree back into blocks
pub fn to_blocks(tree: &EditorTree) -> Vec<Block> {
    tree.read(|t| {
        t.children(t.root())
            .iter()
            .filter_map(|node| node_to_block(t, *node))
            .collect()
    })
}

fn node_to_block(tree: &EditorTree, node: NodeId) -> Option<Block> {
    match tree.kind(node) {
        NodeKind::Paragraph => Some(Block::Paragraph(text_block(tree, node))),
        NodeKind::Heading(_) => Some(Block::Heading(text_block(tree, node))),
        NodeKind::Table => Some(Block::Table(Table {
            rows: tree
                .children(node)
                .iter()
                .map(|row| Row::new(tree.children(*row).iter().map(|c| cell(tree, *c)).collect()))
                .collect(),
            style: TextStyle::default(),
        })),
        _ => None,
    }
}

fn text_block(tree: &EditorTree, node: NodeId) -> TextBlock {
    let runs = tree.text_runs(node);
    TextBlock {
        text: tree.text_content(node),
        style: TextStyle {
            align: tree.align(node).unwrap_or_default(),
            bold: all_runs(&runs, TextFormat::BOLD),
            italic: all_runs(&runs, TextFormat::ITALIC),
            color: None,
            font_size: None,
        },
    }
}

fn cell(tree: &EditorTree, node: NodeId) -> Cell {
    let paragraphs = tree.children(node);
    let text = paragraphs
        .iter()
        .map(|p| tree.text_content(*p))
        .collect::<Vec<_>>()
        .join("\n");
    let runs = tree.text_runs(node);
    let align = paragraphs
        .first()
        .and_then(|p| tree.align(*p))
        .map(CellAlign::from);
    Cell {
        text,
        bold: all_runs(&runs, TextFormat::BOLD),
        align,
    }
}

/// True when there is at least one non-blank run and every such run has `format`
fn all_runs(runs: &[(&str, TextFormat)], format: TextFormat) -> bool {
    let mut visible = runs.iter().filter(|(text, _)| !text.trim().is_empty()).peekable();
    visible.peek().is_some() && visible.all(|(_, f)| f.contains(format))
}

/// One editing session over one logical page
///
/// Population runs at most once per session: repeated calls (as happen when
/// the surrounding view re-renders) are no-ops until [`EditSession::reset`]
/// tears the session down.
#[derive(Debug, Default)]
pub struct EditSession {
    tree: EditorTree,
    config: EditorConfig,
    populated: bool,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            tree: EditorTree::new(),
            config,
            populated: false,
        }
    }

    /// Populate the tree from blocks; returns `false` if already populated
    pub fn populate(&mut self, blocks: &[Block]) -> bool {
        if self.populated {
            debug!("edit session already populated, skipping");
            return false;
        }
        self.populated = true;
        let config = self.config.clone();
        self.tree.update(|tx| populate(tx, blocks, &config));
        true
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn tree(&self) -> &EditorTree {
        &self.tree
    }

    /// Apply an edit to the tree
    pub fn edit<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Transaction<'_>) -> R,
    {
        self.tree.update(f)
    }

    /// Current content as blocks
    pub fn to_blocks(&self) -> Vec<Block> {
        self.tree.to_blocks()
    }

    /// Current content as an HTML fragment
    pub fn to_html(&self) -> String {
        self.tree.to_html()
    }

    /// Tear down the session and re-arm the populate latch
    pub fn reset(&mut self) {
        self.tree = EditorTree::new();
        self.populated = false;
    }
}
