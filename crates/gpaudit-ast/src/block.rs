//! Block-level elements for document structure
//!
//! A block is the smallest unit of report content: a heading, a paragraph
//! or a table. The serde representation is the tagged JSON shape
//! `{"type": "heading", "text": "...", "align": "center", "bold": true}`.

use serde::{Deserialize, Serialize};

use crate::style::{Align, CellAlign, TextStyle};

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A heading line
    Heading(TextBlock),
    /// A paragraph; embedded `\n` characters are hard line breaks
    Paragraph(TextBlock),
    /// A grid of cells
    Table(Table),
}

/// Text content plus its formatting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// A table block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RowRepr")]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CellRepr")]
pub struct Cell {
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<CellAlign>,
}

/// Accepts both the structured row object and a bare array of cells
#[derive(Deserialize)]
#[serde(untagged)]
enum RowRepr {
    Plain(Vec<Cell>),
    Structured { cells: Vec<Cell> },
}

impl From<RowRepr> for Row {
    fn from(repr: RowRepr) -> Self {
        match repr {
            RowRepr::Plain(cells) | RowRepr::Structured { cells } => Row { cells },
        }
    }
}

/// Accepts both the structured cell object and a plain string
#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Plain(String),
    Structured {
        text: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        align: Option<CellAlign>,
    },
}

impl From<CellRepr> for Cell {
    fn from(repr: CellRepr) -> Self {
        match repr {
            CellRepr::Plain(text) => Cell::new(text),
            CellRepr::Structured { text, bold, align } => Cell { text, bold, align },
        }
    }
}

impl Block {
    /// Create a heading with the given style
    pub fn heading(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Heading(TextBlock {
            text: text.into(),
            style,
        })
    }

    /// Create a paragraph with the given style
    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Paragraph(TextBlock {
            text: text.into(),
            style,
        })
    }

    /// Create a table from rows
    pub fn table(rows: Vec<Row>) -> Self {
        Block::Table(Table {
            rows,
            style: TextStyle::default(),
        })
    }

    /// Text content for heading/paragraph blocks, `None` for tables
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading(b) | Block::Paragraph(b) => Some(&b.text),
            Block::Table(_) => None,
        }
    }

    pub fn style(&self) -> &TextStyle {
        match self {
            Block::Heading(b) | Block::Paragraph(b) => &b.style,
            Block::Table(t) => &t.style,
        }
    }

    pub fn align(&self) -> Align {
        self.style().align
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }

    /// Kind name as used in the serialized shape
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::Paragraph(_) => "paragraph",
            Block::Table(_) => "table",
        }
    }
}

impl Table {
    /// Column count as seen by the editor bridge: the first row's width
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Width of the widest row
    pub fn grid_width(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// True when every row has the same number of cells
    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().all(|r| r.cells.len() == width)
    }
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Build a row from plain strings (compatibility with the string-array shape)
    pub fn from_plain<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(Cell::new).collect(),
        }
    }

    /// Same as [`Row::from_plain`] with every cell bold
    pub fn header<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(|t| Cell::new(t).bold()).collect(),
        }
    }
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            align: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn aligned(mut self, align: CellAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn align_or_default(&self) -> CellAlign {
        self.align.unwrap_or_default()
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}
