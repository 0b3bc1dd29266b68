//! Document root and logical pages
//!
//! A document is a pure projection of the current field values: it has no
//! identity of its own and is rebuilt for every render or export.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// One fixed-template group of blocks representing a printed page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Page content in top-to-bottom order
    pub blocks: Vec<Block>,
}

/// A complete report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document title (written to package metadata)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Logical pages in order
    pub pages: Vec<Page>,
}

impl Page {
    pub fn new(number: usize, blocks: Vec<Block>) -> Self {
        Self { number, blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            pages: Vec::new(),
        }
    }

    /// Build a document from block sequences, numbering pages from 1
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = Vec<Block>>,
    {
        Self {
            title: None,
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, blocks)| Page::new(i + 1, blocks))
                .collect(),
        }
    }

    /// Append a page; it is numbered after the current last page
    pub fn push_page(&mut self, blocks: Vec<Block>) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number, blocks));
    }

    /// Number of forced page breaks between logical pages
    pub fn page_breaks(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Iterate every block across all pages
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }
}
