//! gpaudit-ast - Block model definitions
//!
//! This crate provides the canonical in-memory representation of an audit
//! report: an ordered sequence of logical pages, each an ordered sequence of
//! typed blocks (heading, paragraph, table). Every renderer in the workspace
//! (HTML preview, PDF, DOCX, rich-text editor) consumes these types.

pub mod block;
pub mod document;
pub mod style;

pub use block::{Block, Cell, Row, Table, TextBlock};
pub use document::{Document, Page};
pub use style::{Align, CellAlign, Color, TextStyle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
