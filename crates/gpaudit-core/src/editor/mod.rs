//! Rich-text editing surface
//!
//! Each logical page can be opened in an [`EditSession`] backed by an
//! [`EditorTree`]. Blocks flow into the tree once per session; edits flow
//! back out as blocks or as an HTML fragment.

mod bridge;
mod html;
mod tree;

pub use bridge::{populate, to_blocks, EditSession, EditorConfig, ExportSource};
pub use html::{extract_html, render_html};
pub use tree::{EditorTree, HeadingTag, NodeId, NodeKind, TextFormat, Transaction};
