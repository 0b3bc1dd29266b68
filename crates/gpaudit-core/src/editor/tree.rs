//! Arena-backed rich-text node tree
//!
//! The tree is the editing surface's own object graph. Block-model code
//! never holds on to nodes: it mutates the tree only through
//! [`EditorTree::update`] and inspects it only through [`EditorTree::read`].
//! Detached nodes stay in the arena until the tree is dropped.

use gpaudit_ast::Align;

/// Handle to a node in one [`EditorTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Heading level for heading nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingTag {
    H1,
    H2,
    H3,
}

impl HeadingTag {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingTag::H1 => "h1",
            HeadingTag::H2 => "h2",
            HeadingTag::H3 => "h3",
        }
    }
}

/// Text format bits of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFormat(u8);

impl TextFormat {
    pub const BOLD: TextFormat = TextFormat(1);
    pub const ITALIC: TextFormat = TextFormat(1 << 1);
    pub const UNDERLINE: TextFormat = TextFormat(1 << 2);

    pub fn contains(self, other: TextFormat) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn toggle(&mut self, other: TextFormat) {
        self.0 ^= other.0;
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading(HeadingTag),
    Table,
    TableRow,
    TableCell { header: bool },
    Text { text: String, format: TextFormat },
}

impl NodeKind {
    /// Element nodes can have children and an alignment format
    pub fn is_element(&self) -> bool {
        !matches!(self, NodeKind::Text { .. })
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    align: Option<Align>,
}

/// The editor's document tree
#[derive(Debug, Clone)]
pub struct EditorTree {
    nodes: Vec<Node>,
    root: NodeId,
    version: u64,
}

impl Default for EditorTree {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorTree {
    /// Create a tree with an empty root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                align: None,
            }],
            root: NodeId(0),
            version: 0,
        }
    }

    /// Run a mutation transaction; the version advances once per call
    pub fn update<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Transaction<'_>) -> R,
    {
        let result = f(&mut Transaction { tree: self });
        self.version += 1;
        result
    }

    /// Run a read-only view over the tree
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EditorTree) -> R,
    {
        f(self)
    }

    /// Number of completed update transactions
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.first().copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Element alignment; `None` means the default (left)
    pub fn align(&self, id: NodeId) -> Option<Align> {
        self.nodes[id.0].align
    }

    /// Concatenated text of every text run below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text { text, .. } => text.clone(),
            _ => self
                .children(id)
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    /// Text runs below `id` in document order
    pub fn text_runs(&self, id: NodeId) -> Vec<(&str, TextFormat)> {
        let mut runs = Vec::new();
        self.collect_runs(id, &mut runs);
        runs
    }

    fn collect_runs<'a>(&'a self, id: NodeId, runs: &mut Vec<(&'a str, TextFormat)>) {
        match &self.nodes[id.0].kind {
            NodeKind::Text { text, format } => runs.push((text.as_str(), *format)),
            _ => {
                for child in self.children(id) {
                    self.collect_runs(*child, runs);
                }
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            align: None,
        });
        id
    }
}

/// Mutation handle passed to [`EditorTree::update`]
pub struct Transaction<'a> {
    tree: &'a mut EditorTree,
}

impl Transaction<'_> {
    /// Read access within the transaction
    pub fn tree(&self) -> &EditorTree {
        &*self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root
    }

    pub fn create_paragraph(&mut self) -> NodeId {
        self.tree.alloc(NodeKind::Paragraph)
    }

    pub fn create_heading(&mut self, tag: HeadingTag) -> NodeId {
        self.tree.alloc(NodeKind::Heading(tag))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.tree.alloc(NodeKind::Text {
            text: text.into(),
            format: TextFormat::default(),
        })
    }

    /// Create a table whose every cell holds one empty paragraph
    pub fn create_table_with_dimensions(&mut self, rows: usize, columns: usize) -> NodeId {
        let table = self.tree.alloc(NodeKind::Table);
        for _ in 0..rows {
            let row = self.tree.alloc(NodeKind::TableRow);
            for _ in 0..columns {
                let cell = self.tree.alloc(NodeKind::TableCell { header: false });
                let paragraph = self.create_paragraph();
                self.append(cell, paragraph);
                self.append(row, cell);
            }
            self.append(table, row);
        }
        table
    }

    /// Append `child` as the last child of `parent`, detaching it first
    ///
    /// # Panics
    /// Panics if `parent` is a text node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            self.tree.kind(parent).is_element(),
            "text nodes cannot have children"
        );
        self.detach(child);
        self.tree.nodes[child.0].parent = Some(parent);
        self.tree.nodes[parent.0].children.push(child);
    }

    /// Remove every child of `id`
    pub fn clear(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.tree.nodes[id.0].children);
        for child in children {
            self.tree.nodes[child.0].parent = None;
        }
    }

    /// Detach a node from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.tree.nodes[id.0].parent.take() {
            self.tree.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Toggle a format bit on a text node; ignored for elements
    pub fn toggle_format(&mut self, id: NodeId, format: TextFormat) {
        if let NodeKind::Text { format: current, .. } = &mut self.tree.nodes[id.0].kind {
            current.toggle(format);
        }
    }

    /// Set an element's alignment; ignored for text nodes
    pub fn set_align(&mut self, id: NodeId, align: Align) {
        if self.tree.kind(id).is_element() {
            self.tree.nodes[id.0].align = Some(align);
        }
    }

    /// Replace a text node's content
    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        if let NodeKind::Text { text, .. } = &mut self.tree.nodes[id.0].kind {
            *text = value.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_advances_version() {
        let mut tree = EditorTree::new();
        assert_eq!(tree.version(), 0);
        tree.update(|tx| {
            let p = tx.create_paragraph();
            let root = tx.root();
            tx.append(root, p);
        });
        assert_eq!(tree.version(), 1);
        assert_eq!(tree.children(tree.root()).len(), 1);
    }

    #[test]
    fn test_table_dimensions() {
        let mut tree = EditorTree::new();
        let table = tree.update(|tx| tx.create_table_with_dimensions(2, 3));
        tree.read(|t| {
            assert_eq!(t.children(table).len(), 2);
            for row in t.children(table) {
                assert_eq!(t.children(*row).len(), 3);
                for cell in t.children(*row) {
                    let p = t.first_child(*cell).unwrap();
                    assert_eq!(t.kind(p), &NodeKind::Paragraph);
                }
            }
        });
    }

    #[test]
    fn test_toggle_format_twice_clears() {
        let mut tree = EditorTree::new();
        let text = tree.update(|tx| {
            let t = tx.create_text("x");
            tx.toggle_format(t, TextFormat::BOLD);
            tx.toggle_format(t, TextFormat::ITALIC);
            tx.toggle_format(t, TextFormat::BOLD);
            t
        });
        let runs = tree.text_runs(text);
        assert!(!runs[0].1.contains(TextFormat::BOLD));
        assert!(runs[0].1.contains(TextFormat::ITALIC));
    }

    #[test]
    fn test_clear_detaches_children() {
        let mut tree = EditorTree::new();
        tree.update(|tx| {
            let root = tx.root();
            let p = tx.create_paragraph();
            let t = tx.create_text("hello");
            tx.append(p, t);
            tx.append(root, p);
            tx.clear(root);
            assert!(tx.tree().parent(p).is_none());
        });
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = EditorTree::new();
        tree.update(|tx| {
            let a = tx.create_paragraph();
            let b = tx.create_paragraph();
            let t = tx.create_text("moved");
            tx.append(a, t);
            tx.append(b, t);
            assert!(tx.tree().children(a).is_empty());
            assert_eq!(tx.tree().text_content(b), "moved");
        });
    }

    #[test]
    fn test_alignment_only_on_elements() {
        let mut tree = EditorTree::new();
        let (p, t) = tree.update(|tx| {
            let p = tx.create_paragraph();
            let t = tx.create_text("x");
            tx.set_align(p, Align::Right);
            tx.set_align(t, Align::Center);
            (p, t)
        });
        assert_eq!(tree.align(p), Some(Align::Right));
        assert_eq!(tree.align(t), None);
    }
}
