//! Document tree - the root structural container
//!
//! The tree is owned exclusively by its editing session. Transforms operate
//! on clones obtained with `Clone`; deep-cloning preserves node IDs, so the
//! same logical paragraph can be found in two independently transformed
//! clones either by its bookmark anchor or, as a fallback, by ID.

use crate::{CommentStore, InlineNode, NodeId, Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A block-level node in the document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }
}

/// The complete document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    id: NodeId,
    /// Ordered body content
    pub blocks: Vec<Block>,
    /// Comment side store; absent until bootstrapped by the first comment
    #[serde(default)]
    pub comments: Option<CommentStore>,
}

impl DocumentTree {
    /// Create a new empty document tree
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            blocks: Vec::new(),
            comments: None,
        }
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        let mut tree = Self::new();
        tree.blocks.push(Block::Paragraph(Paragraph::new()));
        tree
    }

    /// Get the document root ID
    pub fn root_id(&self) -> NodeId {
        self.id
    }

    /// Append a paragraph to the body
    pub fn push_paragraph(&mut self, para: Paragraph) {
        self.blocks.push(Block::Paragraph(para));
    }

    /// Append a table to the body
    pub fn push_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Every paragraph in document order, including paragraphs nested in
    /// table cells
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a Paragraph>) {
            for block in blocks {
                match block {
                    Block::Paragraph(p) => out.push(p),
                    Block::Table(t) => {
                        for row in &t.rows {
                            for cell in &row.cells {
                                collect(&cell.blocks, out);
                            }
                        }
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.blocks, &mut out);
        out
    }

    /// Find a paragraph by ID
    pub fn paragraph_by_id(&self, id: NodeId) -> Option<&Paragraph> {
        self.paragraphs().into_iter().find(|p| p.id() == id)
    }

    /// Find the paragraph owning the bookmark anchor with the given name
    pub fn paragraph_by_anchor(&self, name: &str) -> Option<&Paragraph> {
        self.paragraphs()
            .into_iter()
            .find(|p| paragraph_has_anchor(p, name))
    }

    /// Find the paragraph owning the given anchor, mutably
    pub fn paragraph_by_anchor_mut(&mut self, name: &str) -> Option<&mut Paragraph> {
        fn visit<'a>(blocks: &'a mut [Block], name: &str) -> Option<&'a mut Paragraph> {
            for block in blocks {
                match block {
                    Block::Paragraph(p) => {
                        if paragraph_has_anchor(p, name) {
                            return Some(p);
                        }
                    }
                    Block::Table(t) => {
                        for row in &mut t.rows {
                            for cell in &mut row.cells {
                                if let Some(p) = visit(&mut cell.blocks, name) {
                                    return Some(p);
                                }
                            }
                        }
                    }
                }
            }
            None
        }
        visit(&mut self.blocks, name)
    }

    /// The full visible text of the document, one line per paragraph
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        for para in self.paragraphs() {
            result.push_str(&para.visible_text());
            result.push('\n');
        }
        result
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::with_empty_paragraph()
    }
}

/// Check whether a paragraph carries a bookmark-start marker with `name`
/// anywhere in its inline tree
pub fn paragraph_has_anchor(para: &Paragraph, name: &str) -> bool {
    fn scan(nodes: &[InlineNode], name: &str) -> bool {
        nodes.iter().any(|node| match node {
            InlineNode::BookmarkStart { name: n, .. } => n == name,
            _ => node.children().map(|c| scan(c, name)).unwrap_or(false),
        })
    }
    scan(&para.children, name)
}

// =============================================================================
// Tests
// =============================================================================
