//! Paragraph node - a block of inline content
//!
//! Paragraphs own the low-level child-list primitives (insert/remove).
//! These are infallible given well-formed input: misuse is a programmer
//! error that asserts in debug builds and degrades to a safe no-op in
//! release builds.

use crate::{InlineNode, MarkRevisionKind, NodeId, ParagraphProperties, Run};
use serde::{Deserialize, Serialize};

/// A paragraph containing runs, containers, revision wrappers, and markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    id: NodeId,
    /// Paragraph formatting (and paragraph-mark revision state)
    pub props: ParagraphProperties,
    /// Ordered inline children
    pub children: Vec<InlineNode>,
}

impl Paragraph {
    /// Create a new empty paragraph
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            props: ParagraphProperties::default(),
            children: Vec::new(),
        }
    }

    /// Create a paragraph with a single plain-text run
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut para = Self::new();
        para.children.push(InlineNode::Run(Run::new(text)));
        para
    }

    /// Create a paragraph from prepared inline children
    pub fn with_children(children: Vec<InlineNode>) -> Self {
        let mut para = Self::new();
        para.children = children;
        para
    }

    /// Get the unique ID of this paragraph
    pub fn id(&self) -> NodeId {
        self.id
    }

    // =========================================================================
    // Child-list primitives
    // =========================================================================

    /// Insert a node before the child at `index`. No type validation is
    /// performed; position finding is the caller's responsibility.
    pub fn insert_before(&mut self, index: usize, node: InlineNode) {
        debug_assert!(index <= self.children.len(), "insert_before out of range");
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    /// Insert a node after the child at `index`
    pub fn insert_after(&mut self, index: usize, node: InlineNode) {
        debug_assert!(index < self.children.len(), "insert_after out of range");
        let index = (index + 1).min(self.children.len());
        self.children.insert(index, node);
    }

    /// Append a node at the end of the child list
    pub fn push(&mut self, node: InlineNode) {
        self.children.push(node);
    }

    /// Detach the child at `index`. Returns `None` (a no-op, not an error)
    /// if there is no such child.
    pub fn remove_child(&mut self, index: usize) -> Option<InlineNode> {
        debug_assert!(index < self.children.len(), "remove_child out of range");
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    // =========================================================================
    // Revision markup queries
    // =========================================================================

    /// Whether this paragraph directly carries any revision markup: a
    /// wrapper anywhere in its inline tree, a tracked property change on the
    /// paragraph or one of its runs, or a paragraph-mark revision.
    pub fn has_revision_markup(&self) -> bool {
        if self.props.change.is_some() || self.props.mark_revision.is_some() {
            return true;
        }
        fn scan(nodes: &[InlineNode]) -> bool {
            nodes.iter().any(|node| {
                if node.is_revision_wrapper() {
                    return true;
                }
                if let InlineNode::Run(run) = node {
                    if run.props.change.is_some() {
                        return true;
                    }
                }
                node.children().map(scan).unwrap_or(false)
            })
        }
        scan(&self.children)
    }

    /// Whether the paragraph's content exists only via insertion wrappers,
    /// i.e. the paragraph has no before-state text.
    pub fn is_insertion_only(&self) -> bool {
        if matches!(
            self.props.mark_revision.as_ref().map(|m| m.kind),
            Some(MarkRevisionKind::Inserted)
        ) && !self.has_run_outside(WrapperFilter::Insertion)
        {
            return true;
        }
        self.run_count() > 0 && !self.has_run_outside(WrapperFilter::Insertion)
    }

    /// Whether the paragraph's content exists only via deletion wrappers,
    /// i.e. the paragraph has no after-state text.
    pub fn is_deletion_only(&self) -> bool {
        if matches!(
            self.props.mark_revision.as_ref().map(|m| m.kind),
            Some(MarkRevisionKind::Deleted)
        ) && !self.has_run_outside(WrapperFilter::Deletion)
        {
            return true;
        }
        self.run_count() > 0 && !self.has_run_outside(WrapperFilter::Deletion)
    }

    /// Visible text of this paragraph (atom-stream linearization, text only)
    pub fn visible_text(&self) -> String {
        crate::atoms::visible_text(self)
    }

    /// Total number of runs anywhere in the inline tree
    pub fn run_count(&self) -> usize {
        fn count(nodes: &[InlineNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    InlineNode::Run(_) => 1,
                    _ => node.children().map(count).unwrap_or(0),
                })
                .sum()
        }
        count(&self.children)
    }

    /// True when some run lies outside the given wrapper kind
    fn has_run_outside(&self, filter: WrapperFilter) -> bool {
        fn scan(nodes: &[InlineNode], inside: bool, filter: WrapperFilter) -> bool {
            nodes.iter().any(|node| match node {
                InlineNode::Run(_) => !inside,
                InlineNode::Insertion(span) => scan(
                    &span.children,
                    inside || filter == WrapperFilter::Insertion,
                    filter,
                ),
                InlineNode::Deletion(span) => scan(
                    &span.children,
                    inside || filter == WrapperFilter::Deletion,
                    filter,
                ),
                _ => node
                    .children()
                    .map(|c| scan(c, inside, filter))
                    .unwrap_or(false),
            })
        }
        scan(&self.children, false, filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrapperFilter {
    Insertion,
    Deletion,
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RevisionSpan, RunProperties};

    fn ins_wrapper(text: &str) -> InlineNode {
        InlineNode::Insertion(
            RevisionSpan::new(1, "Reviewer").with_children(vec![InlineNode::Run(Run::new(text))]),
        )
    }

    fn del_wrapper(text: &str) -> InlineNode {
        InlineNode::Deletion(RevisionSpan::new(2, "Reviewer").with_children(vec![
            InlineNode::Run(Run::deleted(text, RunProperties::default())),
        ]))
    }

    #[test]
    fn test_plain_paragraph_has_no_markup() {
        let para = Paragraph::with_text("Hello");
        assert!(!para.has_revision_markup());
        assert!(!para.is_insertion_only());
        assert!(!para.is_deletion_only());
    }

    #[test]
    fn test_insertion_only() {
        let para = Paragraph::with_children(vec![ins_wrapper("New clause.")]);
        assert!(para.has_revision_markup());
        assert!(para.is_insertion_only());
        assert!(!para.is_deletion_only());
    }

    #[test]
    fn test_deletion_only() {
        let para = Paragraph::with_children(vec![del_wrapper("Old clause.")]);
        assert!(para.is_deletion_only());
        assert!(!para.is_insertion_only());
    }

    #[test]
    fn test_mixed_is_neither() {
        let para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("kept ")),
            ins_wrapper("added"),
        ]);
        assert!(para.has_revision_markup());
        assert!(!para.is_insertion_only());
        assert!(!para.is_deletion_only());
    }

    #[test]
    fn test_markup_detected_through_containers() {
        let link = crate::Hyperlink::new("https://example.com")
            .with_children(vec![ins_wrapper("linked insert")]);
        let para = Paragraph::with_children(vec![InlineNode::Hyperlink(link)]);
        assert!(para.has_revision_markup());
    }

    #[test]
    fn test_run_props_change_counts_as_markup() {
        let mut run = Run::new("styled");
        run.props.change = Some(Box::new(crate::PropertyChange::new(
            "Reviewer",
            RunProperties::default(),
        )));
        let para = Paragraph::with_children(vec![InlineNode::Run(run)]);
        assert!(para.has_revision_markup());
    }

    #[test]
    fn test_insert_primitives_order() {
        let mut para = Paragraph::with_text("b");
        para.insert_before(0, InlineNode::Run(Run::new("a")));
        para.insert_after(1, InlineNode::Run(Run::new("c")));
        assert_eq!(para.visible_text(), "abc");
    }

    #[test]
    fn test_remove_child_out_of_range_is_noop_in_release() {
        let mut para = Paragraph::with_text("x");
        // index 5 does not exist; release builds return None
        if cfg!(not(debug_assertions)) {
            assert!(para.remove_child(5).is_none());
        }
        assert_eq!(para.children.len(), 1);
    }
}
