//! Inline content - runs, containers, revision wrappers, and range markers
//!
//! A paragraph's children are a flat, ordered list of these nodes. Revision
//! wrappers and containers nest further inline content, so the full inline
//! structure of a paragraph is a small tree addressed by child-index paths.

use crate::{qn, CommentId, NodeId, Run};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked-change wrapper (`w:ins`, `w:del`, `w:moveFrom`, `w:moveTo`)
/// around a span of inline content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionSpan {
    /// Wire-visible revision identifier (`w:id`)
    pub id: crate::RevisionId,
    /// Author of the change (`w:author`)
    pub author: String,
    /// When the change was made (`w:date`)
    pub date: Option<DateTime<Utc>>,
    /// Shared move identifier pairing a move source with its destination
    /// (`w:name` on the surrounding move range); `None` for non-moves
    pub move_name: Option<String>,
    /// The wrapped content
    pub children: Vec<InlineNode>,
}

impl RevisionSpan {
    /// Create a wrapper around the given content
    pub fn new(id: impl Into<crate::RevisionId>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            date: None,
            move_name: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<InlineNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_move_name(mut self, name: impl Into<String>) -> Self {
        self.move_name = Some(name.into());
        self
    }
}

/// A hyperlink container (`w:hyperlink`). The Surgeon treats this as an
/// unsafe boundary: replacement ranges may not straddle its edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperlink {
    id: NodeId,
    /// Link target (external URL or internal anchor name)
    pub target: String,
    pub children: Vec<InlineNode>,
}

impl Hyperlink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            target: target.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<InlineNode>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// A structured document tag / content control (`w:sdt`); also an unsafe
/// boundary for the Surgeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredTag {
    id: NodeId,
    /// Friendly name shown in editors
    pub alias: Option<String>,
    /// Machine-readable tag
    pub tag: Option<String>,
    pub children: Vec<InlineNode>,
}

impl StructuredTag {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            alias: None,
            tag: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<InlineNode>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Default for StructuredTag {
    fn default() -> Self {
        Self::new()
    }
}

/// One node in a paragraph's inline content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InlineNode {
    Run(Run),
    Hyperlink(Hyperlink),
    StructuredTag(StructuredTag),
    Insertion(RevisionSpan),
    Deletion(RevisionSpan),
    MoveFrom(RevisionSpan),
    MoveTo(RevisionSpan),
    /// Start of a named bookmark anchor (`w:bookmarkStart`)
    BookmarkStart { id: u64, name: String },
    /// End of a bookmark anchor (`w:bookmarkEnd`)
    BookmarkEnd { id: u64 },
    /// Start of a commented range (`w:commentRangeStart`)
    CommentRangeStart { id: CommentId },
    /// End of a commented range (`w:commentRangeEnd`)
    CommentRangeEnd { id: CommentId },
    /// Reference to a comment in the side store (`w:commentReference`)
    CommentReference { id: CommentId },
}

impl InlineNode {
    /// The qualified element name this node maps onto, used when naming
    /// structure in errors and logs
    pub fn qualified_name(&self) -> &'static str {
        match self {
            InlineNode::Run(_) => qn::RUN,
            InlineNode::Hyperlink(_) => qn::HYPERLINK,
            InlineNode::StructuredTag(_) => qn::STRUCTURED_TAG,
            InlineNode::Insertion(_) => qn::INSERTION,
            InlineNode::Deletion(_) => qn::DELETION,
            InlineNode::MoveFrom(_) => qn::MOVE_FROM,
            InlineNode::MoveTo(_) => qn::MOVE_TO,
            InlineNode::BookmarkStart { .. } => qn::BOOKMARK_START,
            InlineNode::BookmarkEnd { .. } => qn::BOOKMARK_END,
            InlineNode::CommentRangeStart { .. } => qn::COMMENT_RANGE_START,
            InlineNode::CommentRangeEnd { .. } => qn::COMMENT_RANGE_END,
            InlineNode::CommentReference { .. } => qn::COMMENT_REFERENCE,
        }
    }

    /// Nested inline content, for nodes that have any
    pub fn children(&self) -> Option<&[InlineNode]> {
        match self {
            InlineNode::Hyperlink(h) => Some(&h.children),
            InlineNode::StructuredTag(s) => Some(&s.children),
            InlineNode::Insertion(r)
            | InlineNode::Deletion(r)
            | InlineNode::MoveFrom(r)
            | InlineNode::MoveTo(r) => Some(&r.children),
            _ => None,
        }
    }

    /// Mutable nested inline content
    pub fn children_mut(&mut self) -> Option<&mut Vec<InlineNode>> {
        match self {
            InlineNode::Hyperlink(h) => Some(&mut h.children),
            InlineNode::StructuredTag(s) => Some(&mut s.children),
            InlineNode::Insertion(r)
            | InlineNode::Deletion(r)
            | InlineNode::MoveFrom(r)
            | InlineNode::MoveTo(r) => Some(&mut r.children),
            _ => None,
        }
    }

    /// Whether this node is one of the four revision wrappers
    pub fn is_revision_wrapper(&self) -> bool {
        matches!(
            self,
            InlineNode::Insertion(_)
                | InlineNode::Deletion(_)
                | InlineNode::MoveFrom(_)
                | InlineNode::MoveTo(_)
        )
    }

    /// Whether this node is a container the Surgeon refuses to cut across
    pub fn is_unsafe_container(&self) -> bool {
        matches!(self, InlineNode::Hyperlink(_) | InlineNode::StructuredTag(_))
    }

    /// Whether this node is a zero-width range marker
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            InlineNode::BookmarkStart { .. }
                | InlineNode::BookmarkEnd { .. }
                | InlineNode::CommentRangeStart { .. }
                | InlineNode::CommentRangeEnd { .. }
                | InlineNode::CommentReference { .. }
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_names() {
        let ins = InlineNode::Insertion(RevisionSpan::new(1, "Reviewer"));
        assert_eq!(ins.qualified_name(), "w:ins");
        assert!(ins.is_revision_wrapper());

        let link = InlineNode::Hyperlink(Hyperlink::new("https://example.com"));
        assert_eq!(link.qualified_name(), "w:hyperlink");
        assert!(link.is_unsafe_container());
        assert!(!link.is_revision_wrapper());
    }

    #[test]
    fn test_markers_have_no_children() {
        let marker = InlineNode::BookmarkStart {
            id: 1,
            name: "p1".into(),
        };
        assert!(marker.is_marker());
        assert!(marker.children().is_none());
    }
}
