//! Comment side store - review annotations and threaded replies
//!
//! Comments live out of band: the main tree carries only range markers and
//! references (see [`crate::InlineNode`]), while author, date, text, and
//! threading live here. The store does not exist in a document until the
//! first comment bootstraps it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier for a comment (the `w:id` on its anchor markers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl CommentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A comment entry: a root annotation or a reply to one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    pub author: String,
    pub date: DateTime<Utc>,
    pub text: String,
    /// Root comment this entry replies to; `None` for roots. Threads are
    /// one level deep: replies never parent other replies.
    pub parent: Option<CommentId>,
    /// Bookmark anchor of the paragraph the root annotates; `None` for
    /// replies, which attach to their root's anchor range.
    pub anchor: Option<String>,
}

impl Comment {
    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A root comment with its replies nested in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    pub root: Comment,
    pub replies: Vec<Comment>,
}

/// The comment side store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentStore {
    comments: Vec<Comment>,
    next_id: u64,
}

impl CommentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root comment annotating the paragraph with the given anchor
    pub fn insert_root(
        &mut self,
        author: impl Into<String>,
        text: impl Into<String>,
        anchor: impl Into<String>,
    ) -> CommentId {
        let id = self.allocate_id();
        self.comments.push(Comment {
            id,
            author: author.into(),
            date: Utc::now(),
            text: text.into(),
            parent: None,
            anchor: Some(anchor.into()),
        });
        id
    }

    /// Insert a reply under an existing root. Returns `None` when the
    /// parent does not exist or is itself a reply.
    pub fn insert_reply(
        &mut self,
        parent: CommentId,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<CommentId> {
        match self.get(parent) {
            Some(root) if root.is_root() => {}
            _ => return None,
        }
        let id = self.allocate_id();
        self.comments.push(Comment {
            id,
            author: author.into(),
            date: Utc::now(),
            text: text.into(),
            parent: Some(parent),
            anchor: None,
        });
        Some(id)
    }

    fn allocate_id(&mut self) -> CommentId {
        let id = CommentId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get a comment by ID
    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Check if a comment exists
    pub fn contains(&self, id: CommentId) -> bool {
        self.get(id).is_some()
    }

    /// All entries in insertion order
    pub fn all(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    /// Root comments in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.is_root())
    }

    /// Replies to a root, in insertion order
    pub fn replies_of(&self, root: CommentId) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|c| c.parent == Some(root))
            .collect()
    }

    /// All threads: roots in insertion order with replies nested beneath
    pub fn threads(&self) -> Vec<CommentThread> {
        self.roots()
            .map(|root| CommentThread {
                root: root.clone(),
                replies: self.replies_of(root.id).into_iter().cloned().collect(),
            })
            .collect()
    }

    /// Threads whose root is among the given IDs, preserving store order
    pub fn threads_for(&self, ids: &[CommentId]) -> Vec<CommentThread> {
        self.threads()
            .into_iter()
            .filter(|t| ids.contains(&t.root.id()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Comment IDs anchored within a paragraph, in encounter order: every
/// `commentRangeStart` or `commentReference` marker anywhere in its inline
/// tree, deduplicated.
pub fn comment_ids_in(para: &crate::Paragraph) -> Vec<CommentId> {
    use crate::InlineNode;
    fn scan(nodes: &[InlineNode], out: &mut Vec<CommentId>) {
        for node in nodes {
            match node {
                InlineNode::CommentRangeStart { id } | InlineNode::CommentReference { id } => {
                    if !out.contains(id) {
                        out.push(*id);
                    }
                }
                _ => {
                    if let Some(children) = node.children() {
                        scan(children, out);
                    }
                }
            }
        }
    }
    let mut out = Vec::new();
    scan(&para.children, &mut out);
    out
}

// =============================================================================
// Tests
// =============================================================================
