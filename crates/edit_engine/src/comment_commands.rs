//! Comment commands - mutate the comment side store and its anchor markers
//!
//! The side store does not exist in a document until the first root comment
//! bootstraps it. Registration of the new store with the document's
//! packaging manifest is the packaging layer's job; the outcome only flags
//! that a registration is needed.

use doc_model::{
    CommentId, CommentStore, CommentThread, DocumentTree, InlineNode, NodeId,
};
use serde::{Deserialize, Serialize};

use crate::{EditError, Result};

/// Outcome of adding a root comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentInsertion {
    pub id: CommentId,
    /// True when this call created the side store; the packaging layer must
    /// register the new part in the document manifest.
    pub store_bootstrapped: bool,
}

/// A comment thread resolved against the main tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCommentThread {
    pub thread: CommentThread,
    /// The paragraph the root annotates, when its anchor still resolves
    pub paragraph: Option<NodeId>,
}

/// Add a root comment annotating the paragraph with the given bookmark
/// anchor. Bootstraps the side store when absent, then inserts range
/// markers around the paragraph's content and the store entry.
pub fn add_root_comment(
    tree: &mut DocumentTree,
    anchor: &str,
    text: &str,
    author: &str,
) -> Result<CommentInsertion> {
    if text.trim().is_empty() {
        return Err(EditError::EmptyCommentText);
    }
    if author.trim().is_empty() {
        return Err(EditError::EmptyAuthor);
    }
    if tree.paragraph_by_anchor(anchor).is_none() {
        return Err(EditError::AnchorNotFound(anchor.to_string()));
    }

    let store_bootstrapped = tree.comments.is_none();
    let store = tree.comments.get_or_insert_with(CommentStore::new);
    let id = store.insert_root(author, text, anchor);
    if store_bootstrapped {
        tracing::debug!("bootstrapped comment side store");
    }

    let para = tree
        .paragraph_by_anchor_mut(anchor)
        .expect("anchor checked above");

    // Range start goes after any leading bookmark-start markers, range end
    // and reference before the trailing bookmark-end cluster.
    let mut start_index = 0;
    while start_index < para.children.len()
        && matches!(para.children[start_index], InlineNode::BookmarkStart { .. })
    {
        start_index += 1;
    }
    para.insert_before(start_index, InlineNode::CommentRangeStart { id });

    let mut end_index = para.children.len();
    while end_index > 0 && matches!(para.children[end_index - 1], InlineNode::BookmarkEnd { .. }) {
        end_index -= 1;
    }
    para.insert_before(end_index, InlineNode::CommentRangeEnd { id });
    para.insert_before(end_index + 1, InlineNode::CommentReference { id });

    Ok(CommentInsertion {
        id,
        store_bootstrapped,
    })
}

/// Add a reply under an existing root comment. Replies attach to the
/// thread's existing anchor range; no new markers are inserted.
pub fn add_reply(
    tree: &mut DocumentTree,
    parent: CommentId,
    text: &str,
    author: &str,
) -> Result<CommentId> {
    if text.trim().is_empty() {
        return Err(EditError::EmptyCommentText);
    }
    if author.trim().is_empty() {
        return Err(EditError::EmptyAuthor);
    }

    let store = tree
        .comments
        .as_mut()
        .ok_or(EditError::CommentNotFound(parent))?;
    match store.get(parent) {
        None => Err(EditError::CommentNotFound(parent)),
        Some(c) if !c.is_root() => Err(EditError::ReplyToReply(parent)),
        Some(_) => Ok(store
            .insert_reply(parent, author, text)
            .expect("parent verified as root")),
    }
}

/// All comment threads, roots in insertion order with replies nested,
/// each resolved to its anchored paragraph when the anchor still exists.
pub fn list_comments(tree: &DocumentTree) -> Vec<ResolvedCommentThread> {
    let Some(store) = &tree.comments else {
        return Vec::new();
    };
    store
        .threads()
        .into_iter()
        .map(|thread| {
            let paragraph = thread
                .root
                .anchor
                .as_deref()
                .and_then(|a| tree.paragraph_by_anchor(a))
                .map(|p| p.id());
            ResolvedCommentThread { thread, paragraph }
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
