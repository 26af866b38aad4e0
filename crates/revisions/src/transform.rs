//! Accept/Reject transforms - resolve a tree's revision markup to one state
//!
//! The two passes are mirror images: Accept keeps inserted content and
//! discards deleted content; Reject does the reverse. Move pairs resolve to
//! exactly one location (destination on accept, source on reject), and
//! property-change payloads collapse to one branch of the current/original
//! union. A paragraph whose entire content resolves away is removed, with
//! its bookmark anchors relocated to a surviving neighbor so identity
//! lookups in the transformed tree stay valid.
//!
//! Callers that need to preserve the input run these against a clone; the
//! transforms themselves mutate in place. A tree with no revision markup
//! passes through untouched with all-zero stats.

use doc_model::{
    attach_markers_back, attach_markers_front, detach_anchor_markers, Block, DocumentTree,
    InlineNode, MarkRevisionKind, Paragraph,
};
use serde::{Deserialize, Serialize};

/// Which state the transform resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accept,
    Reject,
}

/// Counts of what a transform resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    /// Insertion wrappers resolved (kept on accept, removed on reject),
    /// including inserted paragraph marks
    pub insertions: usize,
    /// Deletion wrappers resolved (discarded on accept, restored on
    /// reject), including deleted paragraph marks
    pub deletions: usize,
    /// Move wrapper halves resolved (both halves of a pair count)
    pub moves: usize,
    /// Property-change payloads collapsed (applied on accept, reverted on
    /// reject)
    pub format_changes: usize,
    /// Paragraphs that resolved to nothing and were removed
    pub paragraphs_removed: usize,
    /// Paragraphs whose bookmark anchors were relocated to a neighbor
    pub anchors_relocated: usize,
}

impl TransformStats {
    /// True when the transform found no revision markup at all
    pub fn is_noop(&self) -> bool {
        *self == TransformStats::default()
    }
}

/// Resolve every tracked change to its accepted state
pub fn accept(tree: &mut DocumentTree) -> TransformStats {
    run_transform(tree, Verdict::Accept)
}

/// Resolve every tracked change back to its original state
pub fn reject(tree: &mut DocumentTree) -> TransformStats {
    run_transform(tree, Verdict::Reject)
}

fn run_transform(tree: &mut DocumentTree, verdict: Verdict) -> TransformStats {
    let mut stats = TransformStats::default();
    process_blocks(&mut tree.blocks, verdict, &mut stats);
    tracing::debug!(
        accept = (verdict == Verdict::Accept),
        insertions = stats.insertions,
        deletions = stats.deletions,
        moves = stats.moves,
        format_changes = stats.format_changes,
        paragraphs_removed = stats.paragraphs_removed,
        "transform complete"
    );
    stats
}

fn process_blocks(blocks: &mut Vec<Block>, verdict: Verdict, stats: &mut TransformStats) {
    // Transform paragraphs in place, remembering which ones are doomed:
    // their only prior content was wrapped in the markup this verdict
    // resolves away.
    let mut doomed: Vec<usize> = Vec::new();
    for (index, block) in blocks.iter_mut().enumerate() {
        match block {
            Block::Paragraph(para) => {
                let removable = match verdict {
                    Verdict::Accept => para.is_deletion_only(),
                    Verdict::Reject => para.is_insertion_only(),
                };
                transform_paragraph(para, verdict, stats);
                if removable && para.run_count() == 0 {
                    doomed.push(index);
                }
            }
            Block::Table(table) => {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        process_blocks(&mut cell.blocks, verdict, stats);
                    }
                }
            }
        }
    }

    // Removal pass, highest index first so earlier indices stay valid.
    // Anchors relocated onto a neighbor that is itself doomed are carried
    // along again when that neighbor is removed.
    for &index in doomed.iter().rev() {
        let markers = match &mut blocks[index] {
            Block::Paragraph(para) => detach_anchor_markers(para),
            Block::Table(_) => continue,
        };
        if !markers.is_empty() {
            let previous = blocks[..index]
                .iter()
                .rposition(|b| matches!(b, Block::Paragraph(_)));
            let next = blocks[index + 1..]
                .iter()
                .position(|b| matches!(b, Block::Paragraph(_)))
                .map(|offset| index + 1 + offset);
            match (previous, next) {
                (Some(at), _) => {
                    if let Block::Paragraph(neighbor) = &mut blocks[at] {
                        attach_markers_back(neighbor, markers);
                        stats.anchors_relocated += 1;
                    }
                }
                (None, Some(at)) => {
                    if let Block::Paragraph(neighbor) = &mut blocks[at] {
                        attach_markers_front(neighbor, markers);
                        stats.anchors_relocated += 1;
                    }
                }
                (None, None) => {
                    tracing::warn!("no surviving neighbor for relocated anchors; dropping");
                }
            }
        }
        blocks.remove(index);
        stats.paragraphs_removed += 1;
    }
}

fn transform_paragraph(para: &mut Paragraph, verdict: Verdict, stats: &mut TransformStats) {
    // Collapse the paragraph property-change union
    match verdict {
        Verdict::Accept => {
            if para.props.change.take().is_some() {
                stats.format_changes += 1;
            }
        }
        Verdict::Reject => {
            if let Some(change) = para.props.change.take() {
                stats.format_changes += 1;
                // An empty original removes the override block entirely;
                // mark bookkeeping is handled below, not by the payload.
                let mark_revision = para.props.mark_revision.take();
                let mark_run_props = para.props.mark_run_props.take();
                para.props = change.original;
                para.props.mark_revision = mark_revision;
                para.props.mark_run_props = mark_run_props;
            }
        }
    }

    // The paragraph-mark revision is consumed either way; whether the
    // paragraph itself survives is decided by the caller.
    if let Some(mark) = para.props.mark_revision.take() {
        match mark.kind {
            MarkRevisionKind::Inserted => stats.insertions += 1,
            MarkRevisionKind::Deleted => stats.deletions += 1,
        }
    }

    transform_inlines(&mut para.children, verdict, stats);
}

fn transform_inlines(nodes: &mut Vec<InlineNode>, verdict: Verdict, stats: &mut TransformStats) {
    let mut index = 0;
    while index < nodes.len() {
        // Take the node out by value; wrappers are either dropped or have
        // their (transformed) children spliced into their place.
        match nodes.remove(index) {
            InlineNode::Insertion(span) => {
                stats.insertions += 1;
                if verdict == Verdict::Accept {
                    index = splice(nodes, index, span, verdict, stats);
                }
            }
            InlineNode::Deletion(mut span) => {
                stats.deletions += 1;
                if verdict == Verdict::Reject {
                    restore_deleted_text(&mut span.children);
                    index = splice(nodes, index, span, verdict, stats);
                }
            }
            InlineNode::MoveFrom(span) => {
                stats.moves += 1;
                // on accept the content lives only at the destination
                if verdict == Verdict::Reject {
                    index = splice(nodes, index, span, verdict, stats);
                }
            }
            InlineNode::MoveTo(span) => {
                stats.moves += 1;
                // on reject the content reverts to the source
                if verdict == Verdict::Accept {
                    index = splice(nodes, index, span, verdict, stats);
                }
            }
            InlineNode::Run(mut run) => {
                match verdict {
                    Verdict::Accept => {
                        if run.props.change.take().is_some() {
                            stats.format_changes += 1;
                        }
                    }
                    Verdict::Reject => {
                        if let Some(change) = run.props.change.take() {
                            stats.format_changes += 1;
                            run.props = change.original;
                        }
                    }
                }
                // strip transient deletion bookkeeping
                run.props.deleted_mark = false;
                nodes.insert(index, InlineNode::Run(run));
                index += 1;
            }
            InlineNode::Hyperlink(mut link) => {
                transform_inlines(&mut link.children, verdict, stats);
                nodes.insert(index, InlineNode::Hyperlink(link));
                index += 1;
            }
            InlineNode::StructuredTag(mut tag) => {
                transform_inlines(&mut tag.children, verdict, stats);
                nodes.insert(index, InlineNode::StructuredTag(tag));
                index += 1;
            }
            marker => {
                nodes.insert(index, marker);
                index += 1;
            }
        }
    }
}

/// Transform a resolved wrapper's children and splice them where the
/// wrapper stood; returns the index just past the spliced content.
fn splice(
    nodes: &mut Vec<InlineNode>,
    index: usize,
    span: doc_model::RevisionSpan,
    verdict: Verdict,
    stats: &mut TransformStats,
) -> usize {
    let mut children = span.children;
    transform_inlines(&mut children, verdict, stats);
    let count = children.len();
    nodes.splice(index..index, children);
    index + count
}

fn restore_deleted_text(nodes: &mut [InlineNode]) {
    for node in nodes {
        match node {
            InlineNode::Run(run) => run.restore_deleted_text(),
            _ => {
                if let Some(children) = node.children_mut() {
                    restore_deleted_text(children);
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
