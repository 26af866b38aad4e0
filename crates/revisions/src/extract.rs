//! Revision extraction - a structured, paginated per-paragraph diff
//!
//! The document is cloned twice; one clone is fully accepted, the other
//! fully rejected. Walking the original tree in document order, every
//! paragraph carrying revision markup yields one change record with its
//! before/after text (joined through the paragraph's stable bookmark
//! anchor), one entry per revision found, and any comment threads anchored
//! in the paragraph. The full ordered list is what sessions cache; slicing
//! happens on top of it.

use chrono::{DateTime, Utc};
use doc_model::{
    anchor_name, comment_ids_in, CommentThread, DocumentTree, InlineNode, MarkRevisionKind,
    NodeId, Paragraph, RevisionSpan,
};
use serde::{Deserialize, Serialize};

use crate::{accept, reject, Result, RevisionError};

/// Smallest allowed page limit
pub const MIN_PAGE_LIMIT: usize = 1;
/// Largest allowed page limit
pub const MAX_PAGE_LIMIT: usize = 500;

/// The kind of an individual revision entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionKind {
    Insertion,
    Deletion,
    MoveFrom,
    MoveTo,
    FormatChange,
}

/// One revision found in a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub kind: RevisionKind,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

/// The structured diff for one revision-bearing paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphChange {
    /// The paragraph in the original (un-transformed) tree
    pub paragraph: NodeId,
    /// Its stable bookmark anchor, when it has one
    pub anchor: Option<String>,
    /// Visible text with every change rejected; empty for paragraphs that
    /// exist only as insertions
    pub before_text: String,
    /// Visible text with every change accepted; empty for paragraphs that
    /// exist only as deletions
    pub after_text: String,
    /// One entry per revision wrapper or property-change marker
    pub entries: Vec<RevisionEntry>,
    /// Comment threads anchored within this paragraph
    pub comments: Vec<CommentThread>,
}

/// A page of extraction results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionPage {
    pub changes: Vec<ParagraphChange>,
    pub total_changes: usize,
    pub has_more: bool,
}

/// Validate pagination parameters. Checked before any computation so an
/// invalid request does no work.
pub fn validate_page_limit(limit: usize) -> Result<()> {
    if !(MIN_PAGE_LIMIT..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(RevisionError::LimitOutOfRange {
            limit,
            min: MIN_PAGE_LIMIT,
            max: MAX_PAGE_LIMIT,
        });
    }
    Ok(())
}

/// Extract one page of the structured diff
pub fn extract_revisions(
    tree: &DocumentTree,
    offset: usize,
    limit: usize,
) -> Result<RevisionPage> {
    validate_page_limit(limit)?;
    let changes = collect_changes(tree)?;
    paginate(&changes, offset, limit)
}

/// Slice a previously computed change list into a page. An offset at or
/// past the end is not an error; it yields an empty page.
pub fn paginate(changes: &[ParagraphChange], offset: usize, limit: usize) -> Result<RevisionPage> {
    validate_page_limit(limit)?;
    let total_changes = changes.len();
    let page: Vec<ParagraphChange> = changes.iter().skip(offset).take(limit).cloned().collect();
    Ok(RevisionPage {
        changes: page,
        total_changes,
        has_more: offset + limit < total_changes,
    })
}

/// Compute the full ordered change list by transforming two clones and
/// correlating per-paragraph state between them.
pub fn collect_changes(tree: &DocumentTree) -> Result<Vec<ParagraphChange>> {
    let mut accepted = tree.clone();
    let accept_stats = accept(&mut accepted);
    let mut rejected = tree.clone();
    let reject_stats = reject(&mut rejected);
    tracing::debug!(
        accepted = ?accept_stats,
        rejected = ?reject_stats,
        "transformed clones for extraction"
    );

    let mut changes = Vec::new();
    for para in tree.paragraphs() {
        if !para.has_revision_markup() {
            continue;
        }

        let anchor = anchor_name(para);
        let entries = collect_entries(para);
        let inserted_only = para.is_insertion_only();
        let deleted_only = para.is_deletion_only();

        // A wholly inserted paragraph has no before state (and its anchor
        // may have been relocated in the reject clone, so the lookup is
        // skipped rather than resolved against a stale target); mirror
        // logic for wholly deleted paragraphs in the accept clone.
        let before_text = if inserted_only {
            String::new()
        } else {
            lookup_text(&rejected, anchor.as_deref(), para.id())?
        };
        let after_text = if deleted_only {
            String::new()
        } else {
            lookup_text(&accepted, anchor.as_deref(), para.id())?
        };

        // A bare inserted paragraph mark with no text in either state is
        // structural noise, not a change.
        if is_bare_mark_insertion(para) && before_text.is_empty() && after_text.is_empty() {
            continue;
        }

        let comments = match &tree.comments {
            Some(store) => store.threads_for(&comment_ids_in(para)),
            None => Vec::new(),
        };

        changes.push(ParagraphChange {
            paragraph: para.id(),
            anchor,
            before_text,
            after_text,
            entries,
            comments,
        });
    }
    Ok(changes)
}

/// Resolve a paragraph's visible text in a transformed clone, joining by
/// anchor first and falling back to the stable node ID.
fn lookup_text(clone: &DocumentTree, anchor: Option<&str>, id: NodeId) -> Result<String> {
    if let Some(name) = anchor {
        if let Some(para) = clone.paragraph_by_anchor(name) {
            return Ok(para.visible_text());
        }
    }
    if let Some(para) = clone.paragraph_by_id(id) {
        return Ok(para.visible_text());
    }
    Err(RevisionError::AnchorNotFound(
        anchor.unwrap_or("<unanchored>").to_string(),
    ))
}

/// One entry per revision wrapper or property-change marker found directly
/// in the paragraph, paragraph-level markers first, then inline markup in
/// document order.
fn collect_entries(para: &Paragraph) -> Vec<RevisionEntry> {
    let mut entries = Vec::new();

    if let Some(change) = &para.props.change {
        entries.push(RevisionEntry {
            kind: RevisionKind::FormatChange,
            author: change.author.clone(),
            date: change.date,
        });
    }
    if let Some(mark) = &para.props.mark_revision {
        entries.push(RevisionEntry {
            kind: match mark.kind {
                MarkRevisionKind::Inserted => RevisionKind::Insertion,
                MarkRevisionKind::Deleted => RevisionKind::Deletion,
            },
            author: mark.author.clone(),
            date: mark.date,
        });
    }

    fn scan(nodes: &[InlineNode], entries: &mut Vec<RevisionEntry>) {
        for node in nodes {
            let wrapper: Option<(RevisionKind, &RevisionSpan)> = match node {
                InlineNode::Insertion(span) => Some((RevisionKind::Insertion, span)),
                InlineNode::Deletion(span) => Some((RevisionKind::Deletion, span)),
                InlineNode::MoveFrom(span) => Some((RevisionKind::MoveFrom, span)),
                InlineNode::MoveTo(span) => Some((RevisionKind::MoveTo, span)),
                _ => None,
            };
            if let Some((kind, span)) = wrapper {
                entries.push(RevisionEntry {
                    kind,
                    author: span.author.clone(),
                    date: span.date,
                });
            }
            if let InlineNode::Run(run) = node {
                if let Some(change) = &run.props.change {
                    entries.push(RevisionEntry {
                        kind: RevisionKind::FormatChange,
                        author: change.author.clone(),
                        date: change.date,
                    });
                }
            }
            if let Some(children) = node.children() {
                scan(children, entries);
            }
        }
    }
    scan(&para.children, &mut entries);
    entries
}

/// True when the paragraph's only markup is an inserted paragraph mark
fn is_bare_mark_insertion(para: &Paragraph) -> bool {
    let mark_inserted = matches!(
        para.props.mark_revision.as_ref().map(|m| m.kind),
        Some(MarkRevisionKind::Inserted)
    );
    mark_inserted && para.props.change.is_none() && !has_inline_markup(para)
}

fn has_inline_markup(para: &Paragraph) -> bool {
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
    scan(&para.children)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{attach_anchor, MarkRevision, Run, RunProperties};

    fn ins(id: u64, author: &str, text: &str) -> InlineNode {
        InlineNode::Insertion(
            RevisionSpan::new(id, author).with_children(vec![InlineNode::Run(Run::new(text))]),
        )
    }

    fn del(id: u64, author: &str, text: &str) -> InlineNode {
        InlineNode::Deletion(RevisionSpan::new(id, author).with_children(vec![
            InlineNode::Run(Run::deleted(text, RunProperties::default())),
        ]))
    }

    #[test]
    fn test_clean_document_extracts_nothing() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph(Paragraph::with_text("nothing tracked"));

        let page = extract_revisions(&tree, 0, 10).unwrap();
        assert!(page.changes.is_empty());
        assert_eq!(page.total_changes, 0);
        assert!(!page.has_more);
    }

    #[test]
    fn test_modified_paragraph_yields_before_and_after() {
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("The ")),
            del(1, "Alice", "old"),
            ins(2, "Alice", "new"),
            InlineNode::Run(Run::new(" terms")),
        ]);
        attach_anchor(&mut para, 1, "p1");
        let mut tree = DocumentTree::new();
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 0, 10).unwrap();
        assert_eq!(page.total_changes, 1);
        let change = &page.changes[0];
        assert_eq!(change.anchor.as_deref(), Some("p1"));
        assert_eq!(change.before_text, "The old terms");
        assert_eq!(change.after_text, "The new terms");
        assert_eq!(change.entries.len(), 2);
        assert_eq!(change.entries[0].kind, RevisionKind::Deletion);
        assert_eq!(change.entries[1].kind, RevisionKind::Insertion);
        assert_eq!(change.entries[0].author, "Alice");
    }

    #[test]
    fn test_inserted_only_paragraph() {
        let mut para = Paragraph::with_children(vec![ins(1, "Alice", "New clause.")]);
        para.props.mark_revision = Some(MarkRevision::inserted("Alice"));
        attach_anchor(&mut para, 1, "p1");
        let mut tree = DocumentTree::new();
        tree.push_paragraph(Paragraph::with_text("context"));
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 0, 10).unwrap();
        assert_eq!(page.total_changes, 1);
        assert_eq!(page.changes[0].before_text, "");
        assert_eq!(page.changes[0].after_text, "New clause.");
    }

    #[test]
    fn test_deleted_only_paragraph() {
        let mut para = Paragraph::with_children(vec![del(1, "Bob", "Old clause.")]);
        para.props.mark_revision = Some(MarkRevision::deleted("Bob"));
        attach_anchor(&mut para, 1, "p1");
        let mut tree = DocumentTree::new();
        tree.push_paragraph(Paragraph::with_text("context"));
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 0, 10).unwrap();
        assert_eq!(page.total_changes, 1);
        assert_eq!(page.changes[0].before_text, "Old clause.");
        assert_eq!(page.changes[0].after_text, "");
    }

    #[test]
    fn test_bare_mark_insertion_is_filtered_as_noise() {
        let mut para = Paragraph::new();
        para.props.mark_revision = Some(MarkRevision::inserted("Alice"));
        let mut tree = DocumentTree::new();
        tree.push_paragraph(Paragraph::with_text("context"));
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 0, 10).unwrap();
        assert_eq!(page.total_changes, 0);
    }

    #[test]
    fn test_format_change_entry() {
        let mut run = Run::with_props("styled", RunProperties::bold());
        run.props.change = Some(Box::new(doc_model::PropertyChange::new(
            "Carol",
            RunProperties::default(),
        )));
        let mut para = Paragraph::with_children(vec![InlineNode::Run(run)]);
        attach_anchor(&mut para, 1, "p1");
        let mut tree = DocumentTree::new();
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 0, 10).unwrap();
        assert_eq!(page.total_changes, 1);
        let change = &page.changes[0];
        assert_eq!(change.entries[0].kind, RevisionKind::FormatChange);
        assert_eq!(change.entries[0].author, "Carol");
        // format-only change keeps the same text on both sides
        assert_eq!(change.before_text, change.after_text);
    }

    #[test]
    fn test_limit_validation() {
        let tree = DocumentTree::new();
        assert!(matches!(
            extract_revisions(&tree, 0, 0),
            Err(RevisionError::LimitOutOfRange { .. })
        ));
        assert!(matches!(
            extract_revisions(&tree, 0, 501),
            Err(RevisionError::LimitOutOfRange { .. })
        ));
        assert!(extract_revisions(&tree, 0, 500).is_ok());
    }

    #[test]
    fn test_page_serializes_for_transport() {
        let mut para = Paragraph::with_children(vec![ins(1, "Alice", "wire")]);
        attach_anchor(&mut para, 1, "p1");
        let mut tree = DocumentTree::new();
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 0, 10).unwrap();
        let json = serde_json::to_string(&page).unwrap();
        let back: RevisionPage = serde_json::from_str(&json).unwrap();
        assert_eq!(page, back);
    }

    #[test]
    fn test_offset_past_end_is_empty_page() {
        let mut para = Paragraph::with_children(vec![ins(1, "Alice", "x")]);
        attach_anchor(&mut para, 1, "p1");
        let mut tree = DocumentTree::new();
        tree.push_paragraph(para);

        let page = extract_revisions(&tree, 10, 5).unwrap();
        assert!(page.changes.is_empty());
        assert_eq!(page.total_changes, 1);
        assert!(!page.has_more);
    }
}
