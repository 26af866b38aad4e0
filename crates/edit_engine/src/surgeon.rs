//! The Surgeon - format-aware range replacement within a paragraph
//!
//! Offsets address the paragraph's atom stream, so callers never see run
//! boundaries. The replacement maps the range back onto the backing runs,
//! reusing the covering run's properties when the range is uniformly
//! formatted and falling back to the first formatting group's properties
//! when it is mixed. Ranges that straddle a hyperlink or structured-tag
//! edge are refused with no mutation.

use std::collections::HashSet;

use doc_model::{
    linearize, run_at, run_at_mut, sibling_list_mut, unsafe_ancestors, Atom, AtomKind, InlineNode,
    NodeId, Paragraph, Run, RunContent, RunProperties,
};

use crate::{EditError, Result};

/// What a successful replacement touched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementOutcome {
    /// Runs created by the splice
    pub created: Vec<NodeId>,
    /// Pre-existing runs that were modified and survive
    pub modified: Vec<NodeId>,
    /// Number of distinct formatting groups the range spanned (0 for a
    /// pure insertion)
    pub groups_spanned: usize,
}

/// Replace `[start, end)` of the paragraph's visible atom stream with
/// `new_text`, preserving formatting per the mixed-format policy.
pub fn replace_range(
    para: &mut Paragraph,
    start: usize,
    end: usize,
    new_text: &str,
) -> Result<ReplacementOutcome> {
    let atoms = linearize(para);

    if start > end {
        return Err(EditError::InvalidRange { start, end });
    }
    if end > atoms.len() {
        return Err(EditError::RangeOutOfBounds {
            start,
            end,
            length: atoms.len(),
        });
    }

    if start == end {
        return insert_at(para, &atoms, start, new_text);
    }

    let covered = &atoms[start..end];
    check_container_boundaries(para, covered)?;

    // Ordered distinct runs backing the range. Atoms of one run are
    // contiguous in the stream, so comparing against the previous path is
    // enough.
    let mut run_paths: Vec<Vec<usize>> = Vec::new();
    for atom in covered {
        if run_paths.last() != Some(&atom.addr.path) {
            run_paths.push(atom.addr.path.clone());
        }
    }

    let mut groups: Vec<RunProperties> = Vec::new();
    for path in &run_paths {
        let props = run_at(para, path)
            .map(|r| r.props.clone())
            .unwrap_or_default();
        if !groups.iter().any(|g| g.formatting_eq(&props)) {
            groups.push(props);
        }
    }
    let groups_spanned = groups.len();
    let replacement_props = groups[0].cloned_formatting();

    let affected: HashSet<NodeId> = run_paths
        .iter()
        .filter_map(|path| run_at(para, path).map(|r| r.id()))
        .collect();

    let segments = build_segments(covered);
    let first_path = covered[0].addr.path.clone();
    let last = &covered[covered.len() - 1];
    let head_exists = start > 0 && atoms[start - 1].addr.path == first_path;
    let tail_exists = end < atoms.len() && atoms[end].addr.path == last.addr.path;

    let mut modified: Vec<NodeId> = Vec::new();

    // A range strictly inside a single run leaves content on both sides;
    // split the run at the range end first so the generic removal below
    // cannot glue head and tail together.
    if run_paths.len() == 1 && head_exists && tail_exists {
        let boundary = match last.kind {
            AtomKind::Text { len } => (last.addr.item, last.addr.offset + len),
            AtomKind::Marker(_) => (last.addr.item + 1, 0),
        };
        let tail_id = split_run(para, &first_path, boundary.0, boundary.1);
        modified.push(tail_id);
    }

    // Remove the covered content, later segments first so item indices in
    // the same run stay valid.
    for seg in segments.iter().rev() {
        let Some(run) = run_at_mut(para, &seg.path) else {
            continue;
        };
        match seg.kind {
            SegmentKind::Text { start, end } => {
                if let Some(text) = run.content.get_mut(seg.item).and_then(item_text_mut) {
                    text.replace_range(start..end, "");
                }
            }
            SegmentKind::Item => {
                run.content.remove(seg.item);
            }
        }
    }

    // Splice in the replacement run.
    let mut created = Vec::new();
    if !new_text.is_empty() {
        let run = Run::with_props(new_text, replacement_props);
        let id = run.id();
        let index = *first_path.last().expect("run path is never empty");
        let list = sibling_list_mut(para, &first_path)
            .ok_or_else(|| EditError::DocModel(doc_model::DocModelError::TreeStructure(
                "covered run path no longer resolves".into(),
            )))?;
        let at = if head_exists { index + 1 } else { index };
        list.insert(at.min(list.len()), InlineNode::Run(run));
        created.push(id);
    }

    cleanup_empty_runs(&mut para.children, &affected);

    for id in &affected {
        if run_exists(para, *id) {
            modified.push(*id);
        }
    }

    tracing::trace!(
        paragraph = %para.id(),
        start,
        end,
        groups = groups_spanned,
        created = created.len(),
        "replaced range"
    );

    Ok(ReplacementOutcome {
        created,
        modified,
        groups_spanned,
    })
}

// =============================================================================
// Insertion (zero-length range)
// =============================================================================

fn insert_at(
    para: &mut Paragraph,
    atoms: &[Atom],
    start: usize,
    new_text: &str,
) -> Result<ReplacementOutcome> {
    if new_text.is_empty() {
        return Ok(ReplacementOutcome::default());
    }

    // Empty paragraph: use the paragraph mark's run properties.
    if atoms.is_empty() {
        let props = para
            .props
            .mark_run_props
            .as_ref()
            .map(|p| p.cloned_formatting())
            .unwrap_or_default();
        let run = Run::with_props(new_text, props);
        let id = run.id();
        // Stay inside any trailing end-marker cluster.
        let mut index = para.children.len();
        while index > 0
            && matches!(
                para.children[index - 1],
                InlineNode::BookmarkEnd { .. }
                    | InlineNode::CommentRangeEnd { .. }
                    | InlineNode::CommentReference { .. }
            )
        {
            index -= 1;
        }
        para.insert_before(index, InlineNode::Run(run));
        return Ok(ReplacementOutcome {
            created: vec![id],
            modified: Vec::new(),
            groups_spanned: 0,
        });
    }

    // Prefer the following atom's run for properties, else the preceding.
    let (anchor, after) = if start < atoms.len() {
        (&atoms[start], false)
    } else {
        (&atoms[start - 1], true)
    };
    let anchor_run = run_at(para, &anchor.addr.path).ok_or_else(|| {
        EditError::DocModel(doc_model::DocModelError::TreeStructure(
            "atom address no longer resolves".into(),
        ))
    })?;
    let props = anchor_run.props.cloned_formatting();
    let anchor_run_id = anchor_run.id();

    let run = Run::with_props(new_text, props);
    let id = run.id();
    let index = *anchor.addr.path.last().expect("run path is never empty");

    let mut modified = Vec::new();
    if after {
        // End of paragraph: insert after the last run.
        let list = sibling_list_mut(para, &anchor.addr.path).expect("sibling list resolves");
        list.insert(index + 1, InlineNode::Run(run));
    } else {
        let mid_run = start > 0 && atoms[start - 1].addr.path == anchor.addr.path;
        if mid_run {
            // Insertion point is inside the run: split and place between.
            let tail_id = split_run(para, &anchor.addr.path, anchor.addr.item, anchor.addr.offset);
            let list = sibling_list_mut(para, &anchor.addr.path).expect("sibling list resolves");
            list.insert(index + 1, InlineNode::Run(run));
            modified.push(anchor_run_id);
            modified.push(tail_id);
        } else {
            let list = sibling_list_mut(para, &anchor.addr.path).expect("sibling list resolves");
            list.insert(index, InlineNode::Run(run));
        }
    }

    Ok(ReplacementOutcome {
        created: vec![id],
        modified,
        groups_spanned: 0,
    })
}

// =============================================================================
// Internals
// =============================================================================

#[derive(Debug)]
enum SegmentKind {
    /// Byte range of covered text within the item
    Text { start: usize, end: usize },
    /// A covered non-text item, removed whole
    Item,
}

#[derive(Debug)]
struct Segment {
    path: Vec<usize>,
    item: usize,
    kind: SegmentKind,
}

fn build_segments(covered: &[Atom]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for atom in covered {
        match atom.kind {
            AtomKind::Text { len } => {
                if let Some(seg) = segments.last_mut() {
                    if seg.path == atom.addr.path && seg.item == atom.addr.item {
                        if let SegmentKind::Text { end, .. } = &mut seg.kind {
                            *end = atom.addr.offset + len;
                            continue;
                        }
                    }
                }
                segments.push(Segment {
                    path: atom.addr.path.clone(),
                    item: atom.addr.item,
                    kind: SegmentKind::Text {
                        start: atom.addr.offset,
                        end: atom.addr.offset + len,
                    },
                });
            }
            AtomKind::Marker(_) => segments.push(Segment {
                path: atom.addr.path.clone(),
                item: atom.addr.item,
                kind: SegmentKind::Item,
            }),
        }
    }
    segments
}

/// Refuse ranges whose atoms do not all share the same unsafe-container
/// context: the full chain of hyperlink/structured-tag ancestors (by
/// instance, not just by kind) must be identical for every covered atom.
fn check_container_boundaries(para: &Paragraph, covered: &[Atom]) -> Result<()> {
    let chain_of = |atom: &Atom| -> Vec<(Vec<usize>, &'static str)> {
        unsafe_ancestors(para, &atom.addr.path)
            .into_iter()
            .map(|(prefix, name)| (atom.addr.path[..prefix].to_vec(), name))
            .collect()
    };

    let first = chain_of(&covered[0]);
    for atom in &covered[1..] {
        let current = chain_of(atom);
        if current != first {
            // name the container at the first point of divergence
            let container = current
                .iter()
                .zip(first.iter())
                .find(|(a, b)| a != b)
                .map(|(a, _)| a.1)
                .or_else(|| current.get(first.len()).map(|c| c.1))
                .or_else(|| first.get(current.len()).map(|c| c.1))
                .expect("a mismatch involves at least one container");
            tracing::debug!(
                paragraph = %para.id(),
                container,
                "refusing replacement across container boundary"
            );
            return Err(EditError::BoundaryCrossed {
                container,
                paragraph: para.id().as_uuid(),
            });
        }
    }
    Ok(())
}

fn item_text_mut(content: &mut RunContent) -> Option<&mut String> {
    match content {
        RunContent::Text(s) | RunContent::DeletedText(s) | RunContent::InstrText(s) => Some(s),
        _ => None,
    }
}

/// Split the run at `path` just before `(item, offset)`. The head keeps
/// everything before the split point; a new tail run with cloned properties
/// receives the rest and is inserted as the next sibling. Returns the tail
/// run's ID.
fn split_run(para: &mut Paragraph, path: &[usize], item: usize, offset: usize) -> NodeId {
    let index = *path.last().expect("run path is never empty");
    let list = sibling_list_mut(para, path).expect("sibling list resolves");
    let InlineNode::Run(run) = &mut list[index] else {
        unreachable!("split target is a run");
    };

    let mut tail_items: Vec<RunContent> = if item + 1 <= run.content.len() {
        run.content.split_off((item + 1).min(run.content.len()))
    } else {
        Vec::new()
    };

    if offset == 0 {
        // The whole boundary item belongs to the tail.
        if run.content.len() > item {
            if let Some(boundary) = run.content.pop() {
                tail_items.insert(0, boundary);
            }
        }
    } else if let Some(text) = run.content.get_mut(item).and_then(item_text_mut) {
        if offset < text.len() {
            let tail_part = text.split_off(offset);
            tail_items.insert(0, RunContent::Text(tail_part));
        }
    }

    let tail_run = Run::with_content(run.props.clone(), tail_items);
    let tail_id = tail_run.id();
    list.insert(index + 1, InlineNode::Run(tail_run));
    tail_id
}

/// Remove touched runs left with zero-length text, cascading removal of any
/// wrapper container the removal leaves empty.
fn cleanup_empty_runs(nodes: &mut Vec<InlineNode>, affected: &HashSet<NodeId>) {
    let mut index = 0;
    while index < nodes.len() {
        let remove = match &mut nodes[index] {
            InlineNode::Run(run) => affected.contains(&run.id()) && run.is_effectively_empty(),
            node => {
                if let Some(children) = node.children_mut() {
                    let before = children.len();
                    cleanup_empty_runs(children, affected);
                    children.len() != before && children.is_empty()
                } else {
                    false
                }
            }
        };
        if remove {
            nodes.remove(index);
        } else {
            index += 1;
        }
    }
}

fn run_exists(para: &Paragraph, id: NodeId) -> bool {
    fn scan(nodes: &[InlineNode], id: NodeId) -> bool {
        nodes.iter().any(|node| match node {
            InlineNode::Run(run) => run.id() == id,
            _ => node.children().map(|c| scan(c, id)).unwrap_or(false),
        })
    }
    scan(&para.children, id)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::Hyperlink;

    fn bold() -> RunProperties {
        RunProperties::bold()
    }

    fn runs_of(para: &Paragraph) -> Vec<&Run> {
        fn collect<'a>(nodes: &'a [InlineNode], out: &mut Vec<&'a Run>) {
            for node in nodes {
                match node {
                    InlineNode::Run(run) => out.push(run),
                    _ => {
                        if let Some(children) = node.children() {
                            collect(children, out);
                        }
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&para.children, &mut out);
        out
    }

    #[test]
    fn test_uniform_replacement_reuses_properties() {
        let mut para = Paragraph::with_children(vec![InlineNode::Run(Run::with_props(
            "Hello world",
            bold(),
        ))]);
        let outcome = replace_range(&mut para, 6, 11, "there").unwrap();
        assert_eq!(para.visible_text(), "Hello there");
        assert_eq!(outcome.groups_spanned, 1);
        let runs = runs_of(&para);
        assert!(runs.iter().all(|r| r.props.formatting_eq(&bold())));
    }

    #[test]
    fn test_replacement_within_fragmented_runs() {
        // same formatting split across three runs: boundaries are history,
        // not meaning
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("ab")),
            InlineNode::Run(Run::new("cd")),
            InlineNode::Run(Run::new("ef")),
        ]);
        replace_range(&mut para, 1, 5, "X").unwrap();
        assert_eq!(para.visible_text(), "aXf");
    }

    #[test]
    fn test_mixed_formatting_takes_first_group() {
        // Bold / plain / bold; replacing across all three puts the new text
        // in a bold run and leaves no stray plain runs.
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::with_props("Bold", bold())),
            InlineNode::Run(Run::new("plain")),
            InlineNode::Run(Run::with_props("Bold", bold())),
        ]);
        let outcome = replace_range(&mut para, 0, 13, "X").unwrap();
        assert_eq!(para.visible_text(), "X");
        assert_eq!(outcome.groups_spanned, 2);
        let runs = runs_of(&para);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].props.formatting_eq(&bold()));
    }

    #[test]
    fn test_split_preserves_head_and_tail() {
        let mut para = Paragraph::with_children(vec![InlineNode::Run(Run::with_props(
            "abcdef",
            bold(),
        ))]);
        let outcome = replace_range(&mut para, 2, 4, "XY").unwrap();
        assert_eq!(para.visible_text(), "abXYef");
        assert_eq!(outcome.created.len(), 1);
        // head / replacement / tail, all bold
        let runs = runs_of(&para);
        assert_eq!(runs.len(), 3);
        assert!(runs.iter().all(|r| r.props.formatting_eq(&bold())));
        assert_eq!(runs[0].text(), "ab");
        assert_eq!(runs[1].text(), "XY");
        assert_eq!(runs[2].text(), "ef");
    }

    #[test]
    fn test_refusal_on_hyperlink_boundary() {
        // "plain text" then a hyperlink starting at atom 10
        let link = Hyperlink::new("https://example.com")
            .with_children(vec![InlineNode::Run(Run::new("linked text"))]);
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("plain text")),
            InlineNode::Hyperlink(link),
        ]);
        let before = para.clone();

        let err = replace_range(&mut para, 5, 15, "text").unwrap_err();
        match err {
            EditError::BoundaryCrossed { container, .. } => {
                assert_eq!(container, "w:hyperlink");
            }
            other => panic!("expected BoundaryCrossed, got {other:?}"),
        }
        // refusal leaves the paragraph byte-for-byte untouched
        assert_eq!(para, before);
    }

    #[test]
    fn test_refusal_on_structured_tag_boundary() {
        let tag = doc_model::StructuredTag::new()
            .with_children(vec![InlineNode::Run(Run::new("field value"))]);
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("before ")),
            InlineNode::StructuredTag(tag),
        ]);
        let err = replace_range(&mut para, 3, 10, "x").unwrap_err();
        assert!(matches!(
            err,
            EditError::BoundaryCrossed {
                container: "w:sdt",
                ..
            }
        ));
    }

    #[test]
    fn test_replacement_entirely_inside_hyperlink_is_allowed() {
        let link = Hyperlink::new("https://example.com")
            .with_children(vec![InlineNode::Run(Run::new("click here"))]);
        let mut para = Paragraph::with_children(vec![InlineNode::Hyperlink(link)]);
        replace_range(&mut para, 6, 10, "there").unwrap();
        assert_eq!(para.visible_text(), "click there");
        // replacement stayed inside the hyperlink
        assert!(matches!(&para.children[0], InlineNode::Hyperlink(h) if h.children.len() > 1));
    }

    #[test]
    fn test_pure_insertion_uses_following_run_properties() {
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("plain ")),
            InlineNode::Run(Run::with_props("bold", bold())),
        ]);
        let outcome = replace_range(&mut para, 6, 6, "very ").unwrap();
        assert_eq!(para.visible_text(), "plain very bold");
        assert_eq!(outcome.groups_spanned, 0);
        let runs = runs_of(&para);
        let inserted = runs
            .iter()
            .find(|r| r.id() == outcome.created[0])
            .unwrap();
        assert!(inserted.props.formatting_eq(&bold()));
    }

    #[test]
    fn test_insertion_at_paragraph_end_uses_preceding_properties() {
        let mut para = Paragraph::with_children(vec![InlineNode::Run(Run::with_props(
            "tail",
            bold(),
        ))]);
        let outcome = replace_range(&mut para, 4, 4, "!").unwrap();
        assert_eq!(para.visible_text(), "tail!");
        let runs = runs_of(&para);
        let inserted = runs
            .iter()
            .find(|r| r.id() == outcome.created[0])
            .unwrap();
        assert!(inserted.props.formatting_eq(&bold()));
    }

    #[test]
    fn test_insertion_into_empty_paragraph() {
        let mut para = Paragraph::new();
        para.props.mark_run_props = Some(RunProperties::italic());
        let outcome = replace_range(&mut para, 0, 0, "fresh").unwrap();
        assert_eq!(para.visible_text(), "fresh");
        let runs = runs_of(&para);
        assert!(runs[0].props.formatting_eq(&RunProperties::italic()));
        assert_eq!(outcome.created.len(), 1);
    }

    #[test]
    fn test_pure_deletion_cleans_up_empty_runs() {
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("ab")),
            InlineNode::Run(Run::with_props("cd", bold())),
            InlineNode::Run(Run::new("ef")),
        ]);
        replace_range(&mut para, 2, 4, "").unwrap();
        assert_eq!(para.visible_text(), "abef");
        // the fully covered bold run is gone, not left empty
        assert_eq!(runs_of(&para).len(), 2);
    }

    #[test]
    fn test_wrapper_cascade_on_emptied_run() {
        // deleting the only visible text of an insertion wrapper removes the
        // wrapper as well
        let mut para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("keep")),
            InlineNode::Insertion(
                doc_model::RevisionSpan::new(1, "Reviewer")
                    .with_children(vec![InlineNode::Run(Run::new("drop"))]),
            ),
        ]);
        replace_range(&mut para, 4, 8, "").unwrap();
        assert_eq!(para.visible_text(), "keep");
        assert_eq!(para.children.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_range() {
        let mut para = Paragraph::with_text("short");
        assert!(matches!(
            replace_range(&mut para, 0, 99, "x"),
            Err(EditError::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            replace_range(&mut para, 3, 1, "x"),
            Err(EditError::InvalidRange { .. })
        ));
        assert_eq!(para.visible_text(), "short");
    }

    #[test]
    fn test_range_over_marker_removes_it() {
        let run = Run::with_content(
            RunProperties::default(),
            vec![
                RunContent::Text("a".into()),
                RunContent::Tab,
                RunContent::Text("b".into()),
            ],
        );
        let mut para = Paragraph::with_children(vec![InlineNode::Run(run)]);
        replace_range(&mut para, 0, 3, "c").unwrap();
        assert_eq!(para.visible_text(), "c");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn style_for(tag: u8) -> RunProperties {
            match tag % 3 {
                0 => RunProperties::default(),
                1 => RunProperties::bold(),
                _ => RunProperties::italic(),
            }
        }

        proptest! {
            /// Every run in the result carries formatting drawn from the
            /// original runs (or the default used by empty-paragraph
            /// insertion) - never a blended property set.
            #[test]
            fn prop_no_blended_formatting(
                specs in prop::collection::vec(("[a-z]{0,6}", 0u8..3), 1..5),
                start_seed in 0usize..64,
                len_seed in 0usize..64,
                replacement in "[A-Z]{0,5}",
            ) {
                let children: Vec<InlineNode> = specs
                    .iter()
                    .map(|(text, tag)| InlineNode::Run(Run::with_props(text.clone(), style_for(*tag))))
                    .collect();
                let originals: Vec<RunProperties> =
                    specs.iter().map(|(_, tag)| style_for(*tag)).collect();
                let mut para = Paragraph::with_children(children);

                let total = linearize(&para).len();
                let start = start_seed % (total + 1);
                let end = start + len_seed % (total - start + 1);

                replace_range(&mut para, start, end, &replacement).unwrap();

                fn collect<'a>(nodes: &'a [InlineNode], out: &mut Vec<&'a Run>) {
                    for node in nodes {
                        match node {
                            InlineNode::Run(run) => out.push(run),
                            _ => {
                                if let Some(children) = node.children() {
                                    collect(children, out);
                                }
                            }
                        }
                    }
                }
                let mut result_runs = Vec::new();
                collect(&para.children, &mut result_runs);

                for run in result_runs {
                    let known = originals.iter().any(|p| run.props.formatting_eq(p))
                        || run.props.formatting_eq(&RunProperties::default());
                    prop_assert!(known, "run has blended formatting: {:?}", run.props);
                }
            }
        }
    }
}
