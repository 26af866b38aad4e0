//! Atom stream - offset-based addressing over fragmented runs
//!
//! Linearizing a paragraph flattens its visible content into a sequence of
//! atoms: one per visible grapheme cluster, plus one per rendered marker
//! (break, tab). Each atom carries the address of its owning run, so
//! character-offset ranges can be mapped back onto arbitrarily fragmented
//! run structure at the point of mutation.
//!
//! Field-code instruction text is excluded from the visible stream (both
//! `w:instrText` items and anything between a `begin` and `separate` field
//! character); field result text is included. Deleted text is hidden.

use crate::{BreakKind, FieldCharKind, InlineNode, Paragraph, Run, RunContent};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Address of one content position inside a paragraph's inline tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomAddr {
    /// Child-index path from the paragraph to the owning run
    pub path: Vec<usize>,
    /// Index of the content item within the run
    pub item: usize,
    /// Byte offset within the item's text (0 for non-text items)
    pub offset: usize,
}

/// What an atom renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtomKind {
    /// One grapheme cluster of visible text; `len` is its byte length
    Text { len: usize },
    /// A non-text marker occupying one stream position
    Marker(MarkerKind),
}

/// Non-text markers that occupy a position in the visible stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Break(BreakKind),
    Tab,
}

/// One addressable unit of a linearized paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub addr: AtomAddr,
    pub kind: AtomKind,
}

impl Atom {
    /// Whether this atom is visible text (not a marker)
    pub fn is_text(&self) -> bool {
        matches!(self.kind, AtomKind::Text { .. })
    }
}

/// Field-region tracking: one stack entry per open field, `true` while in
/// the instruction part (begin..separate).
#[derive(Debug, Default)]
struct FieldState {
    stack: Vec<bool>,
}

impl FieldState {
    fn apply(&mut self, kind: FieldCharKind) {
        match kind {
            FieldCharKind::Begin => self.stack.push(true),
            FieldCharKind::Separate => {
                if let Some(top) = self.stack.last_mut() {
                    *top = false;
                }
            }
            FieldCharKind::End => {
                self.stack.pop();
            }
        }
    }

    fn in_instruction(&self) -> bool {
        self.stack.iter().any(|&instr| instr)
    }
}

/// Flatten a paragraph's visible content into its atom stream
pub fn linearize(para: &Paragraph) -> Vec<Atom> {
    let mut atoms = Vec::new();
    let mut state = FieldState::default();
    let mut path = Vec::new();
    walk(&para.children, &mut path, &mut state, &mut atoms);
    atoms
}

fn walk(
    nodes: &[InlineNode],
    path: &mut Vec<usize>,
    state: &mut FieldState,
    atoms: &mut Vec<Atom>,
) {
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        match node {
            InlineNode::Run(run) => emit_run(run, path, state, atoms),
            _ => {
                if let Some(children) = node.children() {
                    walk(children, path, state, atoms);
                }
            }
        }
        path.pop();
    }
}

fn emit_run(run: &Run, path: &[usize], state: &mut FieldState, atoms: &mut Vec<Atom>) {
    for (item, content) in run.content.iter().enumerate() {
        match content {
            RunContent::Text(text) => {
                if state.in_instruction() {
                    continue;
                }
                for (offset, grapheme) in text.grapheme_indices(true) {
                    atoms.push(Atom {
                        addr: AtomAddr {
                            path: path.to_vec(),
                            item,
                            offset,
                        },
                        kind: AtomKind::Text {
                            len: grapheme.len(),
                        },
                    });
                }
            }
            // Hidden or instruction-only content never reaches the stream
            RunContent::DeletedText(_) | RunContent::InstrText(_) => {}
            RunContent::Break(kind) => atoms.push(Atom {
                addr: AtomAddr {
                    path: path.to_vec(),
                    item,
                    offset: 0,
                },
                kind: AtomKind::Marker(MarkerKind::Break(*kind)),
            }),
            RunContent::Tab => atoms.push(Atom {
                addr: AtomAddr {
                    path: path.to_vec(),
                    item,
                    offset: 0,
                },
                kind: AtomKind::Marker(MarkerKind::Tab),
            }),
            RunContent::FieldChar(kind) => state.apply(*kind),
        }
    }
}

/// The visible text of a paragraph: text atoms verbatim, tabs as `\t`,
/// breaks as `\n`.
pub fn visible_text(para: &Paragraph) -> String {
    let mut out = String::new();
    for atom in linearize(para) {
        match atom.kind {
            AtomKind::Text { .. } => {
                if let Some(s) = atom_text(para, &atom) {
                    out.push_str(s);
                }
            }
            AtomKind::Marker(MarkerKind::Tab) => out.push('\t'),
            AtomKind::Marker(MarkerKind::Break(_)) => out.push('\n'),
        }
    }
    out
}

/// Resolve the text slice an atom points at
pub fn atom_text<'a>(para: &'a Paragraph, atom: &Atom) -> Option<&'a str> {
    let AtomKind::Text { len } = atom.kind else {
        return None;
    };
    let run = run_at(para, &atom.addr.path)?;
    let text = run.content.get(atom.addr.item)?.as_text()?;
    text.get(atom.addr.offset..atom.addr.offset + len)
}

// =============================================================================
// Path navigation
// =============================================================================

/// Resolve the node at a child-index path
pub fn node_at<'a>(para: &'a Paragraph, path: &[usize]) -> Option<&'a InlineNode> {
    let (&first, rest) = path.split_first()?;
    let mut node = para.children.get(first)?;
    for &index in rest {
        node = node.children()?.get(index)?;
    }
    Some(node)
}

/// Resolve the run at a child-index path
pub fn run_at<'a>(para: &'a Paragraph, path: &[usize]) -> Option<&'a Run> {
    match node_at(para, path)? {
        InlineNode::Run(run) => Some(run),
        _ => None,
    }
}

/// Resolve the run at a child-index path, mutably
pub fn run_at_mut<'a>(para: &'a mut Paragraph, path: &[usize]) -> Option<&'a mut Run> {
    let (&first, rest) = path.split_first()?;
    let mut node = para.children.get_mut(first)?;
    for &index in rest {
        node = node.children_mut()?.get_mut(index)?;
    }
    match node {
        InlineNode::Run(run) => Some(run),
        _ => None,
    }
}

/// The sibling list containing the node addressed by `path`
pub fn sibling_list_mut<'a>(
    para: &'a mut Paragraph,
    path: &[usize],
) -> Option<&'a mut Vec<InlineNode>> {
    if path.is_empty() {
        return None;
    }
    let mut list = &mut para.children;
    for &index in &path[..path.len() - 1] {
        list = list.get_mut(index)?.children_mut()?;
    }
    Some(list)
}

/// Every unsafe container (hyperlink / structured tag) on the path to a
/// node, outermost first, as (prefix length, qualified name) pairs. The
/// prefix length identifies the container instance: `path[..prefix]`.
pub fn unsafe_ancestors(para: &Paragraph, path: &[usize]) -> Vec<(usize, &'static str)> {
    let mut found = Vec::new();
    let mut nodes: &[InlineNode] = &para.children;
    for (depth, &index) in path.iter().enumerate() {
        let Some(node) = nodes.get(index) else {
            break;
        };
        if node.is_unsafe_container() {
            found.push((depth + 1, node.qualified_name()));
        }
        match node.children() {
            Some(children) => nodes = children,
            None => break,
        }
    }
    found
}

/// The outermost unsafe container on the path to a node, if any
pub fn unsafe_ancestor(para: &Paragraph, path: &[usize]) -> Option<(usize, &'static str)> {
    unsafe_ancestors(para, path).into_iter().next()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hyperlink, RevisionSpan, RunProperties};

    #[test]
    fn test_linearize_simple_text() {
        let para = Paragraph::with_text("abc");
        let atoms = linearize(&para);
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].addr.path, vec![0]);
        assert_eq!(atoms[2].addr.offset, 2);
        assert_eq!(visible_text(&para), "abc");
    }

    #[test]
    fn test_linearize_across_fragmented_runs() {
        let para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("He")),
            InlineNode::Run(Run::new("llo")),
        ]);
        let atoms = linearize(&para);
        assert_eq!(atoms.len(), 5);
        assert_eq!(atoms[1].addr.path, vec![0]);
        assert_eq!(atoms[2].addr.path, vec![1]);
        assert_eq!(visible_text(&para), "Hello");
    }

    #[test]
    fn test_deleted_text_is_hidden() {
        let para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("keep")),
            InlineNode::Deletion(RevisionSpan::new(1, "Reviewer").with_children(vec![
                InlineNode::Run(Run::deleted("drop", RunProperties::default())),
            ])),
        ]);
        assert_eq!(visible_text(&para), "keep");
    }

    #[test]
    fn test_field_instruction_text_excluded() {
        let run = Run::with_content(
            RunProperties::default(),
            vec![
                RunContent::Text("before ".into()),
                RunContent::FieldChar(FieldCharKind::Begin),
                RunContent::InstrText("PAGE".into()),
                RunContent::Text("hidden instruction".into()),
                RunContent::FieldChar(FieldCharKind::Separate),
                RunContent::Text("7".into()),
                RunContent::FieldChar(FieldCharKind::End),
                RunContent::Text(" after".into()),
            ],
        );
        let para = Paragraph::with_children(vec![InlineNode::Run(run)]);
        assert_eq!(visible_text(&para), "before 7 after");
    }

    #[test]
    fn test_markers_render_as_placeholders() {
        let run = Run::with_content(
            RunProperties::default(),
            vec![
                RunContent::Text("a".into()),
                RunContent::Tab,
                RunContent::Text("b".into()),
                RunContent::Break(BreakKind::TextWrapping),
            ],
        );
        let para = Paragraph::with_children(vec![InlineNode::Run(run)]);
        let atoms = linearize(&para);
        assert_eq!(atoms.len(), 4);
        assert!(!atoms[1].is_text());
        assert_eq!(visible_text(&para), "a\tb\n");
    }

    #[test]
    fn test_grapheme_clusters_are_single_atoms() {
        // family emoji is one grapheme built from multiple scalars
        let para = Paragraph::with_text("a\u{1F469}\u{200D}\u{1F467}b");
        let atoms = linearize(&para);
        assert_eq!(atoms.len(), 3);
        assert_eq!(visible_text(&para), "a\u{1F469}\u{200D}\u{1F467}b");
    }

    #[test]
    fn test_unsafe_ancestor_detection() {
        let link =
            Hyperlink::new("https://example.com").with_children(vec![InlineNode::Run(Run::new(
                "link",
            ))]);
        let para = Paragraph::with_children(vec![
            InlineNode::Run(Run::new("out ")),
            InlineNode::Hyperlink(link),
        ]);
        let atoms = linearize(&para);
        // "out " atoms are unprotected
        assert_eq!(unsafe_ancestor(&para, &atoms[0].addr.path), None);
        // "link" atoms live under the hyperlink
        let (prefix, name) = unsafe_ancestor(&para, &atoms[4].addr.path).unwrap();
        assert_eq!(&atoms[4].addr.path[..prefix], &[1]);
        assert_eq!(name, "w:hyperlink");
    }

    #[test]
    fn test_atoms_inside_wrappers_resolve() {
        let para = Paragraph::with_children(vec![InlineNode::Insertion(
            RevisionSpan::new(1, "Reviewer")
                .with_children(vec![InlineNode::Run(Run::new("new"))]),
        )]);
        let atoms = linearize(&para);
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].addr.path, vec![0, 0]);
        assert_eq!(atom_text(&para, &atoms[0]), Some("n"));
        assert!(run_at(&para, &atoms[0].addr.path).is_some());
    }
}
