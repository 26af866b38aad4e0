//! Bookmark anchors - named start/end marker pairs used as stable
//! paragraph identity keys
//!
//! Every individually addressable paragraph carries exactly one anchor.
//! When a transform removes the paragraph that owns an anchor, the anchor's
//! markers are relocated to a surviving neighbor rather than destroyed, so
//! identity lookups in the transformed tree remain valid.

use crate::{InlineNode, Paragraph};

/// Maximum anchor name length
pub const MAX_ANCHOR_NAME_LENGTH: usize = 40;

/// Errors that can occur during anchor name validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorValidationError {
    /// Name is empty
    EmptyName,
    /// Name contains invalid characters
    InvalidCharacters,
    /// Name doesn't start with a letter
    MustStartWithLetter,
    /// Name is too long (max 40 characters)
    NameTooLong,
}

impl std::fmt::Display for AnchorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnchorValidationError::EmptyName => write!(f, "Anchor name cannot be empty"),
            AnchorValidationError::InvalidCharacters => {
                write!(f, "Anchor name can only contain letters, numbers, and underscores")
            }
            AnchorValidationError::MustStartWithLetter => {
                write!(f, "Anchor name must start with a letter")
            }
            AnchorValidationError::NameTooLong => {
                write!(f, "Anchor name cannot exceed {} characters", MAX_ANCHOR_NAME_LENGTH)
            }
        }
    }
}

impl std::error::Error for AnchorValidationError {}

/// Validate an anchor name
pub fn validate_anchor_name(name: &str) -> Result<(), AnchorValidationError> {
    if name.is_empty() {
        return Err(AnchorValidationError::EmptyName);
    }
    if name.len() > MAX_ANCHOR_NAME_LENGTH {
        return Err(AnchorValidationError::NameTooLong);
    }
    let first = name.chars().next().unwrap();
    if !first.is_ascii_alphabetic() {
        return Err(AnchorValidationError::MustStartWithLetter);
    }
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' {
            return Err(AnchorValidationError::InvalidCharacters);
        }
    }
    Ok(())
}

/// The name of the first bookmark anchor in a paragraph, if any
pub fn anchor_name(para: &Paragraph) -> Option<String> {
    fn scan(nodes: &[InlineNode]) -> Option<String> {
        for node in nodes {
            match node {
                InlineNode::BookmarkStart { name, .. } => return Some(name.clone()),
                _ => {
                    if let Some(found) = node.children().and_then(scan) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }
    scan(&para.children)
}

/// Attach a named anchor (start/end marker pair) around a paragraph's
/// content. The caller is responsible for name uniqueness.
pub fn attach_anchor(para: &mut Paragraph, id: u64, name: impl Into<String>) {
    para.insert_before(
        0,
        InlineNode::BookmarkStart {
            id,
            name: name.into(),
        },
    );
    para.push(InlineNode::BookmarkEnd { id });
}

/// Detach every bookmark marker from a paragraph (any depth), preserving
/// encounter order. Used when a paragraph is about to be removed and its
/// anchors must survive on a neighbor.
pub fn detach_anchor_markers(para: &mut Paragraph) -> Vec<InlineNode> {
    let mut detached = Vec::new();
    fn drain(nodes: &mut Vec<InlineNode>, out: &mut Vec<InlineNode>) {
        let mut index = 0;
        while index < nodes.len() {
            let is_bookmark_marker = matches!(
                nodes[index],
                InlineNode::BookmarkStart { .. } | InlineNode::BookmarkEnd { .. }
            );
            if is_bookmark_marker {
                out.push(nodes.remove(index));
            } else {
                if let Some(children) = nodes[index].children_mut() {
                    drain(children, out);
                }
                index += 1;
            }
        }
    }
    drain(&mut para.children, &mut detached);
    detached
}

/// Prepend relocated anchor markers to a surviving paragraph, keeping start
/// markers ahead of the paragraph's own content
pub fn attach_markers_front(para: &mut Paragraph, markers: Vec<InlineNode>) {
    for (offset, marker) in markers.into_iter().enumerate() {
        para.insert_before(offset, marker);
    }
}

/// Append relocated anchor markers to a surviving paragraph
pub fn attach_markers_back(para: &mut Paragraph, markers: Vec<InlineNode>) {
    for marker in markers {
        para.push(marker);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_anchor_name() {
        assert!(validate_anchor_name("p1").is_ok());
        assert!(validate_anchor_name("row_12_body").is_ok());
        assert_eq!(validate_anchor_name(""), Err(AnchorValidationError::EmptyName));
        assert_eq!(
            validate_anchor_name("1abc"),
            Err(AnchorValidationError::MustStartWithLetter)
        );
        assert_eq!(
            validate_anchor_name("has space"),
            Err(AnchorValidationError::InvalidCharacters)
        );
        assert_eq!(
            validate_anchor_name(&"x".repeat(41)),
            Err(AnchorValidationError::NameTooLong)
        );
    }

    #[test]
    fn test_attach_and_read_anchor() {
        let mut para = Paragraph::with_text("body");
        attach_anchor(&mut para, 7, "p3");
        assert_eq!(anchor_name(&para), Some("p3".to_string()));
        // content sits between the markers
        assert!(matches!(para.children[0], InlineNode::BookmarkStart { .. }));
        assert!(matches!(
            para.children.last(),
            Some(InlineNode::BookmarkEnd { .. })
        ));
    }

    #[test]
    fn test_detach_and_relocate() {
        let mut doomed = Paragraph::with_text("going away");
        attach_anchor(&mut doomed, 1, "p2");
        let markers = detach_anchor_markers(&mut doomed);
        assert_eq!(markers.len(), 2);
        assert_eq!(anchor_name(&doomed), None);

        let mut survivor = Paragraph::with_text("staying");
        attach_markers_front(&mut survivor, markers);
        assert_eq!(anchor_name(&survivor), Some("p2".to_string()));
        assert_eq!(survivor.visible_text(), "staying");
    }
}
