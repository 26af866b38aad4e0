//! Text run node - a contiguous span of content with consistent formatting
//!
//! Run boundaries are an artifact of edit history and carry no semantic
//! meaning; a paragraph's text may be split across runs at arbitrary points.

use crate::{BreakKind, FieldCharKind, NodeId, RunProperties};
use serde::{Deserialize, Serialize};

/// One content item inside a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunContent {
    /// Normal visible text (`w:t`)
    Text(String),
    /// Text inside a deletion wrapper (`w:delText`); semantically identical
    /// to normal text but only visible when deletions are kept. Rejecting a
    /// deletion converts this back to [`RunContent::Text`].
    DeletedText(String),
    /// Field instruction text (`w:instrText`); never part of the visible
    /// stream
    InstrText(String),
    /// Line/page/column break (`w:br`)
    Break(BreakKind),
    /// Field state delimiter (`w:fldChar`)
    FieldChar(FieldCharKind),
    /// Tab character (`w:tab`)
    Tab,
}

impl RunContent {
    /// The string payload, if this item carries one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RunContent::Text(s) | RunContent::DeletedText(s) | RunContent::InstrText(s) => Some(s),
            _ => None,
        }
    }
}

/// A text run - contiguous content sharing one formatting-properties object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    id: NodeId,
    /// Formatting properties for the whole run
    pub props: RunProperties,
    /// Ordered content items
    pub content: Vec<RunContent>,
}

impl Run {
    /// Create a new run with visible text and default formatting
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            props: RunProperties::default(),
            content: vec![RunContent::Text(text.into())],
        }
    }

    /// Create a new run with visible text and the given formatting
    pub fn with_props(text: impl Into<String>, props: RunProperties) -> Self {
        Self {
            id: NodeId::new(),
            props,
            content: vec![RunContent::Text(text.into())],
        }
    }

    /// Create a run holding deleted text (as found inside a `w:del` wrapper)
    pub fn deleted(text: impl Into<String>, props: RunProperties) -> Self {
        Self {
            id: NodeId::new(),
            props,
            content: vec![RunContent::DeletedText(text.into())],
        }
    }

    /// Create a run from prepared content items (used when splitting runs)
    pub fn with_content(props: RunProperties, content: Vec<RunContent>) -> Self {
        Self {
            id: NodeId::new(),
            props,
            content,
        }
    }

    /// Create an empty run with the given formatting
    pub fn empty(props: RunProperties) -> Self {
        Self {
            id: NodeId::new(),
            props,
            content: Vec::new(),
        }
    }

    /// Get the unique ID of this run
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Concatenated normal (visible) text of this run
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated deleted text of this run
    pub fn deleted_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::DeletedText(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// A run is removable when it carries no content at all, or only
    /// zero-length text items.
    pub fn is_effectively_empty(&self) -> bool {
        self.content.iter().all(|c| match c {
            RunContent::Text(s) | RunContent::DeletedText(s) | RunContent::InstrText(s) => {
                s.is_empty()
            }
            _ => false,
        })
    }

    /// Convert every deleted-text item back to normal text (reject path)
    pub fn restore_deleted_text(&mut self) {
        for item in &mut self.content {
            if let RunContent::DeletedText(s) = item {
                *item = RunContent::Text(std::mem::take(s));
            }
        }
    }

    /// Convert every normal text item to deleted text (used when recording
    /// a tracked deletion)
    pub fn mark_text_deleted(&mut self) {
        for item in &mut self.content {
            if let RunContent::Text(s) = item {
                *item = RunContent::DeletedText(std::mem::take(s));
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_and_deleted_text() {
        let run = Run {
            id: NodeId::new(),
            props: RunProperties::default(),
            content: vec![
                RunContent::Text("kept ".into()),
                RunContent::DeletedText("gone".into()),
                RunContent::InstrText("PAGE".into()),
            ],
        };
        assert_eq!(run.text(), "kept ");
        assert_eq!(run.deleted_text(), "gone");
    }

    #[test]
    fn test_restore_deleted_text() {
        let mut run = Run::deleted("old", RunProperties::default());
        run.restore_deleted_text();
        assert_eq!(run.text(), "old");
        assert_eq!(run.deleted_text(), "");
    }

    #[test]
    fn test_effectively_empty() {
        assert!(Run::empty(RunProperties::default()).is_effectively_empty());
        assert!(Run::with_props("", RunProperties::bold()).is_effectively_empty());
        assert!(!Run::new("x").is_effectively_empty());

        // A break is content even with no text
        let run = Run {
            id: NodeId::new(),
            props: RunProperties::default(),
            content: vec![RunContent::Break(BreakKind::TextWrapping)],
        };
        assert!(!run.is_effectively_empty());
    }
}
