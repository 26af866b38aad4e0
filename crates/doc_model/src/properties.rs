//! Formatting properties for runs and paragraphs, and the nested
//! "original vs. current" payloads left behind by tracked property changes.

use crate::{Alignment, HighlightColor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Property Change Payload
// =============================================================================

/// The pre-change state of a properties block (`w:rPrChange` / `w:pPrChange`).
///
/// The live properties block holds the *current* (changed) values; this
/// payload holds the *original* ones. Accepting a property change discards
/// the payload; rejecting replaces the live block with `original`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange<T> {
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    pub original: T,
}

impl<T> PropertyChange<T> {
    pub fn new(author: impl Into<String>, original: T) -> Self {
        Self {
            author: author.into(),
            date: None,
            original,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

// =============================================================================
// Paragraph Mark Revisions
// =============================================================================

/// Revision marker on the paragraph mark itself (`w:ins`/`w:del` inside
/// `w:pPr/w:rPr`). An inserted mark means the paragraph did not exist in the
/// original document; a deleted mark means it will not exist once changes
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkRevisionKind {
    Inserted,
    Deleted,
}

/// Author and date metadata attached to a paragraph-mark revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkRevision {
    pub kind: MarkRevisionKind,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

impl MarkRevision {
    pub fn inserted(author: impl Into<String>) -> Self {
        Self {
            kind: MarkRevisionKind::Inserted,
            author: author.into(),
            date: None,
        }
    }

    pub fn deleted(author: impl Into<String>) -> Self {
        Self {
            kind: MarkRevisionKind::Deleted,
            author: author.into(),
            date: None,
        }
    }
}

// =============================================================================
// Run Properties
// =============================================================================

/// Character formatting properties for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunProperties {
    /// Character style reference
    pub style_id: Option<String>,
    /// Font family name
    pub font_family: Option<String>,
    /// Font size in points
    pub font_size: Option<f32>,
    /// Bold formatting
    pub bold: Option<bool>,
    /// Italic formatting
    pub italic: Option<bool>,
    /// Underline formatting
    pub underline: Option<bool>,
    /// Strikethrough formatting
    pub strikethrough: Option<bool>,
    /// Text color (hex string without '#')
    pub color: Option<String>,
    /// Highlight color from the fixed palette
    pub highlight: Option<HighlightColor>,
    /// Tracked property change: the original properties before the change
    #[serde(default)]
    pub change: Option<Box<PropertyChange<RunProperties>>>,
    /// Transient deletion bookkeeping on the run properties, stripped by the
    /// reject transform's cleanup pass
    #[serde(default)]
    pub deleted_mark: bool,
}

impl RunProperties {
    /// Create new empty run properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no formatting is set (revision bookkeeping ignored)
    pub fn is_empty(&self) -> bool {
        self.style_id.is_none()
            && self.font_family.is_none()
            && self.font_size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.strikethrough.is_none()
            && self.color.is_none()
            && self.highlight.is_none()
    }

    /// Compare only the formatting-bearing fields, ignoring revision
    /// bookkeeping. Two runs with equal formatting are one logical span.
    pub fn formatting_eq(&self, other: &RunProperties) -> bool {
        self.style_id == other.style_id
            && self.font_family == other.font_family
            && self.font_size == other.font_size
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.color == other.color
            && self.highlight == other.highlight
    }

    /// Clone the formatting-bearing fields only. The result carries no
    /// property-change payload and no deletion bookkeeping, so it is safe to
    /// attach to a freshly created run.
    pub fn cloned_formatting(&self) -> RunProperties {
        RunProperties {
            style_id: self.style_id.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
            color: self.color.clone(),
            highlight: self.highlight,
            change: None,
            deleted_mark: false,
        }
    }

    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Default::default()
        }
    }
}

// =============================================================================
// Paragraph Properties
// =============================================================================

/// Paragraph formatting properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProperties {
    /// Paragraph style reference
    pub style_id: Option<String>,
    /// Text alignment
    pub alignment: Option<Alignment>,
    /// Left indent in points
    pub indent_left: Option<f32>,
    /// Right indent in points
    pub indent_right: Option<f32>,
    /// First line indent in points (negative for hanging)
    pub indent_first_line: Option<f32>,
    /// Space before paragraph in points
    pub space_before: Option<f32>,
    /// Space after paragraph in points
    pub space_after: Option<f32>,
    /// Tracked property change: the original properties before the change
    #[serde(default)]
    pub change: Option<Box<PropertyChange<ParagraphProperties>>>,
    /// Revision of the paragraph mark itself (paragraph inserted/deleted)
    #[serde(default)]
    pub mark_revision: Option<MarkRevision>,
    /// Run properties of the paragraph mark; used as the default formatting
    /// when inserting into an otherwise empty paragraph
    #[serde(default)]
    pub mark_run_props: Option<RunProperties>,
}

impl ParagraphProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no formatting is set (revision bookkeeping ignored)
    pub fn is_empty(&self) -> bool {
        self.style_id.is_none()
            && self.alignment.is_none()
            && self.indent_left.is_none()
            && self.indent_right.is_none()
            && self.indent_first_line.is_none()
            && self.space_before.is_none()
            && self.space_after.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================
