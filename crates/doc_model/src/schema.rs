//! Schema constants - qualified names and controlled vocabularies
//!
//! Central table of the WordprocessingML element and attribute names the
//! model maps onto, plus the closed value sets (alignment, highlight
//! palette, field-character states, break types) used across the crate.
//! No behavior beyond parse/format round-trips.

use serde::{Deserialize, Serialize};

/// Qualified element and attribute names.
pub mod qn {
    pub const PARAGRAPH: &str = "w:p";
    pub const RUN: &str = "w:r";
    pub const TEXT: &str = "w:t";
    pub const DELETED_TEXT: &str = "w:delText";
    pub const INSTR_TEXT: &str = "w:instrText";
    pub const BREAK: &str = "w:br";
    pub const TAB: &str = "w:tab";
    pub const FIELD_CHAR: &str = "w:fldChar";

    pub const INSERTION: &str = "w:ins";
    pub const DELETION: &str = "w:del";
    pub const MOVE_FROM: &str = "w:moveFrom";
    pub const MOVE_TO: &str = "w:moveTo";
    pub const RUN_PROPS_CHANGE: &str = "w:rPrChange";
    pub const PARA_PROPS_CHANGE: &str = "w:pPrChange";

    pub const BOOKMARK_START: &str = "w:bookmarkStart";
    pub const BOOKMARK_END: &str = "w:bookmarkEnd";
    pub const COMMENT_RANGE_START: &str = "w:commentRangeStart";
    pub const COMMENT_RANGE_END: &str = "w:commentRangeEnd";
    pub const COMMENT_REFERENCE: &str = "w:commentReference";

    pub const HYPERLINK: &str = "w:hyperlink";
    pub const STRUCTURED_TAG: &str = "w:sdt";

    pub const TABLE: &str = "w:tbl";
    pub const TABLE_ROW: &str = "w:tr";
    pub const TABLE_CELL: &str = "w:tc";

    pub const ATTR_ID: &str = "w:id";
    pub const ATTR_AUTHOR: &str = "w:author";
    pub const ATTR_DATE: &str = "w:date";
    pub const ATTR_NAME: &str = "w:name";
    pub const ATTR_VAL: &str = "w:val";
}

// =============================================================================
// Controlled Vocabularies
// =============================================================================

/// Paragraph text alignment (`w:jc`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// The `w:val` string for this alignment
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }

    /// Parse a `w:val` alignment string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// The fixed highlight palette (`w:highlight`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightColor {
    Yellow,
    Green,
    Cyan,
    Magenta,
    Blue,
    Red,
    DarkBlue,
    DarkCyan,
    DarkGreen,
    DarkMagenta,
    DarkRed,
    DarkYellow,
    DarkGray,
    LightGray,
    Black,
    White,
    None,
}

impl HighlightColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Cyan => "cyan",
            HighlightColor::Magenta => "magenta",
            HighlightColor::Blue => "blue",
            HighlightColor::Red => "red",
            HighlightColor::DarkBlue => "darkBlue",
            HighlightColor::DarkCyan => "darkCyan",
            HighlightColor::DarkGreen => "darkGreen",
            HighlightColor::DarkMagenta => "darkMagenta",
            HighlightColor::DarkRed => "darkRed",
            HighlightColor::DarkYellow => "darkYellow",
            HighlightColor::DarkGray => "darkGray",
            HighlightColor::LightGray => "lightGray",
            HighlightColor::Black => "black",
            HighlightColor::White => "white",
            HighlightColor::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yellow" => Some(HighlightColor::Yellow),
            "green" => Some(HighlightColor::Green),
            "cyan" => Some(HighlightColor::Cyan),
            "magenta" => Some(HighlightColor::Magenta),
            "blue" => Some(HighlightColor::Blue),
            "red" => Some(HighlightColor::Red),
            "darkBlue" => Some(HighlightColor::DarkBlue),
            "darkCyan" => Some(HighlightColor::DarkCyan),
            "darkGreen" => Some(HighlightColor::DarkGreen),
            "darkMagenta" => Some(HighlightColor::DarkMagenta),
            "darkRed" => Some(HighlightColor::DarkRed),
            "darkYellow" => Some(HighlightColor::DarkYellow),
            "darkGray" => Some(HighlightColor::DarkGray),
            "lightGray" => Some(HighlightColor::LightGray),
            "black" => Some(HighlightColor::Black),
            "white" => Some(HighlightColor::White),
            "none" => Some(HighlightColor::None),
            _ => None,
        }
    }
}

/// Field character state (`w:fldChar w:fldCharType`)
///
/// A field is laid out as `begin` [instruction runs] `separate`
/// [result runs] `end`. The atom stream uses these states to exclude
/// instruction text from the visible stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldCharKind {
    Begin,
    Separate,
    End,
}

impl FieldCharKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCharKind::Begin => "begin",
            FieldCharKind::Separate => "separate",
            FieldCharKind::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "begin" => Some(FieldCharKind::Begin),
            "separate" => Some(FieldCharKind::Separate),
            "end" => Some(FieldCharKind::End),
            _ => None,
        }
    }
}

/// Break type (`w:br w:type`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakKind {
    #[default]
    TextWrapping,
    Page,
    Column,
}

impl BreakKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakKind::TextWrapping => "textWrapping",
            BreakKind::Page => "page",
            BreakKind::Column => "column",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "textWrapping" => Some(BreakKind::TextWrapping),
            "page" => Some(BreakKind::Page),
            "column" => Some(BreakKind::Column),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
