//! Error types for editing operations

use doc_model::CommentId;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EditError {
    /// The replacement range straddles the edge of a container that cannot
    /// be cut. The edit is refused and the paragraph left untouched.
    #[error("Replacement range crosses a {container} boundary in paragraph {paragraph}")]
    BoundaryCrossed {
        container: &'static str,
        paragraph: Uuid,
    },

    #[error("Invalid range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Range {start}..{end} is out of bounds for paragraph of length {length}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("Bookmark anchor not found: {0}")]
    AnchorNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Cannot reply to reply {0}: comment threads are one level deep")]
    ReplyToReply(CommentId),

    #[error("Comment text cannot be empty")]
    EmptyCommentText,

    #[error("Author name cannot be empty")]
    EmptyAuthor,

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),
}

pub type Result<T> = std::result::Result<T, EditError>;
