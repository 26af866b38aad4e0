//! Unified error taxonomy for the transport layer
//!
//! The transport maps [`ErrorKind`] onto whatever protocol envelope is in
//! use; the underlying errors keep their full context.

use edit_engine::EditError;
use revisions::RevisionError;
use thiserror::Error;

/// Classification the transport layer switches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The edit would corrupt structure and was refused; narrow the range
    /// or pick a different approach. Never retried automatically.
    StructuralRefusal,
    /// Arguments failed validation; no partial computation was performed
    Validation,
    /// A referenced identifier does not exist
    NotFound,
    /// No resolvable document in this session; a caller-usage error
    MissingContext,
    /// Engine bug; fatal to the operation, never silently swallowed
    Internal,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no document is loaded in this session")]
    MissingDocument,

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    DocModel(#[from] doc_model::DocModelError),
}

impl SessionError {
    /// Classify this error for protocol mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::MissingDocument => ErrorKind::MissingContext,
            SessionError::Edit(err) => match err {
                EditError::BoundaryCrossed { .. } => ErrorKind::StructuralRefusal,
                EditError::InvalidRange { .. }
                | EditError::RangeOutOfBounds { .. }
                | EditError::EmptyCommentText
                | EditError::EmptyAuthor => ErrorKind::Validation,
                EditError::AnchorNotFound(_) | EditError::CommentNotFound(_) => {
                    ErrorKind::NotFound
                }
                EditError::ReplyToReply(_) => ErrorKind::Validation,
                EditError::DocModel(_) => ErrorKind::Internal,
            },
            SessionError::Revision(err) => match err {
                RevisionError::LimitOutOfRange { .. } => ErrorKind::Validation,
                RevisionError::AnchorNotFound(_) => ErrorKind::NotFound,
                RevisionError::DocModel(_) | RevisionError::Internal(_) => ErrorKind::Internal,
            },
            SessionError::DocModel(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            SessionError::MissingDocument.kind(),
            ErrorKind::MissingContext
        );
        assert_eq!(
            SessionError::Edit(EditError::BoundaryCrossed {
                container: "w:hyperlink",
                paragraph: doc_model::NodeId::new().as_uuid(),
            })
            .kind(),
            ErrorKind::StructuralRefusal
        );
        assert_eq!(
            SessionError::Edit(EditError::AnchorNotFound("p1".into())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SessionError::Revision(RevisionError::LimitOutOfRange {
                limit: 0,
                min: 1,
                max: 500,
            })
            .kind(),
            ErrorKind::Validation
        );
    }
}
