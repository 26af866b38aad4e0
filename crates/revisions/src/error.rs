//! Error types for revision operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("Page limit {limit} is outside the allowed range {min}..={max}")]
    LimitOutOfRange {
        limit: usize,
        min: usize,
        max: usize,
    },

    #[error("Bookmark anchor not found in transformed tree: {0}")]
    AnchorNotFound(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Internal invariant violation: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, RevisionError>;
