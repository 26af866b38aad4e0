//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Bookmark anchor not found: {0}")]
    AnchorNotFound(String),

    #[error("Invalid anchor name: {0}")]
    InvalidAnchorName(#[from] crate::AnchorValidationError),

    #[error("Tree structure error: {0}")]
    TreeStructure(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
