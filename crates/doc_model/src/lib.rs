//! Document Model - Core document tree structure and revision markup types
//!
//! This crate provides the foundational document model for the revision
//! engine: an owned tree of blocks, paragraphs, and formatted runs, plus the
//! structural markup that tracked changes leave behind (insertion/deletion/
//! move wrappers, property-change payloads, bookmark anchors, and comment
//! range markers). Offset-based addressing across arbitrarily fragmented
//! runs is provided by the atom stream (see [`atoms`]).

mod node_id;
pub mod schema;
mod properties;
mod run;
mod inline;
mod paragraph;
mod table;
mod document;
mod atoms;
mod bookmark;
mod comment;
mod error;

pub use node_id::*;
pub use schema::*;
pub use properties::*;
pub use run::*;
pub use inline::*;
pub use paragraph::*;
pub use table::*;
pub use document::*;
pub use atoms::*;
pub use bookmark::*;
pub use comment::*;
pub use error::*;
