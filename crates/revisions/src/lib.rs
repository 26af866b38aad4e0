//! Revision Engine - accept/reject transforms and structured extraction
//!
//! The two transforms consume a revision-bearing tree and produce the fully
//! accepted or fully rejected state: insertion wrappers are unwrapped or
//! dropped, deletions discarded or restored, move pairs resolved to one
//! location, and property-change payloads collapsed to one branch of the
//! current/original union. Extraction derives a paginated, per-paragraph
//! structured diff by running both transforms against clones and joining
//! before/after text through stable bookmark anchors.

mod transform;
mod extract;
mod error;

pub use transform::*;
pub use extract::*;
pub use error::*;
