//! Edit Engine - format-preserving surgical edits on the live tree
//!
//! The Surgeon replaces character-offset ranges inside a paragraph while
//! preserving per-character formatting fidelity across arbitrarily
//! fragmented runs, refusing edits that would cut across hyperlink or
//! structured-tag boundaries. The comment commands mutate the comment side
//! store and its anchor markers, bootstrapping the store on first use.

mod surgeon;
mod comment_commands;
mod error;

pub use surgeon::*;
pub use comment_commands::*;
pub use error::*;
