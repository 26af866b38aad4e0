//! Session layer - per-session editing state over the core engine
//!
//! One [`EditSession`] owns one live document tree, the monotonically
//! increasing document-revision counter, and the extraction cache keyed by
//! it. Every mutating operation bumps the counter and invalidates the
//! cache; extraction serves from the cache while the counter matches.
//! Sessions share nothing: two sessions never touch the same tree.

mod session;
mod error;

pub use session::*;
pub use error::*;
