//! The editing session - live tree, revision counter, extraction cache

use doc_model::{CommentId, DocumentTree};
use edit_engine::{CommentInsertion, ReplacementOutcome, ResolvedCommentThread};
use revisions::{collect_changes, paginate, validate_page_limit, ParagraphChange, RevisionPage,
    TransformStats};
use serde::{Deserialize, Serialize};

use crate::{Result, SessionError};

/// A side-store registration the packaging layer must perform before the
/// document is written back out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideStoreRegistration {
    /// The comment part was bootstrapped and needs manifest entries
    Comments,
}

/// Cached extraction result, valid while the revision counter matches
#[derive(Debug, Clone)]
struct ExtractionCache {
    revision: u64,
    changes: Vec<ParagraphChange>,
}

/// One editing session over one document.
///
/// All operations run to completion before the next is accepted; the
/// session is never shared between documents, so no locking is needed.
#[derive(Debug, Default)]
pub struct EditSession {
    tree: Option<DocumentTree>,
    revision: u64,
    cache: Option<ExtractionCache>,
    pending_registrations: Vec<SideStoreRegistration>,
    extractions_computed: u64,
}

impl EditSession {
    /// Create a session around a loaded document tree
    pub fn new(tree: DocumentTree) -> Self {
        Self {
            tree: Some(tree),
            ..Default::default()
        }
    }

    /// Create a session with no document yet; operations fail with a
    /// missing-context error until [`EditSession::load`] is called
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load (or replace) the session's document, resetting session state
    pub fn load(&mut self, tree: DocumentTree) {
        self.tree = Some(tree);
        self.revision = 0;
        self.cache = None;
        self.pending_registrations.clear();
    }

    /// Whether a document is loaded
    pub fn is_loaded(&self) -> bool {
        self.tree.is_some()
    }

    /// The current document-revision counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Read access to the live tree
    pub fn document(&self) -> Result<&DocumentTree> {
        self.tree.as_ref().ok_or(SessionError::MissingDocument)
    }

    /// Hand the tree back to the caller, ending the session
    pub fn into_document(self) -> Result<DocumentTree> {
        self.tree.ok_or(SessionError::MissingDocument)
    }

    /// How many times extraction actually re-ran the clone-and-walk; cache
    /// hits do not increment this
    pub fn extractions_computed(&self) -> u64 {
        self.extractions_computed
    }

    /// Registrations the packaging layer still needs to perform
    pub fn take_pending_registrations(&mut self) -> Vec<SideStoreRegistration> {
        std::mem::take(&mut self.pending_registrations)
    }

    /// Drop any cached extraction result. Called automatically after every
    /// mutating operation; exposed for the transport layer's use.
    pub fn invalidate_extraction_cache(&mut self) {
        self.cache = None;
    }

    fn mutated(&mut self) {
        self.revision += 1;
        self.invalidate_extraction_cache();
        tracing::debug!(revision = self.revision, "document mutated; cache invalidated");
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Replace a character range inside the paragraph with the given
    /// bookmark anchor. On success the revision counter advances; a refusal
    /// or validation error leaves the document and counter untouched.
    pub fn replace_range(
        &mut self,
        anchor: &str,
        start: usize,
        end: usize,
        new_text: &str,
    ) -> Result<ReplacementOutcome> {
        let tree = self.tree.as_mut().ok_or(SessionError::MissingDocument)?;
        let para = tree
            .paragraph_by_anchor_mut(anchor)
            .ok_or_else(|| edit_engine::EditError::AnchorNotFound(anchor.to_string()))?;
        let outcome = edit_engine::replace_range(para, start, end, new_text)?;
        self.mutated();
        Ok(outcome)
    }

    /// Accept every tracked change. The transform runs against a clone and
    /// is swapped in only on success, so a detected invariant violation
    /// leaves the pre-operation state intact.
    pub fn accept_all(&mut self) -> Result<TransformStats> {
        let tree = self.tree.as_ref().ok_or(SessionError::MissingDocument)?;
        let mut transformed = tree.clone();
        let stats = revisions::accept(&mut transformed);
        self.tree = Some(transformed);
        self.mutated();
        Ok(stats)
    }

    /// Reject every tracked change; clone-and-swap like [`Self::accept_all`]
    pub fn reject_all(&mut self) -> Result<TransformStats> {
        let tree = self.tree.as_ref().ok_or(SessionError::MissingDocument)?;
        let mut transformed = tree.clone();
        let stats = revisions::reject(&mut transformed);
        self.tree = Some(transformed);
        self.mutated();
        Ok(stats)
    }

    /// Extract one page of the structured revision diff. The full list is
    /// computed at most once per revision counter value.
    pub fn extract_revisions(&mut self, offset: usize, limit: usize) -> Result<RevisionPage> {
        validate_page_limit(limit)?;
        let tree = self.tree.as_ref().ok_or(SessionError::MissingDocument)?;

        let fresh = match &self.cache {
            Some(cache) if cache.revision == self.revision => false,
            _ => true,
        };
        if fresh {
            let changes = collect_changes(tree)?;
            self.extractions_computed += 1;
            tracing::debug!(
                revision = self.revision,
                changes = changes.len(),
                "extraction computed and cached"
            );
            self.cache = Some(ExtractionCache {
                revision: self.revision,
                changes,
            });
        }

        let cache = self.cache.as_ref().expect("cache populated above");
        Ok(paginate(&cache.changes, offset, limit)?)
    }

    /// Add a root comment on the paragraph with the given anchor. If this
    /// bootstraps the comment side store, a pending registration is
    /// recorded for the packaging layer.
    pub fn add_root_comment(
        &mut self,
        anchor: &str,
        text: &str,
        author: &str,
    ) -> Result<CommentInsertion> {
        let tree = self.tree.as_mut().ok_or(SessionError::MissingDocument)?;
        let outcome = edit_engine::add_root_comment(tree, anchor, text, author)?;
        if outcome.store_bootstrapped {
            self.pending_registrations
                .push(SideStoreRegistration::Comments);
        }
        self.mutated();
        Ok(outcome)
    }

    /// Add a reply under an existing root comment
    pub fn add_reply(&mut self, parent: CommentId, text: &str, author: &str) -> Result<CommentId> {
        let tree = self.tree.as_mut().ok_or(SessionError::MissingDocument)?;
        let id = edit_engine::add_reply(tree, parent, text, author)?;
        self.mutated();
        Ok(id)
    }

    /// List all comment threads, resolved against the live tree
    pub fn list_comments(&self) -> Result<Vec<ResolvedCommentThread>> {
        let tree = self.tree.as_ref().ok_or(SessionError::MissingDocument)?;
        Ok(edit_engine::list_comments(tree))
    }
}

// =============================================================================
// Tests
// =============================================================================
