//! The add-to-cart mutation core.
//!
//! [`CartMutator`] ties the session gate, the remote cart store, and the
//! local cache together around a single operation. The ordering is
//! load-bearing: an anonymous actor never reaches the backend or mutates
//! local state, and the cache is only touched after the remote store
//! confirms the write.

use thiserror::Error;
use tracing::instrument;

use crate::cache::{CartEntry, LocalCartCache};
use crate::draft::{CartItemDraft, DraftError};
use crate::identity::{Identity, SessionGate};
use crate::remote::{CartStore, StoreError};

/// Why an add-to-cart mutation did not reach the cache.
///
/// The variants exist for logging; presentation only ever sees the generic
/// failure signal, never this detail.
#[derive(Debug, Error)]
pub enum FailureReason {
    /// The caller handed over a draft that fails its preconditions.
    /// Indicates a presentation-layer bug, since input is validated there.
    #[error("invalid cart draft: {0}")]
    InvalidDraft(#[from] DraftError),

    /// The remote cart store rejected or never received the write.
    #[error("cart store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of one add-to-cart mutation.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The remote store accepted the write; the cache was reconciled.
    /// Carries the stored entry after the merge.
    Success(CartEntry),
    /// No session identity was present. Nothing was written anywhere.
    /// Recoverable by the user logging in.
    Unauthenticated,
    /// The write did not complete. The cache is untouched and the same
    /// operation is safe to retry.
    RemoteFailure(FailureReason),
}

impl MutationOutcome {
    /// Whether the mutation reached the cache.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// The cart mutation core.
///
/// Collaborators are supplied at construction and never looked up through
/// ambient state, so the core can be exercised in isolation with test
/// doubles. Handles are cheap clones when the collaborators are.
#[derive(Debug, Clone)]
pub struct CartMutator<G, S> {
    gate: G,
    store: S,
    cache: LocalCartCache,
}

impl<G: SessionGate, S: CartStore> CartMutator<G, S> {
    /// Create a mutator from its collaborators.
    pub const fn new(gate: G, store: S, cache: LocalCartCache) -> Self {
        Self { gate, store, cache }
    }

    /// The local cart cache this mutator reconciles into.
    ///
    /// Presentation reads the same handle for optimistic display.
    pub const fn cache(&self) -> &LocalCartCache {
        &self.cache
    }

    /// Add one item to the acting user's cart.
    ///
    /// Resolves the session identity, issues the remote write, and on
    /// confirmed success merges the item into the local cache. Every failure
    /// mode is returned as a value; nothing is thrown past this boundary.
    ///
    /// Invoking again after a [`MutationOutcome::RemoteFailure`] is safe:
    /// a failed attempt leaves no local state behind.
    #[instrument(skip(self, draft), fields(product_id = %draft.product_id, quantity = draft.quantity))]
    pub async fn add_to_cart(&self, draft: CartItemDraft) -> MutationOutcome {
        // Validated input never trips this; a violation is a caller bug.
        if let Err(e) = draft.validate() {
            tracing::error!(error = %e, "rejected malformed cart draft");
            return MutationOutcome::RemoteFailure(FailureReason::InvalidDraft(e));
        }

        let Identity::Authenticated { user_id } = self.gate.resolve_identity().await else {
            tracing::debug!("add to cart attempted without a signed-in user");
            return MutationOutcome::Unauthenticated;
        };

        if let Err(e) = self.store.add_item(&user_id, &draft).await {
            tracing::error!(error = %e, "remote cart write failed");
            return MutationOutcome::RemoteFailure(FailureReason::Store(e));
        }

        // Remote store confirmed the write; reconcile the local mirror.
        let entry = self.cache.upsert(CartEntry::from(draft));
        MutationOutcome::Success(entry)
    }
}
