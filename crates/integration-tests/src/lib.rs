//! Integration tests for Marigold.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marigold-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_mutation` - Add-to-cart outcome scenarios against test doubles
//! - `cart_concurrency` - Overlapping mutations and the no-lost-update property
//!
//! This crate ships the test doubles the scenarios share: a gate with a
//! fixed identity and a remote store that records calls and follows a
//! script, both cheap clones in the same handle style as the production
//! collaborators they stand in for.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Barrier;

use marigold_cart::{CartItemDraft, CartStore, Identity, SessionGate, StoreError};
use marigold_core::UserId;

/// Initialize test logging once per process.
///
/// Controlled by `RUST_LOG`; silent by default.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Session gate that always resolves the same identity.
#[derive(Debug, Clone)]
pub struct StaticGate(Identity);

impl StaticGate {
    /// A gate resolving the given user as signed in.
    #[must_use]
    pub fn signed_in(user_id: &str) -> Self {
        Self(Identity::Authenticated {
            user_id: UserId::new(user_id),
        })
    }

    /// A gate resolving no identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(Identity::Anonymous)
    }
}

impl SessionGate for StaticGate {
    async fn resolve_identity(&self) -> Identity {
        self.0.clone()
    }
}

/// What a [`RecordingStore`] does with each write.
#[derive(Debug, Clone, Copy)]
pub enum StoreScript {
    /// Accept every write.
    Accept,
    /// Reject every write with the given HTTP status.
    RejectStatus(u16),
}

/// Remote store double that counts calls and follows a [`StoreScript`].
///
/// An optional barrier forces concurrent writes to overlap: every write
/// waits at the barrier before returning, so two mutations are both
/// in-flight before either one reconciles the cache.
#[derive(Debug, Clone)]
pub struct RecordingStore {
    inner: Arc<RecordingStoreInner>,
}

#[derive(Debug)]
struct RecordingStoreInner {
    script: StoreScript,
    calls: AtomicUsize,
    rendezvous: Option<Barrier>,
}

impl RecordingStore {
    /// A store following the given script.
    #[must_use]
    pub fn with_script(script: StoreScript) -> Self {
        Self {
            inner: Arc::new(RecordingStoreInner {
                script,
                calls: AtomicUsize::new(0),
                rendezvous: None,
            }),
        }
    }

    /// An accepting store.
    #[must_use]
    pub fn accepting() -> Self {
        Self::with_script(StoreScript::Accept)
    }

    /// An accepting store that holds each write until `parties` writes
    /// have arrived.
    #[must_use]
    pub fn accepting_with_rendezvous(parties: usize) -> Self {
        Self {
            inner: Arc::new(RecordingStoreInner {
                script: StoreScript::Accept,
                calls: AtomicUsize::new(0),
                rendezvous: Some(Barrier::new(parties)),
            }),
        }
    }

    /// How many writes reached this store.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

impl CartStore for RecordingStore {
    async fn add_item(&self, _user_id: &UserId, _draft: &CartItemDraft) -> Result<(), StoreError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(barrier) = &self.inner.rendezvous {
            barrier.wait().await;
        }

        match self.inner.script {
            StoreScript::Accept => Ok(()),
            StoreScript::RejectStatus(status) => Err(StoreError::Status {
                status,
                detail: "scripted rejection".to_string(),
            }),
        }
    }
}
