//! Marigold cart mutation core.
//!
//! This crate owns the protocol between a user's "add to cart" action, the
//! session-identity check, the remote cart store write, and the local cached
//! mirror of the cart. Everything visual (the product card, the cart badge,
//! the confirmation modal) lives downstream and consumes the outcome signal.
//!
//! # Architecture
//!
//! - Collaborators are constructor-injected, never reached through ambient
//!   state: [`mutation::CartMutator`] takes a [`identity::SessionGate`], a
//!   [`remote::CartStore`], and a [`cache::LocalCartCache`].
//! - The cache is write-through: it is only updated after the remote store
//!   confirms the write, so local state never shows an item the backend
//!   did not accept.
//! - Failures are values ([`mutation::MutationOutcome`]), never uncaught
//!   faults crossing the boundary.
//!
//! # Example
//!
//! ```rust,ignore
//! use marigold_cart::{
//!     cache::LocalCartCache, config::CartApiConfig, draft::CartItemDraft,
//!     mutation::CartMutator, notify::CartNotification, remote::HttpCartStore,
//! };
//!
//! let config = CartApiConfig::from_env()?;
//! let store = HttpCartStore::new(&config)?;
//! let mutator = CartMutator::new(gate, store, LocalCartCache::new());
//!
//! let outcome = mutator
//!     .add_to_cart(CartItemDraft::new("p1", "Widget", price))
//!     .await;
//! let signal = CartNotification::from(&outcome);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod draft;
pub mod identity;
pub mod mutation;
pub mod notify;
pub mod remote;

pub use cache::{CartEntry, LocalCartCache, MergePolicy};
pub use draft::{CartItemDraft, DraftError};
pub use identity::{Identity, SessionGate, SessionIdentityGate};
pub use mutation::{CartMutator, FailureReason, MutationOutcome};
pub use notify::CartNotification;
pub use remote::{CartStore, HttpCartStore, StoreError};
