//! Local cart cache.
//!
//! A client-owned, in-memory mirror of the cart contents, read by
//! presentation for optimistic display elsewhere in the application. The
//! cache is write-through: the only writer besides [`LocalCartCache::clear`]
//! is the confirmed-success path of the mutation core, so local state never
//! shows an item the remote store did not accept.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::ProductId;

use crate::draft::CartItemDraft;

/// A cached cart line, keyed by product ID (unique within one cache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Opaque stable product identifier.
    pub product_id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price in the store currency.
    pub unit_price: Decimal,
    /// Optional product image reference.
    pub image_ref: Option<String>,
    /// Cached quantity across all confirmed adds of this product.
    pub quantity: u32,
}

impl From<CartItemDraft> for CartEntry {
    fn from(draft: CartItemDraft) -> Self {
        Self {
            product_id: draft.product_id,
            title: draft.title,
            unit_price: draft.unit_price,
            image_ref: draft.image_ref,
            quantity: draft.quantity,
        }
    }
}

/// How an upsert merges with an existing entry for the same product.
///
/// The remote store contract assumes upsert-by-`(userId, productId)` with
/// quantity accumulation, which `Accumulate` mirrors locally. `Replace`
/// covers a backend that treats each write as the authoritative line state;
/// select it at cache construction if that contract is confirmed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Quantities add; title, price, and image keep their stored values.
    #[default]
    Accumulate,
    /// The incoming entry's quantity overwrites the stored quantity.
    Replace,
}

/// In-memory cart mirror with atomic upserts.
///
/// Handles are cheap clones sharing one underlying cart, so the handle held
/// by the mutation core and the one held by presentation observe the same
/// state. Entries keep insertion order in [`snapshot`](Self::snapshot).
///
/// Upserts are a read-modify-write under a single lock, so concurrent adds
/// of the same product (a rapid double click resolving out of order) never
/// lose an increment.
#[derive(Debug, Clone, Default)]
pub struct LocalCartCache {
    inner: Arc<Mutex<Vec<CartEntry>>>,
    policy: MergePolicy,
}

impl LocalCartCache {
    /// Create an empty cache with the default accumulate policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with an explicit merge policy.
    #[must_use]
    pub fn with_policy(policy: MergePolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            policy,
        }
    }

    /// Insert an entry, or merge it into the existing entry for the same
    /// product per the cache's [`MergePolicy`].
    ///
    /// Returns the stored entry after the merge; this is what a successful
    /// mutation reports back to presentation.
    pub fn upsert(&self, entry: CartEntry) -> CartEntry {
        let mut entries = self.lock();

        if let Some(existing) = entries.iter_mut().find(|e| e.product_id == entry.product_id) {
            match self.policy {
                MergePolicy::Accumulate => {
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                MergePolicy::Replace => {
                    existing.quantity = entry.quantity;
                }
            }
            return existing.clone();
        }

        entries.push(entry.clone());
        entry
    }

    /// Current cart contents in insertion order. Read-only.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartEntry> {
        self.lock().clone()
    }

    /// Empty the cache. Invoked by the surrounding application on logout.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of distinct products currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartEntry>> {
        // A poisoned lock still guards coherent entries; the panicking writer
        // never leaves a partially merged entry behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn entry(product_id: &str, quantity: u32) -> CartEntry {
        CartEntry {
            product_id: ProductId::new(product_id),
            title: format!("Product {product_id}"),
            unit_price: dec!(9.99),
            image_ref: None,
            quantity,
        }
    }

    #[test]
    fn test_upsert_inserts_new_entry() {
        let cache = LocalCartCache::new();
        let stored = cache.upsert(entry("p1", 1));

        assert_eq!(stored.quantity, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_upsert_accumulates_quantity() {
        let cache = LocalCartCache::new();
        cache.upsert(entry("p1", 1));
        let stored = cache.upsert(entry("p1", 2));

        assert_eq!(stored.quantity, 3);
        assert_eq!(cache.len(), 1, "repeated adds must not duplicate the entry");
    }

    #[test]
    fn test_upsert_keeps_originally_stored_fields() {
        let cache = LocalCartCache::new();
        cache.upsert(CartEntry {
            image_ref: Some("first.png".to_string()),
            ..entry("p1", 1)
        });

        let stored = cache.upsert(CartEntry {
            title: "Renamed".to_string(),
            image_ref: Some("second.png".to_string()),
            ..entry("p1", 1)
        });

        assert_eq!(stored.title, "Product p1");
        assert_eq!(stored.image_ref.as_deref(), Some("first.png"));
        assert_eq!(stored.quantity, 2);
    }

    #[test]
    fn test_replace_policy_overwrites_quantity() {
        let cache = LocalCartCache::with_policy(MergePolicy::Replace);
        cache.upsert(entry("p1", 5));
        let stored = cache.upsert(entry("p1", 1));

        assert_eq!(stored.quantity, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let cache = LocalCartCache::new();
        cache.upsert(entry("p2", 1));
        cache.upsert(entry("p1", 1));
        cache.upsert(entry("p2", 1));

        let snapshot = cache.snapshot();
        let ids: Vec<&str> = snapshot.iter().map(|e| e.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn test_snapshot_is_read_idempotent() {
        let cache = LocalCartCache::new();
        cache.upsert(entry("p1", 2));

        assert_eq!(cache.snapshot(), cache.snapshot());
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = LocalCartCache::new();
        cache.upsert(entry("p1", 1));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let cache = LocalCartCache::new();
        let reader = cache.clone();

        cache.upsert(entry("p1", 1));
        assert_eq!(reader.len(), 1);
    }

    #[test]
    fn test_concurrent_upserts_lose_no_increment() {
        let cache = LocalCartCache::new();
        let rounds = 100;

        std::thread::scope(|scope| {
            for _ in 0..2 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for _ in 0..rounds {
                        cache.upsert(entry("p1", 1));
                    }
                });
            }
        });

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.first().unwrap().quantity, 2 * rounds);
    }

    #[test]
    fn test_accumulate_saturates_instead_of_overflowing() {
        let cache = LocalCartCache::new();
        cache.upsert(entry("p1", u32::MAX));
        let stored = cache.upsert(entry("p1", 1));

        assert_eq!(stored.quantity, u32::MAX);
    }
}
