//! Concurrency tests for the cart mutation core.
//!
//! A rapid double click issues two independent mutations for the same
//! product. Both proceed to the remote store; the cache must end up with
//! the sum of both quantities no matter how the responses interleave.

use rust_decimal::dec;

use marigold_cart::{CartItemDraft, CartMutator, LocalCartCache, MutationOutcome};
use marigold_integration_tests::{RecordingStore, StaticGate, init_test_logging};

fn widget() -> CartItemDraft {
    CartItemDraft::new("p1", "Widget", dec!(9.99))
}

#[tokio::test]
async fn test_overlapping_adds_lose_no_increment() {
    init_test_logging();
    // The rendezvous holds each remote write until both have arrived, so
    // both mutations are in flight before either reconciles the cache.
    let store = RecordingStore::accepting_with_rendezvous(2);
    let mutator = CartMutator::new(
        StaticGate::signed_in("u1"),
        store.clone(),
        LocalCartCache::new(),
    );

    let first = tokio::spawn({
        let mutator = mutator.clone();
        async move { mutator.add_to_cart(widget()).await }
    });
    let second = tokio::spawn({
        let mutator = mutator.clone();
        async move { mutator.add_to_cart(widget()).await }
    });

    let (first, second) = tokio::try_join!(first, second).expect("mutation tasks panicked");
    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(store.call_count(), 2, "each click is an independent write");

    let snapshot = mutator.cache().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.first().map(|e| e.quantity), Some(2));
}

#[tokio::test]
async fn test_completion_order_does_not_affect_reported_total() {
    init_test_logging();
    let store = RecordingStore::accepting_with_rendezvous(2);
    let mutator = CartMutator::new(
        StaticGate::signed_in("u1"),
        store,
        LocalCartCache::new(),
    );

    let tasks = [
        tokio::spawn({
            let mutator = mutator.clone();
            async move { mutator.add_to_cart(widget().with_quantity(2)).await }
        }),
        tokio::spawn({
            let mutator = mutator.clone();
            async move { mutator.add_to_cart(widget().with_quantity(3)).await }
        }),
    ];

    let mut reported = Vec::new();
    for task in tasks {
        match task.await.expect("mutation task panicked") {
            MutationOutcome::Success(entry) => reported.push(entry.quantity),
            other => panic!("expected success, got {other:?}"),
        }
    }

    // Whichever write reconciles last reports the full total.
    reported.sort_unstable();
    assert_eq!(reported.last(), Some(&5));
    assert_eq!(
        mutator.cache().snapshot().first().map(|e| e.quantity),
        Some(5)
    );
}

#[tokio::test]
async fn test_abandoned_call_leaves_state_coherent() {
    init_test_logging();
    // A rendezvous of 2 that only ever sees one writer: the in-flight
    // mutation never completes and the caller walks away from it.
    let store = RecordingStore::accepting_with_rendezvous(2);
    let mutator = CartMutator::new(
        StaticGate::signed_in("u1"),
        store.clone(),
        LocalCartCache::new(),
    );

    let abandoned = tokio::spawn({
        let mutator = mutator.clone();
        async move { mutator.add_to_cart(widget()).await }
    });
    tokio::task::yield_now().await;
    abandoned.abort();
    assert!(abandoned.await.is_err(), "the abandoned task was cancelled");

    // The pending write never confirmed, so the cache must not reflect it,
    // and the mutator remains fully usable afterwards.
    assert!(mutator.cache().is_empty());

    let outcome = CartMutator::new(
        StaticGate::signed_in("u1"),
        RecordingStore::accepting(),
        mutator.cache().clone(),
    )
    .add_to_cart(widget())
    .await;
    assert!(outcome.is_success());
    assert_eq!(
        mutator.cache().snapshot().first().map(|e| e.quantity),
        Some(1)
    );
}
