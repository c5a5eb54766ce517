//! Observation semantics: replay, delivery, independence, termination.

mod common;

use std::time::Duration;

use anyhow::Result;
use common::open_store;
use tokio::time::timeout;
use typed_store::prelude::*;

const DELIVERY_BUDGET: Duration = Duration::from_secs(6);

/// Subscribing to a slot with an already-set value immediately yields one
/// event carrying that value, before any new write.
#[tokio::test]
async fn replays_current_value_on_subscribe() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("replayed", StoreKind::Persistent);

    store.set(&key, &"already here".to_string())?;

    let mut sub = store.observe(&key)?;
    let first = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(first.element, Some("already here".to_string()));

    Ok(())
}

/// Subscribing to an empty slot replays an absent element; absence is an
/// event, not an error.
#[tokio::test]
async fn replays_absence_for_empty_slot() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("never_set", StoreKind::Memory);

    let mut sub = store.observe(&key)?;
    let first = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(first.element, None);

    Ok(())
}

/// A write after subscription delivers exactly one event with the written
/// value, in bounded time. Filtering out the absent replay and bounding the
/// wait are caller-side concerns layered on `recv`.
#[tokio::test]
async fn delivers_write_to_subscriber() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("memory_string", StoreKind::Memory);
    let expected = "Testing observer".to_string();

    let mut sub = store.observe(&key)?;
    store.set(&key, &expected)?;

    // Skip replayed absence, then take the first present element.
    let value = loop {
        let event = timeout(DELIVERY_BUDGET, sub.recv()).await??;
        if let Some(value) = event.element {
            break value;
        }
    };
    assert_eq!(value, expected);

    // Exactly one write happened, so no further event is pending.
    let pending = timeout(Duration::from_millis(100), sub.recv()).await;
    assert!(pending.is_err(), "unexpected extra event");

    Ok(())
}

/// Within one slot, events arrive in write order without coalescing.
#[tokio::test]
async fn delivers_in_write_order() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<u32>::new("counter", StoreKind::Memory);

    let mut sub = store.observe(&key)?;
    let first = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(first.element, None);

    for i in 0..5u32 {
        store.set(&key, &i)?;
    }
    for i in 0..5u32 {
        let event = timeout(DELIVERY_BUDGET, sub.recv()).await??;
        assert_eq!(event.element, Some(i));
    }

    Ok(())
}

/// Delete publishes an event with an absent element.
#[tokio::test]
async fn delete_publishes_absence() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("doomed", StoreKind::Persistent);

    store.set(&key, &"present".to_string())?;
    let mut sub = store.observe(&key)?;
    let replay = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(replay.element, Some("present".to_string()));

    store.delete(&key)?;
    let event = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(event.element, None);

    Ok(())
}

/// Each observe call yields an independent, restartable stream; dropping one
/// subscriber does not affect another.
#[tokio::test]
async fn subscriptions_are_independent() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("shared", StoreKind::Memory);

    store.set(&key, &"v1".to_string())?;

    let mut first = store.observe(&key)?;
    let mut second = store.observe(&key)?;

    // Both streams replay independently.
    assert_eq!(
        timeout(DELIVERY_BUDGET, first.recv()).await??.element,
        Some("v1".to_string())
    );
    assert_eq!(
        timeout(DELIVERY_BUDGET, second.recv()).await??.element,
        Some("v1".to_string())
    );

    // Cancelling one leaves the other live.
    drop(first);
    store.set(&key, &"v2".to_string())?;
    assert_eq!(
        timeout(DELIVERY_BUDGET, second.recv()).await??.element,
        Some("v2".to_string())
    );

    // A fresh observe restarts with a replay of the current value.
    let mut third = store.observe(&key)?;
    assert_eq!(
        timeout(DELIVERY_BUDGET, third.recv()).await??.element,
        Some("v2".to_string())
    );

    Ok(())
}

/// Observation of encrypted slots delivers decrypted, decoded values.
#[tokio::test]
async fn observes_encrypted_slots() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("sealed_watch", StoreKind::EncryptedPersistent);

    let mut sub = store.observe(&key)?;
    let replay = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(replay.element, None);

    store.set(&key, &"secret".to_string())?;
    let event = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(event.element, Some("secret".to_string()));

    Ok(())
}

/// Store shutdown terminates observation streams.
#[tokio::test]
async fn shutdown_ends_streams() -> Result<(), anyhow::Error> {
    let (_dir, store) = open_store();
    let key = StoreKey::<String>::new("ending", StoreKind::Memory);

    let mut sub = store.observe(&key)?;
    let replay = timeout(DELIVERY_BUDGET, sub.recv()).await??;
    assert_eq!(replay.element, None);

    store.shutdown()?;

    let err = timeout(DELIVERY_BUDGET, sub.recv())
        .await?
        .expect_err("stream must end");
    assert!(matches!(err, ObserveError::Closed));

    Ok(())
}
