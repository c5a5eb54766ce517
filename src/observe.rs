//! Reactive observation of slot changes.
//!
//! Each slot owns a bounded broadcast channel; subscribing replays the
//! current value (present or absent) before any later write events. Within a
//! slot, events arrive in write order. Across slots there is no ordering
//! guarantee.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::codec::{CodecError, JsonCodec};
use crate::key::Slot;

/// Per-subscriber event ring capacity. A subscriber that falls further behind
/// than this loses the oldest events and observes [`ObserveError::Lagged`].
const EVENT_BUFFER: usize = 64;

/// A change notification for one slot. `element` is `None` when no value is
/// currently stored; absence is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation<T> {
    pub element: Option<T>,
}

/// Errors observed by a single subscriber. None of these affect the
/// publisher or other subscribers of the same slot.
#[derive(Error, Debug)]
pub enum ObserveError {
    /// The subscriber fell behind and `skipped` events were dropped.
    /// Receiving may continue afterwards from the oldest retained event.
    #[error("subscriber lagged; {0} events were dropped")]
    Lagged(u64),

    /// The store was shut down; no further events will arrive.
    #[error("observation stream closed")]
    Closed,

    /// A stored value could not be decoded for this subscriber.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Undecoded event payload fanned out to subscribers. Bytes are shared, not
/// cloned per subscriber.
#[derive(Clone)]
pub(crate) struct RawEvent {
    payload: Option<Arc<[u8]>>,
}

impl RawEvent {
    pub(crate) fn present(bytes: Vec<u8>) -> Self {
        Self {
            payload: Some(Arc::from(bytes)),
        }
    }

    pub(crate) fn absent() -> Self {
        Self { payload: None }
    }
}

/// Per-slot subscription lists.
pub(crate) struct ObserverRegistry {
    channels: RwLock<HashMap<Slot, broadcast::Sender<RawEvent>>>,
}

impl ObserverRegistry {
    pub(crate) fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscriber for `slot`. Cheap and synchronous.
    pub(crate) fn subscribe(&self, slot: &Slot) -> broadcast::Receiver<RawEvent> {
        let mut channels = self.channels.write();
        let sender = channels
            .entry(slot.clone())
            .or_insert_with(|| broadcast::channel(EVENT_BUFFER).0);
        sender.subscribe()
    }

    /// Deliver an event to all live subscribers of `slot`. Never blocks;
    /// sending to a slot with no subscribers (or only disposed ones) is a
    /// no-op.
    pub(crate) fn publish(&self, slot: &Slot, event: RawEvent) {
        let channels = self.channels.read();
        if let Some(sender) = channels.get(slot) {
            let _ = sender.send(event);
        }
    }

    /// Drop every channel, terminating all subscriber streams.
    pub(crate) fn close_all(&self) {
        self.channels.write().clear();
    }
}

/// A live observation stream for one slot.
///
/// Created by [`Store::observe`](crate::Store::observe). The stream is
/// infinite: it never completes on its own and ends only when the
/// subscription is dropped or the store shuts down. Dropping cancels
/// delivery for this subscriber only and is safe at any time, including
/// concurrently with an in-flight publish.
pub struct Subscription<T> {
    replay: Option<RawEvent>,
    rx: broadcast::Receiver<RawEvent>,
    codec: JsonCodec,
    _value: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    pub(crate) fn new(replay: RawEvent, rx: broadcast::Receiver<RawEvent>) -> Self {
        Self {
            replay: Some(replay),
            rx,
            codec: JsonCodec,
            _value: PhantomData,
        }
    }

    /// Receive the next observation event.
    ///
    /// The first call yields the value current at subscription time, even if
    /// absent. A [`ObserveError::Codec`] failure affects only this
    /// subscriber; receiving may continue afterwards.
    pub async fn recv(&mut self) -> Result<Observation<T>, ObserveError> {
        if let Some(event) = self.replay.take() {
            return self.decode(event);
        }
        match self.rx.recv().await {
            Ok(event) => self.decode(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => Err(ObserveError::Lagged(skipped)),
            Err(broadcast::error::RecvError::Closed) => Err(ObserveError::Closed),
        }
    }

    /// Blocking variant of [`Subscription::recv`] for thread-based callers.
    /// Must not be called from an async context.
    pub fn blocking_recv(&mut self) -> Result<Observation<T>, ObserveError> {
        if let Some(event) = self.replay.take() {
            return self.decode(event);
        }
        match self.rx.blocking_recv() {
            Ok(event) => self.decode(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => Err(ObserveError::Lagged(skipped)),
            Err(broadcast::error::RecvError::Closed) => Err(ObserveError::Closed),
        }
    }

    fn decode(&self, event: RawEvent) -> Result<Observation<T>, ObserveError> {
        match event.payload {
            None => Ok(Observation { element: None }),
            Some(bytes) => {
                let element = self.codec.decode(&bytes)?;
                Ok(Observation {
                    element: Some(element),
                })
            }
        }
    }
}
