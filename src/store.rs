//! The store façade composing keys, codec, backends, and observation.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use fjall::{KeyspaceCreateOptions, PersistMode};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::backend::{
    Backend, BackendError, EncryptedBackend, MemoryBackend, PersistentBackend,
};
use crate::codec::JsonCodec;
use crate::crypto::{Aes256GcmCipher, KeyProvider};
use crate::error::Result;
use crate::key::{Slot, StoreKey, StoreKind};
use crate::observe::{ObserverRegistry, RawEvent, Subscription};

/// Keyspace holding store-level metadata.
const META_KEYSPACE: &str = "_meta";
/// Keyspace for unencrypted durable slots.
const PLAIN_KEYSPACE: &str = "plain";
/// Keyspace for encrypted durable slots.
const SEALED_KEYSPACE: &str = "sealed";

/// Key for the format-version stamp in the metadata keyspace.
const META_CONFIG_KEY: &str = "config";

/// Current on-disk format version.
const STORE_VERSION: u32 = 1;

/// Typed key-value store over memory, persistent, and encrypted-persistent
/// backends.
///
/// All operations are callable concurrently from independent threads.
/// Mutations are serialized per slot; operations on different slots never
/// contend on a shared lock. Durability is guaranteed only after
/// [`Store::shutdown`] or a completed persistent write, never by `Drop`.
pub struct Store {
    memory: MemoryBackend,
    persistent: PersistentBackend,
    encrypted: EncryptedBackend,
    codec: JsonCodec,
    registry: ObserverRegistry,
    locks: DashMap<Slot, Arc<Mutex<()>>>,
    closed: AtomicBool,
}

impl Store {
    /// Open (or initialize) a store rooted at `path`.
    ///
    /// On first open a format-version stamp is written; reopening a store
    /// written by an incompatible version fails with
    /// [`BackendError::InvalidFormat`] instead of misreading its data. The
    /// encryption key is obtained from `key_provider` once, at open time.
    pub fn open(path: impl AsRef<Path>, key_provider: &dyn KeyProvider) -> Result<Self> {
        let path = path.as_ref();
        let db = Arc::new(fjall::Database::builder(path).open()?);
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        match meta.get(META_CONFIG_KEY)? {
            Some(config) => {
                let version = u32::from_le_bytes(config.as_ref().try_into().map_err(|_| {
                    BackendError::InvalidFormat("invalid config entry".to_string())
                })?);
                if version != STORE_VERSION {
                    return Err(BackendError::InvalidFormat(format!(
                        "store version mismatch: expected {STORE_VERSION}, got {version}"
                    ))
                    .into());
                }
            }
            None => {
                meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
                db.persist(PersistMode::SyncAll)?;
            }
        }

        let plain = db.keyspace(PLAIN_KEYSPACE, KeyspaceCreateOptions::default)?;
        let sealed = db.keyspace(SEALED_KEYSPACE, KeyspaceCreateOptions::default)?;

        let material = key_provider.get_or_create()?;
        let cipher = Aes256GcmCipher::new(&material)?;
        debug!(path = %path.display(), key_id = %material.id, "store opened");

        Ok(Self {
            memory: MemoryBackend::new(),
            persistent: PersistentBackend::new(Arc::clone(&db), plain),
            encrypted: EncryptedBackend::new(db, sealed, Box::new(cipher)),
            codec: JsonCodec,
            registry: ObserverRegistry::new(),
            locks: DashMap::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Write `value` under `key`, then notify the slot's subscribers.
    ///
    /// Concurrent sets on the same slot are linearized; readers observe one
    /// complete encoding or another, never a mix.
    #[instrument(skip_all, fields(id = %key.id(), kind = %key.kind()))]
    pub fn set<T: Serialize>(&self, key: &StoreKey<T>, value: &T) -> Result<()> {
        self.ensure_open()?;
        let slot = key.slot();
        let encoded = self.codec.encode(value)?;

        let lock = self.slot_lock(&slot);
        let _guard = lock.lock();
        self.backend(slot.kind()).write(slot.qualified(), &encoded)?;
        self.registry.publish(&slot, RawEvent::present(encoded));
        Ok(())
    }

    /// Read the value under `key`, or `None` if the slot is empty.
    ///
    /// Bytes that cannot be decoded as `T` fail with a codec error; they are
    /// never silently treated as absent.
    #[instrument(skip_all, fields(id = %key.id(), kind = %key.kind()))]
    pub fn get<T: DeserializeOwned>(&self, key: &StoreKey<T>) -> Result<Option<T>> {
        self.ensure_open()?;
        let slot = key.slot();
        let Some(bytes) = self.backend(slot.kind()).read(slot.qualified())? else {
            return Ok(None);
        };
        Ok(Some(self.codec.decode(&bytes)?))
    }

    /// Remove the entry under `key` and notify subscribers with an absent
    /// element. Deleting an empty slot still publishes.
    #[instrument(skip_all, fields(id = %key.id(), kind = %key.kind()))]
    pub fn delete<T>(&self, key: &StoreKey<T>) -> Result<()> {
        self.ensure_open()?;
        let slot = key.slot();

        let lock = self.slot_lock(&slot);
        let _guard = lock.lock();
        self.backend(slot.kind()).delete(slot.qualified())?;
        self.registry.publish(&slot, RawEvent::absent());
        Ok(())
    }

    /// Subscribe to changes of `key`'s slot.
    ///
    /// Each call returns an independent stream whose first event replays the
    /// value current at subscription time (present or absent); later events
    /// follow writes in order. The stream never completes on its own; it ends
    /// when the subscription is dropped or the store shuts down.
    #[instrument(skip_all, fields(id = %key.id(), kind = %key.kind()))]
    pub fn observe<T: DeserializeOwned>(&self, key: &StoreKey<T>) -> Result<Subscription<T>> {
        self.ensure_open()?;
        let slot = key.slot();

        // Snapshot and register under the slot lock so the replayed value
        // and subsequent events form one consistent, gap-free sequence.
        let lock = self.slot_lock(&slot);
        let _guard = lock.lock();
        let rx = self.registry.subscribe(&slot);
        let replay = match self.backend(slot.kind()).read(slot.qualified())? {
            Some(bytes) => RawEvent::present(bytes),
            None => RawEvent::absent(),
        };
        Ok(Subscription::new(replay, rx))
    }

    /// Flush durable backends, terminate all observation streams, and reject
    /// further operations. Idempotent.
    #[instrument(skip_all)]
    pub fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.registry.close_all();
        self.memory.flush()?;
        self.persistent.flush()?;
        self.encrypted.flush()?;
        debug!("store shut down");
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackendError::Closed.into());
        }
        Ok(())
    }

    fn backend(&self, kind: StoreKind) -> &dyn Backend {
        match kind {
            StoreKind::Memory => &self.memory,
            StoreKind::Persistent => &self.persistent,
            StoreKind::EncryptedPersistent => &self.encrypted,
        }
    }

    fn slot_lock(&self, slot: &Slot) -> Arc<Mutex<()>> {
        self.locks
            .entry(slot.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
