//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use typed_store::prelude::*;
//!
//! let store = Store::open(".typed-store", &InMemoryKeyProvider::default())?;
//! let key: StoreKey<String> = StoreKey::new("greeting", StoreKind::Memory);
//! store.set(&key, &"hello".to_string())?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Keys and slots
pub use crate::key::{Slot, StoreKey, StoreKind};

// Store façade and observation
pub use crate::observe::{Observation, ObserveError, Subscription};
pub use crate::store::Store;

// Backends and codec
pub use crate::backend::{Backend, BackendError, EncryptedBackend, MemoryBackend, PersistentBackend};
pub use crate::codec::{CodecError, JsonCodec};

// Encryption capability
#[cfg(feature = "keyring")]
pub use crate::crypto::KeyringProvider;
pub use crate::crypto::{
    Aes256GcmCipher, Cipher, CryptoError, InMemoryKeyProvider, KeyMaterial, KeyProvider,
};
