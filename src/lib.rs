//! Typed key-value storage over heterogeneous backends.
//!
//! This library unifies three storage backends (in-memory, persistent, and
//! encrypted-persistent) behind one typed get/set/observe/delete contract. Keys carry their value type as a generic
//! parameter and may be parametrized by a runtime uuid, so one base id yields
//! a distinct slot per user, session, or other argument.
//!
//! # Quick Start
//!
//! ```ignore
//! use typed_store::prelude::*;
//!
//! let store = Store::open(".typed-store", &InMemoryKeyProvider::default())?;
//!
//! // A plain persistent key and a per-user parametrized key.
//! let greeting: StoreKey<String> = StoreKey::new("greeting", StoreKind::Persistent);
//! let session = StoreKey::<String>::parametrized("session", user_id, StoreKind::EncryptedPersistent);
//!
//! store.set(&greeting, &"hello".to_string())?;
//! assert_eq!(store.get(&greeting)?, Some("hello".to_string()));
//!
//! // Observation replays the current value, then follows writes.
//! let mut sub = store.observe(&greeting)?;
//! assert_eq!(sub.recv().await?.element, Some("hello".to_string()));
//! ```
//!
//! # Modules
//!
//! - [`key`] - Typed keys, backend kinds, and slot resolution
//! - [`codec`] - Value serialization to and from raw slot bytes
//! - [`backend`] - Memory, persistent, and encrypted-persistent backends
//! - [`crypto`] - Cipher and key-custody contracts for encryption at rest
//! - [`observe`] - Observation streams with replay-on-subscribe
//! - [`store`] - The façade composing the pieces
//!
//! # Feature Flags
//!
//! - `keyring` - Store the encryption key in the OS keychain (enabled by default)
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

pub mod backend;
pub mod codec;
pub mod crypto;
pub mod key;
pub mod observe;
pub mod prelude;
pub mod store;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export core types at crate root for convenience
pub use backend::{Backend, BackendError};
pub use codec::{CodecError, JsonCodec};
#[cfg(feature = "keyring")]
pub use crypto::KeyringProvider;
pub use crypto::{
    Aes256GcmCipher, Cipher, CryptoError, InMemoryKeyProvider, KeyMaterial, KeyProvider,
};
pub use key::{Slot, StoreKey, StoreKind};
pub use observe::{Observation, ObserveError, Subscription};
pub use store::Store;
