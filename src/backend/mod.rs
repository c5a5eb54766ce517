//! Storage backends.
//!
//! A backend is a raw byte-level keyspace addressed by the qualified slot
//! identifier. Backend selection is a pure function of
//! [`StoreKind`](crate::StoreKind); backends never see value types.

mod encrypted;
mod memory;
mod persistent;

pub use encrypted::EncryptedBackend;
pub use memory::MemoryBackend;
pub use persistent::PersistentBackend;

use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors produced by backend storage operations.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage engine error: {0}")]
    Fjall(#[from] fjall::Error),

    /// Encryption or decryption failed in the encrypted backend.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Stored data does not match the expected on-disk format.
    #[error("invalid store format: {0}")]
    InvalidFormat(String),

    /// The store has been shut down.
    #[error("store is closed")]
    Closed,
}

/// Raw byte-level storage for one backend kind.
///
/// `read` returns `None` for absent entries; absence is never an error.
/// `delete` of a missing entry is a no-op.
pub trait Backend: Send + Sync {
    fn read(&self, qualified: &str) -> Result<Option<Vec<u8>>, BackendError>;

    fn write(&self, qualified: &str, bytes: &[u8]) -> Result<(), BackendError>;

    fn delete(&self, qualified: &str) -> Result<(), BackendError>;

    /// Flush any buffered writes to durable storage.
    fn flush(&self) -> Result<(), BackendError>;
}
