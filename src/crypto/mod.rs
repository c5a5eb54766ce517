//! Encryption capability for the encrypted-persistent backend.
//!
//! The store only depends on the narrow [`Cipher`] and [`KeyProvider`]
//! contracts; key custody (OS keychain in production, memory in tests) stays
//! outside the storage core.

mod aes;
mod key_provider;

pub use aes::Aes256GcmCipher;
#[cfg(feature = "keyring")]
pub use key_provider::KeyringProvider;
pub use key_provider::{InMemoryKeyProvider, KeyMaterial, KeyProvider};

use thiserror::Error;

/// Errors produced by the encryption capability.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// Ciphertext was tampered with, truncated, or the key is wrong.
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// Key material could not be obtained or is malformed.
    #[error("key error: {0}")]
    Key(String),
}

/// Symmetric encryption over raw slot bytes.
pub trait Cipher: Send + Sync {
    /// Encrypt plaintext, producing a self-contained ciphertext blob.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a blob produced by [`Cipher::encrypt`].
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError>;
}
