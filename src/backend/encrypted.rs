//! Durable backend with encryption at rest.

use std::sync::Arc;

use fjall::{Keyspace, PersistMode};

use super::{Backend, BackendError};
use crate::crypto::Cipher;

/// Durable backend that encrypts every value before it reaches the storage
/// engine and decrypts on the way out.
///
/// Only ciphertext blobs (`nonce || ciphertext`) touch disk. A tampered or
/// undecryptable blob surfaces as a
/// [`CryptoError::Decrypt`](crate::crypto::CryptoError::Decrypt), never as
/// corrupted plaintext.
pub struct EncryptedBackend {
    db: Arc<fjall::Database>,
    data: Keyspace,
    cipher: Box<dyn Cipher>,
}

impl EncryptedBackend {
    pub fn new(db: Arc<fjall::Database>, data: Keyspace, cipher: Box<dyn Cipher>) -> Self {
        Self { db, data, cipher }
    }
}

impl Backend for EncryptedBackend {
    fn read(&self, qualified: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let Some(blob) = self.data.get(qualified)? else {
            return Ok(None);
        };
        let plaintext = self.cipher.decrypt(&blob)?;
        Ok(Some(plaintext))
    }

    fn write(&self, qualified: &str, bytes: &[u8]) -> Result<(), BackendError> {
        let blob = self.cipher.encrypt(bytes)?;
        self.data.insert(qualified, &blob)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn delete(&self, qualified: &str) -> Result<(), BackendError> {
        self.data.remove(qualified)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}
