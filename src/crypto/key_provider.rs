//! Key custody for encryption at rest.

use std::sync::{Arc, Mutex};

use rand::{RngCore, rngs::OsRng};

use super::CryptoError;

/// Key material used for encryption at rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Identifier for logging and rotation (never log key bytes).
    pub id: String,
    /// 256-bit symmetric key.
    pub bytes: [u8; 32],
}

/// Provides access to encryption keys (OS keychain in production; memory in
/// tests and ephemeral stores).
pub trait KeyProvider: Send + Sync {
    /// Return the existing key, creating and persisting one if absent.
    fn get_or_create(&self) -> Result<KeyMaterial, CryptoError>;
}

/// OS keychain-backed provider using the `keyring` crate.
#[cfg(feature = "keyring")]
pub struct KeyringProvider {
    service: String,
    account: String,
}

#[cfg(feature = "keyring")]
impl KeyringProvider {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

#[cfg(feature = "keyring")]
impl KeyProvider for KeyringProvider {
    fn get_or_create(&self) -> Result<KeyMaterial, CryptoError> {
        let entry = keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| CryptoError::Key(format!("keyring: {e}")))?;

        if let Ok(secret) = entry.get_password() {
            return decode_key(&secret);
        }

        let material = generate_key();
        entry
            .set_password(&encode_key(&material))
            .map_err(|e| CryptoError::Key(format!("keyring: {e}")))?;
        Ok(material)
    }
}

/// In-memory key provider for tests and ephemeral sessions. The key is
/// generated once and shared by clones.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyProvider {
    inner: Arc<Mutex<Option<KeyMaterial>>>,
}

impl KeyProvider for InMemoryKeyProvider {
    fn get_or_create(&self) -> Result<KeyMaterial, CryptoError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| CryptoError::Key(format!("lock poisoned: {e}")))?;

        if let Some(existing) = guard.clone() {
            return Ok(existing);
        }

        let material = generate_key();
        *guard = Some(material.clone());
        Ok(material)
    }
}

fn generate_key() -> KeyMaterial {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    KeyMaterial {
        id: "default".to_string(),
        bytes,
    }
}

#[cfg(feature = "keyring")]
fn encode_key(material: &KeyMaterial) -> String {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    STANDARD.encode(material.bytes)
}

#[cfg(feature = "keyring")]
fn decode_key(secret: &str) -> Result<KeyMaterial, CryptoError> {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    let bytes = STANDARD
        .decode(secret)
        .map_err(|e| CryptoError::Key(format!("key decode failed: {e}")))?;

    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| CryptoError::Key(format!("expected 32 bytes, got {}", b.len())))?;

    Ok(KeyMaterial {
        id: "default".to_string(),
        bytes,
    })
}
