//! AES-256-GCM cipher over slot bytes.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};

use super::{Cipher, CryptoError, KeyMaterial};

/// GCM nonce size in bytes.
const NONCE_LEN: usize = 12;

/// AES-256-GCM with a fresh random nonce per write.
///
/// Blobs are framed as `nonce || ciphertext`; GCM authentication means any
/// bit flip in either part fails decryption instead of returning corrupted
/// plaintext.
pub struct Aes256GcmCipher {
    cipher: Aes256Gcm,
}

impl Aes256GcmCipher {
    pub fn new(material: &KeyMaterial) -> Result<Self, CryptoError> {
        let cipher = Aes256Gcm::new_from_slice(&material.bytes)
            .map_err(|e| CryptoError::Key(format!("cipher init failed: {e}")))?;
        Ok(Self { cipher })
    }
}

impl Cipher for Aes256GcmCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| CryptoError::Encrypt(format!("encrypt failed: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(nonce.as_slice());
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if blob.len() < NONCE_LEN {
            return Err(CryptoError::Decrypt(format!(
                "blob too short: {} bytes",
                blob.len()
            )));
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CryptoError::Decrypt(format!("decrypt failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{InMemoryKeyProvider, KeyProvider};

    fn cipher() -> Aes256GcmCipher {
        let material = InMemoryKeyProvider::default()
            .get_or_create()
            .expect("key material");
        Aes256GcmCipher::new(&material).expect("cipher")
    }

    #[test]
    fn round_trips_and_hides_plaintext() {
        let c = cipher();
        let plaintext = b"Bitcoin + Ethereum";

        let blob = c.encrypt(plaintext).expect("encrypt");
        assert!(!blob.windows(plaintext.len()).any(|w| w == plaintext));

        let back = c.decrypt(&blob).expect("decrypt");
        assert_eq!(back, plaintext);
    }

    #[test]
    fn tampered_blob_fails_decryption() {
        let c = cipher();
        let mut blob = c.encrypt(b"payload").expect("encrypt");
        if let Some(last) = blob.last_mut() {
            *last ^= 0x01;
        }

        let err = c.decrypt(&blob).expect_err("tamper must fail");
        assert!(matches!(err, CryptoError::Decrypt(_)));
    }

    #[test]
    fn truncated_blob_fails_decryption() {
        let c = cipher();
        let err = c.decrypt(b"short").expect_err("truncated must fail");
        assert!(matches!(err, CryptoError::Decrypt(_)));
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let blob = cipher().encrypt(b"payload").expect("encrypt");
        let other = cipher(); // fresh random key
        let err = other.decrypt(&blob).expect_err("wrong key must fail");
        assert!(matches!(err, CryptoError::Decrypt(_)));
    }
}
