//! Unified error type for the typed-store library.
//!
//! Each module carries its own focused error enum; this module wraps them in
//! a single [`Error`] so application code can use one error type throughout.

use thiserror::Error;

use crate::backend::BackendError;
use crate::codec::CodecError;
use crate::crypto::CryptoError;

/// Unified error type for all store operations.
///
/// Absence of a value is never an error: `get` returns `Ok(None)` for an
/// empty slot. Only structural, cryptographic, and I/O failures surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Stored bytes were malformed or written with an incompatible type.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Encryption-capability failure outside a backend operation (key
    /// custody, cipher construction).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Underlying storage failed or is unavailable.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<fjall::Error> for Error {
    fn from(err: fjall::Error) -> Self {
        Self::Backend(BackendError::Fjall(err))
    }
}

impl Error {
    /// Returns `true` if this is a codec error.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Returns `true` if this error means ciphertext could not be decrypted
    /// (tampered data or unavailable key), wherever it surfaced.
    pub fn is_decryption(&self) -> bool {
        matches!(
            self,
            Self::Crypto(CryptoError::Decrypt(_))
                | Self::Backend(BackendError::Crypto(CryptoError::Decrypt(_)))
        )
    }

    /// Returns `true` if this is a backend storage error.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Returns `true` if the store was already shut down.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Backend(BackendError::Closed))
    }
}
