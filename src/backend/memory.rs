//! Process-lifetime in-memory backend.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Backend, BackendError};

/// In-memory backend. Contents live for the process lifetime and are lost on
/// restart; no I/O, no encryption.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, qualified: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.entries.read().get(qualified).cloned())
    }

    fn write(&self, qualified: &str, bytes: &[u8]) -> Result<(), BackendError> {
        self.entries
            .write()
            .insert(qualified.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, qualified: &str) -> Result<(), BackendError> {
        self.entries.write().remove(qualified);
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
