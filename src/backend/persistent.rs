//! Durable unencrypted backend backed by fjall.

use std::sync::Arc;

use fjall::{Keyspace, PersistMode};

use super::{Backend, BackendError};

/// Durable backend storing raw slot bytes in a fjall keyspace.
///
/// Every mutation is persisted with `PersistMode::SyncAll` before returning,
/// so a completed `write` survives process restart.
pub struct PersistentBackend {
    db: Arc<fjall::Database>,
    data: Keyspace,
}

impl PersistentBackend {
    pub fn new(db: Arc<fjall::Database>, data: Keyspace) -> Self {
        Self { db, data }
    }
}

impl Backend for PersistentBackend {
    fn read(&self, qualified: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.data.get(qualified)?.map(|v| v.to_vec()))
    }

    fn write(&self, qualified: &str, bytes: &[u8]) -> Result<(), BackendError> {
        self.data.insert(qualified, bytes)?;
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
