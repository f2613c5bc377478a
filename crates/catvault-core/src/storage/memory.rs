//! In-memory blob store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, VaultError};
use crate::storage::traits::SecureBlobStore;

/// In-memory blob store for tests and ephemeral vaults.
///
/// Carries none of the at-rest protection the trait assumes from real
/// backends; contents vanish with the process.
#[derive(Default)]
pub struct MemoryBlobStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|_| VaultError::Store("Memory store poisoned".to_string()))
    }
}

impl SecureBlobStore for MemoryBlobStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
