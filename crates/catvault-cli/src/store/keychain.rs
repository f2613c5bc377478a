//! OS-keychain blob store backend.
//!
//! Maps each vault record to one keychain entry under a shared service
//! name. The keychain provides the at-rest protection the
//! [`SecureBlobStore`] contract assumes from its backends.

use catvault_core::error::{Result, VaultError};
use catvault_core::SecureBlobStore;

pub struct KeychainBlobStore {
    service: String,
}

impl KeychainBlobStore {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, key)
            .map_err(|e| VaultError::Store(format!("Keychain entry failed: {}", e)))
    }
}

impl SecureBlobStore for KeychainBlobStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| VaultError::Store(format!("Keychain write failed: {}", e)))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(VaultError::Store(format!("Keychain read failed: {}", err))),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(VaultError::Store(format!("Keychain delete failed: {}", err))),
        }
    }
}
