//! Master key lifecycle.
//!
//! [`SecretKeyManager`] owns the single master key: it is created lazily on
//! first PIN setup, persisted hex-encoded under `encryptionKey`, and cached
//! in memory for the lifetime of the vault instance. Key retrieval does NOT
//! re-verify the PIN; the PIN gates creation and is checked separately by
//! callers via [`SecretKeyManager::verify_pin`]. Anyone who can read the
//! blob store recovers the key without the PIN; the store's own at-rest
//! protection is the real barrier.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::crypto::key::{MasterKey, KEY_LENGTH};
use crate::crypto::pin::Pin;
use crate::crypto::random::{RandomSource, Strength};
use crate::error::{Result, VaultError, Warning};
use crate::storage::traits::{SecureBlobStore, KEY_RECORD, PIN_RECORD};

/// A master key together with any warnings raised while obtaining it.
#[derive(Debug)]
pub struct KeyAccess {
    pub key: MasterKey,
    pub warnings: Vec<Warning>,
}

/// Provides the master key, creating it on first use.
pub trait KeyProvider: Send + Sync {
    /// Get the master key, creating and persisting it if absent.
    ///
    /// A `pin` is required only when no key exists yet; when a key is
    /// already stored it is returned regardless of the supplied value.
    fn get_or_create_key(&self, pin: Option<&Pin>) -> Result<KeyAccess>;
}

/// Owns the lifecycle of the master key and the PIN records.
///
/// Constructed once per vault instance; the key is loaded or created on
/// first use and cached thereafter.
pub struct SecretKeyManager {
    store: Arc<dyn SecureBlobStore>,
    random: Arc<dyn RandomSource>,
    cached: OnceCell<MasterKey>,
}

impl SecretKeyManager {
    pub fn new(store: Arc<dyn SecureBlobStore>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            store,
            random,
            cached: OnceCell::new(),
        }
    }

    /// Whether a master key record exists.
    pub fn key_is_set(&self) -> Result<bool> {
        if self.cached.get().is_some() {
            return Ok(true);
        }
        Ok(self.store.get(KEY_RECORD)?.is_some())
    }

    /// The stored PIN, if one is recorded.
    ///
    /// An unparseable stored value reads as `None`: a half-written setup is
    /// treated as "PIN not set", and callers may re-set a PIN over it.
    pub fn stored_pin(&self) -> Result<Option<Pin>> {
        match self.store.get(PIN_RECORD)? {
            Some(raw) => Ok(Pin::new(&raw).ok()),
            None => Ok(None),
        }
    }

    /// Whether a PIN is recorded.
    pub fn pin_is_set(&self) -> Result<bool> {
        Ok(self.stored_pin()?.is_some())
    }

    /// Compare a supplied PIN against the stored one.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NoPinSet` when no PIN is recorded.
    pub fn verify_pin(&self, pin: &Pin) -> Result<bool> {
        match self.stored_pin()? {
            Some(stored) => Ok(&stored == pin),
            None => Err(VaultError::NoPinSet),
        }
    }

    fn load_or_create(&self, pin: Option<&Pin>, warnings: &mut Vec<Warning>) -> Result<MasterKey> {
        if let Some(key) = self.cached.get() {
            return Ok(key.clone());
        }

        let key = match self.store.get(KEY_RECORD)? {
            Some(encoded) => MasterKey::from_hex(&encoded)?,
            None => {
                let pin = pin.ok_or(VaultError::MissingPin)?;
                let key = self.generate_key(warnings)?;
                // Key first, then PIN. If the PIN write fails the next
                // launch sees a key with no PIN and treats it as "PIN not
                // set"; the repair path below re-attaches a PIN to it.
                self.store.set(KEY_RECORD, &key.to_hex())?;
                self.store.set(PIN_RECORD, pin.as_str())?;
                key
            }
        };

        let _ = self.cached.set(key.clone());
        Ok(key)
    }

    fn generate_key(&self, warnings: &mut Vec<Warning>) -> Result<MasterKey> {
        let mut bytes = [0u8; KEY_LENGTH];
        let strength = self.random.fill(&mut bytes)?;
        if strength == Strength::Fallback {
            warnings.push(Warning::WeakRandomness);
        }
        Ok(MasterKey::from_bytes(bytes))
    }
}

impl KeyProvider for SecretKeyManager {
    fn get_or_create_key(&self, pin: Option<&Pin>) -> Result<KeyAccess> {
        let mut warnings = Vec::new();
        let key = self.load_or_create(pin, &mut warnings)?;

        // Repair: a key that exists without a recorded PIN (interrupted
        // first setup) adopts the supplied PIN.
        if let Some(pin) = pin {
            if self.store.get(PIN_RECORD)?.is_none() {
                self.store.set(PIN_RECORD, pin.as_str())?;
            }
        }

        Ok(KeyAccess { key, warnings })
    }
}
