//! The master key type.
//!
//! Exactly one [`MasterKey`] exists per installation. It is created lazily by
//! the key manager on first PIN setup and persisted hex-encoded in the secure
//! blob store; see the `keys` module for the lifecycle.

use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Length of the master key in bytes (32 bytes = 256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// The single symmetric key protecting all notes.
///
/// Key material is zeroized from memory when dropped, reducing the window of
/// exposure. Outside the core boundary the key is only ever handled as an
/// opaque value passed into cipher calls.
#[derive(Clone, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Create a MasterKey from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure
    /// source.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Parse a MasterKey from its persisted hex form (64 hex characters).
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded)
            .map_err(|e| VaultError::Crypto(format!("Invalid key encoding: {}", e)))?;
        let key: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| VaultError::Crypto("Stored key is not 32 bytes".to_string()))?;
        Ok(Self { key })
    }

    /// Hex-encode the key for persistence (64 lowercase hex characters).
    ///
    /// # Security
    ///
    /// Only write this value to the secure blob store. Never log it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher
    /// operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
