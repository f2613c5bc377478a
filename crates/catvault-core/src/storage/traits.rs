//! Secure blob store trait definition.
//!
//! The [`SecureBlobStore`] trait is the persistence seam of the vault: a
//! string-keyed store whose values are expected to already be protected at
//! rest by the host platform (OS keychain or equivalent). The core does not
//! re-encrypt the values it stores directly under the well-known keys.

use crate::error::Result;

/// Record key for the hex-encoded master key.
pub const KEY_RECORD: &str = "encryptionKey";

/// Record key for the user's PIN.
pub const PIN_RECORD: &str = "userPin";

/// Record key for the JSON array of note ids.
pub const INDEX_RECORD: &str = "noteKeys";

/// Key-value persistence with OS-backed at-rest protection.
///
/// Implementations must ensure:
/// - Values round-trip exactly (opaque strings)
/// - `get` of an absent key is `Ok(None)`, never an error
/// - `delete` of an absent key is a no-op
///
/// The store offers no enumeration and no transactions; multi-record
/// consistency is the caller's responsibility (see the vault's critical
/// section and reconciliation policy).
pub trait SecureBlobStore: Send + Sync {
    /// Store a value under the given key, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Store` on backend failure.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve the value stored under the given key.
    ///
    /// # Returns
    ///
    /// `Ok(Some(value))` if present, `Ok(None)` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove the value stored under the given key, if any.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Store` on backend failure.
    fn delete(&self, key: &str) -> Result<()>;
}
