//! # CatVault Core
//!
//! Core library for CatVault - a PIN-protected encrypted notes vault.
//!
//! This crate provides the secret-key lifecycle and the per-note
//! encryption/decryption pipeline, independent of any user interface.
//!
//! ## Architecture
//!
//! - **storage**: the secure blob store seam and its backends
//! - **crypto**: master key, PIN, random sources, note cipher
//! - **keys**: PIN-gated master key lifecycle
//! - **index**: ordered note-id index with reconciliation
//! - **vault**: note CRUD orchestration and degraded-mode policy
//! - **biometric**: capability seam for device biometrics
//!
//! ## Degraded modes
//!
//! The vault prefers availability over hard failure in two explicit,
//! warning-surfaced places: random generation falls back to a weak source
//! when the CSPRNG is unavailable, and saves may opt in to persisting
//! plaintext when the cipher path fails. Neither fallback is ever silent.

pub mod biometric;
pub mod crypto;
pub mod error;
pub mod index;
pub mod keys;
pub mod storage;
pub mod vault;

pub use biometric::{BiometricGate, NoBiometrics};
pub use crypto::{MasterKey, NoteCipher, Pin};
pub use error::{Result, VaultError, Warning};
pub use index::{NoteId, NoteIndex};
pub use keys::{KeyProvider, SecretKeyManager};
pub use storage::{MemoryBlobStore, SecureBlobStore, SqliteBlobStore};
pub use vault::{NoteListing, SaveMode, VaultService};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
