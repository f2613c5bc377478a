//! Error types for CatVault core operations.
//!
//! This module defines the error hierarchy for all core operations, plus the
//! non-fatal [`Warning`] values the vault surfaces alongside results. Errors
//! are descriptive at the core level; the CLI layer maps these to
//! user-friendly messages.

use thiserror::Error;

use crate::index::NoteId;

/// Result type alias for CatVault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for CatVault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A PIN is required to generate the encryption key and none was supplied
    #[error("PIN required to generate encryption key")]
    MissingPin,

    /// A note operation was attempted before any PIN was set
    #[error("No PIN set")]
    NoPinSet,

    /// Blank note input
    #[error("Note cannot be empty")]
    EmptyNote,

    /// Ciphertext record missing the IV delimiter or an empty half
    #[error("Malformed ciphertext record: {0}")]
    MalformedRecord(String),

    /// Cipher, padding, or text decoding failure during decryption
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Encryption or key material error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Store(String),

    /// Note record not present in the store
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Store(err.to_string())
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        VaultError::Store(err.to_string())
    }
}

/// Non-fatal conditions surfaced alongside operation results.
///
/// The vault never hides a degraded path: every fallback taken is reported
/// as a value the caller can render or audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The platform CSPRNG was unavailable; a non-cryptographic time-seeded
    /// source supplied the random bytes instead.
    WeakRandomness,

    /// A stored record could not be decrypted; its raw stored content was
    /// substituted for display.
    UnreadableNote(NoteId),

    /// The opt-in degraded save path persisted this note as plaintext.
    DegradedSave(NoteId),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::WeakRandomness => {
                write!(f, "CSPRNG unavailable; fallback random source used")
            }
            Warning::UnreadableNote(id) => {
                write!(f, "Note {} could not be decrypted; showing raw content", id)
            }
            Warning::DegradedSave(id) => {
                write!(f, "Note {} saved unencrypted (degraded save)", id)
            }
        }
    }
}
