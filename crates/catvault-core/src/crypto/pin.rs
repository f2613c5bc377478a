//! PIN validation and handling.
//!
//! The PIN gates access to the stored master key; it is not a key-derivation
//! input. See the crate-level security model for the implications.

use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Required PIN length in digits.
pub const PIN_LENGTH: usize = 4;

/// A 4-digit numeric PIN.
///
/// Validated at construction; zeroized from memory on drop. At most one PIN
/// exists per installation, persisted under the `userPin` record.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct Pin {
    digits: String,
}

impl Pin {
    /// Validate and wrap a PIN string.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` unless the input is exactly four
    /// ASCII digits.
    pub fn new(digits: &str) -> Result<Self> {
        if digits.len() != PIN_LENGTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VaultError::InvalidInput(format!(
                "PIN must be exactly {} digits",
                PIN_LENGTH
            )));
        }
        Ok(Self {
            digits: digits.to_string(),
        })
    }

    /// The PIN digits as persisted under the `userPin` record.
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pin").field("digits", &"[REDACTED]").finish()
    }
}
