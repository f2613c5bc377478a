//! Biometric capability seam.
//!
//! The core does not implement biometric matching; it consumes a capability
//! check that feeds a boolean into the auth flow. A failed or unavailable
//! prompt always means "fall back to PIN entry", never a fatal error.

/// Device biometric capability check and prompt.
pub trait BiometricGate: Send + Sync {
    /// Whether the device has biometric hardware.
    fn has_capability(&self) -> bool;

    /// Whether the user has enrolled a biometric credential.
    fn is_enrolled(&self) -> bool;

    /// Show the platform prompt; `true` only on a successful match.
    ///
    /// Unavailability, cancellation, and mismatches all read as `false`.
    fn prompt(&self, message: &str) -> bool;
}

/// A host with no biometric surface; every flow falls back to the PIN.
pub struct NoBiometrics;

impl BiometricGate for NoBiometrics {
    fn has_capability(&self) -> bool {
        false
    }

    fn is_enrolled(&self) -> bool {
        false
    }

    fn prompt(&self, _message: &str) -> bool {
        false
    }
}
