//! Random byte sources for key and IV generation.
//!
//! The platform CSPRNG is always tried first. When it is unavailable the
//! vault falls back to a non-cryptographic time-seeded generator rather than
//! failing outright; the fallback is reported to the caller as
//! [`Strength::Fallback`] so it can be surfaced as a warning. This trade-off
//! between availability and cryptographic strength is part of the vault's
//! contract, not an accident.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::error::{Result, VaultError};

/// Which source produced the requested bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    /// Platform CSPRNG.
    Csprng,
    /// Non-cryptographic time-seeded generator.
    Fallback,
}

/// A source of random bytes for key and IV generation.
pub trait RandomSource: Send + Sync {
    /// Fill `buf` with random bytes, reporting which source was used.
    fn fill(&self, buf: &mut [u8]) -> Result<Strength>;
}

/// Platform CSPRNG only; errors when the OS source is unavailable.
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<Strength> {
        getrandom::getrandom(buf)
            .map_err(|e| VaultError::Crypto(format!("CSPRNG unavailable: {}", e)))?;
        Ok(Strength::Csprng)
    }
}

/// Platform CSPRNG with a weak time-seeded fallback.
///
/// This is the default source for the vault. A fallback fill is reported as
/// [`Strength::Fallback`] and never treated as an error.
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<Strength> {
        if getrandom::getrandom(buf).is_ok() {
            return Ok(Strength::Csprng);
        }
        fallback_fill(buf)?;
        Ok(Strength::Fallback)
    }
}

/// Fill from a SmallRng seeded with the current time.
///
/// SmallRng is documented as NOT cryptographically secure; this path exists
/// only to keep the vault usable when the OS source is broken.
fn fallback_fill(buf: &mut [u8]) -> Result<()> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| VaultError::Crypto(format!("System time error: {}", e)))?
        .as_nanos() as u64;
    let mut rng = SmallRng::seed_from_u64(seed);
    rng.fill_bytes(buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_fills_buffer() {
        let mut buf = [0u8; 32];
        let strength = OsRandom.fill(&mut buf).unwrap();
        assert_eq!(strength, Strength::Csprng);
        // 32 zero bytes from a CSPRNG is effectively impossible
        assert_ne!(buf, [0u8; 32]);
    }

    #[test]
    fn test_system_random_prefers_csprng() {
        let mut buf = [0u8; 16];
        let strength = SystemRandom.fill(&mut buf).unwrap();
        assert_eq!(strength, Strength::Csprng);
    }

    #[test]
    fn test_fallback_fill_produces_bytes() {
        let mut buf = [0u8; 32];
        fallback_fill(&mut buf).unwrap();
        assert_ne!(buf, [0u8; 32]);
    }

    #[test]
    fn test_successive_fills_differ() {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        SystemRandom.fill(&mut a).unwrap();
        SystemRandom.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
