//! Cryptographic operations for CatVault.
//!
//! - AES-256-CBC with PKCS#7 padding for note bodies (`aes` + `cbc`)
//! - Platform CSPRNG for key and IV generation, with an explicit
//!   non-cryptographic fallback (`getrandom`, `rand`)
//! - Key material zeroized from memory on drop
//!
//! ## Security Model
//!
//! - The master key is 32 random bytes, not derived from the PIN; the PIN
//!   gates access to the stored key rather than deriving it.
//! - CBC without a MAC provides confidentiality but not integrity; tampering
//!   can decrypt to garbage without detection.
//! - CSPRNG unavailability degrades to a weak time-seeded source, surfaced
//!   as a warning rather than a failure.
//!
//! ## Threat Model
//!
//! We defend against:
//! - Casual access to the device by someone without the PIN
//!
//! We do NOT defend against:
//! - An attacker who can read the secure blob store (the key is stored there)
//! - Ciphertext tampering (no authentication tag)
//! - Compromised OS / keylogger

pub mod cipher;
pub mod key;
pub mod pin;
pub mod random;

pub use cipher::{EncryptedRecord, NoteCipher, IV_LENGTH};
pub use key::{MasterKey, KEY_LENGTH};
pub use pin::{Pin, PIN_LENGTH};
pub use random::{OsRandom, RandomSource, Strength, SystemRandom};
