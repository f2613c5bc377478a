//! Authenticated-format encryption and decryption of note bodies.
//!
//! Notes are encrypted with AES-256-CBC and PKCS#7 padding under the single
//! master key, with a fresh 16-byte IV per call. The persisted record format
//! is `hex(iv) + ":" + base64(ciphertext)`.
//!
//! The scheme provides confidentiality but NOT integrity: there is no MAC or
//! AEAD tag, so tampering that survives padding and UTF-8 checks decrypts to
//! garbage silently. The record format is the compatibility seam a future
//! versioned AEAD upgrade would preserve.

use std::sync::Arc;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::key::MasterKey;
use crate::crypto::random::{RandomSource, Strength};
use crate::error::{Result, VaultError, Warning};

/// Length of the CBC initialization vector in bytes.
pub const IV_LENGTH: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Result of encrypting one note body.
#[derive(Debug, Clone)]
pub struct EncryptedRecord {
    /// The persisted `hex(iv):base64(ciphertext)` string.
    pub record: String,
    /// Non-fatal conditions hit while encrypting (weak IV randomness).
    pub warnings: Vec<Warning>,
}

/// Encrypts and decrypts individual note bodies under the master key.
pub struct NoteCipher {
    random: Arc<dyn RandomSource>,
}

impl NoteCipher {
    /// Create a cipher drawing IVs from the given random source.
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Encrypt a note body into a ciphertext record.
    ///
    /// A fresh IV is generated per call; IVs are never reused across notes,
    /// since reuse under the same key breaks CBC confidentiality.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Crypto` if no random source can produce an IV or
    /// the cipher cannot be initialized.
    pub fn encrypt(&self, plaintext: &str, key: &MasterKey) -> Result<EncryptedRecord> {
        let mut iv = [0u8; IV_LENGTH];
        let strength = self.random.fill(&mut iv)?;

        let ciphertext = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
            .map_err(|e| VaultError::Crypto(format!("Cipher init failed: {}", e)))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let record = format!("{}:{}", hex::encode(iv), STANDARD.encode(ciphertext));
        let warnings = match strength {
            Strength::Csprng => Vec::new(),
            Strength::Fallback => vec![Warning::WeakRandomness],
        };
        Ok(EncryptedRecord { record, warnings })
    }

    /// Decrypt a ciphertext record back into the note body.
    ///
    /// # Errors
    ///
    /// - `VaultError::MalformedRecord` if the `:` delimiter or either half is
    ///   missing.
    /// - `VaultError::Decryption` if the IV or ciphertext cannot be decoded,
    ///   the cipher rejects the ciphertext (bad key, IV, or padding), the
    ///   decrypted bytes are not valid UTF-8, or the plaintext is empty.
    pub fn decrypt(&self, record: &str, key: &MasterKey) -> Result<String> {
        let (iv_hex, encoded) = record
            .split_once(':')
            .ok_or_else(|| VaultError::MalformedRecord("missing IV delimiter".to_string()))?;
        if iv_hex.is_empty() || encoded.is_empty() {
            return Err(VaultError::MalformedRecord(
                "empty IV or ciphertext".to_string(),
            ));
        }

        let iv = hex::decode(iv_hex)
            .map_err(|e| VaultError::Decryption(format!("Invalid IV encoding: {}", e)))?;
        if iv.len() != IV_LENGTH {
            return Err(VaultError::Decryption(format!(
                "IV must be {} bytes, got {}",
                IV_LENGTH,
                iv.len()
            )));
        }
        let ciphertext = STANDARD
            .decode(encoded)
            .map_err(|e| VaultError::Decryption(format!("Invalid ciphertext encoding: {}", e)))?;

        let plaintext = Aes256CbcDec::new_from_slices(key.as_bytes(), &iv)
            .map_err(|e| VaultError::Crypto(format!("Cipher init failed: {}", e)))?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| VaultError::Decryption("bad key, IV, or padding".to_string()))?;

        let text = String::from_utf8(plaintext)
            .map_err(|_| VaultError::Decryption("decrypted bytes are not valid text".to_string()))?;
        if text.is_empty() {
            return Err(VaultError::Decryption("empty plaintext".to_string()));
        }
        Ok(text)
    }
}
