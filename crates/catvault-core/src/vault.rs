//! The vault service: note CRUD over the key manager, cipher, and index.
//!
//! All public operations are serialized by an in-process mutex so the
//! record+index pairing behaves as a critical section even when multiple
//! surfaces call into one vault concurrently. Per-note decryption failures
//! degrade to raw-content display with a warning; they never abort a batch.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::crypto::cipher::NoteCipher;
use crate::crypto::key::MasterKey;
use crate::crypto::random::{RandomSource, SystemRandom};
use crate::error::{Result, VaultError, Warning};
use crate::index::{NoteId, NoteIdMinter, NoteIndex};
use crate::keys::{KeyProvider, SecretKeyManager};
use crate::storage::traits::SecureBlobStore;

/// Policy for a save whose encryption fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Fail the save on any cipher error.
    EncryptOnly,
    /// Persist the raw plaintext instead (the opt-in degraded save).
    AllowPlaintext,
}

/// One listed note: its id and the content chosen for display.
///
/// Content is the decrypted body, or the raw stored record when decryption
/// failed (see the listing's warnings).
#[derive(Debug, Clone)]
pub struct NoteEntry {
    pub id: NoteId,
    pub content: String,
}

/// Result of listing the vault.
#[derive(Debug, Clone)]
pub struct NoteListing {
    pub notes: Vec<NoteEntry>,
    pub warnings: Vec<Warning>,
}

/// Result of saving one note.
#[derive(Debug, Clone)]
pub struct SavedNote {
    pub id: NoteId,
    pub warnings: Vec<Warning>,
}

/// Result of viewing one note.
#[derive(Debug, Clone)]
pub struct ViewedNote {
    pub content: String,
    pub warnings: Vec<Warning>,
}

/// Result of an index reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    /// Index entries dropped because their note record was missing.
    pub dropped: Vec<String>,
}

/// Orchestrates note operations against one secure blob store.
pub struct VaultService {
    store: Arc<dyn SecureBlobStore>,
    keys: SecretKeyManager,
    cipher: NoteCipher,
    index: NoteIndex,
    minter: NoteIdMinter,
    op_lock: Mutex<()>,
}

impl VaultService {
    /// Open a vault over the given store with the default random source.
    ///
    /// Runs an opportunistic index reconciliation; reconciliation failures
    /// are ignored here and resurface on later operations.
    pub fn open(store: Arc<dyn SecureBlobStore>) -> Self {
        Self::with_random(store, Arc::new(SystemRandom))
    }

    /// Open a vault with a caller-supplied random source.
    pub fn with_random(store: Arc<dyn SecureBlobStore>, random: Arc<dyn RandomSource>) -> Self {
        let vault = Self {
            store: store.clone(),
            keys: SecretKeyManager::new(store.clone(), random.clone()),
            cipher: NoteCipher::new(random),
            index: NoteIndex::new(store),
            minter: NoteIdMinter::new(),
            op_lock: Mutex::new(()),
        };
        let _ = vault.reconcile();
        vault
    }

    /// Access to the key manager for PIN setup and verification.
    pub fn keys(&self) -> &SecretKeyManager {
        &self.keys
    }

    /// Drop index entries whose note record is missing.
    ///
    /// Orphaned records (record without an index entry) cannot be found
    /// without store enumeration and stay invisible.
    pub fn reconcile(&self) -> Result<ReconcileReport> {
        let _guard = self.lock_ops()?;
        let dropped = self.index.reconcile()?;
        Ok(ReconcileReport { dropped })
    }

    /// List all indexed notes.
    ///
    /// Notes that fail to decrypt are still listed with their raw stored
    /// content, each with a [`Warning::UnreadableNote`]; a failure never
    /// aborts the rest of the listing. With no PIN set the listing is empty.
    pub fn list_notes(&self) -> Result<NoteListing> {
        let _guard = self.lock_ops()?;

        let pin = match self.keys.stored_pin()? {
            Some(pin) => pin,
            None => {
                return Ok(NoteListing {
                    notes: Vec::new(),
                    warnings: Vec::new(),
                })
            }
        };
        let access = self.keys.get_or_create_key(Some(&pin))?;
        let mut warnings = access.warnings;

        let mut notes = Vec::new();
        for id in self.index.list()? {
            let record = match self.store.get(id.as_str())? {
                Some(record) => record,
                // Dangling index entry; dropped by the next reconcile.
                None => continue,
            };
            let content = self.display_content(&id, &record, &access.key, &mut warnings)?;
            notes.push(NoteEntry { id, content });
        }

        Ok(NoteListing { notes, warnings })
    }

    /// Save a note, encrypting it under the master key.
    ///
    /// # Errors
    ///
    /// - `VaultError::EmptyNote` on blank trimmed input.
    /// - `VaultError::NoPinSet` before PIN setup.
    /// - Cipher errors propagate under [`SaveMode::EncryptOnly`]; under
    ///   [`SaveMode::AllowPlaintext`] the raw text is persisted instead and
    ///   the outcome carries [`Warning::DegradedSave`].
    pub fn save_note(&self, plaintext: &str, mode: SaveMode) -> Result<SavedNote> {
        let _guard = self.lock_ops()?;

        if plaintext.trim().is_empty() {
            return Err(VaultError::EmptyNote);
        }
        let pin = self.keys.stored_pin()?.ok_or(VaultError::NoPinSet)?;
        let access = self.keys.get_or_create_key(Some(&pin))?;

        let sealed = self.cipher.encrypt(plaintext, &access.key);
        let id = self.minter.mint();
        let (record, mut warnings) = match sealed {
            Ok(sealed) => (sealed.record, sealed.warnings),
            Err(err) => match mode {
                SaveMode::EncryptOnly => return Err(err),
                SaveMode::AllowPlaintext => {
                    (plaintext.to_string(), vec![Warning::DegradedSave(id.clone())])
                }
            },
        };
        warnings.extend(access.warnings);

        // Record first, then index. An interruption here leaves an orphaned
        // record (invisible, reclaimable) rather than a dangling id.
        self.store.set(id.as_str(), &record)?;
        self.index.add(&id)?;

        Ok(SavedNote { id, warnings })
    }

    /// View one note.
    ///
    /// A note that fails to decrypt is returned with its raw stored content
    /// and a [`Warning::UnreadableNote`]; this is never an error.
    ///
    /// # Errors
    ///
    /// - `VaultError::NoteNotFound` if no record exists for the id.
    /// - `VaultError::NoPinSet` before PIN setup.
    pub fn view_note(&self, id: &NoteId) -> Result<ViewedNote> {
        let _guard = self.lock_ops()?;

        let record = self
            .store
            .get(id.as_str())?
            .ok_or_else(|| VaultError::NoteNotFound(id.to_string()))?;
        let pin = self.keys.stored_pin()?.ok_or(VaultError::NoPinSet)?;
        let access = self.keys.get_or_create_key(Some(&pin))?;

        let mut warnings = access.warnings;
        let content = self.display_content(id, &record, &access.key, &mut warnings)?;
        Ok(ViewedNote { content, warnings })
    }

    /// Delete a note record and its index entry.
    ///
    /// Each half is retried once on failure; a half that still fails makes
    /// this operation fail without poisoning the vault. Residual divergence
    /// heals on the next reconcile.
    pub fn delete_note(&self, id: &NoteId) -> Result<()> {
        let _guard = self.lock_ops()?;

        let mut record_result = self.store.delete(id.as_str());
        if record_result.is_err() {
            record_result = self.store.delete(id.as_str());
        }
        let mut index_result = self.index.remove(id);
        if index_result.is_err() {
            index_result = self.index.remove(id);
        }

        record_result?;
        index_result
    }

    /// Decrypt a record for display, degrading to the raw stored content on
    /// cipher or format failure.
    fn display_content(
        &self,
        id: &NoteId,
        record: &str,
        key: &MasterKey,
        warnings: &mut Vec<Warning>,
    ) -> Result<String> {
        match self.cipher.decrypt(record, key) {
            Ok(text) => Ok(text),
            Err(VaultError::MalformedRecord(_)) | Err(VaultError::Decryption(_)) => {
                warnings.push(Warning::UnreadableNote(id.clone()));
                Ok(record.to_string())
            }
            Err(err) => Err(err),
        }
    }

    fn lock_ops(&self) -> Result<MutexGuard<'_, ()>> {
        self.op_lock
            .lock()
            .map_err(|_| VaultError::Store("Vault lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::KEY_LENGTH;
    use crate::crypto::pin::Pin;
    use crate::crypto::random::Strength;
    use crate::storage::traits::{INDEX_RECORD, KEY_RECORD, PIN_RECORD};
    use crate::storage::MemoryBlobStore;

    /// Random source with no working entropy at all.
    struct BrokenRandom;

    impl RandomSource for BrokenRandom {
        fn fill(&self, _buf: &mut [u8]) -> Result<Strength> {
            Err(VaultError::Crypto("no entropy source".to_string()))
        }
    }

    fn vault_with_pin() -> (Arc<MemoryBlobStore>, VaultService) {
        let store = Arc::new(MemoryBlobStore::new());
        let vault = VaultService::open(store.clone() as Arc<dyn SecureBlobStore>);
        vault
            .keys()
            .get_or_create_key(Some(&Pin::new("1234").unwrap()))
            .unwrap();
        (store, vault)
    }

    #[test]
    fn test_save_then_list_round_trip() {
        let (_store, vault) = vault_with_pin();

        let saved = vault.save_note("hello", SaveMode::EncryptOnly).unwrap();
        assert!(saved.warnings.is_empty());

        let listing = vault.list_notes().unwrap();
        assert_eq!(listing.notes.len(), 1);
        assert_eq!(listing.notes[0].id, saved.id);
        assert_eq!(listing.notes[0].content, "hello");
        assert!(listing.warnings.is_empty());
    }

    #[test]
    fn test_note_is_stored_encrypted() {
        let (store, vault) = vault_with_pin();
        let saved = vault
            .save_note("very secret text", SaveMode::EncryptOnly)
            .unwrap();

        let record = store.get(saved.id.as_str()).unwrap().unwrap();
        assert!(record.contains(':'));
        assert!(!record.contains("very secret text"));
    }

    #[test]
    fn test_empty_note_rejected() {
        let (_store, vault) = vault_with_pin();
        for text in ["", "   ", "\n\t"] {
            let result = vault.save_note(text, SaveMode::EncryptOnly);
            assert!(matches!(result, Err(VaultError::EmptyNote)));
        }
    }

    #[test]
    fn test_save_before_pin_setup_fails() {
        let store = Arc::new(MemoryBlobStore::new());
        let vault = VaultService::open(store as Arc<dyn SecureBlobStore>);

        let result = vault.save_note("hello", SaveMode::EncryptOnly);
        assert!(matches!(result, Err(VaultError::NoPinSet)));
    }

    #[test]
    fn test_listing_without_pin_is_empty() {
        let store = Arc::new(MemoryBlobStore::new());
        let vault = VaultService::open(store as Arc<dyn SecureBlobStore>);

        let listing = vault.list_notes().unwrap();
        assert!(listing.notes.is_empty());
        assert!(listing.warnings.is_empty());
    }

    #[test]
    fn test_view_note() {
        let (_store, vault) = vault_with_pin();
        let saved = vault
            .save_note("the note body", SaveMode::EncryptOnly)
            .unwrap();

        let viewed = vault.view_note(&saved.id).unwrap();
        assert_eq!(viewed.content, "the note body");
        assert!(viewed.warnings.is_empty());
    }

    #[test]
    fn test_view_missing_note_fails() {
        let (_store, vault) = vault_with_pin();
        let result = vault.view_note(&NoteId::parse("note_1").unwrap());
        assert!(matches!(result, Err(VaultError::NoteNotFound(_))));
    }

    #[test]
    fn test_delete_removes_record_and_index_entry() {
        let (store, vault) = vault_with_pin();
        let saved = vault.save_note("to delete", SaveMode::EncryptOnly).unwrap();

        vault.delete_note(&saved.id).unwrap();

        assert_eq!(store.get(saved.id.as_str()).unwrap(), None);
        assert!(vault.list_notes().unwrap().notes.is_empty());
    }

    #[test]
    fn test_unreadable_note_degrades_to_raw_content() {
        let (store, vault) = vault_with_pin();
        let saved = vault.save_note("will corrupt", SaveMode::EncryptOnly).unwrap();

        // Replace the record with something the cipher rejects outright.
        store.set(saved.id.as_str(), "not-a-valid-record").unwrap();

        let listing = vault.list_notes().unwrap();
        assert_eq!(listing.notes.len(), 1);
        assert_eq!(listing.notes[0].content, "not-a-valid-record");
        assert_eq!(
            listing.warnings,
            vec![Warning::UnreadableNote(saved.id.clone())]
        );

        let viewed = vault.view_note(&saved.id).unwrap();
        assert_eq!(viewed.content, "not-a-valid-record");
        assert_eq!(viewed.warnings, vec![Warning::UnreadableNote(saved.id)]);
    }

    #[test]
    fn test_degraded_save_persists_plaintext() {
        let store = Arc::new(MemoryBlobStore::new());
        // A key already exists; only the entropy source is broken, so the
        // cipher cannot mint an IV and encryption fails.
        let key = MasterKey::from_bytes([3u8; KEY_LENGTH]);
        store.set(KEY_RECORD, &key.to_hex()).unwrap();
        store.set(PIN_RECORD, "1234").unwrap();
        let vault = VaultService::with_random(
            store.clone() as Arc<dyn SecureBlobStore>,
            Arc::new(BrokenRandom),
        );

        // Without the opt-in the save fails outright.
        let refused = vault.save_note("plain fallback", SaveMode::EncryptOnly);
        assert!(matches!(refused, Err(VaultError::Crypto(_))));

        let saved = vault
            .save_note("plain fallback", SaveMode::AllowPlaintext)
            .unwrap();
        assert_eq!(
            saved.warnings,
            vec![Warning::DegradedSave(saved.id.clone())]
        );

        // Stored raw, carrying no flag distinguishing it from ciphertext.
        let record = store.get(saved.id.as_str()).unwrap().unwrap();
        assert_eq!(record, "plain fallback");

        // Downstream decryption fails and falls back to raw display.
        let listing = vault.list_notes().unwrap();
        assert_eq!(listing.notes[0].content, "plain fallback");
        assert_eq!(
            listing.warnings,
            vec![Warning::UnreadableNote(saved.id)]
        );
    }

    #[test]
    fn test_dangling_index_entry_dropped_on_open() {
        let (store, vault) = vault_with_pin();
        let saved = vault.save_note("survivor", SaveMode::EncryptOnly).unwrap();

        // Simulate a crash between record delete and index update.
        store
            .set(INDEX_RECORD, &format!(r#"["{}","note_9999"]"#, saved.id))
            .unwrap();

        let reopened = VaultService::open(store.clone() as Arc<dyn SecureBlobStore>);
        let listing = reopened.list_notes().unwrap();
        assert_eq!(listing.notes.len(), 1);
        assert_eq!(listing.notes[0].id, saved.id);

        // The index itself was rewritten without the dangling id.
        let index_json = store.get(INDEX_RECORD).unwrap().unwrap();
        assert!(!index_json.contains("note_9999"));
    }

    #[test]
    fn test_orphaned_record_stays_invisible() {
        let (store, vault) = vault_with_pin();
        store.set("note_12345", "orphaned record").unwrap();

        let listing = vault.list_notes().unwrap();
        assert!(listing.notes.is_empty());
        // The record itself is untouched (reclaimable, not deleted).
        assert!(store.get("note_12345").unwrap().is_some());
    }

    #[test]
    fn test_reconcile_reports_dropped_ids() {
        let (store, vault) = vault_with_pin();
        store.set(INDEX_RECORD, r#"["note_77"]"#).unwrap();

        let report = vault.reconcile().unwrap();
        assert_eq!(report.dropped, vec!["note_77".to_string()]);
    }

    #[test]
    fn test_rapid_saves_get_distinct_ids() {
        let (_store, vault) = vault_with_pin();
        let mut ids = std::collections::HashSet::new();
        for i in 0..20 {
            let saved = vault
                .save_note(&format!("note {}", i), SaveMode::EncryptOnly)
                .unwrap();
            assert!(ids.insert(saved.id));
        }

        let listing = vault.list_notes().unwrap();
        assert_eq!(listing.notes.len(), 20);
    }
}
