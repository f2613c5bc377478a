//! Note identifiers and the ordered note index.
//!
//! The index is a single JSON-array record under `noteKeys`; every id in it
//! is expected to have a matching note record in the blob store. The store
//! offers no transactions, so the pairing can diverge when a process dies
//! mid-operation; [`NoteIndex::reconcile`] drops dangling ids on vault open.
//! Orphaned records (record without an index entry) stay invisible: the
//! store cannot be enumerated, so they are tolerated as reclaimable.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::error::{Result, VaultError};
use crate::storage::traits::{SecureBlobStore, INDEX_RECORD};

/// Prefix shared by all note record keys.
pub const NOTE_ID_PREFIX: &str = "note_";

/// Identifier of one note, of the form `note_<decimal-millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteId(String);

impl NoteId {
    /// Parse an id string, rejecting anything that is not
    /// `note_` followed by decimal digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let digits = raw
            .strip_prefix(NOTE_ID_PREFIX)
            .ok_or_else(|| VaultError::InvalidInput(format!("Invalid note id: {}", raw)))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VaultError::InvalidInput(format!("Invalid note id: {}", raw)));
        }
        Ok(Self(raw.to_string()))
    }

    /// The id as stored in the index and used as the record key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints collision-free note ids.
///
/// Ids encode the creation time in milliseconds; rapid successive saves get
/// monotonically bumped values instead of colliding on the same millisecond.
/// Owned by the vault instance, not global state.
pub struct NoteIdMinter {
    last_millis: AtomicI64,
}

impl NoteIdMinter {
    pub fn new() -> Self {
        Self {
            last_millis: AtomicI64::new(0),
        }
    }

    /// Mint a fresh id, strictly greater than any previously minted here.
    pub fn mint(&self) -> NoteId {
        let now = Utc::now().timestamp_millis();
        let assigned = loop {
            let last = self.last_millis.load(Ordering::Acquire);
            let candidate = (last + 1).max(now);
            if self
                .last_millis
                .compare_exchange(last, candidate, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break candidate;
            }
        };
        NoteId(format!("{}{}", NOTE_ID_PREFIX, assigned))
    }
}

impl Default for NoteIdMinter {
    fn default() -> Self {
        Self::new()
    }
}

/// The ordered set of note ids, persisted as a JSON array string.
pub struct NoteIndex {
    store: Arc<dyn SecureBlobStore>,
}

impl NoteIndex {
    pub fn new(store: Arc<dyn SecureBlobStore>) -> Self {
        Self { store }
    }

    /// List ids in stored order. A missing index record reads as empty;
    /// entries that do not parse as note ids are skipped.
    pub fn list(&self) -> Result<Vec<NoteId>> {
        Ok(self
            .load_raw()?
            .iter()
            .filter_map(|raw| NoteId::parse(raw).ok())
            .collect())
    }

    /// Append an id. Never deduplicates; callers only add genuinely new ids.
    pub fn add(&self, id: &NoteId) -> Result<()> {
        let mut raw = self.load_raw()?;
        raw.push(id.as_str().to_string());
        self.persist(&raw)
    }

    /// Remove an id, preserving the relative order of the rest.
    pub fn remove(&self, id: &NoteId) -> Result<()> {
        let mut raw = self.load_raw()?;
        raw.retain(|entry| entry != id.as_str());
        self.persist(&raw)
    }

    /// Drop index entries whose note record is missing or whose id is
    /// unparseable, rewriting the index only when something changed.
    ///
    /// # Returns
    ///
    /// The dropped entries, for reporting.
    pub fn reconcile(&self) -> Result<Vec<String>> {
        let raw = self.load_raw()?;
        let mut kept = Vec::with_capacity(raw.len());
        let mut dropped = Vec::new();

        for entry in raw {
            let valid = match NoteId::parse(&entry) {
                Ok(id) => self.store.get(id.as_str())?.is_some(),
                Err(_) => false,
            };
            if valid {
                kept.push(entry);
            } else {
                dropped.push(entry);
            }
        }

        if !dropped.is_empty() {
            self.persist(&kept)?;
        }
        Ok(dropped)
    }

    fn load_raw(&self) -> Result<Vec<String>> {
        match self.store.get(INDEX_RECORD)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, ids: &[String]) -> Result<()> {
        let json = serde_json::to_string(ids)?;
        self.store.set(INDEX_RECORD, &json)
    }
}
