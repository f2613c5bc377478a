//! Storage layer: the secure blob store seam and its backends.
//!
//! The vault core treats persistence as an opaque string-keyed store with
//! OS-backed at-rest protection ([`SecureBlobStore`]). Two backends live
//! here; the CLI adds an OS-keychain backend on top of the same trait.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;
pub use traits::{SecureBlobStore, INDEX_RECORD, KEY_RECORD, PIN_RECORD};
