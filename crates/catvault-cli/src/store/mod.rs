//! CLI-side blob store backends.

pub mod keychain;

pub use keychain::KeychainBlobStore;
