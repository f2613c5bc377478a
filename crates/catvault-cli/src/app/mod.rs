//! Application context for the CatVault CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config and knows how to
//! open the configured blob store backend and the vault over it.

pub mod auth;

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use catvault_core::{SecureBlobStore, SqliteBlobStore, VaultService};

use crate::cli::Cli;
use crate::config::{
    default_config_path, default_store_path, load_config, StoreBackend, VaultConfig,
};
use crate::store::KeychainBlobStore;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<VaultConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.cli.config {
            Some(path) => Ok(PathBuf::from(path)),
            None => default_config_path(),
        }
    }

    pub fn config(&self) -> anyhow::Result<&VaultConfig> {
        self.config
            .get_or_try_init(|| load_config(&self.config_path()?))
    }

    /// Open the configured blob store backend.
    pub fn open_store(&self) -> anyhow::Result<Arc<dyn SecureBlobStore>> {
        let config = self.config()?;
        match config.store.backend {
            StoreBackend::Keychain => {
                Ok(Arc::new(KeychainBlobStore::new(&config.store.service)))
            }
            StoreBackend::Sqlite => {
                let path = match &config.store.path {
                    Some(path) => PathBuf::from(path),
                    None => default_store_path()?,
                };
                Ok(Arc::new(SqliteBlobStore::open(&path)?))
            }
        }
    }

    /// Open the vault over the configured store.
    pub fn open_vault(&self) -> anyhow::Result<VaultService> {
        Ok(VaultService::open(self.open_store()?))
    }
}
