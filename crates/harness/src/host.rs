use std::path::PathBuf;

use tempfile::TempDir;
use trackreg_engine::{EngineError, Registry, RegistryConfig};
use trackreg_storage::{SqliteStorage, StorageError};

/// A database file in a temporary directory, opened once per simulated process.
pub struct TestHost {
    _dir: TempDir,
    path: PathBuf,
    config: RegistryConfig,
}

impl TestHost {
    pub fn new() -> Result<Self, std::io::Error> {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, std::io::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("site.db");
        Ok(Self {
            _dir: dir,
            path,
            config,
        })
    }

    pub fn storage(&self) -> Result<SqliteStorage, StorageError> {
        SqliteStorage::open(&self.path.to_string_lossy())
    }

    pub fn open(&self) -> Result<Registry<SqliteStorage>, EngineError> {
        Registry::open(self.storage()?, self.config.clone())
    }
}
