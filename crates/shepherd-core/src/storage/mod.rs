mod config;
pub mod database;
pub mod memory;
pub mod snapshot;

pub use config::{AudioConfig, CatalogConfig, Config, MilestonesConfig, ProgressConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use snapshot::{PersistedState, PLAYER_STORAGE_KEY, SNAPSHOT_VERSION};

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable key-value storage.
///
/// Values are opaque strings; callers own the encoding.
pub trait KvStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Returns `~/.config/shepherd[-dev]/` based on SHEPHERD_ENV.
///
/// Set SHEPHERD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SHEPHERD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("shepherd-dev")
    } else {
        base_dir.join("shepherd")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
