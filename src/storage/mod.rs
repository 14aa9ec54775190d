//! Named blob storage behind the model store.
//!
//! A backend only has to offer what atomic artifact replacement needs:
//! reading a blob, writing a temporary blob, renaming it over the target
//! and an exclusive named lock. [`file::FileStorage`] keeps blobs in a
//! directory; [`memory::MemoryStorage`] keeps them in a map for tests.
//!
//! ```
//! use tonescope::storage::{StorageConfig, StorageFactory};
//!
//! # fn main() -> tonescope::error::Result<()> {
//! let storage = StorageFactory::create(StorageConfig::default())?;
//! assert!(!storage.file_exists("emotion.model.json"));
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::io::{self, Read, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::error::{Result, ToneError};

pub mod file;
pub mod memory;

/// A store of named blobs.
pub trait Storage: Send + Sync + Debug {
    /// Open a blob for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    fn file_exists(&self, name: &str) -> bool;

    /// Delete a blob. Deleting a missing blob is not an error.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// Names of the published blobs, sorted. Temporary blobs and locks are
    /// not listed.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Move a blob to a new name, replacing whatever the target held.
    fn rename_file(&self, from: &str, to: &str) -> Result<()>;

    /// Create a uniquely named temporary blob and return its name.
    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)>;

    /// Take an exclusive named lock, failing if it is already held.
    fn acquire_lock(&self, name: &str) -> Result<Box<dyn StorageLock>>;
}

/// A readable blob.
pub trait StorageInput: Read + Send + Debug {}

impl<T: Read + Send + Debug> StorageInput for T {}

/// A blob being written.
pub trait StorageOutput: Write + Send + Debug {
    /// Flush buffered bytes, make them durable and publish the blob under
    /// its name. Calling it again is a no-op.
    fn finish(&mut self) -> Result<()>;
}

/// An exclusive lock, released on drop.
pub trait StorageLock: Send + Debug {
    fn name(&self) -> &str;

    fn release(&mut self) -> Result<()>;
}

/// Which backend to build.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    File(file::FileStorageConfig),
    Memory(memory::MemoryStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(memory::MemoryStorageConfig::default())
    }
}

/// Builds a shared backend from its configuration.
pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        Ok(match config {
            StorageConfig::File(config) => Arc::new(file::FileStorage::new(config)?),
            StorageConfig::Memory(config) => Arc::new(memory::MemoryStorage::new(config)),
        })
    }
}

/// Backend failures, surfaced as [`ToneError::Storage`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{name} is locked by another run")]
    Locked { name: String },

    #[error("cannot {action} {name}: {source}")]
    Io {
        action: &'static str,
        name: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Adapter for `map_err` on I/O results.
    pub fn io(action: &'static str, name: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let name = name.into();
        move |source| StorageError::Io {
            action,
            name,
            source,
        }
    }
}

impl From<StorageError> for ToneError {
    fn from(err: StorageError) -> Self {
        ToneError::storage(err.to_string())
    }
}
