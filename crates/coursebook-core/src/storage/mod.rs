//! Durable key-value storage for client-side state.
//!
//! The session store mirrors the signed-in user into this storage so it
//! survives restarts. `FileStorage` keeps one JSON file per key in the data
//! directory; `MemoryStorage` is a process-local stand-in.

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String values addressed by string keys.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
