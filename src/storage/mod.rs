//! Key-value persistence for saved signatures.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Key under which `save` stores the exported data URI.
pub const SAVED_SIGNATURE_KEY: &str = "savedSignature";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value store, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;
}
