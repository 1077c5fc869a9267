//! Key-value persistence for session state.
//!
//! ## Summary
//! The session store only needs `get`, `set` and `remove` on byte blobs.
//! [`MemoryStore`] keeps them in process (tests, ephemeral hosts);
//! [`FileStore`] keeps one file per key in a directory.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage layer errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = StorageResult<T>> + Send + 'a>>;

pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if absent.
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<Vec<u8>>>;

    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> StorageFuture<'a, ()>;

    /// Removing an absent key is not an error.
    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;
}
