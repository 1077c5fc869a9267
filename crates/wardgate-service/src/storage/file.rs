use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, StorageFuture, StorageResult};

/// Directory-backed store: each key lives in `<dir>/<key>`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a truncated blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    #[tracing::instrument(skip(self, value), fields(dir = %self.dir.display(), len = value.len()))]
    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            tokio::fs::create_dir_all(&self.dir).await?;

            let tmp = self.dir.join(format!(".{key}.tmp"));
            tokio::fs::write(&tmp, &value).await?;
            tokio::fs::rename(&tmp, &path).await?;

            tracing::trace!("Blob written");
            Ok(())
        })
    }

    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }
}
