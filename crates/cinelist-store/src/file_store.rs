use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::backing::{validate_key, BackingStore};
use crate::error::StorageError;

/// Backing store keeping each key in its own `<key>.json` file
pub struct FileBackingStore {
    dir: PathBuf,
}

impl FileBackingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Directory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BackingStore for FileBackingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Storage hit: {} ({} bytes)", key, content.len());
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Storage miss: {} (file does not exist)", key);
                Ok(None)
            }
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let write_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).map_err(write_err)?;
        std::fs::rename(&temp_path, &path).map_err(write_err)?;

        debug!("Storage saved: {} ({} bytes)", key, value.len());
        Ok(())
    }
}
