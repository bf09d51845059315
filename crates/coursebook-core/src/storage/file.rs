use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::{KeyValueStorage, StorageError, StorageResult};

/// One `<key>.json` file per key under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: String::new(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        // Write then rename so a crash never leaves a truncated entry
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_error(key, e))?;
        debug!(key = key, "Stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key = key, "Removed entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}
