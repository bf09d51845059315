use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStorage, StorageResult};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.lock().insert(key.to_string(), value.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}
