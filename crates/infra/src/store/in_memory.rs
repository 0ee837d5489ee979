use std::collections::HashMap;
use std::sync::RwLock;

use super::r#trait::{KeyedStore, StoreError};

/// In-memory keyed store.
///
/// Intended for tests/dev. Contents do not survive the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyedStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().map_err(|_| StoreError::Poisoned)?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut blobs = self.blobs.write().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let blobs = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
