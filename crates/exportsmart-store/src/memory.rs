use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::storage::LocalStorage;

/// In-process local storage. Contents are lost when dropped.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_map<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, StoreError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("storage mutex poisoned: {e}")))?;
        Ok(f(&mut map))
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_map(|map| map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_map(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.with_map(|map| {
            map.remove(key);
        })
    }
}
