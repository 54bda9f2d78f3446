//! In-process key-value store (tests, dry runs).

use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries` (a `None` value is a null entry).
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let values = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.values.lock().await.keys().cloned().collect())
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned().flatten())
    }

    async fn set_value(&self, key: &str, value: Option<&str>) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.map(str::to_string));
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}
