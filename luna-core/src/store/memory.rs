use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::factory::{StoreConfig, StoreFactory};
use super::{KeyValueStore, StoreError};

/// In-process key-value store.
///
/// Backs unit tests and dry runs; nothing survives the process. The mutex
/// is held only for the duration of a map operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// [`StoreFactory`] for the in-process backend, registered as `memory`.
/// The connection string is ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        Ok(Arc::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let store = MemoryStore::new();

        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();

        store.set("greeting", "hello").await.unwrap();

        assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn set_overwrites_an_existing_value() {
        let store = MemoryStore::new();

        store.set("key", "first").await.unwrap();
        store.set("key", "second").await.unwrap();

        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn remove_deletes_the_value() {
        let store = MemoryStore::new();

        store.set("key", "value").await.unwrap();
        store.remove("key").await.unwrap();

        assert!(store.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_an_absent_key_succeeds() {
        let store = MemoryStore::new();

        assert!(store.remove("never-set").await.is_ok());
    }

    #[tokio::test]
    async fn factory_produces_an_empty_store() {
        let store = MemoryStoreFactory
            .create(&StoreConfig::default())
            .await
            .unwrap();

        assert!(store.get("anything").await.unwrap().is_none());
    }
}
