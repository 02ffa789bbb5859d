use std::sync::Arc;

use tracing::debug;

use super::{KeyValueStore, StoreError, keys};
use crate::models::QuoteRecord;

/// The persisted list of completed quotes, newest first, stored as one JSON
/// array under a single key.
///
/// Mutations are read-modify-write with no concurrency guard: the host runs
/// a single writer at a time. An environment that ever allows concurrent
/// writers must serialize these calls behind one owner or risk lost
/// updates.
pub struct RecordLog {
    store: Arc<dyn KeyValueStore>,
}

impl RecordLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the full list, newest first. An absent key is an empty log.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] when the stored JSON no longer parses;
    /// callers decide whether to continue with an empty in-memory list.
    pub async fn load(&self) -> Result<Vec<QuoteRecord>, StoreError> {
        match self.store.get(keys::QUOTE_RECORDS).await? {
            Some(json) => serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
                key: keys::QUOTE_RECORDS.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Prepends a newly completed quote to the log.
    pub async fn append_front(&self, record: QuoteRecord) -> Result<(), StoreError> {
        let mut records = self.load().await?;
        debug!(id = record.id, count = records.len() + 1, "saving quote record");
        records.insert(0, record);
        self.save(&records).await
    }

    /// Deletes the record with the given id, leaving the rest in order.
    /// Returns whether a record was removed; an unknown id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut records = self.load().await?;
        let Some(position) = records.iter().position(|r| r.id == id) else {
            debug!(id, "no record with this id; nothing deleted");
            return Ok(false);
        };
        records.remove(position);
        self.save(&records).await?;
        Ok(true)
    }

    /// Drops the whole log.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::QUOTE_RECORDS).await
    }

    async fn save(&self, records: &[QuoteRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records).map_err(|source| StoreError::Corrupt {
            key: keys::QUOTE_RECORDS.to_string(),
            source,
        })?;
        self.store.set(keys::QUOTE_RECORDS, &json).await
    }
}
