//! Storage abstraction: a flat asynchronous key-value store holding JSON
//! values under fixed keys, plus the aggregates built on top of it (the
//! record log and the settings blob).
//!
//! Storage failures are surfaced to the caller, who logs and continues with
//! best-effort in-memory state; nothing here retries.

pub mod factory;
pub mod memory;
pub mod record_log;
pub mod settings;

use async_trait::async_trait;
use thiserror::Error;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use record_log::RecordLog;
pub use settings::SettingsStore;

/// Fixed storage keys. Key names are part of the persisted format.
pub mod keys {
    pub const QUOTE_RECORDS: &str = "quoteRecords";
    pub const SETTINGS: &str = "lunaSettings";
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value no longer parses as the expected shape.
    #[error("corrupt stored value under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend selection or connection configuration is wrong.
    #[error("store configuration error: {0}")]
    Configuration(String),
}

/// A flat string-to-string key-value store.
///
/// All operations are asynchronous and fallible; values are opaque strings
/// (JSON in practice). Absent keys read as `None` and removing an absent
/// key succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
