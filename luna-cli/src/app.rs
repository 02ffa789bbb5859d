use anyhow::{Context, Result};
use tracing::warn;

use luna_core::models::Settings;
use luna_core::store::{
    MemoryStoreFactory, RecordLog, SettingsStore, StoreConfig, StoreRegistry,
};
use luna_store_sqlite::SqliteStoreFactory;

/// Everything a command needs: the opened store handles and the loaded
/// settings. Built once per invocation and passed by reference, so no state
/// hides in module globals.
pub struct App {
    pub records: RecordLog,
    pub settings_store: SettingsStore,
    pub settings: Settings,
}

impl App {
    /// Opens the requested backend and loads settings.
    ///
    /// Unreadable settings are logged and replaced with defaults; a missing
    /// settings blob is simply a fresh install.
    pub async fn open(backend: &str, database: &str) -> Result<Self> {
        let mut registry = StoreRegistry::new();
        registry.register(Box::new(MemoryStoreFactory));
        registry.register(Box::new(SqliteStoreFactory));

        let config = StoreConfig {
            backend: backend.to_string(),
            connection_string: database.to_string(),
        };
        let store = registry
            .create(&config)
            .await
            .with_context(|| format!("failed to open the '{backend}' storage backend"))?;

        let records = RecordLog::new(store.clone());
        let settings_store = SettingsStore::new(store);
        let settings = match settings_store.load().await {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, "could not load settings; using defaults");
                Settings::default()
            }
        };

        Ok(Self {
            records,
            settings_store,
            settings,
        })
    }
}
