use std::sync::Arc;

use super::{KeyValueStore, StoreError, keys};
use crate::models::Settings;

/// Loads and saves the settings blob.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads settings, falling back to defaults when nothing is stored yet.
    pub async fn load(&self) -> Result<Settings, StoreError> {
        match self.store.get(keys::SETTINGS).await? {
            Some(json) => serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
                key: keys::SETTINGS.to_string(),
                source,
            }),
            None => Ok(Settings::default()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let json = serde_json::to_string(settings).map_err(|source| StoreError::Corrupt {
            key: keys::SETTINGS.to_string(),
            source,
        })?;
        self.store.set(keys::SETTINGS, &json).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::MemoryStore;
    use super::*;
    use crate::models::Theme;

    fn settings_store() -> SettingsStore {
        SettingsStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn fresh_store_yields_defaults() {
        let store = settings_store();

        assert_eq!(store.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn saved_settings_load_back() {
        let store = settings_store();
        let settings = Settings {
            advanced_mode: true,
            theme: Theme::Dark,
        };

        store.save(&settings).await.unwrap();

        assert_eq!(store.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn save_overwrites_previous_settings() {
        let store = settings_store();
        store
            .save(&Settings {
                advanced_mode: true,
                theme: Theme::Light,
            })
            .await
            .unwrap();

        store.save(&Settings::default()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn corrupt_settings_are_reported() {
        let raw = Arc::new(MemoryStore::new());
        raw.set(keys::SETTINGS, "{advanced").await.unwrap();
        let store = SettingsStore::new(raw);

        assert!(matches!(
            store.load().await,
            Err(StoreError::Corrupt { .. })
        ));
    }
}
