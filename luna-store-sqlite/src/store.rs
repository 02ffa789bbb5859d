use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Row, sqlite::SqlitePool};
use tracing::info;

use luna_core::store::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

/// Key-value store persisted in a single SQLite table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects using a sqlx-style URL, e.g. `sqlite:luna.db?mode=rwc` or
    /// `sqlite::memory:`.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(format!("connect '{database_url}': {e}")))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migrations failed: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.map(|r| {
            r.try_get::<String, _>("value")
                .map_err(|e| StoreError::Backend(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?, ?, datetime('now'))
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

/// [`StoreFactory`] for SQLite, registered as `sqlite`.
///
/// The connection string is a bare file path (created if missing) or
/// `:memory:`; it is mapped onto the sqlx URL form here so callers never
/// deal with URLs. Migrations run on every open.
pub struct SqliteStoreFactory;

fn database_url(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{connection_string}?mode=rwc")
    }
}

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let url = database_url(&config.connection_string);
        info!(url = %url, "opening sqlite store");
        let store = SqliteStore::new(&url).await?;
        store.run_migrations().await?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use luna_core::models::{PricingMode, QuoteRecord};
    use luna_core::store::RecordLog;

    use super::*;

    /// In-memory database on a single-connection pool so every query sees
    /// the same data.
    async fn test_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to create in-memory database");

        let store = SqliteStore::new_with_pool(pool);
        store
            .run_migrations()
            .await
            .expect("failed to run migrations");
        store
    }

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let store = test_store().await;

        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = test_store().await;

        store.set("greeting", "hello").await.unwrap();

        assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn set_upserts_an_existing_key() {
        let store = test_store().await;

        store.set("key", "first").await.unwrap();
        store.set("key", "second").await.unwrap();

        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn remove_deletes_and_tolerates_absent_keys() {
        let store = test_store().await;

        store.set("key", "value").await.unwrap();
        store.remove("key").await.unwrap();
        store.remove("key").await.unwrap();

        assert!(store.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn record_log_round_trips_through_sqlite() {
        let store = Arc::new(test_store().await);
        let log = RecordLog::new(store);
        let record = QuoteRecord {
            id: 1,
            saved_at: "8/5/2026, 2:30:15 PM".to_string(),
            file_stamp: "20260805_143015".to_string(),
            company_name: "Acme Corp".to_string(),
            erp_link: None,
            last_year_price: dec!(100.00),
            msrp_total: dec!(1000.00),
            integrations_selected: true,
            mode: PricingMode::Increase,
            discount_percentage: None,
            increase_percentage: Some(dec!(10.00)),
            notes: String::new(),
            integrations_cost: dec!(200.00),
            discount_for_erp: dec!(-90.83),
            total_end_price: dec!(110.00),
        };

        log.append_front(record.clone()).await.unwrap();

        assert_eq!(log.load().await.unwrap(), vec![record]);
    }

    #[test]
    fn factory_maps_bare_paths_to_rwc_urls() {
        assert_eq!(database_url("luna.db"), "sqlite:luna.db?mode=rwc");
        assert_eq!(database_url(":memory:"), "sqlite::memory:");
    }

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }
}
