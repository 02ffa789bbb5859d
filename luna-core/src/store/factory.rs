use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{KeyValueStore, StoreError};

/// Backend-agnostic store configuration.
///
/// `backend` must match the [`StoreFactory::backend_name`] of a registered
/// factory. `connection_string` is passed through to that factory
/// unchanged; its meaning is entirely backend-specific.
///
/// | backend  | connection_string examples |
/// |----------|----------------------------|
/// | `sqlite` | `luna.db`, `:memory:`      |
/// | `memory` | ignored                    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Lowercase identifier matching a registered factory.
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: String::new(),
        }
    }
}

/// One implementation per storage backend. Each backend crate exports a
/// unit struct implementing this trait, registered at startup.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the backing storage and return a ready-to-use
    /// store. Implementations are free to run migrations here.
    async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError>;
}

/// Registry of [`StoreFactory`] instances, keyed by backend name.
pub struct StoreRegistry {
    factories: HashMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a backend factory. A factory with the same name silently
    /// replaces the previous one.
    pub fn register(&mut self, factory: Box<dyn StoreFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatches to the factory matching `config.backend`.
    ///
    /// # Errors
    ///
    /// * [`StoreError::Configuration`] when no factory is registered under
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            StoreError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::super::MemoryStore;
    use super::*;

    /// A factory whose `create` flips an `AtomicBool`, proving it was the
    /// one dispatched to.
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl StoreFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Arc<dyn KeyValueStore>, StoreError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Arc::new(MemoryStore::new()))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl StoreFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }
        async fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Arc<dyn KeyValueStore>, StoreError> {
            Err(StoreError::Backend("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn StoreFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    #[test]
    fn default_config_is_the_memory_backend() {
        let config = StoreConfig::default();

        assert_eq!(config.backend, "memory");
    }

    #[test]
    fn new_registry_has_no_backends() {
        assert!(StoreRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut registry = StoreRegistry::new();
        let (sqlite, _) = stub_factory("sqlite");
        let (memory, _) = stub_factory("memory");
        registry.register(sqlite);
        registry.register(memory);

        assert_eq!(registry.available_backends(), vec!["memory", "sqlite"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut registry = StoreRegistry::new();
        let (old, _) = stub_factory("memory");
        let (new, _) = stub_factory("memory");
        registry.register(old);
        registry.register(new);

        assert_eq!(registry.available_backends(), vec!["memory"]);
    }

    #[tokio::test]
    async fn create_calls_the_matching_factory() {
        let mut registry = StoreRegistry::new();
        let (factory, called) = stub_factory("memory");
        registry.register(factory);

        let result = registry.create(&StoreConfig::default()).await;

        assert!(result.is_ok(), "expected Ok, got {:#?}", result.err());
        assert!(called.load(Ordering::SeqCst), "factory create was not invoked");
    }

    #[tokio::test]
    async fn create_does_not_call_a_non_matching_factory() {
        let mut registry = StoreRegistry::new();
        let (memory_factory, memory_called) = stub_factory("memory");
        let (sqlite_factory, sqlite_called) = stub_factory("sqlite");
        registry.register(memory_factory);
        registry.register(sqlite_factory);

        registry.create(&StoreConfig::default()).await.unwrap();

        assert!(memory_called.load(Ordering::SeqCst));
        assert!(!sqlite_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_is_a_configuration_error() {
        let registry = StoreRegistry::new();
        let config = StoreConfig {
            backend: "nope".to_string(),
            connection_string: String::new(),
        };

        assert!(matches!(
            registry.create(&config).await,
            Err(StoreError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn configuration_error_names_requested_and_available_backends() {
        let mut registry = StoreRegistry::new();
        let (factory, _) = stub_factory("sqlite");
        registry.register(factory);

        let config = StoreConfig {
            backend: "postgres".to_string(),
            connection_string: String::new(),
        };

        match registry.create(&config).await {
            Err(StoreError::Configuration(message)) => {
                assert!(message.contains("postgres"), "should name the requested backend");
                assert!(message.contains("sqlite"), "should list available backends");
            }
            other => panic!("expected Configuration error, got {:#?}", other.err()),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_errors() {
        let mut registry = StoreRegistry::new();
        registry.register(Box::new(FailingFactory));

        let config = StoreConfig {
            backend: "failing".to_string(),
            connection_string: String::new(),
        };

        assert!(matches!(
            registry.create(&config).await,
            Err(StoreError::Backend(message)) if message == "intentional failure"
        ));
    }
}
