//! Collection registry: cached typed collection handles.
//!
//! [`MongoRegistry`] is the main entry point of the integration. It owns
//! the lazily bootstrapped connection and a concurrent cache of collection
//! handles keyed by (collection name, entity type, key type). Requesting
//! the same key twice returns the same handle; requesting the same name
//! with different type parameters yields independent handles.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use mongodb::Database;
use serde::{Serialize, de::DeserializeOwned};

use mongoplug_core::{
    config::MongoConfig,
    entity::Entity,
    error::{MongoPlugError, MongoPlugResult},
};

use crate::{
    bootstrap::Bootstrapper,
    collection::CollectionHandle,
    mapper::{Mapper, MapperConfigurer},
};

/// The cache key: one collection name plus the entity and key type
/// descriptors. Two requests with the same name but different types are
/// distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    name: String,
    entity: TypeId,
    key: TypeId,
}

impl CollectionKey {
    pub fn of<T: 'static, K: 'static>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entity: TypeId::of::<T>(),
            key: TypeId::of::<K>(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry of cached typed collection handles over one shared connection.
///
/// Construction is cheap and performs no I/O; the connection is resolved
/// lazily on first use, or eagerly via [`connect`](Self::connect). All
/// methods are callable concurrently. [`dispose`](Self::dispose) tears the
/// registry down permanently.
pub struct MongoRegistry {
    config: MongoConfig,
    bootstrapper: Bootstrapper,
    configurer: Option<Arc<dyn MapperConfigurer>>,
    cache: DashMap<CollectionKey, Arc<dyn Any + Send + Sync>>,
    disposed: AtomicBool,
}

impl MongoRegistry {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            bootstrapper: Bootstrapper::new(config.clone()),
            config,
            configurer: None,
            cache: DashMap::new(),
            disposed: AtomicBool::new(false),
        }
    }

    /// Builds a registry whose mappers are customized by the given
    /// configurer: the global hook runs once at bootstrap, the
    /// per-collection hook on every cache miss.
    pub fn with_configurer(config: MongoConfig, configurer: Arc<dyn MapperConfigurer>) -> Self {
        Self {
            bootstrapper: Bootstrapper::with_configurer(config.clone(), configurer.clone()),
            config,
            configurer: Some(configurer),
            cache: DashMap::new(),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// Eagerly bootstraps the connection. Idempotent; concurrent callers
    /// share the single in-flight initialization.
    pub async fn connect(&self) -> MongoPlugResult<()> {
        self.guard()?;
        self.bootstrapper.resolve().await.map(|_| ())
    }

    /// The bound database handle, bootstrapping on first call.
    pub async fn database(&self) -> MongoPlugResult<Database> {
        self.guard()?;
        self.bootstrapper.database().await
    }

    /// Returns the cached handle for `(name, T, K)`, constructing and
    /// caching it on first request.
    ///
    /// On a miss the per-collection configurer hook (when present) derives
    /// the effective mapper from the global one, the handle is built, and
    /// an insert-if-absent registers it; whichever insert wins a concurrent
    /// race is the handle every caller receives.
    pub async fn collection<T, K>(&self, name: &str) -> MongoPlugResult<Arc<CollectionHandle<T, K>>>
    where
        T: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static,
        K: Serialize + Send + Sync + Unpin + 'static,
    {
        self.guard()?;

        let key = CollectionKey::of::<T, K>(name);
        if let Some(entry) = self.cache.get(&key) {
            return downcast_handle(entry.value().clone());
        }

        let resolved = self.bootstrapper.resolve().await?;
        let mapper = self.effective_mapper::<T, K>(name, resolved.mapper.clone());
        let handle = Arc::new(CollectionHandle::<T, K>::new(
            &resolved.database,
            name,
            mapper,
        ));
        log::debug!(
            "built collection handle `{name}` ({} keyed by {})",
            type_name::<T>(),
            type_name::<K>()
        );

        let retained = self
            .cache
            .entry(key)
            .or_insert_with(|| handle as Arc<dyn Any + Send + Sync>)
            .value()
            .clone();
        downcast_handle(retained)
    }

    /// Returns the cached handle for an [`Entity`], using its declared
    /// collection name and key type.
    pub async fn entity_collection<E>(&self) -> MongoPlugResult<Arc<CollectionHandle<E, E::Key>>>
    where
        E: Entity,
    {
        self.collection::<E, E::Key>(&E::collection_name()).await
    }

    /// Whether `(name, T, K)` currently has a cached handle.
    pub fn has_collection<T: 'static, K: 'static>(&self, name: &str) -> bool {
        self.cache.contains_key(&CollectionKey::of::<T, K>(name))
    }

    /// Number of cached collection handles.
    pub fn cached_collections(&self) -> usize {
        self.cache.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Tears the registry down: clears the cache and, unless
    /// `close_on_dispose` is off, shuts the shared client down.
    ///
    /// Idempotent; repeated calls are no-ops. Disposal is permanent: any
    /// later accessor fails with
    /// [`Disposed`](mongoplug_core::error::MongoPlugError::Disposed).
    pub async fn dispose(&self) -> MongoPlugResult<()> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            log::debug!("registry already disposed");
            return Ok(());
        }

        self.cache.clear();

        match self.bootstrapper.bootstrapped() {
            Some(state) if self.config.close_on_dispose => {
                log::info!("shutting down mongodb client");
                state.client.clone().shutdown().await;
            }
            Some(_) => {
                log::info!("dispose leaving mongodb client open (close_on_dispose = false)");
            }
            None => {}
        }

        Ok(())
    }

    fn guard(&self) -> MongoPlugResult<()> {
        if self.is_disposed() {
            return Err(MongoPlugError::Disposed);
        }
        if !self.config.enabled {
            return Err(MongoPlugError::Disabled(
                "the mongodb integration is disabled by configuration; \
                 enable it before requesting collections"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn effective_mapper<T: 'static, K: 'static>(&self, name: &str, global: Mapper) -> Mapper {
        match &self.configurer {
            Some(configurer) => {
                configurer.configure_collection(global, name, type_name::<T>(), type_name::<K>())
            }
            None => global,
        }
    }
}

fn downcast_handle<T, K>(
    value: Arc<dyn Any + Send + Sync>,
) -> MongoPlugResult<Arc<CollectionHandle<T, K>>>
where
    T: Send + Sync + 'static,
    K: Send + Sync + 'static,
{
    // Cannot fail in practice: the cache key carries both TypeIds.
    value
        .downcast::<CollectionHandle<T, K>>()
        .map_err(|_| MongoPlugError::Configuration("collection cache entry type mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_distinguish_types_with_the_same_name() {
        let a = CollectionKey::of::<String, i64>("shared");
        let b = CollectionKey::of::<i64, i64>("shared");
        let c = CollectionKey::of::<String, String>("shared");

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, CollectionKey::of::<String, i64>("shared"));
        assert_eq!(a.name(), "shared");
    }

    #[test]
    fn keys_distinguish_names_with_the_same_types() {
        let a = CollectionKey::of::<String, i64>("one");
        let b = CollectionKey::of::<String, i64>("two");

        assert_ne!(a, b);
    }
}
