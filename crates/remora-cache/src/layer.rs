//! Layer wiring: construction, idempotent process-global initialization,
//! and invalidation entry points.

use crate::config::CacheConfig;
use crate::intercept::CachedEngine;
use remora_core::{QueryEngine, RemoraError, RemoraResult};
use remora_store::{CacheBackend, CacheStore};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// The caching layer: a configured store plus the settings applied to every
/// engine it wraps.
pub struct CacheLayer {
    store: CacheStore,
    default_ttl_secs: u64,
    debug: bool,
}

impl CacheLayer {
    /// Builds a layer, constructing the backend from the configuration.
    pub fn new(config: CacheConfig) -> RemoraResult<Self> {
        let backend = config.backend.connect()?;
        Ok(Self::with_backend(&config, backend))
    }

    /// Builds a layer over an already-constructed backend.
    #[must_use]
    pub fn with_backend(config: &CacheConfig, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            store: CacheStore::with_namespace(backend, config.namespace.clone()),
            default_ttl_secs: config.default_ttl_secs,
            debug: config.debug,
        }
    }

    /// Wraps an execution engine with cache-aside behavior.
    ///
    /// Fails with [`RemoraError::IncompatibleHost`] when the engine does not
    /// expose the hydration capability; the mismatch is reported here, once,
    /// rather than on every execution.
    pub fn attach<E: QueryEngine>(&self, engine: Arc<E>) -> RemoraResult<CachedEngine<E>> {
        CachedEngine::new(engine, self.store.clone(), self.default_ttl_secs, self.debug)
    }

    /// Deletes one cache entry by its literal key. Intended for
    /// caller-supplied keys, since derived keys are not human-addressable.
    /// No-op if the key is absent.
    pub async fn invalidate(&self, key: &str) -> RemoraResult<bool> {
        self.store.delete(key).await
    }

    /// Empties the entire cache namespace. Returns the number of entries
    /// deleted.
    pub async fn clear(&self) -> RemoraResult<u64> {
        self.store.clear().await
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Whether hit results are annotated with the origin marker.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }
}

static LAYER: OnceLock<CacheLayer> = OnceLock::new();

/// Initializes the process-global caching layer.
///
/// Idempotent: the first call wins and repeat calls return the existing
/// layer untouched.
pub fn init(config: CacheConfig) -> RemoraResult<&'static CacheLayer> {
    if let Some(layer) = LAYER.get() {
        debug!("Caching layer already initialized; ignoring repeat call");
        return Ok(layer);
    }

    let layer = CacheLayer::new(config)?;
    info!("Caching layer initialized");
    Ok(LAYER.get_or_init(|| layer))
}

/// Initializes the process-global caching layer over an already-constructed
/// backend. Idempotent, like [`init`].
pub fn init_with_backend(
    config: &CacheConfig,
    backend: Arc<dyn CacheBackend>,
) -> &'static CacheLayer {
    if let Some(layer) = LAYER.get() {
        debug!("Caching layer already initialized; ignoring repeat call");
        return layer;
    }

    let layer = CacheLayer::with_backend(config, backend);
    info!("Caching layer initialized");
    LAYER.get_or_init(|| layer)
}

/// Returns the process-global layer, if initialized.
#[must_use]
pub fn global() -> Option<&'static CacheLayer> {
    LAYER.get()
}

/// Clears the process-global cache: one entry when a key is given, the
/// whole namespace otherwise.
pub async fn clear_cache(key: Option<&str>) -> RemoraResult<()> {
    let layer = global()
        .ok_or_else(|| RemoraError::configuration("the caching layer is not initialized"))?;

    match key {
        Some(key) => {
            layer.invalidate(key).await?;
        }
        None => {
            layer.clear().await?;
        }
    }
    Ok(())
}
