//! Namespaced store adapter over an opaque backend.

use crate::CacheBackend;
use remora_core::{RemoraResult, Ttl};
use std::sync::Arc;
use tracing::debug;

/// Namespace prefix applied to every key so the cache cannot collide with
/// unrelated data in a shared backend.
pub const DEFAULT_NAMESPACE: &str = "remora-cache";

/// The cache store adapter: namespacing, TTL write semantics, and typed
/// JSON access over an opaque [`CacheBackend`].
///
/// Derived and caller-supplied keys are namespaced identically, so both are
/// invalidated through the same deletion path.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    namespace: String,
}

impl CacheStore {
    /// Creates a store with the default namespace.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    /// Creates a store with a custom namespace.
    #[must_use]
    pub fn with_namespace(backend: Arc<dyn CacheBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// Returns the namespace prefix.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Gets a typed value from the cache.
    ///
    /// Returns `None` if the key does not exist or has expired. A stored
    /// value that no longer parses surfaces as a codec error.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> RemoraResult<Option<T>> {
        let value = self.backend.get_raw(&self.namespaced(key)).await?;
        match value {
            Some(json) => {
                debug!("Cache hit for key '{}'", key);
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => {
                debug!("Cache miss for key '{}'", key);
                Ok(None)
            }
        }
    }

    /// Sets a typed value in the cache.
    ///
    /// A TTL that disables writes makes this a no-op: nothing is stored, so
    /// subsequent gets always miss.
    pub async fn set<T: serde::Serialize>(&self, key: &str, value: &T, ttl: Ttl) -> RemoraResult<()> {
        if ttl.disables_write() {
            debug!("Skipping cache write for key '{}': writes disabled by TTL", key);
            return Ok(());
        }

        let json = serde_json::to_string(value)?;
        self.backend.set_raw(&self.namespaced(key), &json, ttl.as_duration()).await
    }

    /// Deletes one entry. Returns `true` if the key existed; absent keys are
    /// a no-op.
    pub async fn delete(&self, key: &str) -> RemoraResult<bool> {
        self.backend.delete(&self.namespaced(key)).await
    }

    /// Empties the entire cache namespace. Returns the number of entries
    /// deleted.
    pub async fn clear(&self) -> RemoraResult<u64> {
        let cleared = self.backend.clear_prefix(&format!("{}:", self.namespace)).await?;
        debug!("Cleared {} entries from namespace '{}'", cleared, self.namespace);
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use serde::{Deserialize, Serialize};
    use tokio_test::block_on;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        items: Vec<u32>,
    }

    fn store_over(backend: &Arc<MemoryBackend>) -> CacheStore {
        CacheStore::new(Arc::clone(backend) as Arc<dyn CacheBackend>)
    }

    #[test]
    fn test_typed_round_trip() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_over(&backend);

        let payload = Payload { items: vec![1, 2, 3] };
        block_on(store.set("k", &payload, Ttl::Seconds(60))).unwrap();

        let loaded: Option<Payload> = block_on(store.get("k")).unwrap();
        assert_eq!(loaded, Some(payload));
    }

    #[test]
    fn test_keys_are_namespaced() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_over(&backend);

        block_on(store.set("k", &Payload { items: vec![] }, Ttl::Seconds(60))).unwrap();
        assert!(block_on(backend.get_raw("remora-cache:k")).unwrap().is_some());
        assert!(block_on(backend.get_raw("k")).unwrap().is_none());
    }

    #[test]
    fn test_zero_ttl_writes_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_over(&backend);

        block_on(store.set("k", &Payload { items: vec![1] }, Ttl::Seconds(0))).unwrap();
        assert!(backend.is_empty());
        let loaded: Option<Payload> = block_on(store.get("k")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_delete_is_noop_for_absent_keys() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_over(&backend);

        assert!(!block_on(store.delete("missing")).unwrap());
        block_on(store.set("k", &Payload { items: vec![] }, Ttl::Seconds(60))).unwrap();
        assert!(block_on(store.delete("k")).unwrap());
    }

    #[test]
    fn test_clear_only_touches_namespace() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_over(&backend);
        let other = CacheStore::with_namespace(Arc::clone(&backend) as Arc<dyn CacheBackend>, "other");

        block_on(store.set("a", &Payload { items: vec![] }, Ttl::Seconds(60))).unwrap();
        block_on(other.set("b", &Payload { items: vec![] }, Ttl::Seconds(60))).unwrap();

        assert_eq!(block_on(store.clear()).unwrap(), 1);
        let kept: Option<Payload> = block_on(other.get("b")).unwrap();
        assert!(kept.is_some());
    }
}
