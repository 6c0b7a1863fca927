//! In-process cache backend.

use crate::CacheBackend;
use async_trait::async_trait;
use parking_lot::RwLock;
use remora_core::RemoraResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process map backend with per-entry expiry.
///
/// Expired entries are dropped lazily on access. Suitable for tests and
/// single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries, including not-yet-collected
    /// expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the backend holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get_raw(&self, key: &str) -> RemoraResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries.write().remove(key);
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RemoraResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|d| Instant::now() + d),
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RemoraResult<bool> {
        let now = Instant::now();
        match self.entries.write().remove(key) {
            Some(entry) => Ok(!entry.is_expired(now)),
            None => Ok(false),
        }
    }

    async fn clear_prefix(&self, prefix: &str) -> RemoraResult<u64> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_set_and_get() {
        let backend = MemoryBackend::new();
        block_on(backend.set_raw("k", "v", None)).unwrap();
        assert_eq!(block_on(backend.get_raw("k")).unwrap(), Some("v".to_string()));
        assert_eq!(block_on(backend.get_raw("missing")).unwrap(), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let backend = MemoryBackend::new();
        block_on(backend.set_raw("k", "v", Some(Duration::from_millis(20)))).unwrap();
        assert!(block_on(backend.get_raw("k")).unwrap().is_some());

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(block_on(backend.get_raw("k")).unwrap(), None);
        // lazy collection dropped the entry
        assert!(backend.is_empty());
    }

    #[test]
    fn test_delete() {
        let backend = MemoryBackend::new();
        block_on(backend.set_raw("k", "v", None)).unwrap();
        assert!(block_on(backend.delete("k")).unwrap());
        assert!(!block_on(backend.delete("k")).unwrap());
    }

    #[test]
    fn test_clear_prefix_spares_other_keys() {
        let backend = MemoryBackend::new();
        block_on(backend.set_raw("ns:a", "1", None)).unwrap();
        block_on(backend.set_raw("ns:b", "2", None)).unwrap();
        block_on(backend.set_raw("other:c", "3", None)).unwrap();

        assert_eq!(block_on(backend.clear_prefix("ns:")).unwrap(), 2);
        assert_eq!(backend.len(), 1);
        assert!(block_on(backend.get_raw("other:c")).unwrap().is_some());
    }
}
