//! Backend trait for opaque key/value storage.

use async_trait::async_trait;
use remora_core::RemoraResult;
use std::time::Duration;

/// An opaque key/value storage engine with TTL support.
///
/// Implementations must support safe concurrent get/set/delete from multiple
/// callers without external synchronization. Uses JSON strings for
/// type-erased storage to maintain dyn-compatibility; typed access lives on
/// [`crate::CacheStore`].
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Gets a raw value. Returns `None` if the key does not exist or has
    /// expired.
    async fn get_raw(&self, key: &str) -> RemoraResult<Option<String>>;

    /// Sets a raw value. A `ttl` of `None` stores the entry without expiry.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RemoraResult<()>;

    /// Deletes a value. Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> RemoraResult<bool>;

    /// Deletes every key starting with `prefix`. Returns the number of keys
    /// deleted.
    async fn clear_prefix(&self, prefix: &str) -> RemoraResult<u64>;
}
