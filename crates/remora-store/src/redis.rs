//! Redis cache backend.

use crate::CacheBackend;
use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use remora_core::{RemoraError, RemoraResult};
use std::time::Duration;
use tracing::debug;

/// Redis-backed cache storage over a connection pool.
pub struct RedisBackend {
    pool: Pool,
}

impl RedisBackend {
    /// Creates a backend from an already-constructed pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> RemoraResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| RemoraError::Backend(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get_raw(&self, key: &str) -> RemoraResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| RemoraError::Backend(format!("Failed to get key '{}': {}", key, e)))?;
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RemoraResult<()> {
        let mut conn = self.conn().await?;

        match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
                    RemoraError::Backend(format!("Failed to set key '{}': {}", key, e))
                })?;
                debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
            }
            None => {
                conn.set::<_, _, ()>(key, value).await.map_err(|e| {
                    RemoraError::Backend(format!("Failed to set key '{}': {}", key, e))
                })?;
                debug!("Cached key '{}' without expiry", key);
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> RemoraResult<bool> {
        let mut conn = self.conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| RemoraError::Backend(format!("Failed to delete key '{}': {}", key, e)))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn clear_prefix(&self, prefix: &str) -> RemoraResult<u64> {
        let mut conn = self.conn().await?;

        // Use KEYS to find matching keys (SCAN would be better for production)
        let pattern = format!("{}*", prefix);
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| RemoraError::Backend(format!("Failed to scan keys: {}", e)))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| RemoraError::Backend(format!("Failed to delete keys: {}", e)))?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted as u64)
    }
}
