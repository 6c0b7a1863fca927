//! Backend configuration structures.

use crate::{CacheBackend, MemoryBackend, RedisBackend};
use remora_core::{RemoraError, RemoraResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Storage engine selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum BackendConfig {
    /// In-process map backend.
    Memory,
    /// Redis backend.
    Redis(RedisConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Memory
    }
}

impl BackendConfig {
    /// Constructs the configured backend.
    pub fn connect(&self) -> RemoraResult<Arc<dyn CacheBackend>> {
        match self {
            Self::Memory => {
                info!("Using in-process cache backend");
                Ok(Arc::new(MemoryBackend::new()))
            }
            Self::Redis(redis) => {
                info!("Using Redis cache backend at {}", redis.url);
                Ok(Arc::new(RedisBackend::new(redis.create_pool()?)))
            }
        }
    }
}

/// Redis connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection URL, including credentials where required.
    pub url: String,
    /// Maximum number of pooled connections.
    pub pool_size: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 16,
        }
    }
}

impl RedisConfig {
    /// Builds a connection pool from this configuration.
    pub fn create_pool(&self) -> RemoraResult<deadpool_redis::Pool> {
        if self.url.is_empty() {
            return Err(RemoraError::configuration("Redis URL is required"));
        }

        let mut config = deadpool_redis::Config::from_url(&self.url);
        config.pool = Some(deadpool_redis::PoolConfig::new(self.pool_size));
        config
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| RemoraError::Configuration(format!("Failed to create Redis pool: {}", e)))
    }
}
