//! # Remora Store
//!
//! Cache backends and the namespaced store adapter. The storage engine
//! behind [`CacheBackend`] is an opaque key/value capability with TTL
//! support; TTL countdown and expiry belong entirely to the backend.

pub mod backend;
pub mod config;
pub mod memory;
pub mod redis;
pub mod store;

pub use backend::CacheBackend;
pub use config::{BackendConfig, RedisConfig};
pub use memory::MemoryBackend;
pub use self::redis::RedisBackend;
pub use store::{CacheStore, DEFAULT_NAMESPACE};
