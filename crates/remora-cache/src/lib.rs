//! # Remora Cache
//!
//! A transparent cache-aside layer for document-query execution engines.
//! Given a query descriptor and a time-to-live, previously computed results
//! are served from the cache; otherwise the wrapped engine executes, the
//! result is stored, and returned.
//!
//! The two load-bearing mechanisms live here: deterministic cache-key
//! derivation from structurally equivalent descriptors ([`key`] over
//! [`canonical`]), and the cache-aside protocol that preserves the
//! result-shape contract across the hit/miss boundary ([`intercept`] over
//! [`codec`]), including reconstruction of typed identifier fields lost to
//! serialization.
//!
//! ```no_run
//! # use remora_cache::{config::CacheConfig, layer};
//! # use remora_core::{QueryEngine, RemoraResult};
//! # use serde_json::json;
//! # async fn demo<E: QueryEngine>(engine: std::sync::Arc<E>) -> RemoraResult<()> {
//! let layer = layer::init(CacheConfig::default())?;
//! let cached = layer.attach(engine)?;
//!
//! // First call misses and executes; identical calls hit for 30 seconds.
//! let results = cached.find("records", json!({})).cache_for(30).exec().await?;
//! # let _ = results;
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod codec;
pub mod config;
pub mod intercept;
pub mod key;
pub mod layer;

pub use codec::{StoredPayload, FROM_CACHE_FIELD};
pub use self::config::CacheConfig;
pub use intercept::{CachedEngine, PendingAggregation, PendingQuery};
pub use layer::{clear_cache, global, init, init_with_backend, CacheLayer};
