//! Interception layer: cache-aside execution over a wrapped engine.

use crate::codec::{self, StoredPayload};
use crate::key;
use remora_core::{
    AggregationDescriptor, CacheDirective, ExecutionResult, ModelHost, OpKind, QueryDescriptor,
    QueryEngine, RemoraError, RemoraResult, Ttl,
};
use remora_store::CacheStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// An execution engine wrapped with cache-aside behavior.
///
/// Pending operations start uncached; they enter the cache-requested state
/// only through the explicit `cache*` calls, per invocation. Concurrent
/// identical misses each execute the engine and each write the key; the last
/// write wins.
pub struct CachedEngine<E: QueryEngine> {
    engine: Arc<E>,
    store: CacheStore,
    default_ttl_secs: u64,
    debug: bool,
}

impl<E: QueryEngine> CachedEngine<E> {
    /// Wraps an engine.
    ///
    /// Fails with [`RemoraError::IncompatibleHost`] when the engine does not
    /// expose the document hydration capability this layer requires.
    pub fn new(
        engine: Arc<E>,
        store: CacheStore,
        default_ttl_secs: u64,
        debug: bool,
    ) -> RemoraResult<Self> {
        if engine.model_host().is_none() {
            return Err(RemoraError::incompatible_host(
                "the execution engine does not expose a document hydration capability",
            ));
        }

        Ok(Self {
            engine,
            store,
            default_ttl_secs,
            debug,
        })
    }

    /// Starts a find query.
    #[must_use]
    pub fn find(&self, collection: impl Into<String>, filter: Value) -> PendingQuery<'_, E> {
        self.query(QueryDescriptor::new(collection, OpKind::Find).with_filter(filter))
    }

    /// Starts a single-document query.
    #[must_use]
    pub fn find_one(&self, collection: impl Into<String>, filter: Value) -> PendingQuery<'_, E> {
        self.query(QueryDescriptor::new(collection, OpKind::FindOne).with_filter(filter))
    }

    /// Starts a count query.
    #[must_use]
    pub fn count(&self, collection: impl Into<String>, filter: Value) -> PendingQuery<'_, E> {
        self.query(QueryDescriptor::new(collection, OpKind::Count).with_filter(filter))
    }

    /// Starts a distinct-values query.
    #[must_use]
    pub fn distinct(
        &self,
        collection: impl Into<String>,
        path: impl Into<String>,
        filter: Value,
    ) -> PendingQuery<'_, E> {
        self.query(
            QueryDescriptor::new(collection, OpKind::Distinct)
                .with_filter(filter)
                .with_distinct(path),
        )
    }

    /// Starts a query from a prepared descriptor.
    #[must_use]
    pub fn query(&self, descriptor: QueryDescriptor) -> PendingQuery<'_, E> {
        PendingQuery {
            layer: self,
            descriptor,
            directive: None,
        }
    }

    /// Starts an aggregation pipeline.
    #[must_use]
    pub fn aggregate(
        &self,
        collection: impl Into<String>,
        pipeline: Vec<Value>,
    ) -> PendingAggregation<'_, E> {
        PendingAggregation {
            layer: self,
            descriptor: AggregationDescriptor::new(collection, pipeline),
            directive: None,
        }
    }

    /// Returns the underlying cache store.
    #[must_use]
    pub const fn store(&self) -> &CacheStore {
        &self.store
    }

    fn host(&self) -> RemoraResult<&dyn ModelHost> {
        self.engine.model_host().ok_or_else(|| {
            RemoraError::incompatible_host("document hydration capability disappeared")
        })
    }

    fn default_directive(&self) -> CacheDirective {
        CacheDirective::new().with_ttl(Ttl::Seconds(self.default_ttl_secs))
    }

    /// Resolves the key for a cache-requested operation: the caller-supplied
    /// key wins, otherwise the derived key is computed.
    fn resolve_key(
        directive: &CacheDirective,
        derive: impl FnOnce() -> RemoraResult<String>,
    ) -> RemoraResult<String> {
        match &directive.key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => derive(),
        }
    }

    async fn invalidate_key(&self, cache_key: &str) {
        match self.store.delete(cache_key).await {
            Ok(existed) => debug!("Invalidated cache entry '{}': {}", cache_key, existed),
            Err(e) => warn!("Failed to invalidate cache entry '{}': {}", cache_key, e),
        }
    }

    /// Hit check. Backend read errors degrade to a miss so cache
    /// unavailability means recompute, not failure.
    async fn read_entry(&self, cache_key: &str) -> Option<StoredPayload> {
        match self.store.get::<StoredPayload>(cache_key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read failed for key '{}', treating as miss: {}", cache_key, e);
                None
            }
        }
    }

    /// Stores a freshly computed payload. Write failures are surfaced to the
    /// log only; the computed result is still delivered to the caller.
    async fn write_entry(&self, cache_key: &str, payload: &StoredPayload, ttl: Ttl) {
        if let Err(e) = self.store.set(cache_key, payload, ttl).await {
            warn!("Cache write failed for key '{}': {}", cache_key, e);
        }
    }
}

/// A pending single-document/array query: descriptor plus cache state.
pub struct PendingQuery<'a, E: QueryEngine> {
    layer: &'a CachedEngine<E>,
    descriptor: QueryDescriptor,
    directive: Option<CacheDirective>,
}

impl<'a, E: QueryEngine> PendingQuery<'a, E> {
    /// Sets the projection.
    #[must_use]
    pub fn projection(mut self, projection: Value) -> Self {
        self.descriptor.projection = Some(projection);
        self
    }

    /// Sets the sort specification.
    #[must_use]
    pub fn sort(mut self, sort: Value) -> Self {
        self.descriptor.sort = Some(sort);
        self
    }

    /// Sets the number of matching documents to skip.
    #[must_use]
    pub const fn skip(mut self, skip: u64) -> Self {
        self.descriptor.skip = Some(skip);
        self
    }

    /// Sets the maximum number of documents to return.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.descriptor.limit = Some(limit);
        self
    }

    /// Requests raw results instead of live documents. Lean and non-lean
    /// executions of the same descriptor occupy distinct cache entries.
    #[must_use]
    pub const fn lean(mut self) -> Self {
        self.descriptor.lean = true;
        self
    }

    /// Enables caching with the layer's default TTL.
    #[must_use]
    pub fn cache(mut self) -> Self {
        self.directive = Some(self.layer.default_directive());
        self
    }

    /// Enables caching with an explicit TTL in seconds. Zero means "execute
    /// but never write".
    #[must_use]
    pub fn cache_for(mut self, ttl_secs: u64) -> Self {
        self.directive = Some(CacheDirective::new().with_ttl(Ttl::Seconds(ttl_secs)));
        self
    }

    /// Enables caching under a caller-supplied key with the default TTL. The
    /// custom key entirely replaces key derivation.
    #[must_use]
    pub fn cache_as(mut self, key: impl Into<String>) -> Self {
        self.directive = Some(self.layer.default_directive().with_key(key));
        self
    }

    /// Enables caching with an explicit TTL and optional custom key.
    #[must_use]
    pub fn cache_with(mut self, ttl: Ttl, key: Option<String>) -> Self {
        let mut directive = CacheDirective::new().with_ttl(ttl);
        if let Some(key) = key {
            directive = directive.with_key(key);
        }
        self.directive = Some(directive);
        self
    }

    /// Deletes this operation's cache entry on execution, then executes
    /// without caching.
    #[must_use]
    pub fn invalidate(mut self) -> Self {
        let directive = self.directive.take().unwrap_or_default();
        self.directive = Some(directive.with_ttl(Ttl::Invalidate));
        self
    }

    /// Returns the key this operation would be cached under.
    pub fn cache_key(&self) -> RemoraResult<String> {
        match self.directive.as_ref().and_then(|d| d.key.as_deref()) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => key::derive_query_key(&self.descriptor),
        }
    }

    /// Executes the query through the cache-aside protocol.
    ///
    /// Without a directive the engine is invoked directly, unaffected by any
    /// cache machinery. Otherwise the cache is consulted first; on a miss
    /// the engine executes and the normalized result is stored under the
    /// resolved key. Engine errors propagate verbatim and are never cached.
    pub async fn exec(self) -> RemoraResult<ExecutionResult> {
        let Some(directive) = self.directive else {
            return self.layer.engine.execute(&self.descriptor).await;
        };

        let cache_key =
            CachedEngine::<E>::resolve_key(&directive, || key::derive_query_key(&self.descriptor))?;

        if directive.ttl == Ttl::Invalidate {
            self.layer.invalidate_key(&cache_key).await;
            return self.layer.engine.execute(&self.descriptor).await;
        }

        if let Some(payload) = self.layer.read_entry(&cache_key).await {
            let host = self.layer.host()?;
            return codec::rehydrate(payload, host, &self.descriptor.collection, self.layer.debug);
        }

        let result = self.layer.engine.execute(&self.descriptor).await?;
        let payload = codec::normalize(&result);
        self.layer.write_entry(&cache_key, &payload, directive.ttl).await;
        Ok(result)
    }
}

/// A pending aggregation pipeline: ordered stages plus cache state.
pub struct PendingAggregation<'a, E: QueryEngine> {
    layer: &'a CachedEngine<E>,
    descriptor: AggregationDescriptor,
    directive: Option<CacheDirective>,
}

impl<'a, E: QueryEngine> PendingAggregation<'a, E> {
    /// Appends a stage to the pipeline.
    #[must_use]
    pub fn stage(mut self, stage: Value) -> Self {
        self.descriptor.pipeline.push(stage);
        self
    }

    /// Enables caching with the layer's default TTL.
    #[must_use]
    pub fn cache(mut self) -> Self {
        self.directive = Some(self.layer.default_directive());
        self
    }

    /// Enables caching with an explicit TTL in seconds.
    #[must_use]
    pub fn cache_for(mut self, ttl_secs: u64) -> Self {
        self.directive = Some(CacheDirective::new().with_ttl(Ttl::Seconds(ttl_secs)));
        self
    }

    /// Enables caching under a caller-supplied key with the default TTL.
    #[must_use]
    pub fn cache_as(mut self, key: impl Into<String>) -> Self {
        self.directive = Some(self.layer.default_directive().with_key(key));
        self
    }

    /// Deletes this pipeline's cache entry on execution, then executes
    /// without caching.
    #[must_use]
    pub fn invalidate(mut self) -> Self {
        let directive = self.directive.take().unwrap_or_default();
        self.directive = Some(directive.with_ttl(Ttl::Invalidate));
        self
    }

    /// Returns the key this pipeline would be cached under. Derived from the
    /// ordered stage list; stage order changes semantics, so it changes the
    /// key.
    pub fn cache_key(&self) -> RemoraResult<String> {
        match self.directive.as_ref().and_then(|d| d.key.as_deref()) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => key::derive_pipeline_key(&self.descriptor),
        }
    }

    /// Executes the pipeline through the cache-aside protocol. Results are
    /// raw values, stored and rehydrated as lean data.
    pub async fn exec(self) -> RemoraResult<Vec<Value>> {
        let Some(directive) = self.directive else {
            return self.layer.engine.execute_pipeline(&self.descriptor).await;
        };

        let cache_key = CachedEngine::<E>::resolve_key(&directive, || {
            key::derive_pipeline_key(&self.descriptor)
        })?;

        if directive.ttl == Ttl::Invalidate {
            self.layer.invalidate_key(&cache_key).await;
            return self.layer.engine.execute_pipeline(&self.descriptor).await;
        }

        if let Some(payload) = self.layer.read_entry(&cache_key).await {
            let host = self.layer.host()?;
            let result =
                codec::rehydrate(payload, host, &self.descriptor.collection, self.layer.debug)?;
            return match result {
                ExecutionResult::LeanMany(values) => Ok(values),
                other => Err(RemoraError::codec(format!(
                    "pipeline entries are stored as raw arrays, found {:?}",
                    other.shape()
                ))),
            };
        }

        let values = self.layer.engine.execute_pipeline(&self.descriptor).await?;
        let payload = codec::normalize(&ExecutionResult::LeanMany(values.clone()));
        self.layer.write_entry(&cache_key, &payload, directive.ttl).await;
        Ok(values)
    }
}
