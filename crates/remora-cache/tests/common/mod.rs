//! Shared test doubles: a fake execution engine over in-memory records and
//! a cache backend that injects failures.

#![allow(dead_code)]

use async_trait::async_trait;
use remora_cache::{CacheConfig, CacheLayer};
use remora_core::{
    AggregationDescriptor, Document, ExecutionResult, ModelHost, OpKind, QueryDescriptor,
    QueryEngine, RemoraError, RemoraResult, SerdeModelHost,
};
use remora_store::{CacheBackend, MemoryBackend};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// An execution engine over an in-memory record set, counting executions.
pub struct FakeEngine {
    records: RwLock<Vec<Value>>,
    calls: AtomicUsize,
    fail_execution: AtomicBool,
    host: SerdeModelHost,
}

impl FakeEngine {
    /// Builds an engine holding `n` records shaped
    /// `{_id, num: i, str: "record-i"}`.
    pub fn with_records(n: usize) -> Arc<Self> {
        let engine = Arc::new(Self {
            records: RwLock::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_execution: AtomicBool::new(false),
            host: SerdeModelHost,
        });
        engine.insert_records(n);
        engine
    }

    /// Appends `n` more records, continuing the numbering.
    pub fn insert_records(&self, n: usize) {
        let mut records = self.records.write().unwrap();
        let start = records.len();
        for i in start..start + n {
            records.push(json!({
                "_id": remora_core::DocumentId::new().to_string(),
                "num": i,
                "str": format!("record-{}", i),
            }));
        }
    }

    /// Number of times the engine actually executed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent execution fail until reset.
    pub fn fail_executions(&self, fail: bool) {
        self.fail_execution.store(fail, Ordering::SeqCst);
    }

    fn matched(&self, filter: &Value) -> Vec<Value> {
        let records = self.records.read().unwrap();
        records
            .iter()
            .filter(|record| record_matches(record, filter))
            .cloned()
            .collect()
    }
}

fn record_matches(record: &Value, filter: &Value) -> bool {
    match filter {
        Value::Object(map) if !map.is_empty() => {
            map.iter().all(|(field, expected)| record.get(field) == Some(expected))
        }
        _ => true,
    }
}

#[async_trait]
impl QueryEngine for FakeEngine {
    fn model_host(&self) -> Option<&dyn ModelHost> {
        Some(&self.host)
    }

    async fn execute(&self, descriptor: &QueryDescriptor) -> RemoraResult<ExecutionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_execution.load(Ordering::SeqCst) {
            return Err(RemoraError::execution("injected engine failure"));
        }

        let mut matched = self.matched(&descriptor.filter);
        if let Some(skip) = descriptor.skip {
            matched.drain(..matched.len().min(skip as usize));
        }
        if let Some(limit) = descriptor.limit {
            matched.truncate(limit as usize);
        }

        match descriptor.op {
            OpKind::Count => Ok(ExecutionResult::Count(matched.len() as u64)),
            OpKind::Distinct => {
                let path = descriptor.distinct.as_deref().unwrap_or("_id");
                Ok(ExecutionResult::LeanMany(
                    matched.iter().filter_map(|r| r.get(path).cloned()).collect(),
                ))
            }
            OpKind::FindOne => {
                let first = matched.into_iter().next();
                if descriptor.lean {
                    Ok(ExecutionResult::LeanOne(first))
                } else {
                    Ok(ExecutionResult::One(
                        first
                            .map(|v| Document::from_stored(descriptor.collection.as_str(), v))
                            .transpose()?,
                    ))
                }
            }
            _ => {
                if descriptor.lean {
                    Ok(ExecutionResult::LeanMany(matched))
                } else {
                    Ok(ExecutionResult::Many(
                        matched
                            .into_iter()
                            .map(|v| Document::from_stored(descriptor.collection.as_str(), v))
                            .collect::<RemoraResult<Vec<_>>>()?,
                    ))
                }
            }
        }
    }

    async fn execute_pipeline(
        &self,
        descriptor: &AggregationDescriptor,
    ) -> RemoraResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_execution.load(Ordering::SeqCst) {
            return Err(RemoraError::execution("injected engine failure"));
        }

        match descriptor.pipeline.first().and_then(|stage| stage.get("$match")) {
            Some(filter) => Ok(self.matched(filter)),
            None => Ok(self.records.read().unwrap().clone()),
        }
    }
}

/// An engine without a document-model capability.
pub struct HostlessEngine;

#[async_trait]
impl QueryEngine for HostlessEngine {
    fn model_host(&self) -> Option<&dyn ModelHost> {
        None
    }

    async fn execute(&self, _descriptor: &QueryDescriptor) -> RemoraResult<ExecutionResult> {
        Err(RemoraError::execution("hostless engine cannot execute"))
    }

    async fn execute_pipeline(
        &self,
        _descriptor: &AggregationDescriptor,
    ) -> RemoraResult<Vec<Value>> {
        Err(RemoraError::execution("hostless engine cannot execute"))
    }
}

/// A backend that injects read/write failures around an in-memory store.
pub struct FlakyBackend {
    inner: MemoryBackend,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryBackend::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        })
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn entries(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl CacheBackend for FlakyBackend {
    async fn get_raw(&self, key: &str) -> RemoraResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoraError::backend("injected read failure"));
        }
        self.inner.get_raw(key).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RemoraResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoraError::backend("injected write failure"));
        }
        self.inner.set_raw(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> RemoraResult<bool> {
        self.inner.delete(key).await
    }

    async fn clear_prefix(&self, prefix: &str) -> RemoraResult<u64> {
        self.inner.clear_prefix(prefix).await
    }
}

/// Builds a layer over a fresh in-memory backend.
pub fn memory_layer(debug: bool) -> (CacheLayer, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let mut config = CacheConfig::default();
    if debug {
        config = config.debug();
    }
    let layer = CacheLayer::with_backend(&config, Arc::clone(&backend) as Arc<dyn CacheBackend>);
    (layer, backend)
}

/// Builds a layer over the given backend.
pub fn layer_over(backend: Arc<dyn CacheBackend>, debug: bool) -> CacheLayer {
    let mut config = CacheConfig::default();
    if debug {
        config = config.debug();
    }
    CacheLayer::with_backend(&config, backend)
}
