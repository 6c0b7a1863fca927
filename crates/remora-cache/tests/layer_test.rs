//! Integration tests for process-global layer initialization.
//!
//! The global layer can be initialized once per process, so the whole
//! lifecycle lives in a single test.

mod common;

use common::FakeEngine;
use remora_cache::{layer, CacheConfig};
use serde_json::json;

#[tokio::test]
async fn test_global_layer_lifecycle() {
    // nothing to clear before initialization
    assert!(layer::global().is_none());
    let err = layer::clear_cache(None).await.unwrap_err();
    assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

    // first init wins; repeat calls return the existing layer untouched
    let first = layer::init(CacheConfig::default()).unwrap();
    let second = layer::init(CacheConfig::default().debug()).unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(!second.is_debug());
    assert!(layer::global().is_some());

    let engine = FakeEngine::with_records(3);
    let cached = first.attach(engine.clone()).unwrap();

    let result = cached.find("records", json!({})).cache().exec().await.unwrap();
    assert_eq!(result.len(), Some(3));
    let _ = cached.find("records", json!({})).cache().exec().await.unwrap();
    assert_eq!(engine.calls(), 1);

    // clearing the whole namespace forces recomputation
    layer::clear_cache(None).await.unwrap();
    let _ = cached.find("records", json!({})).cache().exec().await.unwrap();
    assert_eq!(engine.calls(), 2);

    // single-key invalidation through the same entry point
    let _ = cached
        .find("records", json!({}))
        .cache_as("records-all")
        .exec()
        .await
        .unwrap();
    assert_eq!(engine.calls(), 3);
    layer::clear_cache(Some("records-all")).await.unwrap();
    let _ = cached
        .find("records", json!({}))
        .cache_as("records-all")
        .exec()
        .await
        .unwrap();
    assert_eq!(engine.calls(), 4);
}
