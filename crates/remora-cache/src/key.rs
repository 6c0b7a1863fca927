//! Cache key derivation.

use crate::canonical::canonicalize;
use remora_core::{AggregationDescriptor, QueryDescriptor, RemoraError, RemoraResult};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Derives the cache key for a query descriptor.
///
/// Only the fields that affect result identity participate: collection,
/// operation kind, filter, projection, sort, skip, limit, lean flag, and the
/// distinct path. Two descriptors with byte-identical canonical
/// serializations produce the same digest; that equality is the basis for
/// cache-hit detection.
pub fn derive_query_key(descriptor: &QueryDescriptor) -> RemoraResult<String> {
    let identity = json!({
        "collection": descriptor.collection,
        "op": descriptor.op.as_str(),
        "filter": descriptor.filter,
        "projection": descriptor.projection,
        "sort": descriptor.sort,
        "skip": descriptor.skip,
        "limit": descriptor.limit,
        "lean": descriptor.lean,
        "distinct": descriptor.distinct,
    });

    digest(&identity)
}

/// Derives the cache key for an aggregation descriptor from its ordered
/// stage list.
pub fn derive_pipeline_key(descriptor: &AggregationDescriptor) -> RemoraResult<String> {
    let stages: Vec<Value> = descriptor.pipeline.iter().map(canonicalize).collect();
    digest_canonical(&Value::Array(stages))
}

fn digest(identity: &Value) -> RemoraResult<String> {
    digest_canonical(&canonicalize(identity))
}

fn digest_canonical(canonical: &Value) -> RemoraResult<String> {
    let bytes = serde_json::to_vec(canonical)
        .map_err(|e| RemoraError::KeyDerivation(format!("unserializable descriptor: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
