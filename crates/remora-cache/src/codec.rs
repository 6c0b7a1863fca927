//! Result codec: between live execution results and storable payloads.

use remora_core::{Document, ExecutionResult, ModelHost, RemoraError, RemoraResult, ResultShape};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Field injected into raw hit results when the layer runs in debug mode,
/// marking the result's origin as the cache.
pub const FROM_CACHE_FIELD: &str = "_fromCache";

/// The cache-storable form of an execution result: the serialized payload
/// plus the shape metadata needed to distinguish scalar counts, empty result
/// sets, and whether contained items require rehydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPayload {
    /// Result shape.
    pub shape: ResultShape,
    /// Plain body; `Null` encodes an absent single result.
    pub body: Value,
}

impl StoredPayload {
    const fn new(shape: ResultShape, body: Value) -> Self {
        Self { shape, body }
    }
}

/// Converts an execution result into its storable plain representation.
///
/// Counts and lean results are stored as-is; live documents are stripped
/// down to plain data, their typed identifiers flattened to strings.
#[must_use]
pub fn normalize(result: &ExecutionResult) -> StoredPayload {
    match result {
        ExecutionResult::Count(n) => StoredPayload::new(ResultShape::Count, json!(n)),
        ExecutionResult::LeanOne(value) => StoredPayload::new(
            ResultShape::LeanOne,
            value.clone().unwrap_or(Value::Null),
        ),
        ExecutionResult::LeanMany(values) => {
            StoredPayload::new(ResultShape::LeanMany, Value::Array(values.clone()))
        }
        ExecutionResult::One(doc) => StoredPayload::new(
            ResultShape::DocumentOne,
            doc.as_ref().map_or(Value::Null, Document::to_stored),
        ),
        ExecutionResult::Many(docs) => StoredPayload::new(
            ResultShape::DocumentMany,
            Value::Array(docs.iter().map(Document::to_stored).collect()),
        ),
    }
}

/// Reconstructs a live execution result from a stored payload.
///
/// Counts short-circuit all lean/typed logic and come back as-is, so a
/// scalar hit can never carry an origin annotation. Lean results come back
/// as raw data. Typed shapes are hydrated per item through the host's
/// document-model capability and marked as already persisted, with their
/// identifier fields reconstructed into typed form. The returned result is a
/// new, independent value. With `debug` set, hit results carry an origin
/// marker.
pub fn rehydrate(
    payload: StoredPayload,
    host: &dyn ModelHost,
    collection: &str,
    debug: bool,
) -> RemoraResult<ExecutionResult> {
    match payload.shape {
        ResultShape::Count => payload
            .body
            .as_u64()
            .map(ExecutionResult::Count)
            .ok_or_else(|| RemoraError::codec("count payload must be an unsigned integer")),
        ResultShape::LeanOne => Ok(ExecutionResult::LeanOne(match payload.body {
            Value::Null => None,
            value => Some(annotate_lean(value, debug)),
        })),
        ResultShape::LeanMany => {
            let Value::Array(values) = payload.body else {
                return Err(RemoraError::codec("lean array payload must be an array"));
            };
            Ok(ExecutionResult::LeanMany(
                values.into_iter().map(|v| annotate_lean(v, debug)).collect(),
            ))
        }
        ResultShape::DocumentOne => Ok(ExecutionResult::One(match payload.body {
            Value::Null => None,
            value => Some(hydrate_one(host, collection, value, debug)?),
        })),
        ResultShape::DocumentMany => {
            let Value::Array(values) = payload.body else {
                return Err(RemoraError::codec("document array payload must be an array"));
            };
            let docs = values
                .into_iter()
                .map(|v| hydrate_one(host, collection, v, debug))
                .collect::<RemoraResult<Vec<_>>>()?;
            Ok(ExecutionResult::Many(docs))
        }
    }
}

fn hydrate_one(
    host: &dyn ModelHost,
    collection: &str,
    data: Value,
    debug: bool,
) -> RemoraResult<Document> {
    let mut doc = host.hydrate(collection, data)?;
    doc.mark_persisted();
    if debug {
        doc.mark_cache_origin();
    }
    Ok(doc)
}

fn annotate_lean(mut value: Value, debug: bool) -> Value {
    if debug {
        if let Value::Object(map) = &mut value {
            map.insert(FROM_CACHE_FIELD.to_string(), Value::Bool(true));
        }
    }
    value
}
