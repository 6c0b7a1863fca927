//! Boundary traits for the execution engine and the document model.

use crate::{AggregationDescriptor, Document, ExecutionResult, QueryDescriptor, RemoraResult};
use async_trait::async_trait;
use serde_json::Value;

/// The document-query execution engine this layer interposes on.
///
/// The engine accepts a descriptor and produces a result or an error; how it
/// plans and runs the query is its own concern. Implementations must honor
/// the result-shape contract: count operations yield
/// [`ExecutionResult::Count`], lean descriptors yield raw values, everything
/// else yields live documents.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Returns the engine's document-model capability, used to reconstruct
    /// live documents from stored data on cache hits.
    ///
    /// An engine that returns `None` cannot host this layer; the mismatch is
    /// reported once when the layer is attached.
    fn model_host(&self) -> Option<&dyn ModelHost>;

    /// Executes a single-document or array query.
    async fn execute(&self, descriptor: &QueryDescriptor) -> RemoraResult<ExecutionResult>;

    /// Executes an aggregation pipeline, producing raw values.
    async fn execute_pipeline(
        &self,
        descriptor: &AggregationDescriptor,
    ) -> RemoraResult<Vec<Value>>;
}

/// The document-model capability: reconstructing typed, live documents from
/// plain stored data.
pub trait ModelHost: Send + Sync {
    /// Hydrates a stored representation into a live document of the given
    /// collection. Hydrated documents represent already-persisted records.
    fn hydrate(&self, collection: &str, data: Value) -> RemoraResult<Document>;
}
