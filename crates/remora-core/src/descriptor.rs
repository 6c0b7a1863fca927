//! Query and aggregation descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of read operation a descriptor represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Match many documents.
    Find,
    /// Match at most one document.
    FindOne,
    /// Count matching documents.
    Count,
    /// Collect distinct values of a field.
    Distinct,
    /// Run an ordered pipeline of stages.
    Aggregate,
}

impl OpKind {
    /// Returns the canonical operation name used in cache keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::FindOne => "find_one",
            Self::Count => "count",
            Self::Distinct => "distinct",
            Self::Aggregate => "aggregate",
        }
    }

    /// Whether this operation produces a scalar count.
    #[must_use]
    pub const fn is_count(&self) -> bool {
        matches!(self, Self::Count)
    }

    /// Whether this operation produces at most a single document.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self, Self::FindOne)
    }
}

/// The structured intent of a read operation, independent of any execution.
///
/// Descriptors are value objects: two descriptors that are structurally equal
/// after key-order normalization derive the same cache key, and every field
/// here participates in result identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Target collection name.
    pub collection: String,
    /// Operation kind.
    pub op: OpKind,
    /// Filter predicate, possibly containing pattern sub-values.
    pub filter: Value,
    /// Projection specification.
    pub projection: Option<Value>,
    /// Sort specification.
    pub sort: Option<Value>,
    /// Number of matching documents to skip.
    pub skip: Option<u64>,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
    /// Whether results are returned as raw data instead of live documents.
    pub lean: bool,
    /// Field path for distinct operations.
    pub distinct: Option<String>,
}

impl QueryDescriptor {
    /// Creates a descriptor with an empty filter.
    #[must_use]
    pub fn new(collection: impl Into<String>, op: OpKind) -> Self {
        Self {
            collection: collection.into(),
            op,
            filter: Value::Object(Map::new()),
            projection: None,
            sort: None,
            skip: None,
            limit: None,
            lean: false,
            distinct: None,
        }
    }

    /// Sets the filter predicate.
    #[must_use]
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the projection.
    #[must_use]
    pub fn with_projection(mut self, projection: Value) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Sets the sort specification.
    #[must_use]
    pub fn with_sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the number of documents to skip.
    #[must_use]
    pub const fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the maximum number of documents to return.
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requests raw results instead of live documents.
    #[must_use]
    pub const fn lean(mut self) -> Self {
        self.lean = true;
        self
    }

    /// Sets the distinct field path.
    #[must_use]
    pub fn with_distinct(mut self, path: impl Into<String>) -> Self {
        self.distinct = Some(path.into());
        self
    }
}

/// The structured intent of an aggregation: an ordered pipeline of stages.
///
/// Stage order is semantic and is preserved everywhere, including in cache
/// key derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationDescriptor {
    /// Target collection name.
    pub collection: String,
    /// Ordered pipeline stages.
    pub pipeline: Vec<Value>,
}

impl AggregationDescriptor {
    /// Creates an aggregation descriptor.
    #[must_use]
    pub fn new(collection: impl Into<String>, pipeline: Vec<Value>) -> Self {
        Self {
            collection: collection.into(),
            pipeline,
        }
    }

    /// Appends a stage to the pipeline.
    #[must_use]
    pub fn stage(mut self, stage: Value) -> Self {
        self.pipeline.push(stage);
        self
    }
}
