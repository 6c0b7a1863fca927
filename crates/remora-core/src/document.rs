//! Live document handles and the default hydration capability.

use crate::{DocumentId, ModelHost, RemoraError, RemoraResult};
use serde_json::{Map, Value};

/// Field under which a document's identifier is stored in its plain form.
pub const ID_FIELD: &str = "_id";

/// A live, behavior-bearing document produced by the execution engine or by
/// rehydration from the cache.
///
/// A `Document` differs from its stored representation in two ways: its
/// identifier is the typed [`DocumentId`] rather than a plain string, and it
/// carries persistence state (`is_new`). Hydrated documents always represent
/// already-persisted records.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    collection: String,
    id: Option<DocumentId>,
    fields: Map<String, Value>,
    is_new: bool,
    from_cache: bool,
}

impl Document {
    /// Creates a new, not-yet-persisted document with a fresh identifier.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: Some(DocumentId::new()),
            fields: Map::new(),
            is_new: true,
            from_cache: false,
        }
    }

    /// Reconstructs a live document from its plain stored representation.
    ///
    /// The identifier field, serialized as a plain string, is parsed back
    /// into its typed form; the resulting document is marked as already
    /// persisted.
    pub fn from_stored(collection: impl Into<String>, data: Value) -> RemoraResult<Self> {
        let Value::Object(mut fields) = data else {
            return Err(RemoraError::hydration(
                "stored document representation must be an object",
            ));
        };

        let id = match fields.shift_remove(ID_FIELD) {
            Some(Value::String(raw)) => Some(DocumentId::parse(&raw).map_err(|e| {
                RemoraError::hydration(format!("invalid stored identifier '{}': {}", raw, e))
            })?),
            Some(other) => {
                return Err(RemoraError::hydration(format!(
                    "stored identifier must be a string, got {}",
                    other
                )));
            }
            None => None,
        };

        Ok(Self {
            collection: collection.into(),
            id,
            fields,
            is_new: false,
            from_cache: false,
        })
    }

    /// Strips the document down to its plain stored representation.
    ///
    /// The typed identifier is flattened into a plain string field.
    #[must_use]
    pub fn to_stored(&self) -> Value {
        let mut out = Map::new();
        if let Some(id) = self.id {
            out.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        }
        for (name, value) in &self.fields {
            out.insert(name.clone(), value.clone());
        }
        Value::Object(out)
    }

    /// Returns the collection this document belongs to.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the typed document identifier, if assigned.
    #[must_use]
    pub const fn id(&self) -> Option<DocumentId> {
        self.id
    }

    /// Returns a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets a field value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Returns the document's field map, excluding the identifier.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether this document represents a pending insert.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Marks the document as representing an already-persisted record.
    pub fn mark_persisted(&mut self) {
        self.is_new = false;
    }

    /// Whether this document was materialized from a cache entry.
    ///
    /// Only set on hits when the layer runs with the debug flag enabled.
    #[must_use]
    pub const fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Marks the document as materialized from a cache entry.
    pub fn mark_cache_origin(&mut self) {
        self.from_cache = true;
    }
}

/// Default document-model capability backed by plain serde data.
///
/// Hosts with a richer type system supply their own [`ModelHost`]; this one
/// reconstructs [`Document`] handles directly from stored representations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeModelHost;

impl ModelHost for SerdeModelHost {
    fn hydrate(&self, collection: &str, data: Value) -> RemoraResult<Document> {
        Document::from_stored(collection, data)
    }
}
