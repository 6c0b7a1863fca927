//! Execution results and their shapes.

use crate::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shape of a stored or in-flight result.
///
/// Stored alongside the payload so rehydration can distinguish scalar
/// counts, empty result sets, and whether items require hydration into live
/// documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    /// A scalar count.
    Count,
    /// At most one raw value.
    LeanOne,
    /// An array of raw values.
    LeanMany,
    /// At most one live document.
    DocumentOne,
    /// An array of live documents.
    DocumentMany,
}

impl ResultShape {
    /// Whether items of this shape require hydration on a cache hit.
    #[must_use]
    pub const fn requires_hydration(&self) -> bool {
        matches!(self, Self::DocumentOne | Self::DocumentMany)
    }
}

/// The polymorphic result of executing a query.
///
/// Produced fresh by the execution engine on a miss; reconstructed by the
/// result codec on a hit as a new, independent value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// A scalar count.
    Count(u64),
    /// A single raw value, or nothing.
    LeanOne(Option<Value>),
    /// An array of raw values. May be empty; an empty array is a valid
    /// result, distinct from absence.
    LeanMany(Vec<Value>),
    /// A single live document, or nothing.
    One(Option<Document>),
    /// An array of live documents.
    Many(Vec<Document>),
}

impl ExecutionResult {
    /// Returns the shape of this result.
    #[must_use]
    pub const fn shape(&self) -> ResultShape {
        match self {
            Self::Count(_) => ResultShape::Count,
            Self::LeanOne(_) => ResultShape::LeanOne,
            Self::LeanMany(_) => ResultShape::LeanMany,
            Self::One(_) => ResultShape::DocumentOne,
            Self::Many(_) => ResultShape::DocumentMany,
        }
    }

    /// Returns the number of contained items, where that is meaningful.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Count(_) => None,
            Self::LeanOne(v) => Some(usize::from(v.is_some())),
            Self::LeanMany(vs) => Some(vs.len()),
            Self::One(d) => Some(usize::from(d.is_some())),
            Self::Many(ds) => Some(ds.len()),
        }
    }

    /// Whether the result holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len().is_some_and(|n| n == 0)
    }

    /// Returns the scalar count, if this is a count result.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained documents, if this is a typed array result.
    #[must_use]
    pub fn documents(&self) -> Option<&[Document]> {
        match self {
            Self::Many(ds) => Some(ds),
            _ => None,
        }
    }

    /// Returns the contained raw values, if this is a lean array result.
    #[must_use]
    pub fn lean_values(&self) -> Option<&[Value]> {
        match self {
            Self::LeanMany(vs) => Some(vs),
            _ => None,
        }
    }
}
