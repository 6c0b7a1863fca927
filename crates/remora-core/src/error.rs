//! Unified error types for all layers of the caching stack.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Remora.
///
/// Covers the full taxonomy of the layer: host wiring problems raised once
/// at initialization, cache-backend I/O, key derivation, payload codec
/// failures, and errors propagated from the underlying execution engine.
#[derive(Error, Debug)]
pub enum RemoraError {
    // ============ Host / Configuration Errors ============
    /// The execution engine does not expose a capability this layer requires.
    /// Raised once when the layer is attached; never retried.
    #[error("Incompatible host: {0}")]
    IncompatibleHost(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Cache Path Errors ============
    /// Cache backend I/O error
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// A descriptor could not be serialized into a cache key.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// A stored payload could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    // ============ Execution Path Errors ============
    /// Error from the underlying execution engine. Never cached.
    #[error("Execution error: {0}")]
    Execution(String),

    /// The document model could not reconstruct a live instance.
    #[error("Hydration error: {0}")]
    Hydration(String),

    // ============ Internal Errors ============
    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RemoraError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::IncompatibleHost(_) => "INCOMPATIBLE_HOST",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::KeyDerivation(_) => "KEY_DERIVATION_ERROR",
            Self::Codec(_) => "CODEC_ERROR",
            Self::Execution(_) => "EXECUTION_ERROR",
            Self::Hydration(_) => "HYDRATION_ERROR",
            Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates an incompatible-host error.
    #[must_use]
    pub fn incompatible_host<T: Into<String>>(message: T) -> Self {
        Self::IncompatibleHost(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend<T: Into<String>>(message: T) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a key-derivation error.
    #[must_use]
    pub fn key_derivation<T: Into<String>>(message: T) -> Self {
        Self::KeyDerivation(message.into())
    }

    /// Creates a codec error.
    #[must_use]
    pub fn codec<T: Into<String>>(message: T) -> Self {
        Self::Codec(message.into())
    }

    /// Creates an execution error.
    #[must_use]
    pub fn execution<T: Into<String>>(message: T) -> Self {
        Self::Execution(message.into())
    }

    /// Creates a hydration error.
    #[must_use]
    pub fn hydration<T: Into<String>>(message: T) -> Self {
        Self::Hydration(message.into())
    }

    /// Checks if this error originated in the cache backend.
    ///
    /// The interception layer treats backend read errors as misses
    /// (fail-open) and backend write errors as non-fatal; every other
    /// error class is surfaced to the caller.
    #[must_use]
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

impl From<serde_json::Error> for RemoraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(format!("JSON serialization error: {}", err))
    }
}
