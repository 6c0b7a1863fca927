//! Result type aliases for Remora.

use crate::RemoraError;

/// A specialized `Result` type for Remora operations.
pub type RemoraResult<T> = Result<T, RemoraError>;

/// A boxed future returning a `RemoraResult`.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = RemoraResult<T>> + Send + 'a>>;
