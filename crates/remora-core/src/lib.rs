//! # Remora Core
//!
//! Core types, traits, and error definitions for Remora, a transparent
//! cache-aside layer for document-query execution engines. This crate
//! provides the shared abstractions used by the store adapters and the
//! interception layer.

pub mod descriptor;
pub mod directive;
pub mod document;
pub mod error;
pub mod execution;
pub mod id;
pub mod result;
pub mod traits;

pub use descriptor::*;
pub use directive::*;
pub use document::*;
pub use error::*;
pub use execution::*;
pub use id::*;
pub use result::*;
pub use traits::*;
