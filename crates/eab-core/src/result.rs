//! Result type aliases for the capability cache.

use crate::EabError;

/// A specialized `Result` type for capability cache operations.
pub type EabResult<T> = Result<T, EabError>;
