//! Unified error types for the capability cache.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for every layer of the capability cache.
///
/// Per-entry conditions (`UnresolvedIdentifier`, `ExpiredData`,
/// `MissingData`, `Storage`) are converted into query statuses at the
/// controller boundary. Only configuration and validation failures are
/// surfaced to callers as hard errors.
#[derive(Error, Debug)]
pub enum EabError {
    // ============ Per-entry conditions ============
    /// The identifier could not be mapped to a contact.
    #[error("Unresolved identifier: {0}")]
    UnresolvedIdentifier(String),

    /// Stored data exists but is stale under the current policy.
    #[error("Expired capability data for {0}")]
    ExpiredData(String),

    /// No capability record was ever stored for the contact.
    #[error("No capability data for {0}")]
    MissingData(String),

    /// Record store unavailable or corrupt.
    #[error("Storage error: {0}")]
    Storage(String),

    // ============ Contract violations ============
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed contact URI.
    #[error("Invalid contact URI: {0}")]
    InvalidUri(String),

    /// Timestamp that is not ISO-8601 with an offset.
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },

    // ============ Lifecycle ============
    /// The controller was destroyed and no longer serves requests.
    #[error("Capability controller destroyed")]
    ControllerDestroyed,

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EabError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnresolvedIdentifier(_) => "UNRESOLVED_IDENTIFIER",
            Self::ExpiredData(_) => "EXPIRED_DATA",
            Self::MissingData(_) => "MISSING_DATA",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidUri(_) => "INVALID_URI",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::ControllerDestroyed => "CONTROLLER_DESTROYED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage<T: Into<String>>(message: T) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for EabError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Configuration(_) => Self::Configuration(err.to_string()),
            _ => Self::Storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for EabError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}
