//! Per-entry outcome of a capability lookup.

use crate::EabError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status attached to every [`EabCapabilityResult`](crate::EabCapabilityResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EabQueryStatus {
    /// Fresh data was found.
    QuerySuccessful,
    /// The controller was destroyed before the query ran.
    ControllerDestroyed,
    /// Data was found but is stale; the payload is the last-known snapshot.
    ContactExpired,
    /// The contact is unknown or nothing was ever stored for it.
    NotFound,
    /// The record store failed for this entry.
    StorageError,
}

impl EabQueryStatus {
    /// Returns true for a fresh hit.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        matches!(self, Self::QuerySuccessful)
    }

    /// Returns true when the result may carry a capability payload.
    #[must_use]
    pub const fn may_carry_payload(&self) -> bool {
        matches!(self, Self::QuerySuccessful | Self::ContactExpired)
    }

    /// Returns a human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::QuerySuccessful => "Capabilities are cached and fresh",
            Self::ControllerDestroyed => "Capability controller has been destroyed",
            Self::ContactExpired => "Cached capabilities have expired",
            Self::NotFound => "No cached capabilities for contact",
            Self::StorageError => "Capability store failed",
        }
    }

    /// All possible statuses.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::QuerySuccessful,
            Self::ControllerDestroyed,
            Self::ContactExpired,
            Self::NotFound,
            Self::StorageError,
        ]
    }
}

impl fmt::Display for EabQueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuerySuccessful => write!(f, "query_successful"),
            Self::ControllerDestroyed => write!(f, "controller_destroyed"),
            Self::ContactExpired => write!(f, "contact_expired"),
            Self::NotFound => write!(f, "not_found"),
            Self::StorageError => write!(f, "storage_error"),
        }
    }
}

impl From<&EabError> for EabQueryStatus {
    fn from(err: &EabError) -> Self {
        match err {
            EabError::ExpiredData(_) => Self::ContactExpired,
            EabError::UnresolvedIdentifier(_) | EabError::MissingData(_) => Self::NotFound,
            EabError::ControllerDestroyed => Self::ControllerDestroyed,
            _ => Self::StorageError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            EabQueryStatus::from(&EabError::UnresolvedIdentifier("x".into())),
            EabQueryStatus::NotFound
        );
        assert_eq!(
            EabQueryStatus::from(&EabError::MissingData("x".into())),
            EabQueryStatus::NotFound
        );
        assert_eq!(
            EabQueryStatus::from(&EabError::ExpiredData("x".into())),
            EabQueryStatus::ContactExpired
        );
        assert_eq!(
            EabQueryStatus::from(&EabError::storage("disk full")),
            EabQueryStatus::StorageError
        );
        assert_eq!(
            EabQueryStatus::from(&EabError::ControllerDestroyed),
            EabQueryStatus::ControllerDestroyed
        );
    }

    #[test]
    fn test_payload_statuses() {
        let with_payload: Vec<_> = EabQueryStatus::all()
            .into_iter()
            .filter(EabQueryStatus::may_carry_payload)
            .collect();
        assert_eq!(
            with_payload,
            vec![EabQueryStatus::QuerySuccessful, EabQueryStatus::ContactExpired]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(EabQueryStatus::ContactExpired.to_string(), "contact_expired");
        assert!(EabQueryStatus::NotFound.description().contains("No cached"));
    }
}
