//! Per-contact lookup result.

use super::contact_capability::ContactCapability;
use crate::domain::value_objects::{ContactUri, EabQueryStatus};
use serde::{Deserialize, Serialize};

/// Outcome of looking up one contact.
///
/// `contact_capabilities` is populated whenever stored data exists, including
/// when the data has expired, so callers can decide whether stale data is
/// still useful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EabCapabilityResult {
    contact_uri: ContactUri,
    status: EabQueryStatus,
    contact_capabilities: Option<ContactCapability>,
}

impl EabCapabilityResult {
    /// Creates a result.
    #[must_use]
    pub const fn new(
        contact_uri: ContactUri,
        status: EabQueryStatus,
        contact_capabilities: Option<ContactCapability>,
    ) -> Self {
        Self {
            contact_uri,
            status,
            contact_capabilities,
        }
    }

    /// The identifier that was queried.
    #[must_use]
    pub const fn contact_uri(&self) -> &ContactUri {
        &self.contact_uri
    }

    /// Per-entry status.
    #[must_use]
    pub const fn status(&self) -> EabQueryStatus {
        self.status
    }

    /// The capability payload, fresh or stale.
    #[must_use]
    pub const fn contact_capabilities(&self) -> Option<&ContactCapability> {
        self.contact_capabilities.as_ref()
    }

    /// Consumes the result, returning the payload.
    #[must_use]
    pub fn into_contact_capabilities(self) -> Option<ContactCapability> {
        self.contact_capabilities
    }

    /// True when the payload is a stale snapshot.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.status == EabQueryStatus::ContactExpired && self.contact_capabilities.is_some()
    }
}
