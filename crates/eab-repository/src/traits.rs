//! Repository trait definitions.

use eab_core::{ContactCapability, ContactKey, ContactUri, EabResult, Interface};
use async_trait::async_trait;

/// Maps an external contact identifier to the internal contact key.
#[async_trait]
pub trait ContactDirectory: Interface + Send + Sync {
    /// Resolves `uri` to exactly one contact, or `None` when it is unknown.
    async fn resolve(&self, uri: &ContactUri) -> EabResult<Option<ContactKey>>;
}

/// A stored record together with the key it is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCapability {
    /// Contact the record belongs to.
    pub key: ContactKey,
    /// The record as last saved.
    pub capability: ContactCapability,
}

/// Durable keyed storage for capability records.
///
/// At most one record exists per key. Implementations must make
/// [`replace`](Self::replace) atomic: readers see either the old record or
/// the new one, never a mix.
#[async_trait]
pub trait CapabilityStore: Interface + Send + Sync {
    /// Overwrites every stored row for `key` with `capability`.
    async fn replace(&self, key: ContactKey, capability: &ContactCapability) -> EabResult<()>;

    /// Finds the record for `key`.
    async fn find(&self, key: ContactKey) -> EabResult<Option<ContactCapability>>;

    /// Deletes the record for `key`. Returns `true` if one existed.
    async fn remove(&self, key: ContactKey) -> EabResult<bool>;

    /// Lists every stored record, ordered by key.
    async fn list(&self) -> EabResult<Vec<StoredCapability>>;

    /// Counts stored records.
    async fn count(&self) -> EabResult<u64>;
}
