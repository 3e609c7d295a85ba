//! Capability cache controller trait definition.

use eab_config::ExpirationConfig;
use eab_core::{ContactCapability, ContactUri, EabCapabilityResult, EabResult, Interface};
use async_trait::async_trait;

/// Capability cache for one subscription.
///
/// Reads never fail as a whole: each queried contact gets exactly one result,
/// in input order, with its condition encoded in the status.
#[async_trait]
pub trait EabController: Interface + Send + Sync {
    /// Stores each record, superseding whatever was stored for its contact.
    ///
    /// Best-effort: records whose contact cannot be resolved, or whose write
    /// fails, are logged and skipped.
    async fn save_capabilities(&self, capabilities: Vec<ContactCapability>);

    /// Looks up every contact in `uris`.
    async fn get_capabilities(&self, uris: &[ContactUri]) -> Vec<EabCapabilityResult>;

    /// Looks up a single contact.
    async fn get_availability(&self, uri: &ContactUri) -> EabCapabilityResult;

    /// Deletes the stored records of `uris`. Returns how many existed.
    async fn remove_capabilities(&self, uris: &[ContactUri]) -> usize;

    /// Deletes every stored record the current policy reports expired.
    async fn evict_expired(&self) -> EabResult<usize>;

    /// Applies refreshed expiration settings.
    fn on_config_changed(&self, config: &ExpirationConfig) -> EabResult<()>;

    /// Shuts the controller down. Later queries report
    /// [`ControllerDestroyed`](eab_core::EabQueryStatus::ControllerDestroyed).
    fn destroy(&self);

    /// Whether [`destroy`](Self::destroy) has been called.
    fn is_destroyed(&self) -> bool;
}
