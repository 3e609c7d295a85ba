//! In-memory capability store.

use crate::traits::{CapabilityStore, StoredCapability};
use async_trait::async_trait;
use eab_core::{ContactCapability, ContactKey, EabResult};
use parking_lot::RwLock;
use shaku::Component;
use std::collections::HashMap;
use tracing::debug;

/// Capability store held entirely in memory.
///
/// A replace is a single map insert under the write lock.
#[derive(Component, Default)]
#[shaku(interface = CapabilityStore)]
pub struct InMemoryCapabilityStore {
    records: RwLock<HashMap<ContactKey, ContactCapability>>,
}

impl InMemoryCapabilityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CapabilityStore for InMemoryCapabilityStore {
    async fn replace(&self, key: ContactKey, capability: &ContactCapability) -> EabResult<()> {
        debug!("Repository: replace capabilities for contact {}", key);
        self.records.write().insert(key, capability.clone());
        Ok(())
    }

    async fn find(&self, key: ContactKey) -> EabResult<Option<ContactCapability>> {
        Ok(self.records.read().get(&key).cloned())
    }

    async fn remove(&self, key: ContactKey) -> EabResult<bool> {
        debug!("Repository: remove capabilities for contact {}", key);
        Ok(self.records.write().remove(&key).is_some())
    }

    async fn list(&self) -> EabResult<Vec<StoredCapability>> {
        let mut stored: Vec<StoredCapability> = self
            .records
            .read()
            .iter()
            .map(|(key, capability)| StoredCapability {
                key: *key,
                capability: capability.clone(),
            })
            .collect();
        stored.sort_by_key(|s| s.key);
        Ok(stored)
    }

    async fn count(&self) -> EabResult<u64> {
        Ok(self.records.read().len() as u64)
    }
}

impl std::fmt::Debug for InMemoryCapabilityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCapabilityStore")
            .field("records", &self.records.read().len())
            .finish()
    }
}
