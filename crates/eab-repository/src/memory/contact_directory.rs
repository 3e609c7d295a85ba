//! In-memory contact directory keyed by normalized number.

use crate::traits::ContactDirectory;
use async_trait::async_trait;
use eab_core::{ContactKey, ContactUri, EabResult};
use parking_lot::RwLock;
use shaku::Component;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Contact directory held in memory, keyed by dialable number.
///
/// `sip:+1555@host`, `tel:+1555` and `+1555@other` all resolve to the same
/// contact.
#[derive(Component, Default)]
#[shaku(interface = ContactDirectory)]
pub struct InMemoryContactDirectory {
    contacts: RwLock<HashMap<String, ContactKey>>,
    last_key: AtomicI64,
}

impl InMemoryContactDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contact, allocating a key on first sight.
    pub fn register(&self, uri: &ContactUri) -> ContactKey {
        let mut contacts = self.contacts.write();
        *contacts
            .entry(uri.number())
            .or_insert_with(|| ContactKey(self.last_key.fetch_add(1, Ordering::Relaxed) + 1))
    }

    /// Files `uri` under an explicit key.
    pub fn insert(&self, uri: &ContactUri, key: ContactKey) {
        self.contacts.write().insert(uri.number(), key);
    }

    /// Removes the contact. Returns `true` if it was known.
    pub fn forget(&self, uri: &ContactUri) -> bool {
        self.contacts.write().remove(&uri.number()).is_some()
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContactDirectory {
    async fn resolve(&self, uri: &ContactUri) -> EabResult<Option<ContactKey>> {
        let key = self.contacts.read().get(&uri.number()).copied();
        debug!("Repository: resolve {} -> {:?}", uri, key);
        Ok(key)
    }
}

impl std::fmt::Debug for InMemoryContactDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContactDirectory")
            .field("contacts", &self.contacts.read().len())
            .finish()
    }
}
