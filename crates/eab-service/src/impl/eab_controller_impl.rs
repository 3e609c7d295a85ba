//! Capability cache controller implementation.

use crate::assembler::{LookupOutcome, QueryResultAssembler};
use crate::eab_controller::EabController;
use crate::metrics::EabMetrics;
use crate::policy::ExpirationPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eab_config::ExpirationConfig;
use eab_core::{
    Clock, ContactCapability, ContactUri, EabCapabilityResult, EabError, EabResult,
    SubscriptionId,
};
use eab_repository::{CapabilityStore, ContactDirectory};
use futures::future::join_all;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Controller over a contact directory and a capability store.
pub struct EabControllerImpl {
    directory: Arc<dyn ContactDirectory>,
    store: Arc<dyn CapabilityStore>,
    clock: Arc<dyn Clock>,
    policy: RwLock<ExpirationPolicy>,
    sub_id: SubscriptionId,
    destroyed: AtomicBool,
}

impl EabControllerImpl {
    /// Creates a controller for `sub_id`.
    ///
    /// Fails only when `expiration` holds a TTL too large to represent.
    pub fn new(
        directory: Arc<dyn ContactDirectory>,
        store: Arc<dyn CapabilityStore>,
        clock: Arc<dyn Clock>,
        expiration: &ExpirationConfig,
        sub_id: SubscriptionId,
    ) -> EabResult<Self> {
        let policy = ExpirationPolicy::new(expiration)?;
        info!(sub_id = %sub_id, ?policy, "Capability controller created");

        Ok(Self {
            directory,
            store,
            clock,
            policy: RwLock::new(policy),
            sub_id,
            destroyed: AtomicBool::new(false),
        })
    }

    /// Subscription this controller serves.
    #[must_use]
    pub const fn sub_id(&self) -> SubscriptionId {
        self.sub_id
    }

    /// Snapshot of the policy currently in effect.
    #[must_use]
    pub fn policy(&self) -> ExpirationPolicy {
        *self.policy.read()
    }

    async fn resolve(&self, uri: &ContactUri) -> EabResult<eab_core::ContactKey> {
        self.directory
            .resolve(uri)
            .await?
            .ok_or_else(|| EabError::UnresolvedIdentifier(uri.to_string()))
    }

    async fn save_one(&self, capability: ContactCapability, now: DateTime<Utc>) -> EabResult<()> {
        let key = self.resolve(capability.contact_uri()).await?;
        let capability = capability.with_default_timestamp(now);
        self.store.replace(key, &capability).await
    }

    async fn fetch(&self, uri: &ContactUri) -> EabResult<ContactCapability> {
        let key = self.resolve(uri).await?;
        self.store
            .find(key)
            .await?
            .ok_or_else(|| EabError::MissingData(uri.to_string()))
    }

    async fn query_one(
        &self,
        uri: &ContactUri,
        policy: &ExpirationPolicy,
        now: DateTime<Utc>,
    ) -> EabCapabilityResult {
        let outcome = match self.fetch(uri).await {
            Ok(capability) => match policy.check(&capability, now) {
                Ok(()) => LookupOutcome::Fresh(capability),
                Err(reason) => {
                    debug!(sub_id = %self.sub_id, "Lookup of {}: {}", uri, reason);
                    LookupOutcome::Expired { capability, reason }
                }
            },
            Err(e) => {
                if e.is_retriable() {
                    warn!(sub_id = %self.sub_id, "Lookup of {} failed: {}", uri, e);
                } else {
                    debug!(sub_id = %self.sub_id, "Lookup of {}: {}", uri, e);
                }
                LookupOutcome::Failed(e)
            }
        };

        let result = QueryResultAssembler::assemble(uri, outcome);
        EabMetrics::query_completed(self.sub_id.0, result.status());
        result
    }
}

#[async_trait]
impl EabController for EabControllerImpl {
    async fn save_capabilities(&self, capabilities: Vec<ContactCapability>) {
        if self.is_destroyed() {
            warn!(sub_id = %self.sub_id, "Ignoring save of {} records: controller destroyed", capabilities.len());
            return;
        }

        debug!(sub_id = %self.sub_id, "Saving {} capability records", capabilities.len());
        let now = self.clock.now();

        // Sequential so a later record for the same contact wins.
        for capability in capabilities {
            let uri = capability.contact_uri().clone();
            match self.save_one(capability, now).await {
                Ok(()) => {
                    debug!(sub_id = %self.sub_id, "Saved capabilities for {}", uri);
                    EabMetrics::capability_saved(self.sub_id.0);
                }
                Err(EabError::UnresolvedIdentifier(_)) => {
                    warn!(sub_id = %self.sub_id, "Skipping {}: contact not found", uri);
                    EabMetrics::capability_skipped(self.sub_id.0, "unresolved");
                }
                Err(e) => {
                    warn!(sub_id = %self.sub_id, "Skipping {}: {}", uri, e);
                    EabMetrics::capability_skipped(self.sub_id.0, e.error_code());
                }
            }
        }
    }

    async fn get_capabilities(&self, uris: &[ContactUri]) -> Vec<EabCapabilityResult> {
        if self.is_destroyed() {
            return uris.iter().map(QueryResultAssembler::destroyed).collect();
        }

        debug!(sub_id = %self.sub_id, "Querying {} contacts", uris.len());
        let now = self.clock.now();
        let policy = self.policy();

        join_all(uris.iter().map(|uri| self.query_one(uri, &policy, now))).await
    }

    async fn get_availability(&self, uri: &ContactUri) -> EabCapabilityResult {
        if self.is_destroyed() {
            return QueryResultAssembler::destroyed(uri);
        }

        let now = self.clock.now();
        let policy = self.policy();
        self.query_one(uri, &policy, now).await
    }

    async fn remove_capabilities(&self, uris: &[ContactUri]) -> usize {
        if self.is_destroyed() {
            return 0;
        }

        let mut removed = 0;
        for uri in uris {
            let result = match self.resolve(uri).await {
                Ok(key) => self.store.remove(key).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(true) => removed += 1,
                Ok(false) => debug!(sub_id = %self.sub_id, "Nothing stored for {}", uri),
                Err(e) => warn!(sub_id = %self.sub_id, "Could not remove {}: {}", uri, e),
            }
        }

        info!(sub_id = %self.sub_id, "Removed {} capability records", removed);
        EabMetrics::capabilities_evicted(self.sub_id.0, "explicit", removed);
        removed
    }

    async fn evict_expired(&self) -> EabResult<usize> {
        if self.is_destroyed() {
            return Err(EabError::ControllerDestroyed);
        }

        let now = self.clock.now();
        let policy = self.policy();
        let stored = self.store.list().await?;

        let mut evicted = 0;
        for entry in stored
            .iter()
            .filter(|entry| policy.is_expired(&entry.capability, now))
        {
            if self.store.remove(entry.key).await? {
                evicted += 1;
            }
        }

        info!(sub_id = %self.sub_id, "Evicted {} of {} capability records", evicted, stored.len());
        EabMetrics::capabilities_evicted(self.sub_id.0, "expired", evicted);
        Ok(evicted)
    }

    fn on_config_changed(&self, config: &ExpirationConfig) -> EabResult<()> {
        let policy = ExpirationPolicy::new(config)?;
        *self.policy.write() = policy;

        info!(sub_id = %self.sub_id, ?policy, "Expiration config refreshed");
        EabMetrics::config_refreshed(self.sub_id.0);
        Ok(())
    }

    fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::SeqCst) {
            info!(sub_id = %self.sub_id, "Capability controller destroyed");
        }
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EabControllerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EabControllerImpl")
            .field("sub_id", &self.sub_id)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use eab_core::{
        ContactKey, EabQueryStatus, ManualClock, PresenceTuple, RequestResult,
        ServiceCapabilities, SourceType,
    };
    use eab_repository::{InMemoryCapabilityStore, InMemoryContactDirectory, StoredCapability};
    use mockall::mock;

    mock! {
        pub Store {}

        #[async_trait]
        impl CapabilityStore for Store {
            async fn replace(&self, key: ContactKey, capability: &ContactCapability) -> EabResult<()>;
            async fn find(&self, key: ContactKey) -> EabResult<Option<ContactCapability>>;
            async fn remove(&self, key: ContactKey) -> EabResult<bool>;
            async fn list(&self) -> EabResult<Vec<StoredCapability>>;
            async fn count(&self) -> EabResult<u64>;
        }
    }

    mock! {
        pub Directory {}

        #[async_trait]
        impl ContactDirectory for Directory {
            async fn resolve(&self, uri: &ContactUri) -> EabResult<Option<ContactKey>>;
        }
    }

    const DAY: i64 = 24 * 60 * 60;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn uri(s: &str) -> ContactUri {
        ContactUri::parse(s).unwrap()
    }

    fn create_rcs_record(contact: &str, at: Option<DateTime<Utc>>) -> ContactCapability {
        let mut tuple = PresenceTuple::builder("open", "org.3gpp.mmtel", "1.0")
            .service_capabilities(ServiceCapabilities::new(true, true));
        if let Some(at) = at {
            tuple = tuple.timestamp_at(at);
        }
        ContactCapability::presence_builder(uri(contact), SourceType::Network, RequestResult::Found)
            .add_capability_tuple(tuple.build().unwrap())
            .build()
            .unwrap()
    }

    struct Fixture {
        directory: Arc<InMemoryContactDirectory>,
        store: Arc<InMemoryCapabilityStore>,
        clock: Arc<ManualClock>,
        controller: EabControllerImpl,
    }

    fn create_fixture(config: ExpirationConfig) -> Fixture {
        let directory = Arc::new(InMemoryContactDirectory::new());
        let store = Arc::new(InMemoryCapabilityStore::new());
        let clock = Arc::new(ManualClock::new(now()));
        let controller = EabControllerImpl::new(
            directory.clone(),
            store.clone(),
            clock.clone(),
            &config,
            SubscriptionId::new(1),
        )
        .unwrap();
        Fixture {
            directory,
            store,
            clock,
            controller,
        }
    }

    #[tokio::test]
    async fn test_new_rejects_overflowing_ttl() {
        let result = EabControllerImpl::new(
            Arc::new(InMemoryContactDirectory::new()),
            Arc::new(InMemoryCapabilityStore::new()),
            Arc::new(ManualClock::new(now())),
            &ExpirationConfig::new(1, i64::MAX),
            SubscriptionId::new(1),
        );
        assert!(matches!(result, Err(EabError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unresolved_record_is_skipped() {
        let f = create_fixture(ExpirationConfig::default());
        f.directory.register(&uri("tel:+15550001"));

        f.controller
            .save_capabilities(vec![
                create_rcs_record("tel:+19999999", Some(now())),
                create_rcs_record("tel:+15550001", Some(now())),
            ])
            .await;

        assert_eq!(f.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_undated_record_is_stamped_at_ingestion() {
        let f = create_fixture(ExpirationConfig::new(60, 0));
        let key = f.directory.register(&uri("tel:+15550001"));

        f.controller
            .save_capabilities(vec![create_rcs_record("tel:+15550001", None)])
            .await;

        let stored = f.store.find(key).await.unwrap().unwrap();
        assert_eq!(stored.timestamp(), Some(now()));

        f.clock.advance(Duration::seconds(60));
        let result = f.controller.get_availability(&uri("tel:+15550001")).await;
        assert_eq!(result.status(), EabQueryStatus::QuerySuccessful);

        f.clock.advance(Duration::seconds(1));
        let result = f.controller.get_availability(&uri("tel:+15550001")).await;
        assert_eq!(result.status(), EabQueryStatus::ContactExpired);
    }

    #[tokio::test]
    async fn test_later_record_in_batch_wins() {
        let f = create_fixture(ExpirationConfig::default());
        let key = f.directory.register(&uri("tel:+15550001"));
        let newer = create_rcs_record("tel:+15550001", Some(now() + Duration::days(1)));

        f.controller
            .save_capabilities(vec![create_rcs_record("tel:+15550001", Some(now())), newer.clone()])
            .await;

        assert_eq!(f.store.find(key).await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn test_storage_error_is_isolated_to_entry() {
        let mut directory = MockDirectory::new();
        directory
            .expect_resolve()
            .returning(|uri| Ok(Some(ContactKey(if uri.number() == "+15550002" { 2 } else { 1 }))));

        let mut store = MockStore::new();
        store.expect_find().returning(|key| {
            if key == ContactKey(2) {
                Err(EabError::storage("database is locked"))
            } else {
                Ok(Some(create_rcs_record("tel:+15550001", Some(now()))))
            }
        });

        let controller = EabControllerImpl::new(
            Arc::new(directory),
            Arc::new(store),
            Arc::new(ManualClock::new(now())),
            &ExpirationConfig::default(),
            SubscriptionId::new(1),
        )
        .unwrap();

        let results = controller
            .get_capabilities(&[uri("tel:+15550001"), uri("tel:+15550002"), uri("tel:+15550001")])
            .await;

        let statuses: Vec<EabQueryStatus> = results.iter().map(EabCapabilityResult::status).collect();
        assert_eq!(
            statuses,
            vec![
                EabQueryStatus::QuerySuccessful,
                EabQueryStatus::StorageError,
                EabQueryStatus::QuerySuccessful,
            ]
        );
        assert!(results[1].contact_capabilities().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_does_not_abort_batch() {
        let mut directory = MockDirectory::new();
        directory
            .expect_resolve()
            .returning(|uri| Ok(Some(ContactKey(if uri.number() == "+15550002" { 2 } else { 1 }))));

        let mut store = MockStore::new();
        store
            .expect_replace()
            .withf(|key, _| *key == ContactKey(2))
            .times(1)
            .returning(|_, _| Err(EabError::storage("disk I/O error")));
        store
            .expect_replace()
            .withf(|key, _| *key == ContactKey(1))
            .times(2)
            .returning(|_, _| Ok(()));

        let controller = EabControllerImpl::new(
            Arc::new(directory),
            Arc::new(store),
            Arc::new(ManualClock::new(now())),
            &ExpirationConfig::default(),
            SubscriptionId::new(1),
        )
        .unwrap();

        controller
            .save_capabilities(vec![
                create_rcs_record("tel:+15550001", Some(now())),
                create_rcs_record("tel:+15550002", Some(now())),
                create_rcs_record("tel:+15550001", Some(now())),
            ])
            .await;
    }

    #[tokio::test]
    async fn test_destroyed_controller() {
        let f = create_fixture(ExpirationConfig::default());
        f.directory.register(&uri("tel:+15550001"));
        f.controller
            .save_capabilities(vec![create_rcs_record("tel:+15550001", Some(now()))])
            .await;

        f.controller.destroy();
        f.controller.destroy();
        assert!(f.controller.is_destroyed());

        let results = f
            .controller
            .get_capabilities(&[uri("tel:+15550001"), uri("tel:+19999999")])
            .await;
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.status() == EabQueryStatus::ControllerDestroyed));

        f.controller
            .save_capabilities(vec![create_rcs_record("tel:+15550001", Some(now() + Duration::days(1)))])
            .await;
        assert_eq!(
            f.store
                .find(ContactKey(1))
                .await
                .unwrap()
                .unwrap()
                .timestamp(),
            Some(now())
        );
        assert!(matches!(
            f.controller.evict_expired().await,
            Err(EabError::ControllerDestroyed)
        ));
        assert_eq!(f.controller.remove_capabilities(&[uri("tel:+15550001")]).await, 0);
    }

    #[tokio::test]
    async fn test_remove_capabilities() {
        let f = create_fixture(ExpirationConfig::default());
        f.directory.register(&uri("tel:+15550001"));
        f.directory.register(&uri("tel:+15550002"));
        f.controller
            .save_capabilities(vec![create_rcs_record("tel:+15550001", Some(now()))])
            .await;

        let removed = f
            .controller
            .remove_capabilities(&[uri("tel:+15550001"), uri("tel:+15550002"), uri("tel:+19999999")])
            .await;

        assert_eq!(removed, 1);
        let result = f.controller.get_availability(&uri("tel:+15550001")).await;
        assert_eq!(result.status(), EabQueryStatus::NotFound);
    }

    #[tokio::test]
    async fn test_evict_expired_removes_only_expired() {
        let f = create_fixture(ExpirationConfig::new(10 * DAY, 0));
        f.directory.register(&uri("tel:+15550001"));
        f.directory.register(&uri("tel:+15550002"));
        f.directory.register(&uri("tel:+15550003"));

        let not_found = ContactCapability::presence_builder(
            uri("tel:+15550003"),
            SourceType::Network,
            RequestResult::NotFound,
        )
        .timestamp(now() - Duration::days(1000))
        .build()
        .unwrap();

        f.controller
            .save_capabilities(vec![
                create_rcs_record("tel:+15550001", Some(now() - Duration::days(11))),
                create_rcs_record("tel:+15550002", Some(now() - Duration::days(9))),
                not_found,
            ])
            .await;

        assert_eq!(f.controller.evict_expired().await.unwrap(), 1);
        assert_eq!(f.store.count().await.unwrap(), 2);
        assert_eq!(
            f.controller.get_availability(&uri("tel:+15550001")).await.status(),
            EabQueryStatus::NotFound
        );
        assert_eq!(f.controller.evict_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_config_refresh_changes_verdict() {
        let f = create_fixture(ExpirationConfig::new(10 * DAY, 0));
        f.directory.register(&uri("tel:+15550001"));
        f.controller
            .save_capabilities(vec![create_rcs_record(
                "tel:+15550001",
                Some(now() - Duration::days(20)),
            )])
            .await;

        let contact = uri("tel:+15550001");
        assert_eq!(
            f.controller.get_availability(&contact).await.status(),
            EabQueryStatus::ContactExpired
        );

        f.controller
            .on_config_changed(&ExpirationConfig::new(30 * DAY, 0))
            .unwrap();
        assert_eq!(
            f.controller.get_availability(&contact).await.status(),
            EabQueryStatus::QuerySuccessful
        );
    }

    #[tokio::test]
    async fn test_bad_config_refresh_keeps_policy() {
        let f = create_fixture(ExpirationConfig::new(10 * DAY, 0));
        let before = f.controller.policy();

        let result = f
            .controller
            .on_config_changed(&ExpirationConfig::new(i64::MAX, 0));

        assert!(matches!(result, Err(EabError::Configuration(_))));
        assert_eq!(f.controller.policy(), before);
    }
}
