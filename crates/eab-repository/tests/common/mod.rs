//! Common test infrastructure for database integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use eab_config::DatabaseConfig;
use eab_core::{
    ContactCapability, ContactUri, PresenceTuple, RequestResult, ServiceCapabilities, SourceType,
};
use eab_repository::{DatabasePool, DatabasePoolInterface};
use std::sync::Arc;

pub const TEST_CONTACT: &str = "16661234567@android.test";

/// Test database wrapper.
///
/// Each instance owns a private in-memory SQLite database with migrations
/// applied.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a fresh, migrated database.
    pub async fn new() -> Self {
        let pool = DatabasePool::new(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");

        Self {
            pool: Arc::new(pool),
        }
    }

    /// Returns the pool as the injectable interface.
    pub fn pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.pool.clone()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn uri(s: &str) -> ContactUri {
    ContactUri::parse(s).expect("valid uri")
}

/// Presence record with one capable and one bare tuple.
pub fn create_presence_record(contact: &str, at: DateTime<Utc>) -> ContactCapability {
    let contact = uri(contact);
    let mmtel = PresenceTuple::builder("open", "org.3gpp.urn:urn-7:3gpp-service.ims.icsi.mmtel", "1.0")
        .service_description("MMTEL")
        .contact_uri(contact.clone())
        .service_capabilities(ServiceCapabilities::new(true, false))
        .timestamp_at(at)
        .build()
        .expect("valid tuple");
    let chat = PresenceTuple::builder("open", "org.openmobilealliance:ChatSession", "2.0")
        .timestamp_at(at + Duration::seconds(5))
        .build()
        .expect("valid tuple");

    ContactCapability::presence_builder(contact, SourceType::Network, RequestResult::Found)
        .add_capability_tuple(mmtel)
        .add_capability_tuple(chat)
        .build()
        .expect("valid record")
}

pub fn create_options_record(contact: &str, tags: &[&str], at: DateTime<Utc>) -> ContactCapability {
    ContactCapability::options_builder(uri(contact), SourceType::Network, RequestResult::Found)
        .add_feature_tags(tags.iter().copied())
        .timestamp(at)
        .build()
        .expect("valid record")
}
