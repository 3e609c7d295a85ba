//! SQLite capability store.

use super::rows::{assemble, RecordRow, TupleRow};
use crate::traits::{CapabilityStore, StoredCapability};
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use eab_core::{ContactCapability, ContactKey, EabResult};
use shaku::Component;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::debug;

const SELECT_RECORD: &str = r#"
    SELECT contact_key, contact_uri, mechanism, source_type, request_result, timestamp
    FROM capability_records
"#;

/// Capability store persisted in the `capability_records`, `service_tuples`
/// and `feature_tags` tables.
///
/// Every operation runs in a transaction, so a concurrent reader sees a
/// record either before or after a replace.
#[derive(Component, Clone)]
#[shaku(interface = CapabilityStore)]
pub struct SqliteCapabilityStore {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteCapabilityStore {
    /// Creates a new SQLite capability store.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn delete_rows(conn: &mut SqliteConnection, key: ContactKey) -> EabResult<u64> {
        sqlx::query("DELETE FROM service_tuples WHERE contact_key = ?")
            .bind(key.into_inner())
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM feature_tags WHERE contact_key = ?")
            .bind(key.into_inner())
            .execute(&mut *conn)
            .await?;
        let result = sqlx::query("DELETE FROM capability_records WHERE contact_key = ?")
            .bind(key.into_inner())
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_rows(
        conn: &mut SqliteConnection,
        key: ContactKey,
        capability: &ContactCapability,
    ) -> EabResult<()> {
        sqlx::query(
            r#"
            INSERT INTO capability_records
                (contact_key, contact_uri, mechanism, source_type, request_result, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(key.into_inner())
        .bind(capability.contact_uri().as_str())
        .bind(capability.mechanism().as_str())
        .bind(capability.source_type().as_str())
        .bind(capability.request_result().as_str())
        .bind(capability.timestamp())
        .execute(&mut *conn)
        .await?;

        for (position, tuple) in capability.tuples().iter().enumerate() {
            let service_capabilities = tuple
                .service_capabilities()
                .map(serde_json::to_string)
                .transpose()?;

            sqlx::query(
                r#"
                INSERT INTO service_tuples
                    (contact_key, position, status, service_id, version, description,
                     contact_uri, service_capabilities, timestamp)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(key.into_inner())
            .bind(position as i64)
            .bind(tuple.status())
            .bind(tuple.service_id())
            .bind(tuple.version())
            .bind(tuple.description())
            .bind(tuple.contact_uri().map(|u| u.as_str()))
            .bind(service_capabilities)
            .bind(tuple.timestamp())
            .execute(&mut *conn)
            .await?;
        }

        for tag in capability.feature_tags() {
            sqlx::query("INSERT INTO feature_tags (contact_key, tag) VALUES (?, ?)")
                .bind(key.into_inner())
                .bind(tag.as_str())
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    async fn load_children(
        conn: &mut SqliteConnection,
        row: RecordRow,
    ) -> EabResult<ContactCapability> {
        let tuples = sqlx::query_as::<_, TupleRow>(
            r#"
            SELECT status, service_id, version, description, contact_uri,
                   service_capabilities, timestamp
            FROM service_tuples
            WHERE contact_key = ?
            ORDER BY position
            "#,
        )
        .bind(row.contact_key)
        .fetch_all(&mut *conn)
        .await?;

        let tags = sqlx::query_scalar::<_, String>(
            "SELECT tag FROM feature_tags WHERE contact_key = ? ORDER BY tag",
        )
        .bind(row.contact_key)
        .fetch_all(&mut *conn)
        .await?;

        assemble(row, tuples, tags)
    }
}

#[async_trait]
impl CapabilityStore for SqliteCapabilityStore {
    async fn replace(&self, key: ContactKey, capability: &ContactCapability) -> EabResult<()> {
        debug!("Repository: replace capabilities for contact {}", key);

        let mut tx = self.pool.inner().begin().await?;
        Self::delete_rows(&mut tx, key).await?;
        Self::insert_rows(&mut tx, key, capability).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, key: ContactKey) -> EabResult<Option<ContactCapability>> {
        debug!("Repository: find capabilities for contact {}", key);

        let mut tx = self.pool.inner().begin().await?;
        let row = sqlx::query_as::<_, RecordRow>(&format!("{} WHERE contact_key = ?", SELECT_RECORD))
            .bind(key.into_inner())
            .fetch_optional(&mut *tx)
            .await?;

        let capability = match row {
            Some(row) => Some(Self::load_children(&mut tx, row).await?),
            None => None,
        };
        tx.commit().await?;
        Ok(capability)
    }

    async fn remove(&self, key: ContactKey) -> EabResult<bool> {
        debug!("Repository: remove capabilities for contact {}", key);

        let mut tx = self.pool.inner().begin().await?;
        let removed = Self::delete_rows(&mut tx, key).await?;
        tx.commit().await?;
        Ok(removed > 0)
    }

    async fn list(&self) -> EabResult<Vec<StoredCapability>> {
        let mut tx = self.pool.inner().begin().await?;
        let rows = sqlx::query_as::<_, RecordRow>(&format!("{} ORDER BY contact_key", SELECT_RECORD))
            .fetch_all(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let key = ContactKey(row.contact_key);
            let capability = Self::load_children(&mut tx, row).await?;
            stored.push(StoredCapability { key, capability });
        }
        tx.commit().await?;
        debug!("Repository: listed {} capability records", stored.len());
        Ok(stored)
    }

    async fn count(&self) -> EabResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM capability_records")
            .fetch_one(self.pool.inner())
            .await?;
        Ok(count as u64)
    }
}

impl std::fmt::Debug for SqliteCapabilityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCapabilityStore").finish_non_exhaustive()
    }
}
