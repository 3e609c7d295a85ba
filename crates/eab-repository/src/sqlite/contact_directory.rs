//! SQLite contact directory.

use crate::traits::ContactDirectory;
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use eab_core::{ContactKey, ContactUri, EabResult};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Contact directory over the `contacts` table, keyed by dialable number.
#[derive(Component, Clone)]
#[shaku(interface = ContactDirectory)]
pub struct SqliteContactDirectory {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteContactDirectory {
    /// Creates a new SQLite contact directory.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Adds a contact, or updates its raw contact id if the number is known.
    pub async fn insert_contact(
        &self,
        uri: &ContactUri,
        raw_contact_id: Option<i64>,
    ) -> EabResult<ContactKey> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO contacts (phone_number, raw_contact_id)
            VALUES (?, ?)
            ON CONFLICT(phone_number) DO UPDATE SET raw_contact_id = excluded.raw_contact_id
            RETURNING id
            "#,
        )
        .bind(uri.number())
        .bind(raw_contact_id)
        .fetch_one(self.pool.inner())
        .await?;

        info!("Contact {} stored with key {}", uri, id);
        Ok(ContactKey(id))
    }

    /// Deletes a contact. Its capability record, if any, is left to the caller.
    pub async fn delete_contact(&self, uri: &ContactUri) -> EabResult<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE phone_number = ?")
            .bind(uri.number())
            .execute(self.pool.inner())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContactDirectory for SqliteContactDirectory {
    async fn resolve(&self, uri: &ContactUri) -> EabResult<Option<ContactKey>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM contacts WHERE phone_number = ?")
            .bind(uri.number())
            .fetch_optional(self.pool.inner())
            .await?;

        debug!("Repository: resolve {} -> {:?}", uri, id);
        Ok(id.map(ContactKey))
    }
}

impl std::fmt::Debug for SqliteContactDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteContactDirectory").finish_non_exhaustive()
    }
}
