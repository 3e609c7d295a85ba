//! Row types and their conversion back into domain records.

use chrono::{DateTime, Utc};
use eab_core::{
    CapabilityMechanism, ContactCapability, ContactUri, EabResult, PresenceTuple, RequestResult,
    ServiceCapabilities, SourceType,
};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(super) struct RecordRow {
    pub contact_key: i64,
    pub contact_uri: String,
    pub mechanism: String,
    pub source_type: String,
    pub request_result: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
pub(super) struct TupleRow {
    pub status: String,
    pub service_id: String,
    pub version: String,
    pub description: Option<String>,
    pub contact_uri: Option<String>,
    pub service_capabilities: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TupleRow {
    fn into_tuple(self) -> EabResult<PresenceTuple> {
        let mut builder = PresenceTuple::builder(self.status, self.service_id, self.version);
        if let Some(description) = self.description {
            builder = builder.service_description(description);
        }
        if let Some(uri) = self.contact_uri {
            builder = builder.contact_uri(ContactUri::parse(uri)?);
        }
        if let Some(json) = self.service_capabilities {
            let capabilities: ServiceCapabilities = serde_json::from_str(&json)?;
            builder = builder.service_capabilities(capabilities);
        }
        if let Some(timestamp) = self.timestamp {
            builder = builder.timestamp_at(timestamp);
        }
        builder.build()
    }
}

/// Rebuilds a record through the domain builders so stored data passes the
/// same validation as inbound data.
pub(super) fn assemble(
    row: RecordRow,
    tuples: Vec<TupleRow>,
    tags: Vec<String>,
) -> EabResult<ContactCapability> {
    let uri = ContactUri::parse(row.contact_uri)?;
    let mechanism: CapabilityMechanism = row.mechanism.parse()?;
    let source_type: SourceType = row.source_type.parse()?;
    let request_result: RequestResult = row.request_result.parse()?;

    match mechanism {
        CapabilityMechanism::Presence => {
            let tuples = tuples
                .into_iter()
                .map(TupleRow::into_tuple)
                .collect::<EabResult<Vec<_>>>()?;
            let mut builder = ContactCapability::presence_builder(uri, source_type, request_result)
                .add_capability_tuples(tuples);
            if let Some(timestamp) = row.timestamp {
                builder = builder.timestamp(timestamp);
            }
            builder.build()
        }
        CapabilityMechanism::Options => {
            let mut builder = ContactCapability::options_builder(uri, source_type, request_result)
                .add_feature_tags(tags);
            if let Some(timestamp) = row.timestamp {
                builder = builder.timestamp(timestamp);
            }
            builder.build()
        }
    }
}
