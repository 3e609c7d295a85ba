//! Contact capability record.

use super::presence_tuple::PresenceTuple;
use crate::domain::value_objects::{CapabilityMechanism, ContactUri, RequestResult, SourceType};
use crate::validation::rules;
use crate::{EabError, EabResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The most recently known capabilities of one contact.
///
/// Values are immutable once built; a newer record for the same contact
/// replaces this one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCapability {
    contact_uri: ContactUri,
    mechanism: CapabilityMechanism,
    source_type: SourceType,
    request_result: RequestResult,
    tuples: Vec<PresenceTuple>,
    feature_tags: BTreeSet<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl ContactCapability {
    /// Starts a presence (service tuple) record.
    #[must_use]
    pub fn presence_builder(
        contact_uri: ContactUri,
        source_type: SourceType,
        request_result: RequestResult,
    ) -> PresenceBuilder {
        PresenceBuilder {
            contact_uri,
            source_type,
            request_result,
            tuples: Vec::new(),
            timestamp: None,
        }
    }

    /// Starts an OPTIONS (feature tag) record.
    #[must_use]
    pub fn options_builder(
        contact_uri: ContactUri,
        source_type: SourceType,
        request_result: RequestResult,
    ) -> OptionsBuilder {
        OptionsBuilder {
            contact_uri,
            source_type,
            request_result,
            feature_tags: BTreeSet::new(),
            timestamp: None,
        }
    }

    /// The contact this record describes.
    #[must_use]
    pub const fn contact_uri(&self) -> &ContactUri {
        &self.contact_uri
    }

    /// Exchange mechanism that produced the record.
    #[must_use]
    pub const fn mechanism(&self) -> CapabilityMechanism {
        self.mechanism
    }

    /// Provenance of the data.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Outcome of the originating request.
    #[must_use]
    pub const fn request_result(&self) -> RequestResult {
        self.request_result
    }

    /// Presence tuples, in publication order. Empty for OPTIONS records.
    #[must_use]
    pub fn tuples(&self) -> &[PresenceTuple] {
        &self.tuples
    }

    /// Finds the tuple for `service_id`.
    #[must_use]
    pub fn tuple(&self, service_id: &str) -> Option<&PresenceTuple> {
        self.tuples.iter().find(|t| t.service_id() == service_id)
    }

    /// Feature tags, sorted. Empty for presence records.
    #[must_use]
    pub const fn feature_tags(&self) -> &BTreeSet<String> {
        &self.feature_tags
    }

    /// When the data was produced, if known.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// True iff the network confirmed the contact and the record carries
    /// evidence of rich-communication support.
    #[must_use]
    pub fn is_rcs_capable(&self) -> bool {
        if self.request_result != RequestResult::Found {
            return false;
        }
        match self.mechanism {
            CapabilityMechanism::Presence => {
                self.tuples.iter().any(PresenceTuple::has_service_capabilities)
            }
            CapabilityMechanism::Options => !self.feature_tags.is_empty(),
        }
    }

    /// Returns a copy addressed to `uri`, rebinding tuple URIs as well.
    #[must_use]
    pub fn with_contact_uri(mut self, uri: ContactUri) -> Self {
        self.tuples = self
            .tuples
            .into_iter()
            .map(|t| {
                if t.contact_uri().is_some() {
                    t.with_contact_uri(uri.clone())
                } else {
                    t
                }
            })
            .collect();
        self.contact_uri = uri;
        self
    }

    /// Returns a copy stamped with `timestamp` when none is present.
    #[must_use]
    pub fn with_default_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        if self.timestamp.is_none() {
            self.timestamp = Some(timestamp);
        }
        self
    }
}

/// Fluent builder for presence records.
#[derive(Debug, Clone)]
pub struct PresenceBuilder {
    contact_uri: ContactUri,
    source_type: SourceType,
    request_result: RequestResult,
    tuples: Vec<PresenceTuple>,
    timestamp: Option<DateTime<Utc>>,
}

impl PresenceBuilder {
    /// Appends a tuple.
    #[must_use]
    pub fn add_capability_tuple(mut self, tuple: PresenceTuple) -> Self {
        self.tuples.push(tuple);
        self
    }

    /// Appends several tuples.
    #[must_use]
    pub fn add_capability_tuples(mut self, tuples: impl IntoIterator<Item = PresenceTuple>) -> Self {
        self.tuples.extend(tuples);
        self
    }

    /// Overrides the record timestamp. Without this, the earliest tuple
    /// timestamp is used.
    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builds the record.
    ///
    /// Tuples are keyed by service id, as the store keys rows by
    /// (contact, service id). A repeated service id is upserted into the
    /// first-seen position: the later tuple wins field by field, and optional
    /// fields it leaves unset keep the earlier values.
    pub fn build(self) -> EabResult<ContactCapability> {
        let mut tuples: Vec<PresenceTuple> = Vec::with_capacity(self.tuples.len());
        for tuple in self.tuples {
            match tuples.iter().position(|t| t.service_id() == tuple.service_id()) {
                Some(index) => {
                    let earlier = tuples[index].clone();
                    tuples[index] = tuple.upsert_over(earlier);
                }
                None => tuples.push(tuple),
            }
        }

        let timestamp = self
            .timestamp
            .or_else(|| tuples.iter().filter_map(PresenceTuple::timestamp).min());

        Ok(ContactCapability {
            contact_uri: self.contact_uri,
            mechanism: CapabilityMechanism::Presence,
            source_type: self.source_type,
            request_result: self.request_result,
            tuples,
            feature_tags: BTreeSet::new(),
            timestamp,
        })
    }
}

/// Fluent builder for OPTIONS records.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    contact_uri: ContactUri,
    source_type: SourceType,
    request_result: RequestResult,
    feature_tags: BTreeSet<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl OptionsBuilder {
    /// Adds a feature tag.
    #[must_use]
    pub fn add_feature_tag(mut self, tag: impl Into<String>) -> Self {
        self.feature_tags.insert(tag.into().trim().to_string());
        self
    }

    /// Adds several feature tags.
    #[must_use]
    pub fn add_feature_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self = self.add_feature_tag(tag);
        }
        self
    }

    /// Sets the record timestamp.
    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Validates every feature tag and builds the record.
    pub fn build(self) -> EabResult<ContactCapability> {
        for tag in &self.feature_tags {
            rules::feature_tag(tag)
                .map_err(|e| EabError::Validation(format!("feature tag '{}': {}", tag, e.code)))?;
        }

        Ok(ContactCapability {
            contact_uri: self.contact_uri,
            mechanism: CapabilityMechanism::Options,
            source_type: self.source_type,
            request_result: self.request_result,
            tuples: Vec::new(),
            feature_tags: self.feature_tags,
            timestamp: self.timestamp,
        })
    }
}
