//! Presence service tuple and its media capabilities.

use crate::domain::value_objects::ContactUri;
use crate::time::parse_timestamp;
use crate::validation::rules::not_blank;
use crate::{EabError, EabResult, ValidateExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Media duplex mode advertised by a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplexMode {
    /// Send and receive simultaneously.
    Full,
    /// Send and receive alternately.
    Half,
    /// Receive only.
    ReceiveOnly,
    /// Send only.
    SendOnly,
}

impl DuplexMode {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::ReceiveOnly => "receive-only",
            Self::SendOnly => "send-only",
        }
    }
}

impl fmt::Display for DuplexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DuplexMode {
    type Err = EabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "half" => Ok(Self::Half),
            "receive-only" => Ok(Self::ReceiveOnly),
            "send-only" => Ok(Self::SendOnly),
            other => Err(EabError::Validation(format!("unknown duplex mode '{}'", other))),
        }
    }
}

/// Media capabilities of one presence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCapabilities {
    audio_capable: bool,
    video_capable: bool,
    supported_duplex_modes: Vec<DuplexMode>,
    unsupported_duplex_modes: Vec<DuplexMode>,
}

impl ServiceCapabilities {
    /// Creates capabilities with no duplex information.
    #[must_use]
    pub const fn new(audio_capable: bool, video_capable: bool) -> Self {
        Self {
            audio_capable,
            video_capable,
            supported_duplex_modes: Vec::new(),
            unsupported_duplex_modes: Vec::new(),
        }
    }

    /// Adds a supported duplex mode. Duplicates are ignored.
    #[must_use]
    pub fn with_supported_duplex_mode(mut self, mode: DuplexMode) -> Self {
        if !self.supported_duplex_modes.contains(&mode) {
            self.supported_duplex_modes.push(mode);
        }
        self
    }

    /// Adds an unsupported duplex mode. Duplicates are ignored.
    #[must_use]
    pub fn with_unsupported_duplex_mode(mut self, mode: DuplexMode) -> Self {
        if !self.unsupported_duplex_modes.contains(&mode) {
            self.unsupported_duplex_modes.push(mode);
        }
        self
    }

    /// Whether the service carries audio.
    #[must_use]
    pub const fn is_audio_capable(&self) -> bool {
        self.audio_capable
    }

    /// Whether the service carries video.
    #[must_use]
    pub const fn is_video_capable(&self) -> bool {
        self.video_capable
    }

    /// Supported duplex modes, in insertion order.
    #[must_use]
    pub fn supported_duplex_modes(&self) -> &[DuplexMode] {
        &self.supported_duplex_modes
    }

    /// Unsupported duplex modes, in insertion order.
    #[must_use]
    pub fn unsupported_duplex_modes(&self) -> &[DuplexMode] {
        &self.unsupported_duplex_modes
    }
}

/// One service's capability descriptor within a presence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PresenceTuple {
    /// Basic status (`open`/`closed`).
    #[validate(custom(function = "not_blank"))]
    status: String,

    /// Service identifier, e.g. `org.3gpp.urn:urn-7:3gpp-service.ims.icsi.mmtel`.
    #[validate(custom(function = "not_blank"))]
    service_id: String,

    /// Service version.
    #[validate(custom(function = "not_blank"))]
    version: String,

    #[validate(length(max = 256))]
    description: Option<String>,

    contact_uri: Option<ContactUri>,

    service_capabilities: Option<ServiceCapabilities>,

    timestamp: Option<DateTime<Utc>>,
}

impl PresenceTuple {
    /// Starts building a tuple with its three mandatory fields.
    #[must_use]
    pub fn builder(
        status: impl Into<String>,
        service_id: impl Into<String>,
        version: impl Into<String>,
    ) -> PresenceTupleBuilder {
        PresenceTupleBuilder {
            status: status.into(),
            service_id: service_id.into(),
            version: version.into(),
            description: None,
            contact_uri: None,
            service_capabilities: None,
            timestamp: None,
        }
    }

    /// Basic status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Service identifier.
    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Service version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Free-form service description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Contact URI the tuple was published for.
    #[must_use]
    pub const fn contact_uri(&self) -> Option<&ContactUri> {
        self.contact_uri.as_ref()
    }

    /// Media capabilities, if the service advertised any.
    #[must_use]
    pub const fn service_capabilities(&self) -> Option<&ServiceCapabilities> {
        self.service_capabilities.as_ref()
    }

    /// When the tuple was produced.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// True when the tuple carries service capabilities at all.
    #[must_use]
    pub const fn has_service_capabilities(&self) -> bool {
        self.service_capabilities.is_some()
    }

    /// Returns a copy bound to `uri`.
    #[must_use]
    pub fn with_contact_uri(mut self, uri: ContactUri) -> Self {
        self.contact_uri = Some(uri);
        self
    }

    /// Upserts this tuple over an earlier one for the same service: fields
    /// set here win, optional fields left unset keep the earlier values.
    #[must_use]
    pub(crate) fn upsert_over(self, earlier: Self) -> Self {
        Self {
            description: self.description.or(earlier.description),
            contact_uri: self.contact_uri.or(earlier.contact_uri),
            service_capabilities: self.service_capabilities.or(earlier.service_capabilities),
            timestamp: self.timestamp.or(earlier.timestamp),
            ..self
        }
    }
}

/// Fluent builder for [`PresenceTuple`].
#[derive(Debug, Clone)]
pub struct PresenceTupleBuilder {
    status: String,
    service_id: String,
    version: String,
    description: Option<String>,
    contact_uri: Option<ContactUri>,
    service_capabilities: Option<ServiceCapabilities>,
    timestamp: Option<TupleTimestamp>,
}

#[derive(Debug, Clone)]
enum TupleTimestamp {
    Raw(String),
    Instant(DateTime<Utc>),
}

impl PresenceTupleBuilder {
    /// Sets the service description.
    #[must_use]
    pub fn service_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the contact URI.
    #[must_use]
    pub fn contact_uri(mut self, uri: ContactUri) -> Self {
        self.contact_uri = Some(uri);
        self
    }

    /// Sets the media capabilities.
    #[must_use]
    pub fn service_capabilities(mut self, capabilities: ServiceCapabilities) -> Self {
        self.service_capabilities = Some(capabilities);
        self
    }

    /// Sets the timestamp from ISO-8601 text; parsed in [`build`](Self::build).
    #[must_use]
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(TupleTimestamp::Raw(timestamp.into()));
        self
    }

    /// Sets the timestamp from an instant.
    #[must_use]
    pub fn timestamp_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(TupleTimestamp::Instant(timestamp));
        self
    }

    /// Validates and builds the tuple.
    pub fn build(self) -> EabResult<PresenceTuple> {
        let timestamp = match self.timestamp {
            Some(TupleTimestamp::Raw(raw)) => Some(parse_timestamp(&raw)?),
            Some(TupleTimestamp::Instant(ts)) => Some(ts),
            None => None,
        };

        let tuple = PresenceTuple {
            status: self.status,
            service_id: self.service_id,
            version: self.version,
            description: self.description,
            contact_uri: self.contact_uri,
            service_capabilities: self.service_capabilities,
            timestamp,
        };
        tuple.validate_request()?;
        Ok(tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_full_tuple() {
        let uri = ContactUri::parse("16661234567@android.test").unwrap();
        let tuple = PresenceTuple::builder("open", "org.3gpp.mmtel", "1.0")
            .service_description("MMTEL")
            .contact_uri(uri.clone())
            .service_capabilities(
                ServiceCapabilities::new(true, false).with_supported_duplex_mode(DuplexMode::Full),
            )
            .timestamp("2025-01-01T00:00:00+00:00")
            .build()
            .unwrap();

        assert_eq!(tuple.status(), "open");
        assert_eq!(tuple.service_id(), "org.3gpp.mmtel");
        assert_eq!(tuple.version(), "1.0");
        assert_eq!(tuple.description(), Some("MMTEL"));
        assert_eq!(tuple.contact_uri(), Some(&uri));
        let caps = tuple.service_capabilities().unwrap();
        assert!(caps.is_audio_capable());
        assert!(!caps.is_video_capable());
        assert_eq!(caps.supported_duplex_modes(), &[DuplexMode::Full]);
        assert_eq!(
            tuple.timestamp(),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_build_minimal_tuple() {
        let tuple = PresenceTuple::builder("closed", "org.gsma.chat", "2.0")
            .build()
            .unwrap();
        assert!(!tuple.has_service_capabilities());
        assert!(tuple.timestamp().is_none());
        assert!(tuple.description().is_none());
    }

    #[test]
    fn test_blank_mandatory_fields_rejected() {
        let err = PresenceTuple::builder("open", "  ", "1.0").build().unwrap_err();
        assert!(matches!(err, EabError::Validation(_)));
        assert!(err.to_string().contains("service_id"));
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let err = PresenceTuple::builder("open", "svc", "1.0")
            .timestamp("last tuesday")
            .build()
            .unwrap_err();
        assert!(matches!(err, EabError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_duplex_modes_deduplicate() {
        let caps = ServiceCapabilities::new(true, true)
            .with_supported_duplex_mode(DuplexMode::Full)
            .with_supported_duplex_mode(DuplexMode::Full)
            .with_unsupported_duplex_mode(DuplexMode::SendOnly);
        assert_eq!(caps.supported_duplex_modes().len(), 1);
        assert_eq!(caps.unsupported_duplex_modes(), &[DuplexMode::SendOnly]);
    }

    #[test]
    fn test_duplex_mode_parse() {
        assert_eq!("receive-only".parse::<DuplexMode>().unwrap(), DuplexMode::ReceiveOnly);
        assert_eq!(DuplexMode::SendOnly.to_string(), "send-only");
        assert!("sideways".parse::<DuplexMode>().is_err());
    }
}
