//! Expiration policy.
//!
//! A record is judged against one of two TTLs depending on whether it is
//! RCS-capable. Age is measured from the record's own timestamp, never from
//! when it was stored.

use chrono::{DateTime, Duration, Utc};
use eab_config::ExpirationConfig;
use eab_core::{ContactCapability, EabError, EabResult};

/// Time-to-live for one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Records never expire.
    Never,
    /// Records expire once strictly older than the duration.
    After(Duration),
}

impl Ttl {
    /// Converts configured seconds. Zero or negative means [`Ttl::Never`].
    pub fn from_secs(name: &str, secs: i64) -> EabResult<Self> {
        if secs <= 0 {
            return Ok(Self::Never);
        }
        Duration::try_seconds(secs).map(Self::After).ok_or_else(|| {
            EabError::Configuration(format!("{} of {} seconds is out of range", name, secs))
        })
    }

    /// True when `age` is past the TTL. An age exactly equal to it is fresh.
    #[must_use]
    pub fn is_exceeded(&self, age: Duration) -> bool {
        match self {
            Self::Never => false,
            Self::After(ttl) => age > *ttl,
        }
    }
}

/// The pair of TTLs in effect for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    rcs: Ttl,
    non_rcs: Ttl,
}

impl ExpirationPolicy {
    /// Builds the policy, rejecting TTLs that do not fit in a duration.
    pub fn new(config: &ExpirationConfig) -> EabResult<Self> {
        Ok(Self {
            rcs: Ttl::from_secs(
                "rcs_capabilities_cache_expiration_secs",
                config.rcs_capabilities_cache_expiration_secs,
            )?,
            non_rcs: Ttl::from_secs(
                "non_rcs_capabilities_cache_expiration_secs",
                config.non_rcs_capabilities_cache_expiration_secs,
            )?,
        })
    }

    /// TTL for RCS-capable records.
    #[must_use]
    pub const fn rcs_ttl(&self) -> Ttl {
        self.rcs
    }

    /// TTL for everything else.
    #[must_use]
    pub const fn non_rcs_ttl(&self) -> Ttl {
        self.non_rcs
    }

    /// The TTL that governs `capability`.
    #[must_use]
    pub fn ttl_for(&self, capability: &ContactCapability) -> Ttl {
        if capability.is_rcs_capable() {
            self.rcs
        } else {
            self.non_rcs
        }
    }

    /// Judges `capability` at instant `now`.
    ///
    /// Future timestamps are fresh. A record without any timestamp cannot be
    /// aged and counts as expired unless its TTL is [`Ttl::Never`].
    #[must_use]
    pub fn is_expired(&self, capability: &ContactCapability, now: DateTime<Utc>) -> bool {
        let ttl = self.ttl_for(capability);
        match capability.timestamp() {
            Some(timestamp) => ttl.is_exceeded(now.signed_duration_since(timestamp)),
            None => ttl != Ttl::Never,
        }
    }

    /// Like [`is_expired`](Self::is_expired), reporting a stale record as
    /// [`EabError::ExpiredData`].
    pub fn check(&self, capability: &ContactCapability, now: DateTime<Utc>) -> EabResult<()> {
        if !self.is_expired(capability, now) {
            return Ok(());
        }
        let age = match capability.timestamp() {
            Some(timestamp) => format!("{}s old", now.signed_duration_since(timestamp).num_seconds()),
            None => "undated".to_string(),
        };
        Err(EabError::ExpiredData(format!(
            "{} ({}, ttl {:?})",
            capability.contact_uri(),
            age,
            self.ttl_for(capability)
        )))
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            rcs: Ttl::After(Duration::days(90)),
            non_rcs: Ttl::After(Duration::days(180)),
        }
    }
}
