//! Capability cache expiration settings.

use eab_core::SubscriptionId;
use serde::{Deserialize, Serialize};

/// 90 days.
pub const DEFAULT_RCS_CAPABILITIES_CACHE_EXPIRATION_SECS: i64 = 90 * 24 * 60 * 60;

/// 180 days.
pub const DEFAULT_NON_RCS_CAPABILITIES_CACHE_EXPIRATION_SECS: i64 = 180 * 24 * 60 * 60;

/// Largest TTL representable as a millisecond-precision duration.
pub const MAX_EXPIRATION_SECS: i64 = i64::MAX / 1000;

/// Expiration durations for the two capability regimes.
///
/// A value of zero or less means records of that regime never expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationConfig {
    /// TTL for records confirmed RCS-capable by the network.
    #[serde(default = "default_rcs")]
    pub rcs_capabilities_cache_expiration_secs: i64,

    /// TTL for records reporting the contact as non-RCS.
    #[serde(default = "default_non_rcs")]
    pub non_rcs_capabilities_cache_expiration_secs: i64,
}

fn default_rcs() -> i64 {
    DEFAULT_RCS_CAPABILITIES_CACHE_EXPIRATION_SECS
}

fn default_non_rcs() -> i64 {
    DEFAULT_NON_RCS_CAPABILITIES_CACHE_EXPIRATION_SECS
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            rcs_capabilities_cache_expiration_secs: default_rcs(),
            non_rcs_capabilities_cache_expiration_secs: default_non_rcs(),
        }
    }
}

impl ExpirationConfig {
    /// Creates a config from explicit second values.
    #[must_use]
    pub const fn new(rcs_secs: i64, non_rcs_secs: i64) -> Self {
        Self {
            rcs_capabilities_cache_expiration_secs: rcs_secs,
            non_rcs_capabilities_cache_expiration_secs: non_rcs_secs,
        }
    }

    /// Returns a copy with the RCS TTL replaced.
    #[must_use]
    pub const fn with_rcs_secs(mut self, secs: i64) -> Self {
        self.rcs_capabilities_cache_expiration_secs = secs;
        self
    }

    /// Returns a copy with the non-RCS TTL replaced.
    #[must_use]
    pub const fn with_non_rcs_secs(mut self, secs: i64) -> Self {
        self.non_rcs_capabilities_cache_expiration_secs = secs;
        self
    }
}

/// Partial per-subscription override of [`ExpirationConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionOverride {
    /// Subscription the override applies to.
    pub sub_id: i32,
    /// Replacement RCS TTL.
    #[serde(default)]
    pub rcs_capabilities_cache_expiration_secs: Option<i64>,
    /// Replacement non-RCS TTL.
    #[serde(default)]
    pub non_rcs_capabilities_cache_expiration_secs: Option<i64>,
}

/// Cache section of the application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Defaults for every subscription.
    #[serde(default)]
    pub expiration: ExpirationConfig,

    /// Carrier-specific overrides.
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionOverride>,
}

impl CacheConfig {
    /// Resolves the effective expiration for `sub_id`.
    #[must_use]
    pub fn expiration_for(&self, sub_id: SubscriptionId) -> ExpirationConfig {
        let mut effective = self.expiration;
        if let Some(o) = self.subscriptions.iter().find(|o| o.sub_id == sub_id.0) {
            if let Some(secs) = o.rcs_capabilities_cache_expiration_secs {
                effective.rcs_capabilities_cache_expiration_secs = secs;
            }
            if let Some(secs) = o.non_rcs_capabilities_cache_expiration_secs {
                effective.non_rcs_capabilities_cache_expiration_secs = secs;
            }
        }
        effective
    }
}
