//! Typed ID wrappers for stored entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Internal key of a resolved contact.
///
/// Produced by the contact directory; the record store is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactKey(pub i64);

impl ContactKey {
    /// Creates a contact key from a raw row id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the inner row id.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContactKey {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Subscription (account) identifier. One controller instance serves one
/// subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub i32);

impl SubscriptionId {
    /// Sentinel for "no active subscription".
    pub const INVALID: Self = Self(-1);

    /// Creates a subscription id.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns true unless this is the invalid sentinel.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
