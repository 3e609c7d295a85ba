//! Provenance and outcome classifiers carried by every capability record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EabError;

/// Where the capability data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Fetched from the network by a capability exchange.
    #[default]
    Network,
    /// Served from a previously cached copy.
    Cachedb,
}

impl SourceType {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Cachedb => "cachedb",
        }
    }
}

/// Outcome of the capability request the record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestResult {
    /// The request outcome was not reported.
    #[default]
    Unknown,
    /// The network confirmed the contact and reported its capabilities.
    Found,
    /// The network reported the contact as unknown to the service.
    NotFound,
}

impl RequestResult {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Found => "found",
            Self::NotFound => "not_found",
        }
    }
}

/// The capability exchange mechanism that produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityMechanism {
    /// Presence publication carrying service tuples.
    #[default]
    Presence,
    /// SIP OPTIONS exchange carrying feature tags.
    Options,
}

impl CapabilityMechanism {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Options => "options",
        }
    }
}

macro_rules! impl_str_conversions {
    ($ty:ty, $name:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = EabError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                $(
                    if lower == <$ty>::$variant.as_str() {
                        return Ok(<$ty>::$variant);
                    }
                )+
                Err(EabError::Validation(format!("unknown {} '{}'", $name, s)))
            }
        }
    };
}

impl_str_conversions!(SourceType, "source type", [Network, Cachedb]);
impl_str_conversions!(RequestResult, "request result", [Unknown, Found, NotFound]);
impl_str_conversions!(CapabilityMechanism, "capability mechanism", [Presence, Options]);
