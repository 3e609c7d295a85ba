//! Timestamp parsing and the clock abstraction.

use crate::{EabError, EabResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use parking_lot::Mutex;

/// Parses an ISO-8601 timestamp carrying a timezone offset
/// (`2025-03-01T10:00:00+02:00`, `2025-03-01T08:00:00Z`) into an absolute
/// instant.
pub fn parse_timestamp(value: &str) -> EabResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| EabError::InvalidTimestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Formats an instant as RFC 3339 with second precision and a `Z` offset.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Source of "now" for expiration math.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic expiration tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Advances the clock by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_offset_timestamp() {
        let ts = parse_timestamp("2025-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_zulu_timestamp() {
        let ts = parse_timestamp("2025-03-01T08:00:00Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-01T08:00:00Z");
    }

    #[test]
    fn test_parse_rejects_missing_offset() {
        let err = parse_timestamp("2025-03-01T08:00:00").unwrap_err();
        assert!(matches!(err, EabError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_manual_clock() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), start + Duration::days(2));
        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
