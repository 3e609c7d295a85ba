//! Capability cache metrics.

use eab_core::EabQueryStatus;
use metrics::{counter, describe_counter};

/// Metric names for the capability cache.
pub mod names {
    /// Records written to the store.
    pub const CAPABILITIES_SAVED_TOTAL: &str = "eab_capabilities_saved_total";
    /// Records dropped during a save.
    pub const CAPABILITIES_SAVE_SKIPPED_TOTAL: &str = "eab_capabilities_save_skipped_total";
    /// Per-contact query outcomes.
    pub const CAPABILITY_QUERIES_TOTAL: &str = "eab_capability_queries_total";
    /// Records deleted by explicit or expiry-driven eviction.
    pub const CAPABILITIES_EVICTED_TOTAL: &str = "eab_capabilities_evicted_total";
    /// Expiration config refreshes applied.
    pub const CONFIG_REFRESHES_TOTAL: &str = "eab_config_refreshes_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CAPABILITIES_SAVED_TOTAL,
        "Total number of capability records saved"
    );
    describe_counter!(
        names::CAPABILITIES_SAVE_SKIPPED_TOTAL,
        "Total number of capability records skipped during save"
    );
    describe_counter!(
        names::CAPABILITY_QUERIES_TOTAL,
        "Total number of per-contact capability lookups by status"
    );
    describe_counter!(
        names::CAPABILITIES_EVICTED_TOTAL,
        "Total number of capability records evicted"
    );
    describe_counter!(
        names::CONFIG_REFRESHES_TOTAL,
        "Total number of expiration config refreshes"
    );
}

/// Capability cache metrics recorder.
#[derive(Clone)]
pub struct EabMetrics;

impl EabMetrics {
    /// Record a saved record.
    pub fn capability_saved(sub_id: i32) {
        counter!(names::CAPABILITIES_SAVED_TOTAL, "sub_id" => sub_id.to_string()).increment(1);
    }

    /// Record a skipped record.
    pub fn capability_skipped(sub_id: i32, reason: &'static str) {
        counter!(
            names::CAPABILITIES_SAVE_SKIPPED_TOTAL,
            "sub_id" => sub_id.to_string(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Record one lookup outcome.
    pub fn query_completed(sub_id: i32, status: EabQueryStatus) {
        counter!(
            names::CAPABILITY_QUERIES_TOTAL,
            "sub_id" => sub_id.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
    }

    /// Record evicted records.
    pub fn capabilities_evicted(sub_id: i32, trigger: &'static str, count: usize) {
        counter!(
            names::CAPABILITIES_EVICTED_TOTAL,
            "sub_id" => sub_id.to_string(),
            "trigger" => trigger
        )
        .increment(count as u64);
    }

    /// Record a config refresh.
    pub fn config_refreshed(sub_id: i32) {
        counter!(names::CONFIG_REFRESHES_TOTAL, "sub_id" => sub_id.to_string()).increment(1);
    }
}
