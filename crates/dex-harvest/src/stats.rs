use serde::{Deserialize, Serialize};
use tracing::info;

/// Statistics collected during a harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestStats {
    /// Stubs found in the listing
    pub listed: usize,
    /// Stubs whose detail page was requested
    pub dispatched: usize,
    /// Detail pages that could not be fetched
    pub detail_failures: usize,
    /// Records stored without any sub-resource fetch
    pub finalized_immediately: usize,
    /// Aggregates finalized once every sub-result arrived
    pub finalized_aggregates: usize,
    /// Aggregates force-finalized at shutdown
    pub flushed_aggregates: usize,
    /// Registrations rejected because the key was already pending
    pub rejected_registrations: usize,
    /// Records dropped by the final store as duplicates
    pub duplicates_dropped: usize,
    /// Sub-results that arrived for an unknown or finalized key
    pub unknown_sub_results: usize,
    /// Sub-resource fetches that failed permanently
    pub sub_fetch_failures: usize,
    /// Records in the final store
    pub stored: usize,
}

impl HarvestStats {
    pub fn log_summary(&self) {
        info!(
            listed = self.listed,
            dispatched = self.dispatched,
            detail_failures = self.detail_failures,
            finalized_immediately = self.finalized_immediately,
            finalized_aggregates = self.finalized_aggregates,
            flushed_aggregates = self.flushed_aggregates,
            rejected_registrations = self.rejected_registrations,
            duplicates_dropped = self.duplicates_dropped,
            unknown_sub_results = self.unknown_sub_results,
            sub_fetch_failures = self.sub_fetch_failures,
            stored = self.stored,
            "Harvest statistics"
        );
    }
}
