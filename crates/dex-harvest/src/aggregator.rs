//! Sub-resource aggregator (join barrier)
//!
//! Each entry with sub-resources is registered with the number of results it
//! expects. Results arrive in any order; the one that makes
//! `collected == expected` attaches the list to the record and moves it into
//! the [`FinalStore`]. Removing the pending entry is the single finalize point,
//! so a record is emitted exactly once.
//!
//! The aggregator is not synchronized itself. Callers share it behind one
//! mutex and never hold that lock across an `.await`.

use crate::stats::HarvestStats;
use crate::store::{FinalStore, PutOutcome};
use dex_common::types::{Ability, EntityKey, EntityRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Bookkeeping for one entry waiting on its sub-resources
#[derive(Debug)]
pub struct PendingAggregate {
    pub key: EntityKey,
    pub expected: usize,
    pub collected: Vec<Ability>,
    pub record: EntityRecord,
}

impl PendingAggregate {
    fn is_complete(&self) -> bool {
        self.collected.len() >= self.expected
    }
}

/// Outcome of [`Aggregator::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Waiting on sub-results
    Registered,
    /// Nothing expected; went straight to the store
    Completed(PutOutcome),
    /// Another aggregate is already pending under the same key
    Rejected,
}

/// Outcome of [`Aggregator::record_sub_result`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Accumulating { collected: usize, expected: usize },
    Finalized(PutOutcome),
    /// Key not pending: never registered or already finalized
    Unknown,
}

#[derive(Debug, Default)]
pub struct Aggregator {
    pending: HashMap<EntityKey, PendingAggregate>,
    store: FinalStore,
    collapse_duplicates: bool,
    stats: HarvestStats,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse sub-results sharing a name at finalize time, keeping the first
    pub fn with_collapse_duplicates(mut self, collapse: bool) -> Self {
        self.collapse_duplicates = collapse;
        self
    }

    /// Store a record that needs no sub-resources
    pub fn complete(&mut self, record: EntityRecord) -> PutOutcome {
        self.stats.finalized_immediately += 1;
        self.put(record)
    }

    /// Start waiting on `expected` sub-results for `record`
    pub fn register(&mut self, record: EntityRecord, expected: usize) -> Registration {
        if expected == 0 {
            return Registration::Completed(self.complete(record));
        }

        let key = record.key();
        if self.pending.contains_key(&key) {
            warn!(key = %key, "Aggregate already pending, dropping record");
            self.stats.rejected_registrations += 1;
            return Registration::Rejected;
        }

        debug!(key = %key, expected, "Registered aggregate");
        self.pending.insert(
            key.clone(),
            PendingAggregate {
                key,
                expected,
                collected: Vec::with_capacity(expected),
                record,
            },
        );
        Registration::Registered
    }

    /// Deliver one sub-result for `key`
    pub fn record_sub_result(&mut self, key: &EntityKey, result: Ability) -> RecordOutcome {
        let Some(aggregate) = self.pending.get_mut(key) else {
            warn!(key = %key, ability = %result.name, "Sub-result for unknown aggregate");
            self.stats.unknown_sub_results += 1;
            return RecordOutcome::Unknown;
        };

        aggregate.collected.push(result);
        if !aggregate.is_complete() {
            return RecordOutcome::Accumulating {
                collected: aggregate.collected.len(),
                expected: aggregate.expected,
            };
        }

        match self.pending.remove(key) {
            Some(aggregate) => {
                self.stats.finalized_aggregates += 1;
                RecordOutcome::Finalized(self.finalize(aggregate))
            },
            None => RecordOutcome::Unknown,
        }
    }

    /// Force-finalize every pending aggregate with what it collected so far
    pub fn flush(&mut self) -> usize {
        let mut aggregates: Vec<PendingAggregate> =
            self.pending.drain().map(|(_, aggregate)| aggregate).collect();
        // deterministic order for the first-writer-wins store
        aggregates.sort_by(|a, b| a.key.cmp(&b.key));

        let flushed = aggregates.len();
        for aggregate in aggregates {
            debug!(
                key = %aggregate.key,
                collected = aggregate.collected.len(),
                expected = aggregate.expected,
                "Flushing incomplete aggregate"
            );
            self.finalize(aggregate);
        }

        self.stats.flushed_aggregates += flushed;
        flushed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, key: &EntityKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn stored_len(&self) -> usize {
        self.store.len()
    }

    pub fn stats(&self) -> &HarvestStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut HarvestStats {
        &mut self.stats
    }

    /// Flush, then hand back the sorted records and the run statistics
    pub fn finish(mut self) -> (Vec<EntityRecord>, HarvestStats) {
        self.flush();
        let mut stats = self.stats;
        stats.stored = self.store.len();
        (self.store.into_sorted(), stats)
    }

    fn finalize(&mut self, aggregate: PendingAggregate) -> PutOutcome {
        let PendingAggregate {
            mut record,
            mut collected,
            ..
        } = aggregate;

        if self.collapse_duplicates {
            let mut names = HashSet::new();
            collected.retain(|ability| names.insert(ability.name.clone()));
        }

        record.abilities = collected;
        self.put(record)
    }

    fn put(&mut self, record: EntityRecord) -> PutOutcome {
        let outcome = self.store.put(record);
        if outcome == PutOutcome::Duplicate {
            self.stats.duplicates_dropped += 1;
        }
        outcome
    }
}
