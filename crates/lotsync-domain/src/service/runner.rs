//! Full-replace import over an ordered feed

use chrono::{DateTime, Utc};
use lotsync_types::{Error, Result, Vehicle};
use tracing::{debug, info};

use crate::model::{RunConfig, RunSummary};
use crate::repository::{FeedImporter, InventoryRepository};
use crate::service::{classify, full_replace, InventorySet};

/// Applies full-replace semantics per lot, given a feed importer and a store.
///
/// Records are processed in a single pass. When a record's lot differs from
/// the lot being built, the current set is committed and a fresh set is
/// seeded from the store for the new lot. The last set is committed at the
/// end of input. A record that fails translation aborts the run before its
/// lot is committed; lots committed earlier in the run stand.
pub struct FullReplaceRunner {
    config: RunConfig,
    clock: fn() -> DateTime<Utc>,
}

impl FullReplaceRunner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            clock: Utc::now,
        }
    }

    /// Replace the time source used to stamp created/modified metadata
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn run<I, R>(&self, importer: &I, repo: &R) -> Result<RunSummary>
    where
        I: FeedImporter + ?Sized,
        R: InventoryRepository + ?Sized,
    {
        let filename = self.config.filename.as_str();
        let mut summary = RunSummary::default();

        if !importer.has_acquired(filename) {
            info!(filename, "acquiring feed");
            importer.acquire_records(filename)?;
            summary.acquired = true;
        }

        if !self.config.do_processing {
            info!(filename, "processing disabled, stopping after acquisition");
            return Ok(summary);
        }
        summary.processed = true;

        let records = importer.load_records(filename)?;
        summary.records = records.len();
        info!(filename, records = records.len(), "feed loaded");

        let mut current: Option<InventorySet> = None;
        for (index, record) in records.iter().enumerate() {
            let vehicle = importer
                .process_record(record)
                .map_err(|e| Error::translation(index, e))?;

            let set = match current.take() {
                Some(set) if *set.lot() == vehicle.lot => set,
                previous => {
                    if let Some(set) = previous {
                        summary.commits.push(full_replace(&set, repo)?);
                    }
                    info!(lot = %vehicle.lot, "seeding lot");
                    InventorySet::seed(vehicle.lot.clone(), repo)?
                }
            };

            let set = current.insert(set);
            self.reconcile(set, vehicle);
        }

        if let Some(set) = current {
            summary.commits.push(full_replace(&set, repo)?);
        }

        info!(
            records = summary.records,
            commits = summary.commits.len(),
            created = summary.created(),
            updated = summary.updated(),
            deleted = summary.deleted(),
            "import finished"
        );
        Ok(summary)
    }

    /// Classify one feed vehicle against the set and put the result back
    fn reconcile(&self, set: &mut InventorySet, incoming: Vehicle) {
        let (slot, matched) = match set.lookup_entry(incoming.key()) {
            Some((slot, vehicle)) => (Some(slot), Some(vehicle.clone())),
            None => (None, None),
        };
        let previous_key = matched.as_ref().map(|v| v.key().clone());

        let vehicle = classify(incoming, matched, (self.clock)(), &self.config.actor);
        debug!(vehicle = %vehicle, state = %vehicle.state, "classified");

        // A matched vehicle whose identity changed must not stay reachable
        // under its old key, or it would also be inferred deleted. Entries
        // that another vehicle took over stay with that vehicle.
        if let (Some(slot), Some(previous_key)) = (slot, previous_key) {
            if previous_key != *vehicle.key() {
                set.remove_entries_of(slot);
            }
        }
        set.insert(vehicle);
    }
}
