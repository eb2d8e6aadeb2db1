//! Outcome counters for commits and runs

use lotsync_types::Lot;
use serde::Serialize;

/// What one full-replace commit did to a lot
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    pub lot: Lot,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unaltered: usize,
}

impl CommitSummary {
    pub fn new(lot: Lot) -> Self {
        Self {
            lot,
            created: 0,
            updated: 0,
            deleted: 0,
            unaltered: 0,
        }
    }

    /// Number of store writes issued
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// What a FullReplaceRunner run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// The feed was fetched during this run
    pub acquired: bool,
    /// Records were reconciled (false for acquire-only runs)
    pub processed: bool,
    /// Number of feed records read
    pub records: usize,
    /// One entry per contiguous run of same-lot records, in feed order
    pub commits: Vec<CommitSummary>,
}

impl RunSummary {
    pub fn created(&self) -> usize {
        self.commits.iter().map(|c| c.created).sum()
    }

    pub fn updated(&self) -> usize {
        self.commits.iter().map(|c| c.updated).sum()
    }

    pub fn deleted(&self) -> usize {
        self.commits.iter().map(|c| c.deleted).sum()
    }

    pub fn unaltered(&self) -> usize {
        self.commits.iter().map(|c| c.unaltered).sum()
    }
}
