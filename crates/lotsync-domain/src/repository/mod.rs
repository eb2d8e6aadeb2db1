//! Collaborator traits for persistence and feed acquisition

use lotsync_types::{Error, LotType, Vehicle};

/// Persisted inventory rows, reachable by lot
pub trait InventoryRepository {
    /// All rows belonging to the given lot
    fn query(&self, dealer_id: i64, lot_type: LotType) -> Result<Vec<Vehicle>, Error>;

    /// Insert a row and return its assigned id
    fn create(&self, vehicle: &Vehicle) -> Result<u64, Error>;

    /// Overwrite the row with the vehicle's persisted id
    fn update(&self, vehicle: &Vehicle) -> Result<(), Error>;

    /// Remove the row with the vehicle's persisted id
    fn delete(&self, vehicle: &Vehicle) -> Result<(), Error>;
}

/// A specific feed: how to acquire it, stage it into records, and turn a
/// record into a vehicle.
///
/// Records handed to a runner must be grouped by lot. Each contiguous run of
/// same-lot records is committed on its own, so a lot split across two runs
/// is replaced twice and the second replace wins.
pub trait FeedImporter {
    /// One staged row of the feed, in whatever shape `process_record` understands
    type Record;

    /// Fetch the named feed into a working location chosen by the importer
    fn acquire_records(&self, filename: &str) -> Result<(), Error>;

    /// Whether a previous acquisition of the named feed is available
    fn has_acquired(&self, filename: &str) -> bool;

    /// Stage an acquired feed into ordered records
    fn load_records(&self, filename: &str) -> Result<Vec<Self::Record>, Error>;

    /// Translate one record; unrecognised fields fail the record
    fn process_record(&self, record: &Self::Record) -> Result<Vehicle, Error>;
}
