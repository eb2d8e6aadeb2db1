//! Flush a reconciled lot to the persisted store

use lotsync_types::{Error, Operation, Result, Vehicle, VehicleState};
use tracing::{debug, info, warn};

use crate::model::CommitSummary;
use crate::repository::InventoryRepository;
use crate::service::InventorySet;

/// Make the store mirror the set, according to each vehicle's state.
///
/// Unknown vehicles are created, vehicles still Persisted (no feed record
/// referenced them) are deleted, Altered vehicles are updated. Unaltered
/// vehicles need no write. The first failing write aborts the commit.
pub fn full_replace<R>(set: &InventorySet, repo: &R) -> Result<CommitSummary>
where
    R: InventoryRepository + ?Sized,
{
    let mut summary = CommitSummary::new(set.lot().clone());

    let mut unknowns: Vec<&Vehicle> = Vec::new();
    let mut persisteds: Vec<&Vehicle> = Vec::new();
    let mut altereds: Vec<&Vehicle> = Vec::new();

    for vehicle in set.all_vehicles() {
        match vehicle.state {
            VehicleState::Unknown => unknowns.push(vehicle),
            VehicleState::Persisted => persisteds.push(vehicle),
            VehicleState::Altered => altereds.push(vehicle),
            VehicleState::Unaltered => summary.unaltered += 1,
        }
    }

    for vehicle in unknowns {
        let id = repo
            .create(vehicle)
            .map_err(|e| Error::persistence(Operation::Create, vehicle, e))?;
        debug!(id, key = %vehicle.key(), "created");
        summary.created += 1;
    }

    for vehicle in persisteds {
        if vehicle.key().is_empty() {
            warn!(vehicle = %vehicle, "deleting row with no VIN or stock code");
        }
        repo.delete(vehicle)
            .map_err(|e| Error::persistence(Operation::Delete, vehicle, e))?;
        debug!(vehicle = %vehicle, "deleted");
        summary.deleted += 1;
    }

    for vehicle in altereds {
        repo.update(vehicle)
            .map_err(|e| Error::persistence(Operation::Update, vehicle, e))?;
        debug!(vehicle = %vehicle, "updated");
        summary.updated += 1;
    }

    info!(
        lot = %summary.lot,
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        unaltered = summary.unaltered,
        "lot committed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotsync_types::{FeedVehicle, Lot, LotType, VehicleKey};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRepository {
        calls: RefCell<Vec<(Operation, VehicleKey)>>,
        fail_on: Option<Operation>,
    }

    impl RecordingRepository {
        fn record(&self, op: Operation, vehicle: &Vehicle) -> Result<()> {
            if self.fail_on == Some(op) {
                return Err(Error::NotFound(vehicle.to_string()));
            }
            self.calls.borrow_mut().push((op, vehicle.key().clone()));
            Ok(())
        }

        fn count(&self, op: Operation) -> usize {
            self.calls.borrow().iter().filter(|(o, _)| *o == op).count()
        }
    }

    impl InventoryRepository for RecordingRepository {
        fn query(&self, _dealer_id: i64, _lot_type: LotType) -> Result<Vec<Vehicle>> {
            Ok(Vec::new())
        }

        fn create(&self, vehicle: &Vehicle) -> Result<u64> {
            self.record(Operation::Create, vehicle)?;
            Ok(1)
        }

        fn update(&self, vehicle: &Vehicle) -> Result<()> {
            self.record(Operation::Update, vehicle)
        }

        fn delete(&self, vehicle: &Vehicle) -> Result<()> {
            self.record(Operation::Delete, vehicle)
        }
    }

    fn lot() -> Lot {
        Lot::new(1, "Acme", LotType::New)
    }

    fn vehicle(vin: &str, stock: &str, state: VehicleState) -> Vehicle {
        let mut vehicle = Vehicle::from_feed(
            lot(),
            FeedVehicle {
                key: VehicleKey::new(vin, stock),
                ..Default::default()
            },
        );
        vehicle.id = Some(1);
        vehicle.state = state;
        vehicle
    }

    #[test]
    fn test_partitions_by_state() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "", VehicleState::Unknown));
        set.insert(vehicle("V2", "S2", VehicleState::Persisted));
        set.insert(vehicle("", "S3", VehicleState::Altered));
        set.insert(vehicle("V4", "S4", VehicleState::Unaltered));

        let repo = RecordingRepository::default();
        let summary = full_replace(&set, &repo).unwrap();

        assert_eq!(repo.count(Operation::Create), 1);
        assert_eq!(repo.count(Operation::Delete), 1);
        assert_eq!(repo.count(Operation::Update), 1);
        assert_eq!(
            (summary.created, summary.deleted, summary.updated, summary.unaltered),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn test_all_unaltered_issues_no_writes() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", VehicleState::Unaltered));
        set.insert(vehicle("V2", "", VehicleState::Unaltered));

        let repo = RecordingRepository::default();
        let summary = full_replace(&set, &repo).unwrap();

        assert!(repo.calls.borrow().is_empty());
        assert_eq!(summary.writes(), 0);
        assert_eq!(summary.unaltered, 2);
    }

    #[test]
    fn test_write_failure_aborts_commit() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "", VehicleState::Persisted));
        set.insert(vehicle("V2", "", VehicleState::Altered));

        let repo = RecordingRepository {
            fail_on: Some(Operation::Delete),
            ..Default::default()
        };
        let err = full_replace(&set, &repo).unwrap_err();

        assert!(matches!(
            err,
            Error::Persistence {
                operation: Operation::Delete,
                ..
            }
        ));
        assert_eq!(repo.count(Operation::Update), 0);
    }
}
