//! Inventory table persisted as a JSON file

use lotsync_types::{Lot, LotType, Result, Vehicle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// On-disk layout of `inventory.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct InventoryTable {
    /// Last id handed out; ids are never reused
    next_id: u64,
    vehicles: BTreeMap<u64, Vehicle>,
}

/// Persistent store for inventory rows
pub struct InventoryStore {
    store_path: PathBuf,
    table: InventoryTable,
}

impl InventoryStore {
    /// Create or load an inventory store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("inventory.json");

        // Unreadable table is an error, never an empty inventory
        let table = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            InventoryTable::default()
        };

        Ok(Self { store_path, table })
    }

    /// Save store to disk. The table goes to a sibling temp file first and
    /// is renamed over `inventory.json`, so a failed write leaves the
    /// previous table intact.
    fn save(&self) -> Result<()> {
        let tmp_path = self.tmp_path();
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, &self.table)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&tmp_path, &self.store_path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        self.store_path.with_extension("json.tmp")
    }

    /// Insert a new row, assigning it the next id
    pub fn insert(&mut self, mut vehicle: Vehicle) -> Result<u64> {
        self.table.next_id += 1;
        let id = self.table.next_id;
        vehicle.id = Some(id);
        self.table.vehicles.insert(id, vehicle);
        self.save()?;
        Ok(id)
    }

    /// Replace the row with the same id. Returns false if there is no such row.
    pub fn update(&mut self, vehicle: &Vehicle) -> Result<bool> {
        let Some(id) = vehicle.id else {
            return Ok(false);
        };
        match self.table.vehicles.get_mut(&id) {
            Some(row) => {
                *row = vehicle.clone();
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a row by id
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let removed = self.table.vehicles.remove(&id).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Get a row by id
    pub fn get(&self, id: u64) -> Option<&Vehicle> {
        self.table.vehicles.get(&id)
    }

    /// Rows belonging to one lot, in id order
    pub fn query(&self, dealer_id: i64, lot_type: LotType) -> Vec<&Vehicle> {
        self.table
            .vehicles
            .values()
            .filter(|v| v.lot.dealer_id == dealer_id && v.lot.lot_type == lot_type)
            .collect()
    }

    /// Distinct lots present in the store, ordered by dealer id then lot type
    pub fn lots(&self) -> Vec<Lot> {
        let mut lots: Vec<Lot> = Vec::new();
        for vehicle in self.table.vehicles.values() {
            if !lots.contains(&vehicle.lot) {
                lots.push(vehicle.lot.clone());
            }
        }
        lots.sort_by(|a, b| (a.dealer_id, a.lot_type).cmp(&(b.dealer_id, b.lot_type)));
        lots
    }

    /// Get total row count
    pub fn count(&self) -> usize {
        self.table.vehicles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotsync_types::{FeedVehicle, VehicleKey};
    use tempfile::tempdir;

    fn vehicle(dealer_id: i64, lot_type: LotType, vin: &str) -> Vehicle {
        Vehicle::from_feed(
            Lot::new(dealer_id, "Acme", lot_type),
            FeedVehicle {
                key: VehicleKey::new(vin, ""),
                year: 2020,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let mut store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();

        let a = store.insert(vehicle(1, LotType::New, "V1")).unwrap();
        let b = store.insert(vehicle(1, LotType::New, "V2")).unwrap();
        assert_eq!((a, b), (1, 2));

        store.remove(b).unwrap();
        let c = store.insert(vehicle(1, LotType::New, "V3")).unwrap();
        assert_eq!(c, 3);
    }

    #[test]
    fn test_query_filters_by_lot() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let mut store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();
        store.insert(vehicle(1, LotType::New, "V1")).unwrap();
        store.insert(vehicle(1, LotType::Used, "V2")).unwrap();
        store.insert(vehicle(2, LotType::New, "V3")).unwrap();

        let rows = store.query(1, LotType::New);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key().vin(), Some("V1"));
        assert_eq!(store.lots().len(), 3);
    }

    #[test]
    fn test_update_missing_row() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let mut store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();

        let mut ghost = vehicle(1, LotType::New, "V1");
        assert!(!store.update(&ghost).unwrap());
        ghost.id = Some(42);
        assert!(!store.update(&ghost).unwrap());
    }

    #[test]
    fn test_reopen_preserves_rows_and_sequence() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        {
            let mut store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();
            let id = store.insert(vehicle(1, LotType::New, "V1")).unwrap();
            let mut row = store.get(id).cloned().unwrap();
            row.feed.year = 2021;
            assert!(store.update(&row).unwrap());
        }

        let mut store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(1).unwrap().feed.year, 2021);
        assert_eq!(store.insert(vehicle(1, LotType::New, "V2")).unwrap(), 2);
    }

    #[test]
    fn test_failed_save_keeps_previous_table() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let mut store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();
        store.insert(vehicle(1, LotType::New, "V1")).unwrap();
        assert!(!temp_dir.path().join("inventory.json.tmp").exists());

        // a directory in the temp file's place makes the next write fail
        std::fs::create_dir(temp_dir.path().join("inventory.json.tmp")).unwrap();
        assert!(store.insert(vehicle(1, LotType::New, "V2")).is_err());

        let store = InventoryStore::open(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(1).unwrap().key().vin(), Some("V1"));
    }

    #[test]
    fn test_corrupt_table_is_an_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("inventory.json"), "{not json").unwrap();
        assert!(InventoryStore::open(temp_dir.path().to_path_buf()).is_err());
    }
}
