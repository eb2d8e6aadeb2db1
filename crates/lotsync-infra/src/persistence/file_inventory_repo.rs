//! File-based implementation of InventoryRepository

use std::cell::RefCell;
use std::path::PathBuf;

use lotsync_domain::repository::InventoryRepository;
use lotsync_store::InventoryStore;
use lotsync_types::{Error, Lot, LotType, Result, Vehicle};

/// Inventory repository over the JSON inventory store
pub struct FileInventoryRepository {
    store: RefCell<InventoryStore>,
}

impl FileInventoryRepository {
    /// Create or load the repository in a store directory
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        let store = InventoryStore::open(store_dir)?;
        Ok(Self {
            store: RefCell::new(store),
        })
    }

    /// Distinct lots that have persisted rows
    pub fn lots(&self) -> Vec<Lot> {
        self.store.borrow().lots()
    }

    /// Get total row count
    pub fn count(&self) -> usize {
        self.store.borrow().count()
    }

    fn persisted_id(vehicle: &Vehicle) -> Result<u64> {
        vehicle
            .id
            .ok_or_else(|| Error::NotFound(format!("{} has no persisted id", vehicle)))
    }
}

impl InventoryRepository for FileInventoryRepository {
    fn query(&self, dealer_id: i64, lot_type: LotType) -> std::result::Result<Vec<Vehicle>, Error> {
        Ok(self
            .store
            .borrow()
            .query(dealer_id, lot_type)
            .into_iter()
            .cloned()
            .collect())
    }

    fn create(&self, vehicle: &Vehicle) -> std::result::Result<u64, Error> {
        self.store.borrow_mut().insert(vehicle.clone())
    }

    fn update(&self, vehicle: &Vehicle) -> std::result::Result<(), Error> {
        Self::persisted_id(vehicle)?;
        if self.store.borrow_mut().update(vehicle)? {
            Ok(())
        } else {
            Err(Error::NotFound(vehicle.to_string()))
        }
    }

    fn delete(&self, vehicle: &Vehicle) -> std::result::Result<(), Error> {
        let id = Self::persisted_id(vehicle)?;
        if self.store.borrow_mut().remove(id)? {
            Ok(())
        } else {
            Err(Error::NotFound(vehicle.to_string()))
        }
    }
}
