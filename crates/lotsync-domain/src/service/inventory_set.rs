//! In-memory index of one lot's vehicles, tolerant of partial identity keys
//!
//! Every vehicle is stored once in a slot list. The key map points its
//! effective key, plus the `{vin, -}` and `{-, stock}` aliases of that key,
//! at the slot, so a lookup by either half of an identity finds a vehicle
//! that was inserted under the full one and the other way round.
//!
//! Re-inserting under an existing key repoints the entries to the new slot;
//! a slot no key points at is no longer part of the set.

use std::collections::BTreeMap;

use lotsync_types::{Error, Lot, Operation, Result, Vehicle, VehicleKey, VehicleState};
use tracing::warn;

use crate::repository::InventoryRepository;

/// Position of a vehicle in the slot list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot(usize);

/// Vehicles of a single lot keyed by full and partial identity
#[derive(Debug)]
pub struct InventorySet {
    lot: Lot,
    slots: Vec<Vehicle>,
    keys: BTreeMap<VehicleKey, Slot>,
    /// Vehicles with neither VIN nor stock; never found by lookup
    anonymous: Vec<Slot>,
    /// Persisted rows that lost their last key to a different row
    displaced: Vec<Slot>,
}

impl InventorySet {
    /// Empty set for a lot
    pub fn new(lot: Lot) -> Self {
        Self {
            lot,
            slots: Vec::new(),
            keys: BTreeMap::new(),
            anonymous: Vec::new(),
            displaced: Vec::new(),
        }
    }

    /// Set holding the lot's persisted snapshot, every vehicle marked Persisted
    pub fn seed<R>(lot: Lot, repo: &R) -> Result<Self>
    where
        R: InventoryRepository + ?Sized,
    {
        let vehicles = repo
            .query(lot.dealer_id, lot.lot_type)
            .map_err(|e| Error::persistence(Operation::Query, &lot, e))?;
        Ok(Self::from_persisted(lot, vehicles))
    }

    /// Set built from an already loaded snapshot
    pub fn from_persisted(lot: Lot, vehicles: impl IntoIterator<Item = Vehicle>) -> Self {
        let mut set = Self::new(lot);
        for mut vehicle in vehicles {
            vehicle.state = VehicleState::Persisted;
            set.insert(vehicle);
        }
        set
    }

    pub fn lot(&self) -> &Lot {
        &self.lot
    }

    /// Store a vehicle under its effective key and that key's aliases
    pub fn insert(&mut self, vehicle: Vehicle) {
        let slot = Slot(self.slots.len());
        if vehicle.key().is_empty() {
            self.slots.push(vehicle);
            self.anonymous.push(slot);
            return;
        }

        let key = self.resolve_key(vehicle.key());
        self.slots.push(vehicle);

        let mut overwritten = Vec::new();
        for entry in [key.vin_alias(), key.stock_alias(), Some(key)].into_iter().flatten() {
            if let Some(previous) = self.keys.insert(entry, slot) {
                if previous != slot && !overwritten.contains(&previous) {
                    overwritten.push(previous);
                }
            }
        }
        for previous in overwritten {
            self.check_displaced(previous, slot);
        }
    }

    /// Record a persisted row that is no longer reachable because a
    /// different row took over its keys
    fn check_displaced(&mut self, previous: Slot, by: Slot) {
        if self.keys.values().any(|s| *s == previous) {
            return;
        }
        let old = &self.slots[previous.0];
        let new = &self.slots[by.0];
        // Same row reinserted after classification
        if old.id.is_some() && old.id == new.id {
            return;
        }
        if old.state == VehicleState::Persisted {
            warn!(
                lot = %self.lot,
                displaced = %old,
                by = %new,
                "persisted row lost its keys to another row and will be left untouched"
            );
            self.displaced.push(previous);
        }
    }

    /// Persisted rows shadowed by another row with an overlapping key
    pub fn displaced(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.displaced.iter().map(move |slot| &self.slots[slot.0])
    }

    /// Key a vehicle would be stored under.
    ///
    /// A partial key that already finds a vehicle yields that vehicle's key,
    /// so an alias never displaces a better known identity.
    pub fn resolve_key(&self, key: &VehicleKey) -> VehicleKey {
        if key.is_partial() {
            if let Some(vehicle) = self.lookup(key) {
                return vehicle.key().clone();
            }
        }
        key.clone()
    }

    /// Exact key first, then its VIN-only form, then its stock-only form
    pub fn lookup(&self, key: &VehicleKey) -> Option<&Vehicle> {
        self.lookup_entry(key).map(|(_, vehicle)| vehicle)
    }

    /// Like `lookup`, also returning the slot the match lives in
    pub fn lookup_entry(&self, key: &VehicleKey) -> Option<(Slot, &Vehicle)> {
        self.lookup_slot(key).map(|slot| (slot, &self.slots[slot.0]))
    }

    fn lookup_slot(&self, key: &VehicleKey) -> Option<Slot> {
        if key.is_empty() {
            return None;
        }
        self.keys
            .get(key)
            .or_else(|| key.vin_alias().and_then(|alias| self.keys.get(&alias)))
            .or_else(|| key.stock_alias().and_then(|alias| self.keys.get(&alias)))
            .copied()
    }

    /// Drop the entries `insert` would create for this vehicle
    pub fn remove(&mut self, vehicle: &Vehicle) -> bool {
        self.remove_key(vehicle.key())
    }

    /// Drop the entry under the resolved key and both of its aliases.
    /// Anonymous vehicles are not keyed and are left in place.
    pub fn remove_key(&mut self, key: &VehicleKey) -> bool {
        if key.is_empty() {
            return false;
        }
        let key = self.resolve_key(key);
        let mut removed = false;
        for alias in [key.vin_alias(), key.stock_alias()].into_iter().flatten() {
            removed |= self.keys.remove(&alias).is_some();
        }
        removed |= self.keys.remove(&key).is_some();
        removed
    }

    /// Drop every key entry that points at `slot`, leaving entries that
    /// other vehicles took over in place
    pub fn remove_entries_of(&mut self, slot: Slot) -> bool {
        let before = self.keys.len();
        self.keys.retain(|_, s| *s != slot);
        self.keys.len() != before
    }

    /// Each vehicle of the set exactly once.
    ///
    /// A keyed entry counts only when it is stored under the vehicle's own
    /// key; alias entries are skipped.
    pub fn all_vehicles(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        let keyed = self.keys.iter().filter_map(move |(key, slot)| {
            let vehicle = &self.slots[slot.0];
            (vehicle.key() == key).then_some(vehicle)
        });
        keyed.chain(self.anonymous.iter().map(move |slot| &self.slots[slot.0]))
    }

    pub fn len(&self) -> usize {
        self.all_vehicles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotsync_types::{FeedVehicle, LotType};

    fn lot() -> Lot {
        Lot::new(1, "Acme", LotType::New)
    }

    fn vehicle(vin: &str, stock: &str, year: i32) -> Vehicle {
        Vehicle::from_feed(
            lot(),
            FeedVehicle {
                key: VehicleKey::new(vin, stock),
                year,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_vin_alias_finds_full_key() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", 2020));

        let found = set.lookup(&VehicleKey::new("V1", "")).unwrap();
        assert_eq!(found.key(), &VehicleKey::new("V1", "S1"));
        let found = set.lookup(&VehicleKey::new("", "S1")).unwrap();
        assert_eq!(found.key(), &VehicleKey::new("V1", "S1"));
    }

    #[test]
    fn test_full_key_finds_partial_entry() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "", 2020));
        set.insert(vehicle("", "S2", 2021));

        assert_eq!(set.lookup(&VehicleKey::new("V1", "S9")).unwrap().feed.year, 2020);
        assert_eq!(set.lookup(&VehicleKey::new("V8", "S2")).unwrap().feed.year, 2021);
        assert!(set.lookup(&VehicleKey::new("V8", "S8")).is_none());
    }

    #[test]
    fn test_lookup_prefers_exact_then_vin() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "", 2001));
        set.insert(vehicle("", "S1", 2002));
        set.insert(vehicle("V2", "S2", 2003));

        // {V1,S1}: no exact entry, VIN form wins over stock form
        assert_eq!(set.lookup(&VehicleKey::new("V1", "S1")).unwrap().feed.year, 2001);
        assert_eq!(set.lookup(&VehicleKey::new("V2", "S2")).unwrap().feed.year, 2003);
    }

    #[test]
    fn test_partial_insert_resolves_to_known_full_key() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", 2020));
        assert_eq!(set.resolve_key(&VehicleKey::new("", "S1")), VehicleKey::new("V1", "S1"));

        // stored under {V1,S1} and its aliases; own key {-,S1} is canonical
        set.insert(vehicle("", "S1", 2021));
        let all: Vec<_> = set.all_vehicles().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].feed.year, 2021);
        assert_eq!(set.lookup(&VehicleKey::new("V1", "")).unwrap().feed.year, 2021);
    }

    #[test]
    fn test_insert_then_remove() {
        let mut set = InventorySet::new(lot());
        let v = vehicle("V1", "S1", 2020);
        set.insert(v.clone());
        assert!(set.remove(&v));

        assert!(set.lookup(&VehicleKey::new("V1", "S1")).is_none());
        assert!(set.lookup(&VehicleKey::new("V1", "")).is_none());
        assert!(set.lookup(&VehicleKey::new("", "S1")).is_none());
        assert!(set.is_empty());
        assert!(!set.remove(&v));
    }

    #[test]
    fn test_remove_partial_key_clears_resolved_entries() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", 2020));
        assert!(set.remove_key(&VehicleKey::new("V1", "")));
        assert!(set.lookup(&VehicleKey::new("", "S1")).is_none());
    }

    #[test]
    fn test_all_vehicles_skips_aliases() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", 2020));
        set.insert(vehicle("V2", "", 2020));
        set.insert(vehicle("", "S3", 2020));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_reinsert_replaces_previous_copy() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", 2020));
        set.insert(vehicle("V1", "S1", 2022));

        let all: Vec<_> = set.all_vehicles().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].feed.year, 2022);
    }

    #[test]
    fn test_anonymous_vehicles_never_match() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("", "", 2019));
        set.insert(vehicle("", "", 2020));

        assert!(set.lookup(&VehicleKey::default()).is_none());
        assert_eq!(set.resolve_key(&VehicleKey::default()), VehicleKey::default());
        assert_eq!(set.len(), 2);
        assert!(!set.remove(&vehicle("", "", 2019)));
    }

    #[test]
    fn test_remove_entries_of_keeps_shared_alias_of_other_vehicle() {
        let mut set = InventorySet::new(lot());
        set.insert(vehicle("V1", "S1", 2001));
        set.insert(vehicle("V2", "S1", 2002));

        let (slot, found) = set.lookup_entry(&VehicleKey::new("V1", "S3")).unwrap();
        assert_eq!(found.feed.year, 2001);
        assert!(set.remove_entries_of(slot));

        assert!(set.lookup(&VehicleKey::new("V1", "")).is_none());
        assert_eq!(set.lookup(&VehicleKey::new("", "S1")).unwrap().feed.year, 2002);
        assert!(!set.remove_entries_of(slot));
    }

    #[test]
    fn test_persisted_row_shadowed_by_partial_key_is_displaced() {
        let mut first = vehicle("V1", "S1", 2001);
        first.id = Some(1);
        let mut second = vehicle("", "S1", 2002);
        second.id = Some(2);
        let set = InventorySet::from_persisted(lot(), vec![first, second]);

        let displaced: Vec<_> = set.displaced().collect();
        assert_eq!(displaced.len(), 1);
        assert_eq!(displaced[0].id, Some(1));
    }

    #[test]
    fn test_reinserting_same_row_is_not_displacement() {
        let mut row = vehicle("V1", "S1", 2001);
        row.id = Some(1);
        let mut set = InventorySet::from_persisted(lot(), vec![row.clone()]);
        row.state = VehicleState::Unaltered;
        set.insert(row);

        assert_eq!(set.displaced().count(), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_persisted_marks_state() {
        let set = InventorySet::from_persisted(lot(), vec![vehicle("V1", "", 2020), vehicle("", "", 2020)]);
        assert!(set.all_vehicles().all(|v| v.state == VehicleState::Persisted));
        assert_eq!(set.len(), 2);
    }
}
