//! Lot and vehicle type definitions

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Actor tag recorded on rows written by the importer
pub const IMPORT_ACTOR: &str = "IMPORT";

/// Stock type of a dealer lot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LotType {
    New,
    Used,
}

impl std::fmt::Display for LotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LotType::New => write!(f, "NEW"),
            LotType::Used => write!(f, "USED"),
        }
    }
}

/// Where a vehicle belongs: a dealer and the type of lot.
///
/// Two lots are the same lot when dealer id and lot type match;
/// the dealer name is descriptive only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    pub dealer_id: i64,
    pub dealer_name: String,
    pub lot_type: LotType,
}

impl Lot {
    pub fn new(dealer_id: i64, dealer_name: impl Into<String>, lot_type: LotType) -> Self {
        Self {
            dealer_id,
            dealer_name: dealer_name.into(),
            lot_type,
        }
    }
}

impl PartialEq for Lot {
    fn eq(&self, other: &Self) -> bool {
        self.dealer_id == other.dealer_id && self.lot_type == other.lot_type
    }
}

impl Eq for Lot {}

impl Hash for Lot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dealer_id.hash(state);
        self.lot_type.hash(state);
    }
}

impl std::fmt::Display for Lot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{}, {})", self.dealer_name, self.dealer_id, self.lot_type)
    }
}

/// Identity of a vehicle: VIN and/or stock code, either possibly absent.
///
/// Empty strings are normalised to `None`, so a present field is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "KeyParts")]
pub struct VehicleKey {
    vin: Option<String>,
    stock: Option<String>,
}

#[derive(Deserialize)]
struct KeyParts {
    #[serde(default)]
    vin: Option<String>,
    #[serde(default)]
    stock: Option<String>,
}

impl From<KeyParts> for VehicleKey {
    fn from(parts: KeyParts) -> Self {
        Self {
            vin: parts.vin.filter(|s| !s.is_empty()),
            stock: parts.stock.filter(|s| !s.is_empty()),
        }
    }
}

impl VehicleKey {
    pub fn new(vin: impl Into<String>, stock: impl Into<String>) -> Self {
        KeyParts {
            vin: Some(vin.into()),
            stock: Some(stock.into()),
        }
        .into()
    }

    pub fn vin(&self) -> Option<&str> {
        self.vin.as_deref()
    }

    pub fn stock(&self) -> Option<&str> {
        self.stock.as_deref()
    }

    pub fn has_vin(&self) -> bool {
        self.vin.is_some()
    }

    pub fn has_stock(&self) -> bool {
        self.stock.is_some()
    }

    /// Both VIN and stock present
    pub fn is_full(&self) -> bool {
        self.has_vin() && self.has_stock()
    }

    /// Exactly one of VIN and stock present
    pub fn is_partial(&self) -> bool {
        self.has_vin() != self.has_stock()
    }

    /// Neither VIN nor stock present
    pub fn is_empty(&self) -> bool {
        !self.has_vin() && !self.has_stock()
    }

    /// Narrowed `{vin, -}` form, if a VIN is present
    pub fn vin_alias(&self) -> Option<VehicleKey> {
        self.vin.as_ref().map(|vin| VehicleKey {
            vin: Some(vin.clone()),
            stock: None,
        })
    }

    /// Narrowed `{-, stock}` form, if a stock code is present
    pub fn stock_alias(&self) -> Option<VehicleKey> {
        self.stock.as_ref().map(|stock| VehicleKey {
            vin: None,
            stock: Some(stock.clone()),
        })
    }
}

impl std::fmt::Display for VehicleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "vin={} stock={}",
            self.vin().unwrap_or("-"),
            self.stock().unwrap_or("-")
        )
    }
}

/// Where a vehicle stands relative to the persisted store during one pass.
/// Never stored; recomputed every reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleState {
    /// Not matched to any persisted row
    #[default]
    Unknown,
    /// Loaded from the store and not (yet) referenced by the feed
    Persisted,
    /// Matched a persisted row whose feed attributes differ
    Altered,
    /// Matched a persisted row with identical feed attributes
    Unaltered,
}

impl std::fmt::Display for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VehicleState::Unknown => "unknown",
            VehicleState::Persisted => "persisted",
            VehicleState::Altered => "altered",
            VehicleState::Unaltered => "unaltered",
        };
        write!(f, "{}", label)
    }
}

/// The part of a vehicle record the feed is authoritative for.
///
/// Equality over this block decides whether a matched vehicle changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedVehicle {
    pub key: VehicleKey,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub trim: String,
    pub body: String,
    pub doors: i32,
    pub interior_colour: String,
    pub exterior_colour: String,
    pub interior_colour_generic: String,
    pub exterior_colour_generic: String,
    pub configuration: String,
    pub cylinders: i32,
    pub displacement: f64,
    pub fuel: String,
    pub transmission_type: String,
    pub transmission_speeds: i32,
    pub transmission_description: String,
    pub drivetrain: String,
    pub odometer: i64,
    pub price: f64,
    pub msrp: f64,
    pub description: String,
    pub passengers: i32,
}

/// A vehicle as seen both on a feed and in the persisted store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Persisted row id (`None` until created)
    #[serde(default)]
    pub id: Option<u64>,

    pub created: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,

    /// Actor tag of the last writer
    #[serde(default)]
    pub last_modified_by: String,

    pub lot: Lot,

    pub feed: FeedVehicle,

    #[serde(skip)]
    pub state: VehicleState,
}

impl Vehicle {
    /// Build an unpersisted vehicle from translated feed attributes
    pub fn from_feed(lot: Lot, feed: FeedVehicle) -> Self {
        Self {
            id: None,
            created: DateTime::<Utc>::default(),
            last_modified: DateTime::<Utc>::default(),
            last_modified_by: String::new(),
            lot,
            feed,
            state: VehicleState::Unknown,
        }
    }

    pub fn key(&self) -> &VehicleKey {
        &self.feed.key
    }
}

impl std::fmt::Display for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{} [{}]", id, self.feed.key),
            None => write!(f, "[{}]", self.feed.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalises_empty_fields() {
        let key = VehicleKey::new("", "S7");
        assert_eq!(key.vin(), None);
        assert_eq!(key.stock(), Some("S7"));
        assert!(key.is_partial());
        assert!(!key.is_full());
    }

    #[test]
    fn test_key_fullness() {
        assert!(VehicleKey::new("V1", "S1").is_full());
        assert!(VehicleKey::new("V1", "").is_partial());
        assert!(VehicleKey::new("", "").is_empty());
        assert!(!VehicleKey::new("", "").is_partial());
    }

    #[test]
    fn test_key_aliases() {
        let key = VehicleKey::new("V1", "S1");
        assert_eq!(key.vin_alias(), Some(VehicleKey::new("V1", "")));
        assert_eq!(key.stock_alias(), Some(VehicleKey::new("", "S1")));
        assert_eq!(VehicleKey::new("V1", "").stock_alias(), None);
    }

    #[test]
    fn test_key_deserialize_normalises() {
        let key: VehicleKey = serde_json::from_str(r#"{"vin": "", "stock": "S5"}"#).unwrap();
        assert_eq!(key, VehicleKey::new("", "S5"));
    }

    #[test]
    fn test_lot_equality_ignores_name() {
        let a = Lot::new(1, "Acme", LotType::New);
        let b = Lot::new(1, "Acme Motors", LotType::New);
        let c = Lot::new(1, "Acme", LotType::Used);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_feed_vehicle_equality() {
        let mut a = FeedVehicle {
            key: VehicleKey::new("V1", ""),
            year: 2020,
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(a, b);
        a.price = 19_999.0;
        assert_ne!(a, b);
    }

    #[test]
    fn test_vehicle_state_not_serialized() {
        let mut vehicle = Vehicle::from_feed(Lot::new(1, "Acme", LotType::New), FeedVehicle::default());
        vehicle.state = VehicleState::Altered;
        let json = serde_json::to_string(&vehicle).unwrap();
        let back: Vehicle = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state, VehicleState::Unknown);
    }
}
