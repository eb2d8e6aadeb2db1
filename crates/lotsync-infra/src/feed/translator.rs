//! Dealer feed record translation
//!
//! Each feed heading maps to a setter in `FIELDS`. A heading outside the
//! table fails the record.

use std::str::FromStr;
use std::sync::LazyLock;

use csv::StringRecord;
use lotsync_types::{FeedVehicle, Lot, LotType, RecordError, Vehicle, VehicleKey};
use regex::Regex;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.0-9]+").unwrap());

static TRANSMISSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9])-Spe*d (Automatic|Manual)").unwrap());

type Setter = fn(&mut FeedRow, &str) -> Result<(), RecordError>;

/// Values collected from one record before it becomes a vehicle
#[derive(Debug, Default)]
struct FeedRow {
    dealer_id: i64,
    dealer_name: String,
    lot_type: Option<LotType>,
    vin: String,
    stock: String,
    feed: FeedVehicle,
}

impl FeedRow {
    fn into_vehicle(self) -> Vehicle {
        let lot = Lot::new(
            self.dealer_id,
            self.dealer_name,
            self.lot_type.unwrap_or(LotType::Used),
        );
        let mut feed = self.feed;
        feed.key = VehicleKey::new(self.vin, self.stock);
        Vehicle::from_feed(lot, feed)
    }
}

const FIELDS: &[(&str, Setter)] = &[
    ("DealerID", |row, v| {
        row.dealer_id = parse_int("DealerID", v)?;
        Ok(())
    }),
    ("DealerName", |row, v| {
        row.dealer_name = v.to_string();
        Ok(())
    }),
    ("Type", |row, v| {
        row.lot_type = Some(if v == "New" { LotType::New } else { LotType::Used });
        Ok(())
    }),
    ("Stock", |row, v| {
        row.stock = v.to_string();
        Ok(())
    }),
    ("VIN", |row, v| {
        row.vin = v.to_string();
        Ok(())
    }),
    ("Year", |row, v| {
        row.feed.year = parse_int("Year", v)?;
        Ok(())
    }),
    ("Make", |row, v| {
        row.feed.make = v.to_string();
        Ok(())
    }),
    ("Model", |row, v| {
        row.feed.model = v.to_string();
        Ok(())
    }),
    ("Trim", |row, v| {
        row.feed.trim = v.to_string();
        Ok(())
    }),
    ("Body", |row, v| {
        row.feed.body = v.to_string();
        Ok(())
    }),
    ("Doors", |row, v| {
        row.feed.doors = parse_int("Doors", v)?;
        Ok(())
    }),
    ("ExtColor", |row, v| {
        row.feed.exterior_colour = v.to_string();
        Ok(())
    }),
    ("IntColor", |row, v| {
        row.feed.interior_colour = v.to_string();
        Ok(())
    }),
    ("EngCylinders", |row, v| {
        row.feed.cylinders = parse_int("EngCylinders", v)?;
        Ok(())
    }),
    ("EngDisplacement", |row, v| {
        row.feed.displacement = first_numeric("EngDisplacement", v)?;
        Ok(())
    }),
    ("Transmission", |row, v| {
        row.feed.transmission_description = v.to_string();
        if v == "CVT" {
            row.feed.transmission_type = "CVT".to_string();
        } else if let Some((speeds, kind)) = transmission_speeds(v) {
            row.feed.transmission_speeds = speeds;
            row.feed.transmission_type = kind.to_string();
        }
        Ok(())
    }),
    ("Odometer", |row, v| {
        row.feed.odometer = parse_int("Odometer", v)?;
        Ok(())
    }),
    ("Price", |row, v| {
        row.feed.price = first_numeric("Price", v)?;
        Ok(())
    }),
    ("MSRP", |row, v| {
        row.feed.msrp = first_numeric("MSRP", v)?;
        Ok(())
    }),
    // Recognised, no vehicle attribute
    ("Certified", |_, _| Ok(())),
    ("DateInStock", |_, _| Ok(())),
    ("Description", |row, v| {
        row.feed.description = v.to_string();
        Ok(())
    }),
    ("EngType", |row, v| {
        row.feed.configuration = v.to_string();
        Ok(())
    }),
    ("EngFuel", |row, v| {
        row.feed.fuel = v.to_string();
        Ok(())
    }),
    ("Drivetrain", |row, v| {
        row.feed.drivetrain = v.to_string();
        Ok(())
    }),
    ("ExtColorGeneric", |row, v| {
        row.feed.exterior_colour_generic = v.to_string();
        Ok(())
    }),
    ("IntColorGeneric", |row, v| {
        row.feed.interior_colour_generic = v.to_string();
        Ok(())
    }),
    ("PassengerCount", |row, v| {
        row.feed.passengers = parse_int("PassengerCount", v)?;
        Ok(())
    }),
];

/// Translate one feed row, given the feed's heading row
pub fn translate(headings: &StringRecord, values: &StringRecord) -> Result<Vehicle, RecordError> {
    if headings.len() != values.len() {
        return Err(RecordError::ShapeMismatch {
            headings: headings.len(),
            values: values.len(),
        });
    }

    let mut row = FeedRow::default();
    for (column, (heading, value)) in headings.iter().zip(values.iter()).enumerate() {
        let setter = FIELDS
            .iter()
            .find(|(name, _)| *name == heading)
            .map(|(_, setter)| setter)
            .ok_or_else(|| RecordError::UnknownHeading {
                heading: heading.to_string(),
                column,
            })?;
        setter(&mut row, value)?;
    }
    Ok(row.into_vehicle())
}

fn parse_int<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

/// Leftmost run of digits and dots, read as a float ("3.5L" -> 3.5)
fn first_numeric(field: &'static str, value: &str) -> Result<f64, RecordError> {
    let invalid = || RecordError::InvalidValue {
        field,
        value: value.to_string(),
    };

    let found = NUMERIC.find(value).ok_or_else(invalid)?;
    found.as_str().parse().map_err(|_| invalid())
}

/// Speeds and kind from descriptions like "6-Speed Automatic" or "5-Spd Manual"
fn transmission_speeds(value: &str) -> Option<(i32, &'static str)> {
    let caps = TRANSMISSION.captures(value)?;
    let speeds = caps[1].parse().ok()?;
    let kind = match &caps[2] {
        "Automatic" => "Automatic",
        _ => "Manual",
    };
    Some((speeds, kind))
}
