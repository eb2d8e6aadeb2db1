//! Decide how a feed vehicle relates to what is already known for its identity

use chrono::{DateTime, Utc};
use lotsync_types::{Vehicle, VehicleState};

/// Classify `incoming` against the vehicle its key matched, if any, and
/// return the vehicle to carry forward into the lot's set.
///
/// * no match: the incoming vehicle, state Unknown, created and modified now
/// * match with different feed attributes: the matched vehicle with the
///   incoming feed attributes, state Altered, modified now
/// * match with identical feed attributes: the matched vehicle, state
///   Unaltered, metadata untouched
///
/// A match that is itself not from the store (a repeated identity within one
/// feed) keeps the state it already earned: a new vehicle stays Unknown and
/// an altered one stays Altered.
pub fn classify(
    incoming: Vehicle,
    matched: Option<Vehicle>,
    now: DateTime<Utc>,
    actor: &str,
) -> Vehicle {
    let Some(mut current) = matched else {
        let mut vehicle = incoming;
        vehicle.created = now;
        vehicle.last_modified = now;
        vehicle.last_modified_by = actor.to_string();
        vehicle.state = VehicleState::Unknown;
        return vehicle;
    };

    if current.feed != incoming.feed {
        current.feed = incoming.feed;
        current.last_modified = now;
        current.last_modified_by = actor.to_string();
        current.state = match current.state {
            VehicleState::Unknown => VehicleState::Unknown,
            _ => VehicleState::Altered,
        };
    } else if current.state == VehicleState::Persisted {
        current.state = VehicleState::Unaltered;
    }
    current
}
