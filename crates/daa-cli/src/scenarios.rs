//! Built-in encounters for demonstrating the alerting core.

use crate::encounter::{AircraftRecord, Encounter, Position};
use clap::ValueEnum;
use daa_core::{units, LocalProjection, Vect3};

/// Irvine, CA
pub const DEFAULT_CENTER_LAT: f64 = 33.6846;
pub const DEFAULT_CENTER_LON: f64 = -117.8265;

const CRUISE_ALTITUDE_FT: f64 = 5000.0;

/// A named encounter.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub encounter: Encounter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioKind {
    HeadOn,
    Crossing,
    Overtake,
}

impl ScenarioKind {
    pub fn build(self, center_lat: f64, center_lon: f64) -> Scenario {
        match self {
            ScenarioKind::HeadOn => create_head_on_scenario(center_lat, center_lon),
            ScenarioKind::Crossing => create_crossing_scenario(center_lat, center_lon),
            ScenarioKind::Overtake => create_overtake_scenario(center_lat, center_lon),
        }
    }
}

/// Aircraft `offset_nmi` from the center along `bearing_deg`.
fn aircraft_at(
    projection: &LocalProjection,
    id: &str,
    offset_nmi: f64,
    bearing_deg: f64,
    altitude_ft: f64,
    track_deg: f64,
    ground_speed_kn: f64,
) -> AircraftRecord {
    let d = units::from("nmi", offset_nmi);
    let b = bearing_deg.to_radians();
    let (lat, lon, _) = projection.inverse(&Vect3::new(d * b.sin(), d * b.cos(), 0.0));
    AircraftRecord {
        id: id.to_string(),
        position: Position::Geodetic { lat, lon },
        altitude_ft,
        track_deg,
        ground_speed_kn,
        vertical_speed_fpm: 0.0,
    }
}

/// Two aircraft converging nose to nose on a north/south line.
///
/// - Ownship: 4 nmi south of center, northbound
/// - Intruder: 4 nmi north of center, southbound
pub fn create_head_on_scenario(center_lat: f64, center_lon: f64) -> Scenario {
    let projection = LocalProjection::new(center_lat, center_lon);
    let ownship = aircraft_at(&projection, "OWN", 4.0, 180.0, CRUISE_ALTITUDE_FT, 0.0, 200.0);
    let intruder = aircraft_at(&projection, "AC1", 4.0, 0.0, CRUISE_ALTITUDE_FT, 180.0, 200.0);

    Scenario {
        name: "head-on".to_string(),
        encounter: Encounter {
            ownship,
            traffic: vec![intruder],
            most_urgent: Some("AC1".to_string()),
        },
    }
}

/// Two aircraft reaching the center together at right angles.
///
/// - Ownship: flying west to east through center
/// - Intruder: flying south to north through center
pub fn create_crossing_scenario(center_lat: f64, center_lon: f64) -> Scenario {
    let projection = LocalProjection::new(center_lat, center_lon);
    let ownship = aircraft_at(&projection, "OWN", 3.0, 270.0, CRUISE_ALTITUDE_FT, 90.0, 150.0);
    let intruder = aircraft_at(&projection, "AC1", 3.0, 180.0, CRUISE_ALTITUDE_FT, 0.0, 150.0);
    // Westbound on a parallel track 6 nmi north
    let bystander = aircraft_at(&projection, "AC2", 12.0, 60.0, CRUISE_ALTITUDE_FT, 270.0, 120.0);

    Scenario {
        name: "crossing".to_string(),
        encounter: Encounter {
            ownship,
            traffic: vec![intruder, bystander],
            most_urgent: Some("AC1".to_string()),
        },
    }
}

/// Ownship catching up with a slower aircraft 200 ft above on the same track.
pub fn create_overtake_scenario(center_lat: f64, center_lon: f64) -> Scenario {
    let projection = LocalProjection::new(center_lat, center_lon);
    let ownship = aircraft_at(&projection, "OWN", 1.0, 180.0, CRUISE_ALTITUDE_FT, 0.0, 250.0);
    let intruder = aircraft_at(
        &projection,
        "AC1",
        0.0,
        0.0,
        CRUISE_ALTITUDE_FT + 200.0,
        0.0,
        150.0,
    );

    Scenario {
        name: "overtake".to_string(),
        encounter: Encounter {
            ownship,
            traffic: vec![intruder],
            most_urgent: Some("AC1".to_string()),
        },
    }
}
