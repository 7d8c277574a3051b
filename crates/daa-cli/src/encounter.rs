//! Encounter files: ownship and traffic as pilots describe them.
//!
//! Positions are either geodetic (`lat`/`lon` in degrees) or local
//! (`x_m`/`y_m`, east/north meters). Geodetic traffic is projected around
//! the ownship, which must then be geodetic as well.

use anyhow::{bail, Context, Result};
use daa_core::{units, KinematicBandsCore, LocalProjection, TrafficState, Vect3, Velocity};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Geodetic { lat: f64, lon: f64 },
    Local { x_m: f64, y_m: f64 },
}

/// One aircraft as it appears in an encounter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftRecord {
    pub id: String,
    #[serde(flatten)]
    pub position: Position,
    pub altitude_ft: f64,
    /// Degrees clockwise from true north
    pub track_deg: f64,
    pub ground_speed_kn: f64,
    #[serde(default)]
    pub vertical_speed_fpm: f64,
}

impl AircraftRecord {
    fn velocity(&self) -> Velocity {
        Velocity::from_trk_gs_vs(
            units::from("deg", self.track_deg),
            units::from("knot", self.ground_speed_kn),
            units::from("fpm", self.vertical_speed_fpm),
        )
    }

    fn state(&self, projection: Option<&LocalProjection>) -> Result<TrafficState> {
        let altitude = units::from("ft", self.altitude_ft);
        let s = match (self.position, projection) {
            (Position::Local { x_m, y_m }, _) => Vect3::new(x_m, y_m, altitude),
            (Position::Geodetic { lat, lon }, Some(projection)) => {
                projection.project(lat, lon, altitude)
            }
            (Position::Geodetic { .. }, None) => {
                bail!("aircraft {} is geodetic but the ownship is not", self.id)
            }
        };
        Ok(TrafficState::new(self.id.clone(), s, self.velocity()))
    }
}

/// Ownship, traffic and an optional most urgent intruder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub ownship: AircraftRecord,
    #[serde(default)]
    pub traffic: Vec<AircraftRecord>,
    /// Identifier of the intruder used for implicit coordination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_urgent: Option<String>,
}

impl Encounter {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read encounter {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid encounter {}", path.display()))
    }

    fn projection(&self) -> Option<LocalProjection> {
        match self.ownship.position {
            Position::Geodetic { lat, lon } => Some(LocalProjection::new(lat, lon)),
            Position::Local { .. } => None,
        }
    }

    /// Ownship and traffic in the local frame.
    pub fn states(&self) -> Result<(TrafficState, Vec<TrafficState>)> {
        let projection = self.projection();
        let ownship = self.ownship.state(projection.as_ref())?;
        let traffic = self
            .traffic
            .iter()
            .map(|ac| ac.state(projection.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok((ownship, traffic))
    }

    /// Load this encounter into `core`, replacing any previous state.
    pub fn apply(&self, core: &mut KinematicBandsCore) -> Result<()> {
        let (ownship, traffic) = self.states()?;
        core.clear();
        core.set_ownship(ownship);
        core.set_traffic(traffic);
        if let Some(id) = &self.most_urgent {
            let ac = core.intruder(id).clone();
            if !ac.is_valid() {
                bail!("most urgent aircraft {id} is not in traffic");
            }
            core.set_most_urgent_aircraft(ac);
        }
        Ok(())
    }
}
