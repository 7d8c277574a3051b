//! Core value types shared by the alerting core.

use crate::error::ParameterError;
use crate::geometry::{Vect3, Velocity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static INVALID_TRAFFIC: TrafficState = TrafficState {
    id: String::new(),
    s: Vect3::new(f64::NAN, f64::NAN, f64::NAN),
    v: Velocity::from_xyz(f64::NAN, f64::NAN, f64::NAN),
    time: f64::NAN,
    valid: false,
};

static EMPTY_INTERVAL: Interval = Interval::EMPTY;

/// Kinematic state of one aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficState {
    pub id: String,
    /// Position in the local frame (meters)
    pub s: Vect3,
    /// Velocity (meters/second)
    pub v: Velocity,
    /// Time of applicability (seconds)
    #[serde(default)]
    pub time: f64,
    #[serde(default = "default_valid")]
    valid: bool,
}

fn default_valid() -> bool {
    true
}

impl TrafficState {
    /// Create a valid aircraft state.
    pub fn new(id: impl Into<String>, s: Vect3, v: Velocity) -> Self {
        Self {
            id: id.into(),
            s,
            v,
            time: 0.0,
            valid: true,
        }
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// The process-wide "no aircraft" sentinel.
    pub fn invalid() -> &'static TrafficState {
        &INVALID_TRAFFIC
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn altitude(&self) -> f64 {
        self.s.z
    }

    /// Linear scan by identifier; the invalid sentinel on miss.
    pub fn find_aircraft<'a>(traffic: &'a [TrafficState], id: &str) -> &'a TrafficState {
        traffic
            .iter()
            .find(|ac| ac.id == id)
            .unwrap_or(&INVALID_TRAFFIC)
    }
}

impl Default for TrafficState {
    fn default() -> Self {
        INVALID_TRAFFIC.clone()
    }
}

/// Closed time interval `[lo, up]`. Empty when `lo > up`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub up: f64,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        lo: f64::INFINITY,
        up: f64::NEG_INFINITY,
    };

    pub const fn new(lo: f64, up: f64) -> Self {
        Self { lo, up }
    }

    /// Shared empty interval.
    pub fn empty() -> &'static Interval {
        &EMPTY_INTERVAL
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.up
    }

    /// Grow to cover `[lo, up]`.
    pub fn absorb(&mut self, lo: f64, up: f64) {
        self.lo = self.lo.min(lo);
        self.up = self.up.max(up);
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::EMPTY
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{:.3}, {:.3}]", self.lo, self.up)
        }
    }
}

/// Severity classification of an alert level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BandsRegion {
    #[default]
    None,
    Far,
    Mid,
    Near,
    Recovery,
}

impl BandsRegion {
    /// FAR, MID and NEAR are conflict bands.
    pub fn is_conflict_band(&self) -> bool {
        matches!(self, BandsRegion::Far | BandsRegion::Mid | BandsRegion::Near)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BandsRegion::None => "NONE",
            BandsRegion::Far => "FAR",
            BandsRegion::Mid => "MID",
            BandsRegion::Near => "NEAR",
            BandsRegion::Recovery => "RECOVERY",
        }
    }
}

impl fmt::Display for BandsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BandsRegion {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(BandsRegion::None),
            "FAR" => Ok(BandsRegion::Far),
            "MID" => Ok(BandsRegion::Mid),
            "NEAR" => Ok(BandsRegion::Near),
            "RECOVERY" => Ok(BandsRegion::Recovery),
            _ => Err(ParameterError::UnknownRegion(s.to_string())),
        }
    }
}
