//! Detect-and-avoid alerting core.
//!
//! Well-clear detection, SC-228 alert levels, TCAS II thresholds and the
//! per-cycle [`KinematicBandsCore`] that turns ownship and traffic state
//! into alert levels and conflict aircraft.

pub mod alerting;
pub mod bands_core;
pub mod bands_parameters;
pub mod criteria;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod models;
pub mod parameter_data;
pub mod tcas;
pub mod units;
pub mod urgency;

pub use alerting::{AlertLevels, AlertThresholds};
pub use bands_core::KinematicBandsCore;
pub use bands_parameters::KinematicBandsParameters;
pub use detection::{detector_from_class, ConflictData, Detection3D, WcvTauMod};
pub use error::ParameterError;
pub use geometry::{LocalProjection, Vect2, Vect3, Velocity};
pub use models::{BandsRegion, Interval, TrafficState};
pub use parameter_data::{ParameterData, ParameterEntry};
pub use tcas::TcasTable;
pub use urgency::{FixedAircraftUrgencyStrategy, NoneUrgencyStrategy, UrgencyStrategy};
