//! Strategies that pick the most urgent intruder for implicit coordination.

use crate::detection::Detection3D;
use crate::models::TrafficState;
use std::fmt;

/// Chooses which intruder coordination is computed against.
pub trait UrgencyStrategy: fmt::Debug {
    /// The most urgent aircraft in `traffic`, or the invalid sentinel.
    fn most_urgent_aircraft(
        &self,
        detector: Option<&dyn Detection3D>,
        ownship: &TrafficState,
        traffic: &[TrafficState],
        lookahead_time: f64,
    ) -> TrafficState;
}

/// Never selects an aircraft.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneUrgencyStrategy;

impl UrgencyStrategy for NoneUrgencyStrategy {
    fn most_urgent_aircraft(
        &self,
        _detector: Option<&dyn Detection3D>,
        _ownship: &TrafficState,
        _traffic: &[TrafficState],
        _lookahead_time: f64,
    ) -> TrafficState {
        TrafficState::invalid().clone()
    }
}

/// Always selects the aircraft with a fixed identifier.
#[derive(Debug, Clone, Default)]
pub struct FixedAircraftUrgencyStrategy {
    pub ac_id: String,
}

impl FixedAircraftUrgencyStrategy {
    pub fn new(ac_id: impl Into<String>) -> Self {
        Self {
            ac_id: ac_id.into(),
        }
    }
}

impl UrgencyStrategy for FixedAircraftUrgencyStrategy {
    fn most_urgent_aircraft(
        &self,
        _detector: Option<&dyn Detection3D>,
        _ownship: &TrafficState,
        traffic: &[TrafficState],
        _lookahead_time: f64,
    ) -> TrafficState {
        TrafficState::find_aircraft(traffic, &self.ac_id).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Vect3, Velocity};

    #[test]
    fn test_strategies() {
        let own = TrafficState::new("OWN", Vect3::ZERO, Velocity::ZERO);
        let traffic = vec![
            TrafficState::new("AC1", Vect3::new(1000.0, 0.0, 0.0), Velocity::ZERO),
            TrafficState::new("AC2", Vect3::new(2000.0, 0.0, 0.0), Velocity::ZERO),
        ];
        let none = NoneUrgencyStrategy.most_urgent_aircraft(None, &own, &traffic, 180.0);
        assert!(!none.is_valid());

        let fixed = FixedAircraftUrgencyStrategy::new("AC2");
        let picked = fixed.most_urgent_aircraft(None, &own, &traffic, 180.0);
        assert_eq!(picked.id, "AC2");
        let missing = FixedAircraftUrgencyStrategy::new("AC9");
        assert!(!missing.most_urgent_aircraft(None, &own, &traffic, 180.0).is_valid());
    }
}
