//! Alerting scenarios driven by a scripted detector.
//!
//! The scripted detector returns fixed answers and counts its invocations,
//! so level bookkeeping is tested independently of well-clear geometry.

use daa_core::{
    AlertLevels, AlertThresholds, BandsRegion, ConflictData, Detection3D, KinematicBandsCore,
    KinematicBandsParameters, ParameterData, ParameterError, TcasTable, TrafficState, Vect3,
    Velocity,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ScriptedDetector {
    id: String,
    violation: bool,
    time_in: f64,
    time_out: f64,
    calls: Arc<AtomicUsize>,
}

impl ScriptedDetector {
    fn new(violation: bool, time_in: f64, time_out: f64) -> Self {
        Self {
            id: String::new(),
            violation,
            time_in,
            time_out,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn quiet() -> Self {
        Self::new(false, f64::INFINITY, f64::NEG_INFINITY)
    }
}

impl Detection3D for ScriptedDetector {
    fn violation(&self, _so: &Vect3, _vo: &Velocity, _si: &Vect3, _vi: &Velocity) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.violation
    }

    fn conflict_detection(
        &self,
        _so: &Vect3,
        _vo: &Velocity,
        _si: &Vect3,
        _vi: &Velocity,
        b: f64,
        t: f64,
    ) -> ConflictData {
        if self.time_in < self.time_out {
            ConflictData::new(self.time_in, self.time_out)
        } else {
            ConflictData::none(b, t)
        }
    }

    fn clone_box(&self) -> Box<dyn Detection3D> {
        Box::new(self.clone())
    }

    fn class_name(&self) -> &'static str {
        "SCRIPTED"
    }

    fn identifier(&self) -> &str {
        &self.id
    }

    fn set_identifier(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn parameters(&self) -> ParameterData {
        ParameterData::new()
    }

    fn set_parameters(&mut self, _params: &ParameterData) -> Result<(), ParameterError> {
        Ok(())
    }
}

fn ownship() -> TrafficState {
    TrafficState::new(
        "OWN",
        Vect3::new(0.0, 0.0, 1500.0),
        Velocity::from_xyz(0.0, 100.0, 0.0),
    )
}

fn intruder(id: &str) -> TrafficState {
    TrafficState::new(
        id,
        Vect3::new(2000.0, 2000.0, 1500.0),
        Velocity::from_xyz(-100.0, 0.0, 0.0),
    )
}

fn level(detector: &ScriptedDetector, alerting_time: f64, region: BandsRegion) -> AlertThresholds {
    AlertThresholds::new(Box::new(detector.clone()), alerting_time, alerting_time, region)
}

fn core_with(levels: Vec<AlertThresholds>) -> KinematicBandsCore {
    let mut alertor = AlertLevels::new();
    for thresholds in levels {
        alertor.add_level(thresholds);
    }
    let mut params = KinematicBandsParameters::default();
    params.set_alertor(alertor);
    let mut core = KinematicBandsCore::new(params);
    core.set_ownship(ownship());
    core
}

#[test]
fn test_zero_traffic_no_alerts() {
    let mut core = KinematicBandsCore::new(KinematicBandsParameters::wc_sc_228_mops());
    core.set_ownship(ownship());
    assert!(!core.has_traffic());
    for l in 1..=3 {
        assert!(core.conflict_aircraft(l).is_empty());
        let iv = core.time_interval_of_violation(l);
        assert!(iv.is_empty());
        assert_eq!(iv.lo, f64::INFINITY);
        assert_eq!(iv.up, f64::NEG_INFINITY);
    }
    assert_eq!(core.current_alert_level(), 0);
}

#[test]
fn test_violation_in_conflict_band_alerts() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::Near)]);
    core.set_traffic(vec![intruder("AC1")]);

    let aircraft = core.conflict_aircraft(1);
    assert_eq!(aircraft.len(), 1);
    assert_eq!(aircraft[0].id, "AC1");
    let iv = core.time_interval_of_violation(1);
    assert_eq!((iv.lo, iv.up), (0.0, 30.0));
    assert_eq!(core.current_alert_level(), 1);
}

#[test]
fn test_none_region_records_interval_only() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::None)]);
    core.set_traffic(vec![intruder("AC1")]);

    assert!(core.conflict_aircraft(1).is_empty());
    let iv = core.time_interval_of_violation(1);
    assert_eq!((iv.lo, iv.up), (0.0, 30.0));
    assert_eq!(core.current_alert_level(), 0);
}

#[test]
fn test_conflict_beyond_alerting_time_not_alerted() {
    let det = ScriptedDetector::new(false, 40.0, 70.0);
    let mut core = core_with(vec![
        level(&det, 55.0, BandsRegion::Mid),
        level(&det, 25.0, BandsRegion::Near),
    ]);
    core.set_traffic(vec![intruder("AC1")]);

    assert_eq!(core.conflict_aircraft(1).len(), 1);
    assert!(core.conflict_aircraft(2).is_empty());
    // Interval is recorded even when the aircraft is not alerted
    assert_eq!(core.time_interval_of_violation(2).lo, 40.0);
    assert_eq!(core.current_alert_level(), 1);
}

#[test]
fn test_alerting_time_capped_by_lookahead() {
    let det = ScriptedDetector::new(false, 40.0, 70.0);
    let mut core = core_with(vec![level(&det, 55.0, BandsRegion::Mid)]);
    core.set_traffic(vec![intruder("AC1")]);
    assert_eq!(core.current_alert_level(), 1);

    assert!(core.parameters_mut().set_lookahead_time(30.0));
    assert!(core.conflict_aircraft(1).is_empty());
}

#[test]
fn test_current_alert_level_is_highest_non_empty() {
    let hit = ScriptedDetector::new(true, 0.0, 30.0);
    let miss = ScriptedDetector::quiet();
    let mut core = core_with(vec![
        level(&hit, 55.0, BandsRegion::Far),
        level(&miss, 55.0, BandsRegion::Mid),
        level(&hit, 25.0, BandsRegion::Near),
        level(&miss, 25.0, BandsRegion::Recovery),
    ]);
    core.set_traffic(vec![intruder("AC1")]);

    assert_eq!(core.conflict_aircraft(1).len(), 1);
    assert!(core.conflict_aircraft(2).is_empty());
    assert_eq!(core.conflict_aircraft(3).len(), 1);
    assert!(core.conflict_aircraft(4).is_empty());
    assert_eq!(core.current_alert_level(), 3);
}

#[test]
fn test_recovery_region_is_not_a_conflict_band() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::Recovery)]);
    core.set_traffic(vec![intruder("AC1")]);
    assert!(core.conflict_aircraft(1).is_empty());
    assert_eq!(core.current_alert_level(), 0);
}

#[test]
fn test_interval_absorbs_every_intruder() {
    let early = ScriptedDetector::new(false, 10.0, 20.0);
    let mut core = core_with(vec![level(&early, 25.0, BandsRegion::Near)]);
    core.set_traffic(vec![intruder("AC1"), intruder("AC2")]);
    let iv = core.time_interval_of_violation(1);
    assert_eq!((iv.lo, iv.up), (10.0, 20.0));
    assert_eq!(core.conflict_aircraft(1).len(), 2);
}

#[test]
fn test_invalid_traffic_skipped() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::Near)]);
    core.set_traffic(vec![TrafficState::invalid().clone(), intruder("AC1")]);
    assert_eq!(core.conflict_aircraft(1).len(), 1);
    assert_eq!(det.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_out_of_range_levels_return_shared_sentinels() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::Near)]);
    core.set_traffic(vec![intruder("AC1")]);

    for l in [0, 2, 99] {
        let a = core.conflict_aircraft(l);
        let b = core.conflict_aircraft(l);
        assert!(a.is_empty());
        assert!(std::ptr::eq(a, b));
        let iv = core.time_interval_of_violation(l);
        assert!(std::ptr::eq(iv, core.time_interval_of_violation(l)));
        assert!(iv.is_empty());
    }
    assert!(std::ptr::eq(
        core.time_interval_of_violation(0),
        core.time_interval_of_violation(7)
    ));
}

#[test]
fn test_detector_invoked_once_per_refresh() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![
        level(&det, 25.0, BandsRegion::Mid),
        level(&det, 25.0, BandsRegion::Near),
    ]);
    core.set_traffic(vec![intruder("AC1"), intruder("AC2")]);

    let first = core.conflict_aircraft(2).to_vec();
    for _ in 0..3 {
        assert_eq!(core.current_alert_level(), 2);
        assert_eq!(core.conflict_aircraft(2), first.as_slice());
        let _ = core.time_interval_of_violation(1);
        let _ = core.epsilon_h();
    }
    // Two levels times two intruders
    assert_eq!(det.calls.load(Ordering::SeqCst), 4);

    core.add_traffic(intruder("AC3"));
    assert_eq!(core.conflict_aircraft(2).len(), 3);
    assert_eq!(det.calls.load(Ordering::SeqCst), 10);
}

#[test]
fn test_clone_deep_copies_detectors() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::Near)]);
    core.set_traffic(vec![intruder("AC1")]);
    let mut copy = core.clone();

    copy.parameters_mut()
        .alertor_mut()
        .set_level(1, level(&ScriptedDetector::quiet(), 25.0, BandsRegion::Near));
    assert_eq!(copy.current_alert_level(), 0);
    assert_eq!(core.current_alert_level(), 1);
}

#[test]
fn test_wc_sc_228_levels() {
    let alertor = AlertLevels::wc_sc_228();
    assert_eq!(alertor.most_severe_alert_level(), 3);
    assert_eq!(alertor.conflict_alert_level(), 2);
    assert_eq!(alertor.level(1).region(), BandsRegion::None);
    assert_eq!(alertor.level(2).region(), BandsRegion::Mid);
    assert_eq!(alertor.level(3).region(), BandsRegion::Near);
    assert_eq!(alertor.level(3).alerting_time(), 25.0);
    assert_eq!(alertor.level(3).early_alerting_time(), 55.0);
}

#[test]
fn test_recovery_minimums_follow_ownship_altitude() {
    let params = KinematicBandsParameters::default();
    let table = TcasTable::ra();
    let mut core = KinematicBandsCore::new(params);
    assert_eq!(core.min_horizontal_recovery(), table.hmd(3));

    for alt in [0.0, 500.0, 1500.0, 4000.0, 9000.0, 15000.0] {
        let mut own = ownship();
        own.s.z = alt;
        core.set_ownship(own);
        let sl = TcasTable::sensitivity_level(alt).max(3);
        assert_eq!(core.min_horizontal_recovery(), table.hmd(sl));
        assert_eq!(core.min_vertical_recovery(), table.zthr(sl));
    }
}

#[test]
fn test_epsilon_zero_without_valid_aircraft() {
    let det = ScriptedDetector::new(true, 0.0, 30.0);
    let mut core = core_with(vec![level(&det, 25.0, BandsRegion::Near)]);
    core.set_traffic(vec![intruder("AC1")]);
    assert_eq!(core.epsilon_h(), 0);
    assert_eq!(core.epsilon_v(), 0);

    core.set_most_urgent_aircraft(intruder("AC1"));
    assert_eq!(core.epsilon_h().abs(), 1);
    assert_eq!(core.epsilon_v().abs(), 1);

    core.set_ownship(TrafficState::invalid().clone());
    assert_eq!(core.epsilon_h(), 0);
    assert_eq!(core.epsilon_v(), 0);
}
