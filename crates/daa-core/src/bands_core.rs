//! Per-cycle alerting engine.
//!
//! [`KinematicBandsCore`] holds a snapshot of ownship and traffic and
//! derives, per alert level, the conflicting aircraft and the time interval
//! of violation. Derived state is computed lazily on the first query and
//! memoized until the next mutation.

use crate::bands_parameters::KinematicBandsParameters;
use crate::criteria;
use crate::detection::{ConflictData, Detection3D};
use crate::models::{Interval, TrafficState};
use crate::tcas::TcasTable;
use crate::urgency::UrgencyStrategy;
use std::cell::OnceCell;
use tracing::{debug, trace};

static NO_AIRCRAFT: [TrafficState; 0] = [];

/// Sensitivity level floor for recovery volumes.
const MIN_RECOVERY_SENSITIVITY_LEVEL: usize = 3;

/// Results derived from one ownship/traffic snapshot.
#[derive(Debug, Default)]
struct Snapshot {
    eps_h: i32,
    eps_v: i32,
    /// Indexed by level - 1
    conflict_aircraft: Vec<Vec<TrafficState>>,
    /// Indexed by level - 1
    violation_interval: Vec<Interval>,
    current_alert_level: usize,
}

#[derive(Debug)]
pub struct KinematicBandsCore {
    ownship: TrafficState,
    traffic: Vec<TrafficState>,
    parameters: KinematicBandsParameters,
    most_urgent_aircraft: TrafficState,
    /// Source of recovery volumes when no explicit minimum is configured
    recovery_table: TcasTable,
    cache: OnceCell<Snapshot>,
}

impl Clone for KinematicBandsCore {
    /// Copies every owned value; the copy recomputes on its first query.
    fn clone(&self) -> Self {
        Self {
            ownship: self.ownship.clone(),
            traffic: self.traffic.clone(),
            parameters: self.parameters.clone(),
            most_urgent_aircraft: self.most_urgent_aircraft.clone(),
            recovery_table: self.recovery_table.clone(),
            cache: OnceCell::new(),
        }
    }
}

impl Default for KinematicBandsCore {
    fn default() -> Self {
        Self::new(KinematicBandsParameters::default())
    }
}

impl KinematicBandsCore {
    /// Core using the TCAS II RA table for recovery volumes.
    pub fn new(parameters: KinematicBandsParameters) -> Self {
        Self::with_recovery_table(parameters, TcasTable::ra())
    }

    pub fn with_recovery_table(parameters: KinematicBandsParameters, table: TcasTable) -> Self {
        Self {
            ownship: TrafficState::invalid().clone(),
            traffic: Vec::new(),
            parameters,
            most_urgent_aircraft: TrafficState::invalid().clone(),
            recovery_table: table,
            cache: OnceCell::new(),
        }
    }

    /// Drop cached results.
    fn reset(&mut self) {
        self.cache.take();
    }

    /// Remove ownship, traffic and the most urgent aircraft.
    pub fn clear(&mut self) {
        self.ownship = TrafficState::invalid().clone();
        self.traffic.clear();
        self.most_urgent_aircraft = TrafficState::invalid().clone();
        self.reset();
    }

    /// Whether cached results are current.
    pub fn is_fresh(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn ownship(&self) -> &TrafficState {
        &self.ownship
    }

    pub fn set_ownship(&mut self, ownship: TrafficState) {
        self.ownship = ownship;
        self.reset();
    }

    pub fn traffic(&self) -> &[TrafficState] {
        &self.traffic
    }

    pub fn set_traffic(&mut self, traffic: Vec<TrafficState>) {
        self.traffic = traffic;
        self.reset();
    }

    pub fn add_traffic(&mut self, ac: TrafficState) {
        self.traffic.push(ac);
        self.reset();
    }

    pub fn most_urgent_aircraft(&self) -> &TrafficState {
        &self.most_urgent_aircraft
    }

    pub fn set_most_urgent_aircraft(&mut self, ac: TrafficState) {
        self.most_urgent_aircraft = ac;
        self.reset();
    }

    /// Select the most urgent aircraft with `strategy`, judged by the
    /// conflict level detector.
    pub fn apply_urgency_strategy(&mut self, strategy: &dyn UrgencyStrategy) {
        let ac = strategy.most_urgent_aircraft(
            self.parameters.alertor().detector(0),
            &self.ownship,
            &self.traffic,
            self.parameters.lookahead_time(),
        );
        self.set_most_urgent_aircraft(ac);
    }

    pub fn parameters(&self) -> &KinematicBandsParameters {
        &self.parameters
    }

    /// Mutable access to the parameters. Cached results are dropped.
    pub fn parameters_mut(&mut self) -> &mut KinematicBandsParameters {
        self.reset();
        &mut self.parameters
    }

    pub fn set_parameters(&mut self, parameters: KinematicBandsParameters) {
        self.parameters = parameters;
        self.reset();
    }

    pub fn recovery_table(&self) -> &TcasTable {
        &self.recovery_table
    }

    pub fn lookahead_time(&self) -> f64 {
        self.parameters.lookahead_time()
    }

    pub fn has_ownship(&self) -> bool {
        self.ownship.is_valid()
    }

    pub fn has_traffic(&self) -> bool {
        !self.traffic.is_empty()
    }

    /// Ownship plus traffic.
    pub fn number_of_aircraft(&self) -> usize {
        self.traffic.len() + 1
    }

    /// Traffic aircraft by identifier, or the invalid sentinel.
    pub fn intruder(&self, id: &str) -> &TrafficState {
        TrafficState::find_aircraft(&self.traffic, id)
    }

    /// Most urgent aircraft when conflict criteria are enabled.
    pub fn criteria_ac(&self) -> &TrafficState {
        if self.parameters.is_enabled_conflict_criteria() {
            &self.most_urgent_aircraft
        } else {
            TrafficState::invalid()
        }
    }

    /// Most urgent aircraft when recovery criteria are enabled.
    pub fn recovery_ac(&self) -> &TrafficState {
        if self.parameters.is_enabled_recovery_criteria() {
            &self.most_urgent_aircraft
        } else {
            TrafficState::invalid()
        }
    }

    fn recovery_sensitivity_level(&self) -> usize {
        if self.has_ownship() {
            TcasTable::sensitivity_level(self.ownship.altitude()).max(MIN_RECOVERY_SENSITIVITY_LEVEL)
        } else {
            MIN_RECOVERY_SENSITIVITY_LEVEL
        }
    }

    /// Configured minimum, or the table HMD at ownship's sensitivity level.
    pub fn min_horizontal_recovery(&self) -> f64 {
        let explicit = self.parameters.min_horizontal_recovery();
        if explicit > 0.0 {
            return explicit;
        }
        self.recovery_table.hmd(self.recovery_sensitivity_level())
    }

    /// Configured minimum, or the table ZTHR at ownship's sensitivity level.
    pub fn min_vertical_recovery(&self) -> f64 {
        let explicit = self.parameters.min_vertical_recovery();
        if explicit > 0.0 {
            return explicit;
        }
        self.recovery_table.zthr(self.recovery_sensitivity_level())
    }

    /// Horizontal coordination between two aircraft; 0 if either is invalid.
    pub fn epsilon_h_between(ownship: &TrafficState, ac: &TrafficState) -> i32 {
        if !(ownship.is_valid() && ac.is_valid()) {
            return 0;
        }
        let s = (ownship.s - ac.s).vect2();
        let v = (ownship.v - ac.v).vect2();
        criteria::horizontal_coordination(&s, &v)
    }

    /// Vertical coordination between two aircraft; 0 if either is invalid.
    pub fn epsilon_v_between(ownship: &TrafficState, ac: &TrafficState) -> i32 {
        if !(ownship.is_valid() && ac.is_valid()) {
            return 0;
        }
        let s = ownship.s - ac.s;
        criteria::vertical_coordination_los(&s, &ownship.v, &ac.v, &ownship.id, &ac.id)
    }

    pub fn epsilon_h(&self) -> i32 {
        self.snapshot().eps_h
    }

    pub fn epsilon_v(&self) -> i32 {
        self.snapshot().eps_v
    }

    /// Highest level with at least one conflicting aircraft, or 0.
    pub fn current_alert_level(&self) -> usize {
        self.snapshot().current_alert_level
    }

    /// Conflicting aircraft of `level`; a shared empty slice out of range.
    pub fn conflict_aircraft(&self, level: usize) -> &[TrafficState] {
        level
            .checked_sub(1)
            .and_then(|i| self.snapshot().conflict_aircraft.get(i))
            .map_or(&NO_AIRCRAFT[..], Vec::as_slice)
    }

    /// Time interval of violation of `level`; the shared empty interval out
    /// of range.
    pub fn time_interval_of_violation(&self, level: usize) -> &Interval {
        level
            .checked_sub(1)
            .and_then(|i| self.snapshot().violation_interval.get(i))
            .unwrap_or(Interval::empty())
    }

    fn snapshot(&self) -> &Snapshot {
        self.cache.get_or_init(|| self.compute())
    }

    fn compute(&self) -> Snapshot {
        let levels = self.parameters.alertor().most_severe_alert_level();
        let mut snapshot = Snapshot {
            conflict_aircraft: Vec::with_capacity(levels),
            violation_interval: Vec::with_capacity(levels),
            ..Snapshot::default()
        };
        for level in 1..=levels {
            let (aircraft, interval) = self.level_conflicts(level);
            if !aircraft.is_empty() {
                snapshot.current_alert_level = level;
            }
            snapshot.conflict_aircraft.push(aircraft);
            snapshot.violation_interval.push(interval);
        }
        snapshot.eps_h = Self::epsilon_h_between(&self.ownship, &self.most_urgent_aircraft);
        snapshot.eps_v = Self::epsilon_v_between(&self.ownship, &self.most_urgent_aircraft);
        debug!(
            levels,
            traffic = self.traffic.len(),
            alert_level = snapshot.current_alert_level,
            "alerting state refreshed"
        );
        snapshot
    }

    /// Conflicting aircraft and violation interval for one level.
    fn level_conflicts(&self, level: usize) -> (Vec<TrafficState>, Interval) {
        let mut aircraft = Vec::new();
        let mut interval = Interval::EMPTY;
        let thresholds = self.parameters.alertor().level(level);
        let Some(detector) = thresholds.detector() else {
            return (aircraft, interval);
        };
        if !self.has_ownship() {
            return (aircraft, interval);
        }
        let lookahead = self.parameters.lookahead_time();
        let alerting_time = lookahead.min(thresholds.alerting_time());
        let conflict_band = thresholds.region().is_conflict_band();

        for ac in self.traffic.iter().filter(|ac| ac.is_valid()) {
            let (violation, cd) = detect(detector, &self.ownship, ac, lookahead);
            if !(violation || cd.conflict()) {
                continue;
            }
            interval.absorb(cd.time_in, cd.time_out);
            let alerted = conflict_band && (violation || cd.time_in < alerting_time);
            trace!(
                level,
                intruder = %ac.id,
                violation,
                time_in = cd.time_in,
                time_out = cd.time_out,
                alerted,
                "loss of well-clear predicted"
            );
            if alerted {
                aircraft.push(ac.clone());
            }
        }
        (aircraft, interval)
    }
}

fn detect(
    detector: &dyn Detection3D,
    ownship: &TrafficState,
    ac: &TrafficState,
    lookahead: f64,
) -> (bool, ConflictData) {
    let violation = detector.violation(&ownship.s, &ownship.v, &ac.s, &ac.v);
    let cd = detector.conflict_detection(&ownship.s, &ownship.v, &ac.s, &ac.v, 0.0, lookahead);
    (violation, cd)
}
