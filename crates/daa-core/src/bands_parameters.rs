//! Bands configuration consumed by the alerting core.
//!
//! All values are held in internal units. Setters validate their input,
//! log rejected values and report whether the value was accepted.

use crate::alerting::AlertLevels;
use crate::error::ParameterError;
use crate::parameter_data::ParameterData;
use crate::units;
use std::f64::consts::PI;
use std::path::Path;
use tracing::warn;

/// Absorbs unit round-off on angles read back from degrees.
const ANGLE_SLACK: f64 = 1e-9;

/// Scalar bands settings plus the alert level table.
#[derive(Debug, Clone)]
pub struct KinematicBandsParameters {
    /// Prediction horizon (s)
    lookahead_time: f64,
    /// Track range to the left of current track (rad)
    left_trk: f64,
    /// Track range to the right of current track (rad)
    right_trk: f64,
    min_gs: f64,
    max_gs: f64,
    min_vs: f64,
    max_vs: f64,
    min_alt: f64,
    max_alt: f64,
    trk_step: f64,
    gs_step: f64,
    vs_step: f64,
    alt_step: f64,
    horizontal_accel: f64,
    vertical_accel: f64,
    /// Turn rate (rad/s); zero means instantaneous turns unless a bank angle is set
    turn_rate: f64,
    bank_angle: f64,
    vertical_rate: f64,
    horizontal_nmac: f64,
    vertical_nmac: f64,
    recovery_stability_time: f64,
    /// Explicit minimum horizontal recovery distance; 0 uses the TCAS table
    min_horizontal_recovery: f64,
    /// Explicit minimum vertical recovery distance; 0 uses the TCAS table
    min_vertical_recovery: f64,
    conflict_crit: bool,
    recovery_crit: bool,
    recovery_trk: bool,
    recovery_gs: bool,
    recovery_vs: bool,
    recovery_alt: bool,
    ca_bands: bool,
    ca_factor: f64,
    contour_thr: f64,
    alertor: AlertLevels,
}

impl Default for KinematicBandsParameters {
    fn default() -> Self {
        Self {
            lookahead_time: 180.0,
            left_trk: PI,
            right_trk: PI,
            min_gs: 0.0,
            max_gs: units::from("knot", 700.0),
            min_vs: units::from("fpm", -5000.0),
            max_vs: units::from("fpm", 5000.0),
            min_alt: units::from("ft", 500.0),
            max_alt: units::from("ft", 50000.0),
            trk_step: units::from("deg", 1.0),
            gs_step: units::from("knot", 1.0),
            vs_step: units::from("fpm", 10.0),
            alt_step: units::from("ft", 100.0),
            horizontal_accel: 2.0,
            vertical_accel: units::from("G", 0.25),
            turn_rate: units::from("deg/s", 3.0),
            bank_angle: 0.0,
            vertical_rate: units::from("fpm", 500.0),
            horizontal_nmac: units::from("ft", 500.0),
            vertical_nmac: units::from("ft", 100.0),
            recovery_stability_time: 2.0,
            min_horizontal_recovery: 0.0,
            min_vertical_recovery: 0.0,
            conflict_crit: false,
            recovery_crit: false,
            recovery_trk: true,
            recovery_gs: true,
            recovery_vs: true,
            recovery_alt: true,
            ca_bands: false,
            ca_factor: 0.2,
            contour_thr: PI,
            alertor: AlertLevels::new(),
        }
    }
}

fn accept(setter: &'static str, value: f64, ok: bool) -> bool {
    if !ok {
        warn!(setter, value, "rejected parameter value");
    }
    ok
}

impl KinematicBandsParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the SC-228 alerting and instantaneous bands.
    pub fn wc_sc_228_mops() -> Self {
        let mut p = Self::default();
        p.set_wc_sc_228_mops();
        p
    }

    /// Defaults with the buffered SC-228 alerting and kinematic bands.
    pub fn buffered_wc_sc_228_mops(fast_turn: bool) -> Self {
        let mut p = Self::default();
        p.set_buffered_wc_sc_228_mops(fast_turn);
        p
    }

    pub fn set_wc_sc_228_mops(&mut self) {
        self.alertor = AlertLevels::wc_sc_228();
        self.set_instantaneous_bands();
        self.ca_bands = false;
        self.min_horizontal_recovery = units::from("nmi", 0.66);
        self.min_vertical_recovery = units::from("ft", 450.0);
    }

    /// `fast_turn` selects a 3 deg/s turn rate instead of 1.5 deg/s.
    pub fn set_buffered_wc_sc_228_mops(&mut self, fast_turn: bool) {
        self.alertor = AlertLevels::buffered_wc_sc_228();
        self.set_kinematic_bands(fast_turn);
        self.ca_bands = true;
        self.ca_factor = 0.2;
        self.min_horizontal_recovery = units::from("nmi", 1.0);
        self.min_vertical_recovery = units::from("ft", 450.0);
    }

    /// Zero turn rate, bank angle, accelerations and vertical rate.
    pub fn set_instantaneous_bands(&mut self) {
        self.turn_rate = 0.0;
        self.bank_angle = 0.0;
        self.horizontal_accel = 0.0;
        self.vertical_accel = 0.0;
        self.vertical_rate = 0.0;
    }

    pub fn set_kinematic_bands(&mut self, fast_turn: bool) {
        self.set_turn_rate(units::from("deg/s", if fast_turn { 3.0 } else { 1.5 }));
        self.horizontal_accel = 2.0;
        self.vertical_accel = units::from("G", 0.25);
        self.vertical_rate = units::from("fpm", 500.0);
    }

    pub fn alertor(&self) -> &AlertLevels {
        &self.alertor
    }

    pub fn alertor_mut(&mut self) -> &mut AlertLevels {
        &mut self.alertor
    }

    pub fn set_alertor(&mut self, alertor: AlertLevels) {
        self.alertor = alertor;
    }

    pub fn lookahead_time(&self) -> f64 {
        self.lookahead_time
    }

    pub fn set_lookahead_time(&mut self, val: f64) -> bool {
        let ok = accept("set_lookahead_time", val, val > 0.0);
        if ok {
            self.lookahead_time = val;
        }
        ok
    }

    pub fn left_trk(&self) -> f64 {
        self.left_trk
    }

    pub fn set_left_trk(&mut self, val: f64) -> bool {
        let ok = accept("set_left_trk", val, val.abs() <= PI + ANGLE_SLACK);
        if ok {
            self.left_trk = val.abs().min(PI);
        }
        ok
    }

    pub fn right_trk(&self) -> f64 {
        self.right_trk
    }

    pub fn set_right_trk(&mut self, val: f64) -> bool {
        let ok = accept("set_right_trk", val, val.abs() <= PI + ANGLE_SLACK);
        if ok {
            self.right_trk = val.abs().min(PI);
        }
        ok
    }

    pub fn min_gs(&self) -> f64 {
        self.min_gs
    }

    pub fn set_min_gs(&mut self, val: f64) -> bool {
        let ok = accept("set_min_gs", val, val >= 0.0);
        if ok {
            self.min_gs = val;
        }
        ok
    }

    pub fn max_gs(&self) -> f64 {
        self.max_gs
    }

    pub fn set_max_gs(&mut self, val: f64) -> bool {
        let ok = accept("set_max_gs", val, val > 0.0);
        if ok {
            self.max_gs = val;
        }
        ok
    }

    pub fn min_vs(&self) -> f64 {
        self.min_vs
    }

    pub fn set_min_vs(&mut self, val: f64) {
        self.min_vs = val;
    }

    pub fn max_vs(&self) -> f64 {
        self.max_vs
    }

    pub fn set_max_vs(&mut self, val: f64) {
        self.max_vs = val;
    }

    pub fn min_alt(&self) -> f64 {
        self.min_alt
    }

    pub fn set_min_alt(&mut self, val: f64) -> bool {
        let ok = accept("set_min_alt", val, val >= 0.0);
        if ok {
            self.min_alt = val;
        }
        ok
    }

    pub fn max_alt(&self) -> f64 {
        self.max_alt
    }

    pub fn set_max_alt(&mut self, val: f64) -> bool {
        let ok = accept("set_max_alt", val, val > 0.0);
        if ok {
            self.max_alt = val;
        }
        ok
    }

    pub fn trk_step(&self) -> f64 {
        self.trk_step
    }

    pub fn set_trk_step(&mut self, val: f64) -> bool {
        let ok = accept("set_trk_step", val, val > 0.0 && val <= PI + ANGLE_SLACK);
        if ok {
            self.trk_step = val.min(PI);
        }
        ok
    }

    pub fn gs_step(&self) -> f64 {
        self.gs_step
    }

    pub fn set_gs_step(&mut self, val: f64) -> bool {
        let ok = accept("set_gs_step", val, val > 0.0);
        if ok {
            self.gs_step = val;
        }
        ok
    }

    pub fn vs_step(&self) -> f64 {
        self.vs_step
    }

    pub fn set_vs_step(&mut self, val: f64) -> bool {
        let ok = accept("set_vs_step", val, val > 0.0);
        if ok {
            self.vs_step = val;
        }
        ok
    }

    pub fn alt_step(&self) -> f64 {
        self.alt_step
    }

    pub fn set_alt_step(&mut self, val: f64) -> bool {
        let ok = accept("set_alt_step", val, val > 0.0);
        if ok {
            self.alt_step = val;
        }
        ok
    }

    pub fn horizontal_accel(&self) -> f64 {
        self.horizontal_accel
    }

    pub fn set_horizontal_accel(&mut self, val: f64) -> bool {
        let ok = accept("set_horizontal_accel", val, val >= 0.0);
        if ok {
            self.horizontal_accel = val;
        }
        ok
    }

    pub fn vertical_accel(&self) -> f64 {
        self.vertical_accel
    }

    pub fn set_vertical_accel(&mut self, val: f64) -> bool {
        let ok = accept("set_vertical_accel", val, val >= 0.0);
        if ok {
            self.vertical_accel = val;
        }
        ok
    }

    pub fn turn_rate(&self) -> f64 {
        self.turn_rate
    }

    /// Setting a turn rate clears the bank angle.
    pub fn set_turn_rate(&mut self, val: f64) -> bool {
        let ok = accept("set_turn_rate", val, val >= 0.0);
        if ok {
            self.turn_rate = val;
            self.bank_angle = 0.0;
        }
        ok
    }

    pub fn bank_angle(&self) -> f64 {
        self.bank_angle
    }

    /// Setting a bank angle clears the turn rate.
    pub fn set_bank_angle(&mut self, val: f64) -> bool {
        let ok = accept("set_bank_angle", val, val >= 0.0);
        if ok {
            self.bank_angle = val;
            self.turn_rate = 0.0;
        }
        ok
    }

    pub fn vertical_rate(&self) -> f64 {
        self.vertical_rate
    }

    pub fn set_vertical_rate(&mut self, val: f64) -> bool {
        let ok = accept("set_vertical_rate", val, val >= 0.0);
        if ok {
            self.vertical_rate = val;
        }
        ok
    }

    pub fn horizontal_nmac(&self) -> f64 {
        self.horizontal_nmac
    }

    pub fn set_horizontal_nmac(&mut self, val: f64) -> bool {
        let ok = accept("set_horizontal_nmac", val, val >= 0.0);
        if ok {
            self.horizontal_nmac = val;
        }
        ok
    }

    pub fn vertical_nmac(&self) -> f64 {
        self.vertical_nmac
    }

    pub fn set_vertical_nmac(&mut self, val: f64) -> bool {
        let ok = accept("set_vertical_nmac", val, val >= 0.0);
        if ok {
            self.vertical_nmac = val;
        }
        ok
    }

    pub fn recovery_stability_time(&self) -> f64 {
        self.recovery_stability_time
    }

    pub fn set_recovery_stability_time(&mut self, val: f64) -> bool {
        let ok = accept("set_recovery_stability_time", val, val >= 0.0);
        if ok {
            self.recovery_stability_time = val;
        }
        ok
    }

    pub fn min_horizontal_recovery(&self) -> f64 {
        self.min_horizontal_recovery
    }

    pub fn set_min_horizontal_recovery(&mut self, val: f64) -> bool {
        let ok = accept("set_min_horizontal_recovery", val, val >= 0.0);
        if ok {
            self.min_horizontal_recovery = val;
        }
        ok
    }

    pub fn min_vertical_recovery(&self) -> f64 {
        self.min_vertical_recovery
    }

    pub fn set_min_vertical_recovery(&mut self, val: f64) -> bool {
        let ok = accept("set_min_vertical_recovery", val, val >= 0.0);
        if ok {
            self.min_vertical_recovery = val;
        }
        ok
    }

    pub fn is_enabled_conflict_criteria(&self) -> bool {
        self.conflict_crit
    }

    pub fn set_conflict_criteria(&mut self, flag: bool) {
        self.conflict_crit = flag;
    }

    pub fn is_enabled_recovery_criteria(&self) -> bool {
        self.recovery_crit
    }

    pub fn set_recovery_criteria(&mut self, flag: bool) {
        self.recovery_crit = flag;
    }

    pub fn is_enabled_recovery_trk_bands(&self) -> bool {
        self.recovery_trk
    }

    pub fn set_recovery_trk_bands(&mut self, flag: bool) {
        self.recovery_trk = flag;
    }

    pub fn is_enabled_recovery_gs_bands(&self) -> bool {
        self.recovery_gs
    }

    pub fn set_recovery_gs_bands(&mut self, flag: bool) {
        self.recovery_gs = flag;
    }

    pub fn is_enabled_recovery_vs_bands(&self) -> bool {
        self.recovery_vs
    }

    pub fn set_recovery_vs_bands(&mut self, flag: bool) {
        self.recovery_vs = flag;
    }

    pub fn is_enabled_recovery_alt_bands(&self) -> bool {
        self.recovery_alt
    }

    pub fn set_recovery_alt_bands(&mut self, flag: bool) {
        self.recovery_alt = flag;
    }

    pub fn is_enabled_collision_avoidance_bands(&self) -> bool {
        self.ca_bands
    }

    pub fn set_collision_avoidance_bands(&mut self, flag: bool) {
        self.ca_bands = flag;
    }

    pub fn collision_avoidance_bands_factor(&self) -> f64 {
        self.ca_factor
    }

    /// Must lie strictly between 0 and 1.
    pub fn set_collision_avoidance_bands_factor(&mut self, val: f64) -> bool {
        let ok = accept("set_collision_avoidance_bands_factor", val, val > 0.0 && val < 1.0);
        if ok {
            self.ca_factor = val;
        }
        ok
    }

    pub fn horizontal_contour_threshold(&self) -> f64 {
        self.contour_thr
    }

    pub fn set_horizontal_contour_threshold(&mut self, val: f64) -> bool {
        let ok = accept("set_horizontal_contour_threshold", val, val.abs() <= PI + ANGLE_SLACK);
        if ok {
            self.contour_thr = val.abs().min(PI);
        }
        ok
    }

    fn numeric_fields(&self) -> [(&'static str, f64, &'static str); 25] {
        [
            ("lookahead_time", self.lookahead_time, "s"),
            ("left_trk", self.left_trk, "deg"),
            ("right_trk", self.right_trk, "deg"),
            ("min_gs", self.min_gs, "knot"),
            ("max_gs", self.max_gs, "knot"),
            ("min_vs", self.min_vs, "fpm"),
            ("max_vs", self.max_vs, "fpm"),
            ("min_alt", self.min_alt, "ft"),
            ("max_alt", self.max_alt, "ft"),
            ("trk_step", self.trk_step, "deg"),
            ("gs_step", self.gs_step, "knot"),
            ("vs_step", self.vs_step, "fpm"),
            ("alt_step", self.alt_step, "ft"),
            ("horizontal_accel", self.horizontal_accel, "m/s^2"),
            ("vertical_accel", self.vertical_accel, "G"),
            ("turn_rate", self.turn_rate, "deg/s"),
            ("bank_angle", self.bank_angle, "deg"),
            ("vertical_rate", self.vertical_rate, "fpm"),
            ("horizontal_nmac", self.horizontal_nmac, "ft"),
            ("vertical_nmac", self.vertical_nmac, "ft"),
            ("recovery_stability_time", self.recovery_stability_time, "s"),
            ("min_horizontal_recovery", self.min_horizontal_recovery, "nmi"),
            ("min_vertical_recovery", self.min_vertical_recovery, "ft"),
            ("ca_factor", self.ca_factor, "unitless"),
            ("contour_thr", self.contour_thr, "deg"),
        ]
    }

    fn flag_fields(&self) -> [(&'static str, bool); 7] {
        [
            ("conflict_crit", self.conflict_crit),
            ("recovery_crit", self.recovery_crit),
            ("recovery_trk", self.recovery_trk),
            ("recovery_gs", self.recovery_gs),
            ("recovery_vs", self.recovery_vs),
            ("recovery_alt", self.recovery_alt),
            ("ca_bands", self.ca_bands),
        ]
    }

    pub fn parameters(&self) -> ParameterData {
        let mut p = ParameterData::new();
        self.update_parameter_data(&mut p);
        p
    }

    /// Write every setting and the alert level table into `p`.
    pub fn update_parameter_data(&self, p: &mut ParameterData) {
        for (key, value, unit) in self.numeric_fields() {
            p.set_internal(key, value, unit);
        }
        for (key, flag) in self.flag_fields() {
            p.set_bool(key, flag);
        }
        self.alertor.update_parameter_data(p);
    }

    fn apply_number(&mut self, key: &str, val: f64) -> bool {
        match key {
            "lookahead_time" => self.set_lookahead_time(val),
            "left_trk" => self.set_left_trk(val),
            "right_trk" => self.set_right_trk(val),
            "min_gs" => self.set_min_gs(val),
            "max_gs" => self.set_max_gs(val),
            "min_vs" => {
                self.set_min_vs(val);
                true
            }
            "max_vs" => {
                self.set_max_vs(val);
                true
            }
            "min_alt" => self.set_min_alt(val),
            "max_alt" => self.set_max_alt(val),
            "trk_step" => self.set_trk_step(val),
            "gs_step" => self.set_gs_step(val),
            "vs_step" => self.set_vs_step(val),
            "alt_step" => self.set_alt_step(val),
            "horizontal_accel" => self.set_horizontal_accel(val),
            "vertical_accel" => self.set_vertical_accel(val),
            // Both keys are stored together; neither clears the other here
            "turn_rate" => {
                let ok = accept("set_turn_rate", val, val >= 0.0);
                if ok {
                    self.turn_rate = val;
                }
                ok
            }
            "bank_angle" => {
                let ok = accept("set_bank_angle", val, val >= 0.0);
                if ok {
                    self.bank_angle = val;
                }
                ok
            }
            "vertical_rate" => self.set_vertical_rate(val),
            "horizontal_nmac" => self.set_horizontal_nmac(val),
            "vertical_nmac" => self.set_vertical_nmac(val),
            "recovery_stability_time" => self.set_recovery_stability_time(val),
            "min_horizontal_recovery" => self.set_min_horizontal_recovery(val),
            "min_vertical_recovery" => self.set_min_vertical_recovery(val),
            "ca_factor" => self.set_collision_avoidance_bands_factor(val),
            "contour_thr" => self.set_horizontal_contour_threshold(val),
            _ => false,
        }
    }

    fn apply_flag(&mut self, key: &str, flag: bool) {
        match key {
            "conflict_crit" => self.conflict_crit = flag,
            "recovery_crit" => self.recovery_crit = flag,
            "recovery_trk" => self.recovery_trk = flag,
            "recovery_gs" => self.recovery_gs = flag,
            "recovery_vs" => self.recovery_vs = flag,
            "recovery_alt" => self.recovery_alt = flag,
            "ca_bands" => self.ca_bands = flag,
            _ => {}
        }
    }

    /// Read the keys present in `p`. Rejected values are logged and skipped;
    /// malformed entries fail the whole update and leave `self` unchanged.
    pub fn set_parameters(&mut self, p: &ParameterData) -> Result<(), ParameterError> {
        let mut next = self.clone();
        let numeric: Vec<&'static str> = self.numeric_fields().iter().map(|f| f.0).collect();
        for key in numeric {
            if p.contains(key) {
                next.apply_number(key, p.value(key)?);
            }
        }
        let flags: Vec<&'static str> = self.flag_fields().iter().map(|f| f.0).collect();
        for key in flags {
            if p.contains(key) {
                next.apply_flag(key, p.bool(key)?);
            }
        }
        next.alertor.set_parameters(p)?;
        *self = next;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParameterError> {
        let mut params = Self::default();
        params.set_parameters(&ParameterData::load(path)?)?;
        Ok(params)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ParameterError> {
        self.parameters().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = KinematicBandsParameters::default();
        assert_eq!(p.lookahead_time(), 180.0);
        assert_eq!(p.left_trk(), PI);
        assert!((units::to("knot", p.max_gs()) - 700.0).abs() < 1e-9);
        assert!((units::to("ft", p.min_alt()) - 500.0).abs() < 1e-9);
        assert_eq!(p.min_horizontal_recovery(), 0.0);
        assert!(!p.is_enabled_conflict_criteria());
        assert!(p.is_enabled_recovery_trk_bands());
        assert!(p.alertor().is_empty());
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut p = KinematicBandsParameters::default();
        assert!(!p.set_lookahead_time(0.0));
        assert!(!p.set_lookahead_time(-5.0));
        assert_eq!(p.lookahead_time(), 180.0);
        assert!(!p.set_left_trk(4.0));
        assert!(p.set_left_trk(-1.0));
        assert_eq!(p.left_trk(), 1.0);
        assert!(!p.set_trk_step(0.0));
        assert!(!p.set_collision_avoidance_bands_factor(1.0));
        assert!(p.set_collision_avoidance_bands_factor(0.5));
        assert!(!p.set_min_horizontal_recovery(-1.0));
    }

    #[test]
    fn test_turn_rate_and_bank_angle_exclusive() {
        let mut p = KinematicBandsParameters::default();
        assert!(p.set_bank_angle(units::from("deg", 30.0)));
        assert_eq!(p.turn_rate(), 0.0);
        assert!(p.set_turn_rate(units::from("deg/s", 1.5)));
        assert_eq!(p.bank_angle(), 0.0);
    }

    #[test]
    fn test_mops_presets() {
        let p = KinematicBandsParameters::wc_sc_228_mops();
        assert_eq!(p.alertor().len(), 3);
        assert_eq!(p.turn_rate(), 0.0);
        assert_eq!(p.horizontal_accel(), 0.0);
        assert!(!p.is_enabled_collision_avoidance_bands());
        assert!((units::to("nmi", p.min_horizontal_recovery()) - 0.66).abs() < 1e-9);
        assert!((units::to("ft", p.min_vertical_recovery()) - 450.0).abs() < 1e-9);

        let slow = KinematicBandsParameters::buffered_wc_sc_228_mops(false);
        assert!((units::to("deg/s", slow.turn_rate()) - 1.5).abs() < 1e-9);
        assert!(slow.is_enabled_collision_avoidance_bands());
        assert_eq!(slow.collision_avoidance_bands_factor(), 0.2);
        assert!((units::to("nmi", slow.min_horizontal_recovery()) - 1.0).abs() < 1e-9);
        let fast = KinematicBandsParameters::buffered_wc_sc_228_mops(true);
        assert!((units::to("deg/s", fast.turn_rate()) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_parameters_skips_rejected_values() {
        let mut data = ParameterData::new();
        data.set_value("lookahead_time", -3.0, "s");
        data.set_value("max_alt", 30000.0, "ft");
        data.set_bool("conflict_crit", true);
        let mut p = KinematicBandsParameters::default();
        p.set_parameters(&data).unwrap();
        assert_eq!(p.lookahead_time(), 180.0);
        assert!((units::to("ft", p.max_alt()) - 30000.0).abs() < 1e-9);
        assert!(p.is_enabled_conflict_criteria());

        data.set_string("recovery_crit", "yes");
        assert!(p.set_parameters(&data).is_err());
        assert!(!p.is_enabled_recovery_criteria());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let mut original = KinematicBandsParameters::buffered_wc_sc_228_mops(true);
        original.set_recovery_criteria(true);
        original.set_lookahead_time(120.0);
        original.save_to_file(&path).unwrap();

        let loaded = KinematicBandsParameters::load_from_file(&path).unwrap();
        assert!((loaded.lookahead_time() - 120.0).abs() < 1e-9);
        assert!(loaded.is_enabled_recovery_criteria());
        assert!((loaded.turn_rate() - original.turn_rate()).abs() < 1e-12);
        assert_eq!(loaded.alertor().len(), 3);
        assert_eq!(loaded.alertor().conflict_alert_level(), 2);
        assert!(loaded.parameters().almost_equals(&original.parameters()));
    }
}
