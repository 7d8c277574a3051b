//! TCAS II resolution/traffic advisory thresholds by sensitivity level.
//!
//! Thresholds are indexed by sensitivity level 1..=7. Thresholds that do
//! not apply at a level are stored as `0`. Every getter returns
//! [`NOT_APPLICABLE`] for a level outside the table.

use crate::error::ParameterError;
use crate::parameter_data::ParameterData;
use crate::units::{self, FT, NMI};

/// Number of sensitivity levels.
pub const LEVELS: usize = 7;

/// Returned for levels outside 1..=7.
pub const NOT_APPLICABLE: f64 = -1.0;

/// Threshold that does not apply at a level.
const NA: f64 = 0.0;

/// Upper altitude bound of sensitivity levels 1..=6; level 7 is unbounded.
const LEVEL_CEILINGS: [f64; LEVELS - 1] = [
    0.0,
    1000.0 * FT,
    2350.0 * FT,
    5000.0 * FT,
    10000.0 * FT,
    20000.0 * FT,
];

const TA_TAU: [f64; LEVELS] = [NA, 20.0, 25.0, 30.0, 40.0, 45.0, 48.0];
const RA_TAU: [f64; LEVELS] = [NA, NA, 15.0, 20.0, 25.0, 30.0, 35.0];

const TA_DMOD: [f64; LEVELS] = [
    NA,
    0.30 * NMI,
    0.33 * NMI,
    0.48 * NMI,
    0.75 * NMI,
    1.0 * NMI,
    1.3 * NMI,
];
const RA_DMOD: [f64; LEVELS] = [
    NA,
    NA,
    0.2 * NMI,
    0.35 * NMI,
    0.55 * NMI,
    0.8 * NMI,
    1.1 * NMI,
];

const TA_ZTHR: [f64; LEVELS] = [
    NA,
    850.0 * FT,
    850.0 * FT,
    850.0 * FT,
    850.0 * FT,
    850.0 * FT,
    850.0 * FT,
];
const RA_ZTHR: [f64; LEVELS] = [
    NA,
    NA,
    600.0 * FT,
    600.0 * FT,
    600.0 * FT,
    600.0 * FT,
    700.0 * FT,
];

const RA_HMD: [f64; LEVELS] = [
    NA,
    NA,
    1215.0 * FT,
    2126.0 * FT,
    3342.0 * FT,
    4861.0 * FT,
    6683.0 * FT,
];

const RA_TABLE: TcasTable = TcasTable {
    tau: RA_TAU,
    tcoa: RA_TAU,
    dmod: RA_DMOD,
    zthr: RA_ZTHR,
    hmd: RA_HMD,
    hmd_filter: true,
};

const TA_TABLE: TcasTable = TcasTable {
    tau: TA_TAU,
    tcoa: TA_TAU,
    dmod: TA_DMOD,
    zthr: TA_ZTHR,
    hmd: TA_DMOD,
    hmd_filter: false,
};

/// TAU, TCOA, DMOD, ZTHR and HMD per sensitivity level, internal units.
#[derive(Debug, Clone, PartialEq)]
pub struct TcasTable {
    tau: [f64; LEVELS],
    tcoa: [f64; LEVELS],
    dmod: [f64; LEVELS],
    zthr: [f64; LEVELS],
    hmd: [f64; LEVELS],
    hmd_filter: bool,
}

impl Default for TcasTable {
    fn default() -> Self {
        Self::ra()
    }
}

fn slot(level: usize) -> Option<usize> {
    (1..=LEVELS).contains(&level).then(|| level - 1)
}

fn lookup(table: &[f64; LEVELS], level: usize) -> f64 {
    slot(level).map_or(NOT_APPLICABLE, |i| table[i])
}

fn store(table: &mut [f64; LEVELS], level: usize, value: f64) -> bool {
    match slot(level) {
        Some(i) => {
            table[i] = value;
            true
        }
        None => false,
    }
}

fn lookup_in(table: &[f64; LEVELS], level: usize, unit: &str) -> f64 {
    let v = lookup(table, level);
    if v < 0.0 {
        v
    } else {
        units::to(unit, v)
    }
}

impl TcasTable {
    /// Resolution advisory defaults.
    pub fn ra() -> Self {
        RA_TABLE
    }

    /// Traffic advisory defaults.
    pub fn ta() -> Self {
        TA_TABLE
    }

    /// Reset every threshold to the RA (`true`) or TA (`false`) defaults.
    pub fn set_default_ra_thresholds(&mut self, ra: bool) {
        *self = if ra { RA_TABLE } else { TA_TABLE };
    }

    /// Sensitivity level for an altitude in meters. NaN maps to the top level.
    pub fn sensitivity_level(altitude: f64) -> usize {
        LEVEL_CEILINGS
            .iter()
            .position(|ceiling| altitude <= *ceiling)
            .map_or(LEVELS, |i| i + 1)
    }

    pub fn tau(&self, level: usize) -> f64 {
        lookup(&self.tau, level)
    }

    pub fn tcoa(&self, level: usize) -> f64 {
        lookup(&self.tcoa, level)
    }

    pub fn dmod(&self, level: usize) -> f64 {
        lookup(&self.dmod, level)
    }

    pub fn zthr(&self, level: usize) -> f64 {
        lookup(&self.zthr, level)
    }

    pub fn hmd(&self, level: usize) -> f64 {
        lookup(&self.hmd, level)
    }

    /// Value in `unit`; not-applicable sentinels are returned unconverted.
    pub fn tau_in(&self, level: usize, unit: &str) -> f64 {
        lookup_in(&self.tau, level, unit)
    }

    pub fn tcoa_in(&self, level: usize, unit: &str) -> f64 {
        lookup_in(&self.tcoa, level, unit)
    }

    pub fn dmod_in(&self, level: usize, unit: &str) -> f64 {
        lookup_in(&self.dmod, level, unit)
    }

    pub fn zthr_in(&self, level: usize, unit: &str) -> f64 {
        lookup_in(&self.zthr, level, unit)
    }

    pub fn hmd_in(&self, level: usize, unit: &str) -> f64 {
        lookup_in(&self.hmd, level, unit)
    }

    pub fn hmd_filter(&self) -> bool {
        self.hmd_filter
    }

    pub fn set_hmd_filter(&mut self, flag: bool) {
        self.hmd_filter = flag;
    }

    /// Returns false when `level` is outside the table.
    pub fn set_tau(&mut self, level: usize, value: f64) -> bool {
        store(&mut self.tau, level, value)
    }

    pub fn set_tcoa(&mut self, level: usize, value: f64) -> bool {
        store(&mut self.tcoa, level, value)
    }

    pub fn set_dmod(&mut self, level: usize, value: f64) -> bool {
        store(&mut self.dmod, level, value)
    }

    pub fn set_zthr(&mut self, level: usize, value: f64) -> bool {
        store(&mut self.zthr, level, value)
    }

    pub fn set_hmd(&mut self, level: usize, value: f64) -> bool {
        store(&mut self.hmd, level, value)
    }

    pub fn set_tau_all(&mut self, value: f64) {
        self.tau = [value; LEVELS];
    }

    pub fn set_tcoa_all(&mut self, value: f64) {
        self.tcoa = [value; LEVELS];
    }

    pub fn set_dmod_all(&mut self, value: f64) {
        self.dmod = [value; LEVELS];
    }

    pub fn set_zthr_all(&mut self, value: f64) {
        self.zthr = [value; LEVELS];
    }

    pub fn set_hmd_all(&mut self, value: f64) {
        self.hmd = [value; LEVELS];
    }

    pub fn is_ra_standard(&self) -> bool {
        *self == RA_TABLE
    }

    pub fn is_ta_standard(&self) -> bool {
        *self == TA_TABLE
    }

    /// Every threshold of `self` is at least the matching one of `other`,
    /// and `self` filters on HMD only if `other` does.
    pub fn contains(&self, other: &TcasTable) -> bool {
        let covers = |a: &[f64; LEVELS], b: &[f64; LEVELS]| a.iter().zip(b).all(|(x, y)| x >= y);
        covers(&self.tau, &other.tau)
            && covers(&self.tcoa, &other.tcoa)
            && covers(&self.dmod, &other.dmod)
            && covers(&self.zthr, &other.zthr)
            && covers(&self.hmd, &other.hmd)
            && (!self.hmd_filter || other.hmd_filter)
    }

    fn columns(&self) -> [(&'static str, &[f64; LEVELS], &'static str); 5] {
        [
            ("TAU", &self.tau, "s"),
            ("TCOA", &self.tcoa, "s"),
            ("DMOD", &self.dmod, "nmi"),
            ("ZTHR", &self.zthr, "ft"),
            ("HMD", &self.hmd, "ft"),
        ]
    }

    pub fn parameters(&self) -> ParameterData {
        let mut p = ParameterData::new();
        self.update_parameter_data(&mut p);
        p
    }

    /// Write every threshold under `TCAS_<FIELD>_<level>` keys.
    pub fn update_parameter_data(&self, p: &mut ParameterData) {
        p.set_bool("TCAS_HMDFilter", self.hmd_filter);
        for (name, column, unit) in self.columns() {
            for (i, v) in column.iter().enumerate() {
                p.set_internal(format!("TCAS_{name}_{}", i + 1), *v, unit);
            }
        }
    }

    /// Read the `TCAS_*` keys present in `p`. On error the table is unchanged.
    pub fn set_parameters(&mut self, p: &ParameterData) -> Result<(), ParameterError> {
        let mut next = self.clone();
        if p.contains("TCAS_HMDFilter") {
            next.hmd_filter = p.bool("TCAS_HMDFilter")?;
        }
        let columns: [(&str, &mut [f64; LEVELS]); 5] = [
            ("TAU", &mut next.tau),
            ("TCOA", &mut next.tcoa),
            ("DMOD", &mut next.dmod),
            ("ZTHR", &mut next.zthr),
            ("HMD", &mut next.hmd),
        ];
        for (name, column) in columns {
            for (i, slot) in column.iter_mut().enumerate() {
                let key = format!("TCAS_{name}_{}", i + 1);
                if p.contains(&key) {
                    let v = p.value(&key)?;
                    *slot = v.max(0.0);
                }
            }
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_level_bands() {
        assert_eq!(TcasTable::sensitivity_level(-10.0), 1);
        assert_eq!(TcasTable::sensitivity_level(0.0), 1);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 500.0)), 2);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 1000.0)), 2);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 2000.0)), 3);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 4000.0)), 4);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 8000.0)), 5);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 15000.0)), 6);
        assert_eq!(TcasTable::sensitivity_level(units::from("ft", 45000.0)), 7);
        assert_eq!(TcasTable::sensitivity_level(f64::NAN), 7);
    }

    #[test]
    fn test_sensitivity_level_monotonic() {
        let mut last = 1;
        let mut alt = -1000.0;
        while alt < 20_000.0 {
            let sl = TcasTable::sensitivity_level(alt);
            assert!((1..=LEVELS).contains(&sl));
            assert!(sl >= last);
            last = sl;
            alt += 7.5;
        }
        assert_eq!(TcasTable::sensitivity_level(f64::MAX), 7);
        assert_eq!(TcasTable::sensitivity_level(f64::MIN), 1);
    }

    #[test]
    fn test_ra_values_and_out_of_range() {
        let ra = TcasTable::ra();
        assert_eq!(ra.tau(3), 15.0);
        assert_eq!(ra.tau(7), 35.0);
        assert!((ra.hmd_in(5, "ft") - 3342.0).abs() < 1e-9);
        assert!((ra.zthr_in(7, "ft") - 700.0).abs() < 1e-9);
        assert!((ra.dmod_in(4, "nmi") - 0.35).abs() < 1e-12);
        assert_eq!(ra.hmd(2), 0.0);
        assert_eq!(ra.tau(0), NOT_APPLICABLE);
        assert_eq!(ra.zthr(8), NOT_APPLICABLE);
        assert_eq!(ra.dmod_in(1, "nmi"), NOT_APPLICABLE);
        assert!(ra.hmd_filter());
    }

    #[test]
    fn test_inapplicable_thresholds_are_zero() {
        let ra = TcasTable::ra();
        for level in 1..=2 {
            assert_eq!(ra.tau(level), 0.0);
            assert_eq!(ra.tcoa(level), 0.0);
            assert_eq!(ra.dmod(level), 0.0);
            assert_eq!(ra.zthr(level), 0.0);
            assert_eq!(ra.hmd(level), 0.0);
            assert_eq!(ra.hmd_in(level, "ft"), 0.0);
        }
        let ta = TcasTable::ta();
        assert_eq!(ta.tau(1), 0.0);
        assert_eq!(ta.zthr(1), 0.0);
        assert_eq!(ta.dmod_in(1, "nmi"), 0.0);
        assert_eq!(ta.tau(8), NOT_APPLICABLE);
        assert_eq!(ta.hmd_in(0, "ft"), NOT_APPLICABLE);

        let p = ra.parameters();
        assert_eq!(p.value("TCAS_HMD_2").unwrap(), 0.0);
        let mut t = TcasTable::ta();
        t.set_parameters(&p).unwrap();
        assert_eq!(t.tau(2), 0.0);
        assert_eq!(t.hmd(1), 0.0);
        assert_eq!(t.tau(3), 15.0);
    }

    #[test]
    fn test_standard_detection() {
        let mut t = TcasTable::ra();
        assert!(t.is_ra_standard());
        assert!(!t.is_ta_standard());
        assert!(t.set_tau(4, 21.0));
        assert!(!t.set_tau(9, 21.0));
        assert!(!t.is_ra_standard());
        t.set_default_ra_thresholds(false);
        assert!(t.is_ta_standard());
        t.set_default_ra_thresholds(true);
        assert!(t.is_ra_standard());
    }

    #[test]
    fn test_contains() {
        let ra = TcasTable::ra();
        let mut bigger = ra.clone();
        bigger.set_hmd_all(units::from("ft", 10_000.0));
        bigger.set_hmd_filter(false);
        assert!(bigger.contains(&ra));
        assert!(!ra.contains(&bigger));
        assert!(ra.contains(&ra));
        assert!(TcasTable::ta().contains(&TcasTable::ta()));
    }

    #[test]
    fn test_parameters_round_trip() {
        let mut custom = TcasTable::ta();
        custom.set_zthr(3, units::from("ft", 900.0));
        custom.set_hmd_filter(true);
        let p = custom.parameters();
        assert!(p.contains("TCAS_ZTHR_3"));
        assert_eq!(p.unit("TCAS_DMOD_2"), Some("nmi"));

        let mut t = TcasTable::ra();
        t.set_parameters(&p).unwrap();
        assert_eq!(t.tau(1), 0.0);
        assert!((t.zthr_in(3, "ft") - 900.0).abs() < 1e-9);
        assert!(t.hmd_filter());
        assert!(!t.is_ta_standard());
    }

    #[test]
    fn test_set_parameters_is_atomic() {
        let mut p = ParameterData::new();
        p.set_value("TCAS_TAU_3", 99.0, "s");
        p.set_string("TCAS_TAU_4", "soon");
        let mut t = TcasTable::ra();
        assert!(t.set_parameters(&p).is_err());
        assert!(t.is_ra_standard());
    }
}
