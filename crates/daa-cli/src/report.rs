//! Alerting summaries printed by the `daa` binary.

use daa_core::{units, KinematicBandsCore, TcasTable};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    pub level: usize,
    pub region: String,
    pub conflict_aircraft: Vec<String>,
    /// `[time_in, time_out]` in seconds, absent when no aircraft violates
    pub violation: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReport {
    pub ownship: String,
    pub alert_level: usize,
    pub levels: Vec<LevelReport>,
    pub epsilon_h: i32,
    pub epsilon_v: i32,
    pub min_horizontal_recovery_nmi: f64,
    pub min_vertical_recovery_ft: f64,
}

impl AlertReport {
    pub fn from_core(core: &KinematicBandsCore) -> Self {
        let alertor = core.parameters().alertor();
        let levels = (1..=alertor.most_severe_alert_level())
            .map(|level| {
                let interval = core.time_interval_of_violation(level);
                LevelReport {
                    level,
                    region: alertor.level(level).region().to_string(),
                    conflict_aircraft: core
                        .conflict_aircraft(level)
                        .iter()
                        .map(|ac| ac.id.clone())
                        .collect(),
                    violation: (!interval.is_empty()).then_some([interval.lo, interval.up]),
                }
            })
            .collect();

        Self {
            ownship: core.ownship().id.clone(),
            alert_level: core.current_alert_level(),
            levels,
            epsilon_h: core.epsilon_h(),
            epsilon_v: core.epsilon_v(),
            min_horizontal_recovery_nmi: units::to("nmi", core.min_horizontal_recovery()),
            min_vertical_recovery_ft: units::to("ft", core.min_vertical_recovery()),
        }
    }
}

impl fmt::Display for AlertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ownship {}: alert level {}", self.ownship, self.alert_level)?;
        for level in &self.levels {
            let window = match level.violation {
                Some([lo, up]) => format!("[{lo:.1}, {up:.1}] s"),
                None => "none".to_string(),
            };
            let aircraft = if level.conflict_aircraft.is_empty() {
                "-".to_string()
            } else {
                level.conflict_aircraft.join(", ")
            };
            writeln!(
                f,
                "  level {} ({}): conflicts {} | violation {}",
                level.level, level.region, aircraft, window
            )?;
        }
        writeln!(f, "  epsilon h/v: {}/{}", self.epsilon_h, self.epsilon_v)?;
        write!(
            f,
            "  recovery minimums: {:.2} nmi, {:.0} ft",
            self.min_horizontal_recovery_nmi, self.min_vertical_recovery_ft
        )
    }
}

/// TCAS II thresholds at one altitude. Thresholds that do not apply
/// at the level are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TcasReport {
    pub advisory: &'static str,
    pub altitude_ft: f64,
    pub sensitivity_level: usize,
    pub tau_s: Option<f64>,
    pub tcoa_s: Option<f64>,
    pub dmod_nmi: Option<f64>,
    pub zthr_ft: Option<f64>,
    pub hmd_ft: Option<f64>,
}

fn applicable(v: f64) -> Option<f64> {
    (v > 0.0).then_some(v)
}

impl TcasReport {
    pub fn new(altitude_ft: f64, ta: bool) -> Self {
        let table = if ta { TcasTable::ta() } else { TcasTable::ra() };
        let sl = TcasTable::sensitivity_level(units::from("ft", altitude_ft));
        Self {
            advisory: if ta { "TA" } else { "RA" },
            altitude_ft,
            sensitivity_level: sl,
            tau_s: applicable(table.tau_in(sl, "s")),
            tcoa_s: applicable(table.tcoa_in(sl, "s")),
            dmod_nmi: applicable(table.dmod_in(sl, "nmi")),
            zthr_ft: applicable(table.zthr_in(sl, "ft")),
            hmd_ft: applicable(table.hmd_in(sl, "ft")),
        }
    }
}

impl fmt::Display for TcasReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>, unit: &str| match v {
            Some(v) => format!("{v:.2} {unit}"),
            None => "n/a".to_string(),
        };
        writeln!(
            f,
            "{} thresholds at {:.0} ft: sensitivity level {}",
            self.advisory, self.altitude_ft, self.sensitivity_level
        )?;
        writeln!(f, "  TAU  {}", show(self.tau_s, "s"))?;
        writeln!(f, "  TCOA {}", show(self.tcoa_s, "s"))?;
        writeln!(f, "  DMOD {}", show(self.dmod_nmi, "nmi"))?;
        writeln!(f, "  ZTHR {}", show(self.zthr_ft, "ft"))?;
        write!(f, "  HMD  {}", show(self.hmd_ft, "ft"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{ScenarioKind, DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON};
    use daa_core::KinematicBandsParameters;

    #[test]
    fn test_head_on_report() {
        let scenario = ScenarioKind::HeadOn.build(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON);
        let mut core = KinematicBandsCore::new(KinematicBandsParameters::wc_sc_228_mops());
        scenario.encounter.apply(&mut core).unwrap();
        let report = AlertReport::from_core(&core);

        assert_eq!(report.ownship, "OWN");
        assert_eq!(report.alert_level, 2);
        assert_eq!(report.levels.len(), 3);
        assert_eq!(report.levels[0].region, "NONE");
        assert!(report.levels[0].conflict_aircraft.is_empty());
        assert!(report.levels[0].violation.is_some());
        assert_eq!(report.levels[1].conflict_aircraft, vec!["AC1".to_string()]);
        assert!((report.min_horizontal_recovery_nmi - 0.66).abs() < 1e-9);

        let text = report.to_string();
        assert!(text.contains("alert level 2"));
        assert!(text.contains("level 2 (MID): conflicts AC1"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["levels"][2]["region"], "NEAR");
    }

    #[test]
    fn test_empty_core_report() {
        let core = KinematicBandsCore::new(KinematicBandsParameters::wc_sc_228_mops());
        let report = AlertReport::from_core(&core);
        assert_eq!(report.alert_level, 0);
        assert!(report.levels.iter().all(|l| l.violation.is_none()));
        assert!(report.to_string().contains("violation none"));
    }

    #[test]
    fn test_tcas_report() {
        let ra = TcasReport::new(8000.0, false);
        assert_eq!(ra.sensitivity_level, 5);
        assert_eq!(ra.tau_s, Some(25.0));
        assert!((ra.dmod_nmi.unwrap() - 0.55).abs() < 1e-9);
        assert!((ra.zthr_ft.unwrap() - 600.0).abs() < 1e-9);

        let low = TcasReport::new(500.0, false);
        assert_eq!(low.sensitivity_level, 2);
        assert_eq!(low.tau_s, None);
        assert!(low.to_string().contains("TAU  n/a"));

        let ta = TcasReport::new(500.0, true);
        assert_eq!(ta.tau_s, Some(20.0));
        assert!((ta.hmd_ft.unwrap() - units::to("ft", units::from("nmi", 0.30))).abs() < 1e-6);
    }

    #[test]
    fn test_tcas_report_hmd_in_feet() {
        let ra = TcasReport::new(8000.0, false);
        assert!((ra.hmd_ft.unwrap() - 3342.0).abs() < 1e-6);
        assert!(ra.to_string().contains("HMD  3342.00 ft"));

        let low = TcasReport::new(500.0, false);
        assert_eq!(low.hmd_ft, None);
        assert_eq!(low.dmod_nmi, None);
        assert!(low.to_string().contains("HMD  n/a"));
    }
}
