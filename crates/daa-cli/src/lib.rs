//! DAA CLI - command line tools for the detect-and-avoid alerting core.
//!
//! The `daa` binary evaluates encounter files and built-in scenarios,
//! exports parameter presets and prints TCAS II thresholds.

pub mod encounter;
pub mod presets;
pub mod report;
pub mod scenarios;

pub use encounter::{AircraftRecord, Encounter, Position};
pub use presets::Preset;
pub use report::{AlertReport, LevelReport, TcasReport};
pub use scenarios::{Scenario, ScenarioKind};

use anyhow::{Context, Result};
use daa_core::{KinematicBandsCore, KinematicBandsParameters, ParameterData};
use std::path::Path;

/// Preset parameters, overridden by the keys present in `overrides`.
pub fn load_parameters(
    preset: Preset,
    overrides: Option<&Path>,
) -> Result<KinematicBandsParameters> {
    let mut params = preset.parameters();
    if let Some(path) = overrides {
        let data = ParameterData::load(path)
            .with_context(|| format!("failed to load parameters {}", path.display()))?;
        params
            .set_parameters(&data)
            .with_context(|| format!("invalid parameters in {}", path.display()))?;
    }
    Ok(params)
}

/// Run one alerting cycle for `encounter`.
pub fn evaluate(encounter: &Encounter, params: KinematicBandsParameters) -> Result<AlertReport> {
    let mut core = KinematicBandsCore::new(params);
    encounter.apply(&mut core)?;
    Ok(AlertReport::from_core(&core))
}

#[cfg(test)]
mod tests {
    use super::*;
    use daa_core::units;

    #[test]
    fn test_overrides_layer_on_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let mut data = ParameterData::new();
        data.set_value("lookahead_time", 20.0, "s");
        data.save(&path).unwrap();

        let params = load_parameters(Preset::WcSc228, Some(&path)).unwrap();
        assert_eq!(params.lookahead_time(), 20.0);
        assert!((units::to("nmi", params.min_horizontal_recovery()) - 0.66).abs() < 1e-9);

        let scenario = ScenarioKind::HeadOn.build(
            scenarios::DEFAULT_CENTER_LAT,
            scenarios::DEFAULT_CENTER_LON,
        );
        let report = evaluate(&scenario.encounter, params).unwrap();
        assert_eq!(report.alert_level, 0);
    }

    #[test]
    fn test_missing_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_parameters(Preset::WcSc228, Some(&dir.path().join("nope.json")));
        assert!(err.is_err());
    }
}
