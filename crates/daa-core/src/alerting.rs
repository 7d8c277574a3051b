//! Alert levels and their thresholds.
//!
//! An [`AlertLevels`] table lists one [`AlertThresholds`] per level,
//! conventionally from least to most severe, and designates one of them as
//! the conflict level that bands are computed against.

use crate::detection::{detector_from_class, Detection3D, WcvTauMod};
use crate::error::ParameterError;
use crate::models::BandsRegion;
use crate::parameter_data::ParameterData;
use crate::units;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

static INVALID_THRESHOLDS: AlertThresholds = AlertThresholds {
    detector: None,
    alerting_time: 0.0,
    early_alerting_time: 0.0,
    region: BandsRegion::None,
    spread_trk: 0.0,
    spread_gs: 0.0,
    spread_vs: 0.0,
    spread_alt: 0.0,
};

/// Definition of one alert level.
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    detector: Option<Box<dyn Detection3D>>,
    /// Seconds before loss of well-clear at which the alert is issued
    alerting_time: f64,
    /// Seconds of lookahead used to compute bands for this level
    early_alerting_time: f64,
    region: BandsRegion,
    /// Track spread (rad)
    spread_trk: f64,
    /// Ground speed spread (m/s)
    spread_gs: f64,
    /// Vertical speed spread (m/s)
    spread_vs: f64,
    /// Altitude spread (m)
    spread_alt: f64,
}

impl AlertThresholds {
    /// Alerting time is taken in absolute value; the early alerting time is
    /// raised to at least the alerting time.
    pub fn new(
        detector: Box<dyn Detection3D>,
        alerting_time: f64,
        early_alerting_time: f64,
        region: BandsRegion,
    ) -> Self {
        let alerting_time = alerting_time.abs();
        Self {
            detector: Some(detector),
            alerting_time,
            early_alerting_time: alerting_time.max(early_alerting_time),
            region,
            spread_trk: 0.0,
            spread_gs: 0.0,
            spread_vs: 0.0,
            spread_alt: 0.0,
        }
    }

    /// Shared sentinel for undefined levels. It has no detector.
    pub fn invalid() -> &'static AlertThresholds {
        &INVALID_THRESHOLDS
    }

    pub fn is_valid(&self) -> bool {
        self.detector.is_some()
    }

    /// Borrow the detector; ownership stays with the thresholds.
    pub fn detector(&self) -> Option<&dyn Detection3D> {
        self.detector.as_deref()
    }

    pub fn detector_mut(&mut self) -> Option<&mut (dyn Detection3D + 'static)> {
        self.detector.as_deref_mut()
    }

    pub fn set_detector(&mut self, detector: Box<dyn Detection3D>) {
        self.detector = Some(detector);
    }

    pub fn alerting_time(&self) -> f64 {
        self.alerting_time
    }

    pub fn set_alerting_time(&mut self, t: f64) {
        self.alerting_time = t.abs();
        self.early_alerting_time = self.early_alerting_time.max(self.alerting_time);
    }

    pub fn early_alerting_time(&self) -> f64 {
        self.early_alerting_time
    }

    pub fn set_early_alerting_time(&mut self, t: f64) {
        self.early_alerting_time = self.alerting_time.max(t);
    }

    pub fn region(&self) -> BandsRegion {
        self.region
    }

    pub fn set_region(&mut self, region: BandsRegion) {
        self.region = region;
    }

    pub fn spread_trk(&self) -> f64 {
        self.spread_trk
    }

    /// Clamped to `[0, π]`.
    pub fn set_spread_trk(&mut self, spread: f64) {
        self.spread_trk = spread.abs().min(PI);
    }

    pub fn spread_gs(&self) -> f64 {
        self.spread_gs
    }

    pub fn set_spread_gs(&mut self, spread: f64) {
        self.spread_gs = spread.abs();
    }

    pub fn spread_vs(&self) -> f64 {
        self.spread_vs
    }

    pub fn set_spread_vs(&mut self, spread: f64) {
        self.spread_vs = spread.abs();
    }

    pub fn spread_alt(&self) -> f64 {
        self.spread_alt
    }

    pub fn set_spread_alt(&mut self, spread: f64) {
        self.spread_alt = spread.abs();
    }
}

impl fmt::Display for AlertThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detector = self
            .detector
            .as_ref()
            .map_or("none", |d| d.class_name());
        write!(
            f,
            "{} alerting {:.0}s early {:.0}s region {}",
            detector, self.alerting_time, self.early_alerting_time, self.region
        )
    }
}

/// Ordered, 1-based table of alert levels.
#[derive(Debug, Clone, Default)]
pub struct AlertLevels {
    levels: Vec<AlertThresholds>,
    /// Explicit conflict level; 0 means unset
    conflict_level: usize,
}

fn mops_detector(dthr_nmi: f64, zthr_ft: f64, tcoa: f64) -> Box<dyn Detection3D> {
    Box::new(WcvTauMod::new(
        units::from("nmi", dthr_nmi),
        units::from("ft", zthr_ft),
        35.0,
        tcoa,
    ))
}

impl AlertLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// RTCA SC-228 preventive, corrective and warning levels.
    pub fn wc_sc_228() -> Self {
        let mut alertor = Self::new();
        alertor.add_level(AlertThresholds::new(
            mops_detector(0.66, 700.0, 0.0),
            55.0,
            75.0,
            BandsRegion::None,
        ));
        alertor.add_level(AlertThresholds::new(
            mops_detector(0.66, 450.0, 0.0),
            55.0,
            75.0,
            BandsRegion::Mid,
        ));
        alertor.add_level(AlertThresholds::new(
            mops_detector(0.66, 450.0, 0.0),
            25.0,
            55.0,
            BandsRegion::Near,
        ));
        alertor.set_conflict_alert_level(2);
        alertor
    }

    /// A single NEAR level with the SC-228 corrective volume.
    pub fn single_bands_wc_sc_228() -> Self {
        let mut alertor = Self::new();
        alertor.add_level(AlertThresholds::new(
            mops_detector(0.66, 450.0, 0.0),
            55.0,
            75.0,
            BandsRegion::Near,
        ));
        alertor
    }

    /// SC-228 levels with buffered well-clear volumes.
    pub fn buffered_wc_sc_228() -> Self {
        let mut alertor = Self::new();
        alertor.add_level(AlertThresholds::new(
            mops_detector(1.0, 750.0, 20.0),
            60.0,
            75.0,
            BandsRegion::None,
        ));
        alertor.add_level(AlertThresholds::new(
            mops_detector(1.0, 450.0, 20.0),
            60.0,
            75.0,
            BandsRegion::Mid,
        ));
        alertor.add_level(AlertThresholds::new(
            mops_detector(1.0, 450.0, 20.0),
            30.0,
            55.0,
            BandsRegion::Near,
        ));
        alertor.set_conflict_alert_level(2);
        alertor
    }

    /// A single NEAR level for `detector`.
    pub fn single_bands(
        detector: Box<dyn Detection3D>,
        alerting_time: f64,
        lookahead_time: f64,
    ) -> Self {
        let mut alertor = Self::new();
        alertor.add_level(AlertThresholds::new(
            detector,
            alerting_time,
            lookahead_time,
            BandsRegion::Near,
        ));
        alertor
    }

    /// Append a level and return the new number of levels.
    pub fn add_level(&mut self, thresholds: AlertThresholds) -> usize {
        self.levels.push(thresholds);
        self.levels.len()
    }

    /// Replace `level` in place. No-op outside `[1, len]`.
    pub fn set_level(&mut self, level: usize, thresholds: AlertThresholds) {
        if let Some(slot) = level.checked_sub(1).and_then(|i| self.levels.get_mut(i)) {
            *slot = thresholds;
        }
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.conflict_level = 0;
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn most_severe_alert_level(&self) -> usize {
        self.levels.len()
    }

    /// First level whose region is a conflict band, or 0.
    pub fn first_guidance_level(&self) -> usize {
        self.levels
            .iter()
            .position(|t| t.region.is_conflict_band())
            .map_or(0, |i| i + 1)
    }

    /// Last level whose region is a conflict band, or 0.
    pub fn last_guidance_level(&self) -> usize {
        self.levels
            .iter()
            .rposition(|t| t.region.is_conflict_band())
            .map_or(0, |i| i + 1)
    }

    /// The explicit conflict level when it is a valid level, otherwise the
    /// first guidance level.
    pub fn conflict_alert_level(&self) -> usize {
        if (1..=self.most_severe_alert_level()).contains(&self.conflict_level) {
            self.conflict_level
        } else {
            self.first_guidance_level()
        }
    }

    pub fn set_conflict_alert_level(&mut self, level: usize) {
        self.conflict_level = level;
    }

    /// Detector of `level`; level 0 resolves to the conflict level.
    pub fn detector(&self, level: usize) -> Option<&dyn Detection3D> {
        let level = if level == 0 {
            self.conflict_alert_level()
        } else {
            level
        };
        self.get(level)?.detector()
    }

    fn get(&self, level: usize) -> Option<&AlertThresholds> {
        self.levels.get(level.checked_sub(1)?)
    }

    /// Thresholds of `level`, or the shared invalid sentinel.
    pub fn level(&self, level: usize) -> &AlertThresholds {
        self.get(level).unwrap_or(&INVALID_THRESHOLDS)
    }

    pub fn level_mut(&mut self, level: usize) -> Option<&mut AlertThresholds> {
        self.levels.get_mut(level.checked_sub(1)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlertThresholds> {
        self.levels.iter()
    }

    pub fn parameters(&self) -> ParameterData {
        let mut p = ParameterData::new();
        self.update_parameter_data(&mut p);
        p
    }

    /// Write the table, plus one definition per distinct detector, into `p`.
    pub fn update_parameter_data(&self, p: &mut ParameterData) {
        p.set_int("conflict_level", self.conflict_level as i64);
        let mut defined: Vec<(String, &dyn Detection3D)> = Vec::new();
        for (i, t) in self.levels.iter().enumerate() {
            let n = i + 1;
            if let Some(det) = t.detector() {
                let id = detector_id(&mut defined, det, n);
                p.set_string(format!("alert_{n}_detector"), id);
            }
            p.set_internal(format!("alert_{n}_alerting_time"), t.alerting_time, "s");
            p.set_internal(
                format!("alert_{n}_early_alerting_time"),
                t.early_alerting_time,
                "s",
            );
            p.set_string(format!("alert_{n}_region"), t.region.as_str());
            p.set_internal(format!("alert_{n}_spread_trk"), t.spread_trk, "deg");
            p.set_internal(format!("alert_{n}_spread_gs"), t.spread_gs, "knot");
            p.set_internal(format!("alert_{n}_spread_vs"), t.spread_vs, "fpm");
            p.set_internal(format!("alert_{n}_spread_alt"), t.spread_alt, "ft");
        }
        for (id, det) in defined {
            p.set_string(format!("load_core_detection_{id}"), det.class_name());
            p.extend(det.parameters().with_prefix(&format!("{id}_")));
        }
    }

    /// Replace the table from `p`. Keys that are absent leave the matching
    /// setting untouched; on error nothing changes.
    pub fn set_parameters(&mut self, p: &ParameterData) -> Result<(), ParameterError> {
        let mut next = self.clone();
        if p.contains("conflict_level") {
            next.conflict_level = usize::try_from(p.int("conflict_level")?).unwrap_or(0);
        }
        if p.contains("alert_1_detector") {
            let detectors = load_detectors(p)?;
            next.levels.clear();
            let mut n = 1;
            while p.contains(&format!("alert_{n}_detector")) {
                next.levels.push(read_level(p, n, &detectors)?);
                n += 1;
            }
            tracing::debug!(levels = next.levels.len(), "alert levels loaded");
        }
        *self = next;
        Ok(())
    }
}

/// Identifier under which `det` is written for level `n`, reusing the entry
/// of an earlier equivalent detector.
fn detector_id<'a>(
    defined: &mut Vec<(String, &'a dyn Detection3D)>,
    det: &'a dyn Detection3D,
    n: usize,
) -> String {
    if let Some((id, _)) = defined
        .iter()
        .find(|(id, d)| d.same_as(det) && (det.identifier().is_empty() || det.identifier() == id))
    {
        return id.clone();
    }
    let taken = |candidate: &str| defined.iter().any(|(id, _)| id == candidate);
    let mut id = if det.identifier().is_empty() || taken(det.identifier()) {
        format!("det_{n}")
    } else {
        det.identifier().to_string()
    };
    while taken(&id) {
        id.push('_');
    }
    defined.push((id.clone(), det));
    id
}

fn load_detectors(
    p: &ParameterData,
) -> Result<BTreeMap<String, Box<dyn Detection3D>>, ParameterError> {
    const PREFIX: &str = "load_core_detection_";
    let mut detectors = BTreeMap::new();
    for key in p.keys().filter(|k| k.starts_with(PREFIX)) {
        let id = &key[PREFIX.len()..];
        let mut det = detector_from_class(p.string(key)?)?;
        det.set_parameters(&p.extract_prefix(&format!("{id}_")))?;
        det.set_identifier(id);
        detectors.insert(id.to_string(), det);
    }
    Ok(detectors)
}

fn read_level(
    p: &ParameterData,
    n: usize,
    detectors: &BTreeMap<String, Box<dyn Detection3D>>,
) -> Result<AlertThresholds, ParameterError> {
    let key = |field: &str| format!("alert_{n}_{field}");
    let id = p.string(&key("detector"))?;
    let detector = detectors
        .get(id)
        .cloned()
        .ok_or_else(|| ParameterError::UndefinedDetector {
            level: n,
            id: id.to_string(),
        })?;
    let region = p.string(&key("region"))?.parse::<BandsRegion>()?;
    let mut t = AlertThresholds::new(
        detector,
        p.value(&key("alerting_time"))?,
        p.value(&key("early_alerting_time"))?,
        region,
    );
    if p.contains(&key("spread_trk")) {
        t.set_spread_trk(p.value(&key("spread_trk"))?);
    }
    if p.contains(&key("spread_gs")) {
        t.set_spread_gs(p.value(&key("spread_gs"))?);
    }
    if p.contains(&key("spread_vs")) {
        t.set_spread_vs(p.value(&key("spread_vs"))?);
    }
    if p.contains(&key("spread_alt")) {
        t.set_spread_alt(p.value(&key("spread_alt"))?);
    }
    Ok(t)
}
