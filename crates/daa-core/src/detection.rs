//! Conflict detection strategies.
//!
//! A [`Detection3D`] decides whether two aircraft are in loss of well-clear
//! now, and over which time window within a lookahead they will be.
//! Alert levels own their detector as a boxed trait object and clone it
//! through [`Detection3D::clone_box`].

use crate::error::ParameterError;
use crate::geometry::{Vect2, Vect3, Velocity};
use crate::parameter_data::ParameterData;
use std::fmt;

const ALMOST_ZERO: f64 = 1e-9;

/// Predicted loss-of-well-clear window relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictData {
    pub time_in: f64,
    pub time_out: f64,
}

impl ConflictData {
    pub fn new(time_in: f64, time_out: f64) -> Self {
        Self { time_in, time_out }
    }

    /// No conflict within `[b, t]`.
    pub fn none(b: f64, t: f64) -> Self {
        Self::new(t, b)
    }

    pub fn conflict(&self) -> bool {
        self.time_in < self.time_out
    }
}

/// Polymorphic conflict-detection strategy.
pub trait Detection3D: fmt::Debug + Send + Sync {
    /// Loss of well-clear at the current time.
    fn violation(&self, so: &Vect3, vo: &Velocity, si: &Vect3, vi: &Velocity) -> bool;

    /// Loss-of-well-clear window within `[b, t]` seconds from now.
    fn conflict_detection(
        &self,
        so: &Vect3,
        vo: &Velocity,
        si: &Vect3,
        vi: &Velocity,
        b: f64,
        t: f64,
    ) -> ConflictData;

    fn clone_box(&self) -> Box<dyn Detection3D>;

    /// Class name written to parameter maps.
    fn class_name(&self) -> &'static str;

    fn identifier(&self) -> &str;

    fn set_identifier(&mut self, id: &str);

    /// Detector parameters, unprefixed.
    fn parameters(&self) -> ParameterData;

    /// Read the keys present in `params`; absent keys keep their value.
    fn set_parameters(&mut self, params: &ParameterData) -> Result<(), ParameterError>;

    /// Same class and same parameters; the identifier is ignored.
    fn same_as(&self, other: &dyn Detection3D) -> bool {
        self.class_name() == other.class_name()
            && self.parameters().almost_equals(&other.parameters())
    }
}

impl Clone for Box<dyn Detection3D> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Instantiate a bundled detector from its class name.
pub fn detector_from_class(class: &str) -> Result<Box<dyn Detection3D>, ParameterError> {
    let short = class.rsplit('.').next().unwrap_or(class);
    match short {
        WcvTauMod::CLASS_NAME => Ok(Box::new(WcvTauMod::default())),
        _ => Err(ParameterError::UnknownDetector(class.to_string())),
    }
}

fn sign(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Time at which a 1-D motion `s + t*v` reaches `eps * h` (`eps = ±1`).
fn theta_h(s: f64, v: f64, eps: f64, h: f64) -> f64 {
    (eps * sign(v) * h - s) / v
}

/// Time at which the horizontal range reaches `d`; `eps = -1` entry, `1` exit.
fn theta_d(s: &Vect2, v: &Vect2, eps: f64, d: f64) -> f64 {
    let a = v.sqv();
    let b = s.dot(v);
    let c = s.sqv() - d * d;
    if a.abs() < ALMOST_ZERO {
        return f64::NAN;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return f64::NAN;
    }
    (-b + eps * disc.sqrt()) / a
}

/// Horizontal time of closest approach.
fn tcpa(s: &Vect2, v: &Vect2) -> f64 {
    let a = v.sqv();
    if a.abs() < ALMOST_ZERO {
        0.0
    } else {
        -s.dot(v) / a
    }
}

/// Well-clear volume with modified tau.
///
/// Horizontal well-clear is lost when range is within `dthr`, or when the
/// aircraft close to within `dthr` at CPA and modified tau is at most
/// `tthr`. Vertical well-clear is lost when altitude separation is within
/// `zthr`, or time to co-altitude is at most `tcoa`.
#[derive(Debug, Clone, PartialEq)]
pub struct WcvTauMod {
    id: String,
    /// Horizontal distance threshold (meters)
    pub dthr: f64,
    /// Vertical distance threshold (meters)
    pub zthr: f64,
    /// Modified tau threshold (seconds)
    pub tthr: f64,
    /// Time to co-altitude threshold (seconds)
    pub tcoa: f64,
}

impl Default for WcvTauMod {
    /// DO-365 well-clear: 4000 ft, 450 ft, 35 s, 0 s.
    fn default() -> Self {
        Self::new(1219.2, 137.16, 35.0, 0.0)
    }
}

impl WcvTauMod {
    pub const CLASS_NAME: &'static str = "WCV_TAUMOD";

    pub fn new(dthr: f64, zthr: f64, tthr: f64, tcoa: f64) -> Self {
        Self {
            id: String::new(),
            dthr,
            zthr,
            tthr,
            tcoa,
        }
    }

    fn horizontal_tvar(&self, s: &Vect2, v: &Vect2) -> f64 {
        let sdotv = s.dot(v);
        if sdotv < 0.0 {
            (self.dthr * self.dthr - s.sqv()) / sdotv
        } else {
            -1.0
        }
    }

    fn horizontal_wcv(&self, s: &Vect2, v: &Vect2) -> bool {
        if s.norm() <= self.dthr {
            return true;
        }
        let dcpa = (*s + v.scal(tcpa(s, v))).norm();
        if dcpa <= self.dthr {
            let tvar = self.horizontal_tvar(s, v);
            return (0.0..=self.tthr).contains(&tvar);
        }
        false
    }

    fn vertical_wcv(&self, sz: f64, vz: f64) -> bool {
        let tcoa = if sz * vz < 0.0 { -sz / vz } else { -1.0 };
        sz.abs() <= self.zthr || (0.0..=self.tcoa).contains(&tcoa)
    }

    /// Vertical loss window within `[b, t]`; `(t, b)` when empty.
    fn vertical_interval(&self, b: f64, t: f64, sz: f64, vz: f64) -> (f64, f64) {
        if vz.abs() < ALMOST_ZERO {
            return if sz.abs() <= self.zthr { (b, t) } else { (t, b) };
        }
        let act_h = self.zthr.max(vz.abs() * self.tcoa);
        let tentry = theta_h(sz, vz, -1.0, act_h);
        let texit = theta_h(sz, vz, 1.0, self.zthr);
        if t < tentry || texit < b {
            return (t, b);
        }
        (b.max(tentry), t.min(texit))
    }

    /// Horizontal loss window within `[0, t]`; `(t, 0)` when empty.
    fn horizontal_interval(&self, t: f64, s: &Vect2, v: &Vect2) -> (f64, f64) {
        let none = (t, 0.0);
        let sqs = s.sqv();
        let sdotv = s.dot(v);
        let sqd = self.dthr * self.dthr;
        let a = v.sqv();
        if a.abs() < ALMOST_ZERO && sqs <= sqd {
            return (0.0, t);
        }
        if sqs <= sqd {
            return (0.0, t.min(theta_d(s, v, 1.0, self.dthr)));
        }
        let b = 2.0 * sdotv + self.tthr * a;
        let c = sqs + self.tthr * sdotv - sqd;
        let discr = b * b - 4.0 * a * c;
        if sdotv >= 0.0 || discr < 0.0 {
            return none;
        }
        let entry = (-b - discr.sqrt()) / (2.0 * a);
        let delta = sqd * a - s.det(v).powi(2);
        if delta >= 0.0 && entry <= t {
            (entry.max(0.0), t.min(theta_d(s, v, 1.0, self.dthr)))
        } else {
            none
        }
    }
}

impl Detection3D for WcvTauMod {
    fn violation(&self, so: &Vect3, vo: &Velocity, si: &Vect3, vi: &Velocity) -> bool {
        let s = *so - *si;
        let v = *vo - *vi;
        self.horizontal_wcv(&s.vect2(), &v.vect2()) && self.vertical_wcv(s.z, v.z)
    }

    fn conflict_detection(
        &self,
        so: &Vect3,
        vo: &Velocity,
        si: &Vect3,
        vi: &Velocity,
        b: f64,
        t: f64,
    ) -> ConflictData {
        let s = *so - *si;
        let v = *vo - *vi;
        let (s2, v2) = (s.vect2(), v.vect2());

        let (vlo, vup) = self.vertical_interval(b, t, s.z, v.z);
        if vlo > vup {
            return ConflictData::none(b, t);
        }
        let step = s2 + v2.scal(vlo);
        if (vup - vlo).abs() < ALMOST_ZERO {
            return if self.horizontal_wcv(&step, &v2) {
                ConflictData::new(vlo, vup)
            } else {
                ConflictData::none(b, t)
            };
        }
        let (hin, hout) = self.horizontal_interval(vup - vlo, &step, &v2);
        if hin > hout {
            return ConflictData::none(b, t);
        }
        ConflictData::new(hin + vlo, hout + vlo)
    }

    fn clone_box(&self) -> Box<dyn Detection3D> {
        Box::new(self.clone())
    }

    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn identifier(&self) -> &str {
        &self.id
    }

    fn set_identifier(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn parameters(&self) -> ParameterData {
        let mut p = ParameterData::new();
        p.set_internal("WCV_DTHR", self.dthr, "nmi");
        p.set_internal("WCV_ZTHR", self.zthr, "ft");
        p.set_internal("WCV_TTHR", self.tthr, "s");
        p.set_internal("WCV_TCOA", self.tcoa, "s");
        p
    }

    fn set_parameters(&mut self, params: &ParameterData) -> Result<(), ParameterError> {
        let read = |key: &str, current: f64| -> Result<f64, ParameterError> {
            if params.contains(key) {
                params.value(key)
            } else {
                Ok(current)
            }
        };
        let dthr = read("WCV_DTHR", self.dthr)?;
        let zthr = read("WCV_ZTHR", self.zthr)?;
        let tthr = read("WCV_TTHR", self.tthr)?;
        let tcoa = read("WCV_TCOA", self.tcoa)?;
        self.dthr = dthr;
        self.zthr = zthr;
        self.tthr = tthr;
        self.tcoa = tcoa;
        Ok(())
    }
}
