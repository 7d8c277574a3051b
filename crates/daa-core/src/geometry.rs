//! Vector math for relative positions and velocities.
//!
//! Positions live in a flat local east-north-up frame in meters;
//! velocities in meters/second. Track angles are measured clockwise
//! from true north, in radians.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

const METERS_PER_DEG_LAT: f64 = 111_320.0;
const EPSILON: f64 = 1e-12;

/// Two-dimensional vector (east, north).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vect2 {
    pub x: f64,
    pub y: f64,
}

impl Vect2 {
    pub const ZERO: Vect2 = Vect2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vect2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Two-dimensional cross product `self.x * other.y - self.y * other.x`.
    pub fn det(&self, other: &Vect2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn sqv(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.sqv().sqrt()
    }

    pub fn scal(&self, k: f64) -> Vect2 {
        Vect2::new(self.x * k, self.y * k)
    }

    pub fn is_zero(&self) -> bool {
        self.x.abs() < EPSILON && self.y.abs() < EPSILON
    }

    pub fn almost_equals(&self, other: &Vect2) -> bool {
        (*self - *other).is_zero()
    }
}

impl Add for Vect2 {
    type Output = Vect2;
    fn add(self, rhs: Vect2) -> Vect2 {
        Vect2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vect2 {
    type Output = Vect2;
    fn sub(self, rhs: Vect2) -> Vect2 {
        Vect2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vect2 {
    type Output = Vect2;
    fn neg(self) -> Vect2 {
        Vect2::new(-self.x, -self.y)
    }
}

/// Three-dimensional vector (east, north, up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vect3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vect3 {
    pub const ZERO: Vect3 = Vect3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Horizontal component.
    pub fn vect2(&self) -> Vect2 {
        Vect2::new(self.x, self.y)
    }

    pub fn dot(&self, other: &Vect3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn sqv(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.sqv().sqrt()
    }

    pub fn scal(&self, k: f64) -> Vect3 {
        Vect3::new(self.x * k, self.y * k, self.z * k)
    }

    /// `self + other * k`
    pub fn linear(&self, other: &Vect3, k: f64) -> Vect3 {
        *self + other.scal(k)
    }

    pub fn is_zero(&self) -> bool {
        self.x.abs() < EPSILON && self.y.abs() < EPSILON && self.z.abs() < EPSILON
    }
}

impl Add for Vect3 {
    type Output = Vect3;
    fn add(self, rhs: Vect3) -> Vect3 {
        Vect3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vect3 {
    type Output = Vect3;
    fn sub(self, rhs: Vect3) -> Vect3 {
        Vect3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vect3 {
    type Output = Vect3;
    fn neg(self) -> Vect3 {
        Vect3::new(-self.x, -self.y, -self.z)
    }
}

/// Velocity vector with track / ground speed / vertical speed views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(pub Vect3);

impl Velocity {
    pub const ZERO: Velocity = Velocity(Vect3::ZERO);

    pub const fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Velocity(Vect3::new(x, y, z))
    }

    /// Build from track (rad, clockwise from north), ground speed (m/s)
    /// and vertical speed (m/s).
    pub fn from_trk_gs_vs(trk: f64, gs: f64, vs: f64) -> Self {
        Velocity(Vect3::new(gs * trk.sin(), gs * trk.cos(), vs))
    }

    /// Track angle in `[0, 2π)`.
    pub fn trk(&self) -> f64 {
        let t = self.0.x.atan2(self.0.y);
        if t < 0.0 {
            t + 2.0 * std::f64::consts::PI
        } else {
            t
        }
    }

    pub fn gs(&self) -> f64 {
        self.0.vect2().norm()
    }

    pub fn vs(&self) -> f64 {
        self.0.z
    }

    pub fn vect2(&self) -> Vect2 {
        self.0.vect2()
    }

    pub fn vect3(&self) -> Vect3 {
        self.0
    }
}

impl Sub for Velocity {
    type Output = Vect3;
    fn sub(self, rhs: Velocity) -> Vect3 {
        self.0 - rhs.0
    }
}

/// Flat-earth projection around a reference point.
///
/// Accurate to a few meters within the tens of kilometers an encounter spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalProjection {
    pub ref_lat: f64,
    pub ref_lon: f64,
}

impl LocalProjection {
    pub fn new(ref_lat: f64, ref_lon: f64) -> Self {
        Self { ref_lat, ref_lon }
    }

    fn meters_per_deg_lon(&self) -> f64 {
        self.ref_lat.to_radians().cos().abs().max(0.01) * METERS_PER_DEG_LAT
    }

    /// Project latitude/longitude (degrees) and altitude (meters).
    pub fn project(&self, lat: f64, lon: f64, altitude_m: f64) -> Vect3 {
        let x = (lon - self.ref_lon) * self.meters_per_deg_lon();
        let y = (lat - self.ref_lat) * METERS_PER_DEG_LAT;
        Vect3::new(x, y, altitude_m)
    }

    /// Inverse of [`LocalProjection::project`]: returns (lat, lon, altitude_m).
    pub fn inverse(&self, p: &Vect3) -> (f64, f64, f64) {
        let lat = self.ref_lat + p.y / METERS_PER_DEG_LAT;
        let lon = self.ref_lon + p.x / self.meters_per_deg_lon();
        (lat, lon, p.z)
    }
}
