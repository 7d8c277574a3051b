//! Implicit coordination between two non-communicating aircraft.
//!
//! Each aircraft evaluates these functions on its own relative state and
//! arrives at compatible maneuver directions without exchanging messages.

use crate::geometry::{Vect2, Vect3, Velocity};
use crate::units;

/// Horizontal size of the near mid-air collision volume (500 ft).
pub const NMAC_D: f64 = 500.0 * units::FT;
/// Vertical size of the near mid-air collision volume (100 ft).
pub const NMAC_H: f64 = 100.0 * units::FT;

const ALMOST_ZERO: f64 = 1e-9;

fn sign(x: f64) -> i32 {
    if x >= 0.0 {
        1
    } else {
        -1
    }
}

/// Horizontal coordination sign for relative position `s` and velocity `v`.
///
/// `-1` turns right in the relative frame, `+1` turns left. Both aircraft
/// compute the same value for the same encounter.
pub fn horizontal_coordination(s: &Vect2, v: &Vect2) -> i32 {
    sign(v.det(s))
}

/// Vertical coordination sign while in loss of separation.
///
/// `-1` reduces vertical speed, `+1` increases it. For distinct identifiers
/// the two aircraft always obtain opposite signs.
pub fn vertical_coordination_los(
    s: &Vect3,
    vo: &Velocity,
    vi: &Velocity,
    ownship: &str,
    traffic: &str,
) -> i32 {
    break_symmetry(
        &vertical_decision_vect(s, vo, vi, NMAC_D, NMAC_H),
        ownship,
        traffic,
    )
}

fn vertical_decision_vect(s: &Vect3, vo: &Velocity, vi: &Velocity, d: f64, h: f64) -> Vect3 {
    let s2 = s.vect2();
    let (vo2, vi2) = (vo.vect2(), vi.vect2());
    let v = *vo - *vi;
    if (!s.is_zero() && cd3d(s, &v, d, h)) || (vo.vs() - vi.vs()).abs() < ALMOST_ZERO {
        *s
    } else if vo2.almost_equals(&vi2) || s.is_zero() {
        v
    } else if s2.dot(&v.vect2()) <= 0.0 {
        s.linear(&v, tcpa(&s2, &v.vect2()))
    } else {
        *s
    }
}

fn tcpa(s: &Vect2, v: &Vect2) -> f64 {
    let a = v.sqv();
    if a < ALMOST_ZERO {
        0.0
    } else {
        -s.dot(v) / a
    }
}

/// Positive vertical component wins; a level vector is resolved by
/// comparing the reversed identifiers.
fn break_symmetry(s: &Vect3, ownship: &str, traffic: &str) -> i32 {
    if s.z.abs() < ALMOST_ZERO {
        let own: String = ownship.chars().rev().collect();
        let traf: String = traffic.chars().rev().collect();
        if own <= traf {
            1
        } else {
            -1
        }
    } else {
        sign(s.z)
    }
}

/// Whether the relative trajectory `s + t*v`, `t >= 0`, ever enters the
/// cylinder of radius `d` and half-height `h`.
fn cd3d(s: &Vect3, v: &Vect3, d: f64, h: f64) -> bool {
    let (s2, v2) = (s.vect2(), v.vect2());
    let horizontal = if v2.sqv() < ALMOST_ZERO {
        (s2.sqv() < d * d).then_some((0.0, f64::INFINITY))
    } else {
        let a = v2.sqv();
        let b = s2.dot(&v2);
        let disc = b * b - a * (s2.sqv() - d * d);
        (disc > 0.0).then(|| ((-b - disc.sqrt()) / a, (-b + disc.sqrt()) / a))
    };
    let vertical = if v.z.abs() < ALMOST_ZERO {
        (s.z.abs() < h).then_some((0.0, f64::INFINITY))
    } else {
        let t1 = (-h - s.z) / v.z;
        let t2 = (h - s.z) / v.z;
        Some((t1.min(t2), t1.max(t2)))
    };
    match (horizontal, vertical) {
        (Some((hin, hout)), Some((vin, vout))) => {
            let tin = hin.max(vin).max(0.0);
            let tout = hout.min(vout);
            tin < tout
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_coordination_shared_by_both_aircraft() {
        let s = Vect2::new(1000.0, -200.0);
        let v = Vect2::new(-50.0, 30.0);
        assert_ne!(v.det(&s), 0.0);
        assert_eq!(horizontal_coordination(&s, &v), horizontal_coordination(&-s, &-v));
        let mirrored = Vect2::new(-50.0, -70.0);
        assert_eq!(horizontal_coordination(&s, &mirrored), -horizontal_coordination(&s, &v));
    }

    #[test]
    fn test_horizontal_coordination_collinear_is_positive() {
        let s = Vect2::new(1000.0, -200.0);
        let v = Vect2::new(-50.0, 10.0);
        assert_eq!(v.det(&s), 0.0);
        assert_eq!(horizontal_coordination(&s, &v), 1);
        assert_eq!(horizontal_coordination(&-s, &-v), 1);
    }

    #[test]
    fn test_vertical_uses_altitude_when_not_level() {
        let s = Vect3::new(100.0, 0.0, 50.0);
        let vo = Velocity::from_xyz(10.0, 0.0, 0.0);
        let vi = Velocity::from_xyz(-10.0, 0.0, 0.0);
        assert_eq!(vertical_coordination_los(&s, &vo, &vi, "A", "B"), 1);
        assert_eq!(vertical_coordination_los(&-s, &vi, &vo, "B", "A"), -1);
    }

    #[test]
    fn test_vertical_break_symmetry_by_identifier() {
        let s = Vect3::new(100.0, 0.0, 0.0);
        let vo = Velocity::from_xyz(-10.0, 0.0, 0.0);
        let vi = Velocity::from_xyz(10.0, 0.0, 0.0);
        let own = vertical_coordination_los(&s, &vo, &vi, "N123", "N124");
        let other = vertical_coordination_los(&-s, &vi, &vo, "N124", "N123");
        assert_eq!(own, -other);
        // Reversed "N123" is "321N" < "421N"
        assert_eq!(own, 1);
    }

    #[test]
    fn test_cd3d() {
        let s = Vect3::new(1000.0, 0.0, 0.0);
        assert!(cd3d(&s, &Vect3::new(-10.0, 0.0, 0.0), NMAC_D, NMAC_H));
        assert!(!cd3d(&s, &Vect3::new(10.0, 0.0, 0.0), NMAC_D, NMAC_H));
        assert!(!cd3d(&Vect3::new(1000.0, 0.0, 500.0), &Vect3::new(-10.0, 0.0, 0.0), NMAC_D, NMAC_H));
    }
}
