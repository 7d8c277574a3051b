//! Unit conversion between display units and internal units.
//!
//! Internal units are meters, seconds, meters/second, radians and
//! meters/second^2. Every other unit is expressed as the factor that
//! converts one display unit into internal units.

pub const M: f64 = 1.0;
pub const FT: f64 = 0.3048;
pub const NMI: f64 = 1852.0;
pub const KM: f64 = 1000.0;
pub const S: f64 = 1.0;
pub const MIN: f64 = 60.0;
pub const RAD: f64 = 1.0;
pub const DEG: f64 = std::f64::consts::PI / 180.0;
pub const MPS: f64 = 1.0;
pub const KNOT: f64 = NMI / 3600.0;
pub const FPM: f64 = FT / 60.0;
pub const MPS2: f64 = 1.0;
/// Standard gravity
pub const G: f64 = 9.80665;
pub const DEG_PER_S: f64 = DEG;

/// Conversion factor for a unit tag, `None` when the tag is unknown.
pub fn factor(unit: &str) -> Option<f64> {
    let f = match unit {
        "m" => M,
        "ft" => FT,
        "nmi" | "NM" => NMI,
        "km" => KM,
        "s" => S,
        "min" => MIN,
        "rad" => RAD,
        "deg" => DEG,
        "m/s" => MPS,
        "knot" | "kts" | "kn" => KNOT,
        "fpm" | "ft/min" => FPM,
        "m/s^2" => MPS2,
        "G" => G,
        "deg/s" => DEG_PER_S,
        "rad/s" => 1.0,
        "unitless" | "unspecified" | "" => 1.0,
        _ => return None,
    };
    Some(f)
}

/// True when `unit` is a known unit tag.
pub fn is_unit(unit: &str) -> bool {
    factor(unit).is_some()
}

/// Convert `value` given in `unit` into internal units.
/// Unknown units are treated as internal.
pub fn from(unit: &str, value: f64) -> f64 {
    value * factor(unit).unwrap_or(1.0)
}

/// Convert an internal `value` into `unit`.
/// Unknown units are treated as internal.
pub fn to(unit: &str, value: f64) -> f64 {
    value / factor(unit).unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_round_trip() {
        let m = from("ft", 1000.0);
        assert!((m - 304.8).abs() < 1e-9);
        assert!((to("ft", m) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_aliases_share_factor() {
        assert_eq!(factor("nmi"), factor("NM"));
        assert_eq!(factor("knot"), factor("kts"));
        assert_eq!(factor("fpm"), factor("ft/min"));
    }

    #[test]
    fn test_unknown_unit_is_identity() {
        assert!(!is_unit("furlong"));
        assert_eq!(from("furlong", 3.0), 3.0);
        assert_eq!(to("furlong", 3.0), 3.0);
    }
}
