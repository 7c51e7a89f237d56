//! Longitude to sign, degree and house resolution.

use crate::ephemeris::PlanetPosition;
use crate::western::signs::{degree_in_sign, normalize_degrees, sign_of, Sign};
use serde::{Deserialize, Serialize};

/// Where a body sits in the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub sign: Sign,
    /// Degree within the sign, two decimals, in [0, 30)
    pub degree: f64,
    /// House number 1..12, absent without cusps
    pub house: Option<u8>,
    /// Normalized absolute longitude
    pub longitude: f64,
    pub retrograde: bool,
}

/// Round to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether `longitude` lies in the circular interval [start, end).
///
/// When `start >= end` the interval wraps through 0°.
pub fn in_arc(longitude: f64, start: f64, end: f64) -> bool {
    if start < end {
        longitude >= start && longitude < end
    } else {
        longitude >= start || longitude < end
    }
}

/// House (1..12) containing `longitude`; the first matching house wins
pub fn house_of(longitude: f64, cusps: &[f64; 12]) -> Option<u8> {
    let lon = normalize_degrees(longitude);
    (0..12)
        .find(|&i| in_arc(lon, cusps[i], cusps[(i + 1) % 12]))
        .map(|i| (i + 1) as u8)
}

/// Resolve a longitude against optional house cusps
pub fn resolve_longitude(longitude: f64, cusps: Option<&[f64; 12]>) -> (Sign, f64, Option<u8>) {
    let lon = normalize_degrees(longitude);
    // Rounding 29.995.. up would leave the sign; keep the degree inside it.
    let degree = round2(degree_in_sign(lon)).min(29.99);
    let house = cusps.and_then(|c| house_of(lon, c));
    (sign_of(lon), degree, house)
}

/// Place a body from its ephemeris position
pub fn place(position: &PlanetPosition, cusps: Option<&[f64; 12]>) -> Placement {
    let (sign, degree, house) = resolve_longitude(position.lon, cusps);
    Placement {
        sign,
        degree,
        house,
        longitude: normalize_degrees(position.lon),
        retrograde: position.is_retrograde(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_without_wrap() {
        assert!(in_arc(15.0, 10.0, 20.0));
        assert!(in_arc(10.0, 10.0, 20.0));
        assert!(!in_arc(20.0, 10.0, 20.0));
    }

    #[test]
    fn arc_with_wrap() {
        assert!(in_arc(355.0, 350.0, 20.0));
        assert!(in_arc(5.0, 350.0, 20.0));
        assert!(!in_arc(180.0, 350.0, 20.0));
    }

    #[test]
    fn degree_never_rounds_into_next_sign() {
        let (sign, degree, _) = resolve_longitude(59.999, None);
        assert_eq!(sign, Sign::Taurus);
        assert!(degree < 30.0);
    }
}
