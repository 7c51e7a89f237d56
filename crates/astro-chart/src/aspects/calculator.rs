use crate::aspects::types::{
    AspectMatch, AspectObjectRef, AspectSet, AspectSetKind, AspectSettings, AspectType,
};
use crate::ephemeris::Body;
use crate::western::{normalize_degrees, round2};
use std::collections::BTreeMap;

/// Body longitudes for one set; `None` entries take no part
pub type LongitudeSet = BTreeMap<Body, Option<f64>>;

/// Smallest angle between two longitudes, in [0, 180]
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = (normalize_degrees(lon1) - normalize_degrees(lon2)).abs();
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Aspect calculator
#[derive(Debug, Clone)]
pub struct AspectCalculator {
    settings: AspectSettings,
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl AspectCalculator {
    pub fn new() -> Self {
        Self::with_settings(AspectSettings::default())
    }

    pub fn with_settings(settings: AspectSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AspectSettings {
        &self.settings
    }

    /// Every aspect whose orb window contains the separation of the two
    /// longitudes, as (aspect, separation, orb).
    ///
    /// Windows are checked independently, so overlapping windows yield
    /// several entries.
    pub fn calculate_aspects(&self, lon1: f64, lon2: f64) -> Vec<(AspectType, f64, f64)> {
        let separation = angular_separation(lon1, lon2);
        AspectType::ALL
            .iter()
            .filter_map(|&aspect| {
                let orb_value = (separation - aspect.angle()).abs();
                (orb_value <= self.settings.orb(aspect)).then_some((aspect, separation, orb_value))
            })
            .collect()
    }

    /// Compute aspects within a single layer
    pub fn compute_intra_layer_aspects(&self, layer: &str, longitudes: &LongitudeSet) -> AspectSet {
        let bodies = self.participants(longitudes);

        let mut matches = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (b1, lon1) = bodies[i];
                let (b2, lon2) = bodies[j];
                self.push_matches(&mut matches, (layer, b1, lon1), (layer, b2, lon2));
            }
        }

        AspectSet {
            kind: AspectSetKind::IntraLayer,
            layers: vec![layer.to_string()],
            matches,
        }
    }

    /// Compute aspects between two layers; every pair has one body from each
    pub fn compute_inter_layer_aspects(
        &self,
        layer_a: &str,
        longitudes_a: &LongitudeSet,
        layer_b: &str,
        longitudes_b: &LongitudeSet,
    ) -> AspectSet {
        let bodies_a = self.participants(longitudes_a);
        let bodies_b = self.participants(longitudes_b);

        let mut matches = Vec::new();
        for &(b1, lon1) in &bodies_a {
            for &(b2, lon2) in &bodies_b {
                self.push_matches(&mut matches, (layer_a, b1, lon1), (layer_b, b2, lon2));
            }
        }

        AspectSet {
            kind: AspectSetKind::InterLayer,
            layers: vec![layer_a.to_string(), layer_b.to_string()],
            matches,
        }
    }

    fn participants(&self, longitudes: &LongitudeSet) -> Vec<(Body, f64)> {
        longitudes
            .iter()
            .filter(|(body, _)| self.settings.includes(**body))
            .filter_map(|(body, lon)| lon.filter(|l| l.is_finite()).map(|l| (*body, l)))
            .collect()
    }

    fn push_matches(
        &self,
        matches: &mut Vec<AspectMatch>,
        (layer1, body1, lon1): (&str, Body, f64),
        (layer2, body2, lon2): (&str, Body, f64),
    ) {
        for (aspect, separation, orb) in self.calculate_aspects(lon1, lon2) {
            matches.push(AspectMatch {
                aspect,
                from: AspectObjectRef {
                    layer: layer1.to_string(),
                    body: body1,
                },
                to: AspectObjectRef {
                    layer: layer2.to_string(),
                    body: body2,
                },
                angle: aspect.angle(),
                separation: round2(separation),
                orb: round2(orb),
                exact: orb < 0.1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calculator_uses_catalog_orbs() {
        let calculator = AspectCalculator::default();
        assert_eq!(calculator.settings(), &AspectSettings::default());

        let found = calculator.calculate_aspects(10.0, 64.5);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, AspectType::Sextile);
        assert!(calculator.calculate_aspects(10.0, 76.5).is_empty());
    }

    #[test]
    fn separation_wraps_through_zero() {
        assert_eq!(angular_separation(350.0, 10.0), 20.0);
        assert_eq!(angular_separation(10.0, 350.0), 20.0);
        assert_eq!(angular_separation(0.0, 180.0), 180.0);
    }

    #[test]
    fn overlapping_windows_are_all_reported() {
        // Widened orbs make square and trine overlap at 105°.
        let settings = AspectSettings::default()
            .with_orb(AspectType::Square, 20.0)
            .with_orb(AspectType::Trine, 20.0);
        let calculator = AspectCalculator::with_settings(settings);
        let found: Vec<AspectType> = calculator
            .calculate_aspects(0.0, 105.0)
            .into_iter()
            .map(|(a, _, _)| a)
            .collect();
        assert_eq!(found, vec![AspectType::Trine, AspectType::Square]);
    }

    #[test]
    fn include_filter_limits_participants() {
        let settings = AspectSettings {
            include: vec![Body::Sun, Body::Moon],
            ..AspectSettings::default()
        };
        let calculator = AspectCalculator::with_settings(settings);
        let longitudes: LongitudeSet = [
            (Body::Sun, Some(0.0)),
            (Body::Moon, Some(2.0)),
            (Body::Mars, Some(1.0)),
        ]
        .into_iter()
        .collect();
        let set = calculator.compute_intra_layer_aspects("natal", &longitudes);
        assert_eq!(set.matches.len(), 1);
        assert_eq!(set.matches[0].from.body, Body::Sun);
        assert_eq!(set.matches[0].to.body, Body::Moon);
    }

    #[test]
    fn matches_carry_angle_and_exactness() {
        let calculator = AspectCalculator::new();
        let longitudes: LongitudeSet = [(Body::Sun, Some(10.0)), (Body::Moon, Some(130.05))]
            .into_iter()
            .collect();
        let set = calculator.compute_intra_layer_aspects("natal", &longitudes);
        assert_eq!(set.matches.len(), 1);
        let m = &set.matches[0];
        assert_eq!(m.aspect, AspectType::Trine);
        assert_eq!(m.angle, 120.0);
        assert_eq!(m.separation, 120.05);
        assert!(m.exact);
    }
}
