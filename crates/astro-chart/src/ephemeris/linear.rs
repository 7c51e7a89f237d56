//! In-memory gateway with uniform motion.
//!
//! Each body moves at a constant speed from a base longitude at J2000, which
//! is enough to exercise the chart pipeline without Swiss Ephemeris data.

use crate::ephemeris::gateway::{EphemerisError, EphemerisGateway};
use crate::ephemeris::types::{Body, CuspOutcome, GeoLocation, HouseSystem, PlanetPosition};
use crate::time::{TimePoint, J2000};
use crate::western::normalize_degrees;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone)]
pub struct LinearEphemeris {
    bodies: BTreeMap<Body, (f64, f64)>,
    houses: CuspOutcome,
    failing: HashSet<Body>,
    failing_from: BTreeMap<Body, f64>,
}

impl LinearEphemeris {
    /// Gateway with no bodies and a failed house lookup
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            houses: CuspOutcome::Failed("no house data configured".to_string()),
            failing: HashSet::new(),
            failing_from: BTreeMap::new(),
        }
    }

    /// Body at `base_lon` on J2000, moving `speed` degrees per day
    pub fn with_body(mut self, body: Body, base_lon: f64, speed: f64) -> Self {
        self.bodies.insert(body, (base_lon, speed));
        self
    }

    /// Stationary body, handy for fixed natal charts
    pub fn with_fixed(self, body: Body, lon: f64) -> Self {
        self.with_body(body, lon, 0.0)
    }

    pub fn with_houses(mut self, outcome: CuspOutcome) -> Self {
        self.houses = outcome;
        self
    }

    /// Make every lookup of `body` fail
    pub fn failing(mut self, body: Body) -> Self {
        self.failing.insert(body);
        self
    }

    /// Make lookups of `body` fail at or after Julian Day `jd`
    pub fn failing_from(mut self, body: Body, jd: f64) -> Self {
        self.failing_from.insert(body, jd);
        self
    }

    fn fails_at(&self, body: Body, at: TimePoint) -> bool {
        self.failing.contains(&body)
            || self
                .failing_from
                .get(&body)
                .is_some_and(|from| at.julian_day() >= *from)
    }
}

impl Default for LinearEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EphemerisGateway for LinearEphemeris {
    async fn body_position(&self, at: TimePoint, body: Body) -> Result<PlanetPosition, EphemerisError> {
        if self.fails_at(body, at) {
            return Err(EphemerisError::CalculationFailed {
                body,
                julian_day: at.julian_day(),
                message: "configured to fail".to_string(),
            });
        }
        let (base, speed) = self
            .bodies
            .get(&body)
            .copied()
            .ok_or(EphemerisError::UnknownBody { body })?;
        let elapsed = at.julian_day() - J2000;
        Ok(PlanetPosition {
            lon: normalize_degrees(base + speed * elapsed),
            lat: 0.0,
            speed_lon: speed,
        })
    }

    async fn house_cusps(&self, _at: TimePoint, _location: GeoLocation, _system: HouseSystem) -> CuspOutcome {
        self.houses.clone()
    }
}
