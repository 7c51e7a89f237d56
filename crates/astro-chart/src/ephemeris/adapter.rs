use crate::ephemeris::gateway::{EphemerisError, EphemerisGateway};
use crate::ephemeris::types::{Body, CuspOutcome, GeoLocation, HouseFrame, HouseSystem, PlanetPosition};
use crate::time::TimePoint;
use async_trait::async_trait;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::{AscMc, Cusp};

// Swiss Ephemeris body codes. SUN=0 .. PLUTO=9, TRUE_NODE=11, CHIRON=15.
// The south node has no code; it is derived from the true node.
const BODY_CODES: &[(Body, i32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
    (Body::NorthNode, 11),
    (Body::Chiron, 15),
];

/// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;

/// Mean obliquity of the ecliptic; beyond 90° minus this, quadrant house
/// systems have no solution.
const OBLIQUITY: f64 = 23.4393;

/// The C library keeps global state, so calls are serialized.
static SWE_LOCK: Mutex<()> = Mutex::new(());

/// Swiss Ephemeris gateway
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        // The C library falls back to SE_EPHE_PATH when no path has been set through its API
        if env::var_os("SE_EPHE_PATH").is_none() {
            env::set_var("SE_EPHE_PATH", &path);
        }
        log::info!("Swiss Ephemeris data at {}", path.display());
        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    /// Blocking position lookup for a single body
    pub fn calc_body_position(jd: f64, body: Body) -> Result<PlanetPosition, EphemerisError> {
        if body == Body::SouthNode {
            let north = Self::calc_body_position(jd, Body::NorthNode)?;
            return Ok(PlanetPosition {
                lon: crate::western::normalize_degrees(north.lon + 180.0),
                lat: -north.lat,
                speed_lon: north.speed_lon,
            });
        }

        let code = BODY_CODES
            .iter()
            .find(|(candidate, _)| *candidate == body)
            .map(|(_, code)| *code)
            .ok_or(EphemerisError::UnknownBody { body })?;

        let result = {
            let _guard = SWE_LOCK
                .lock()
                .map_err(|_| EphemerisError::Unavailable("ephemeris lock poisoned".to_string()))?;
            calc_ut(jd, code as u32, CALC_FLAGS as u32)
        }
        .map_err(|e| EphemerisError::CalculationFailed {
            body,
            julian_day: jd,
            message: format!("Swiss Ephemeris error: {}", e),
        })?;

        let out = result.out;
        Ok(PlanetPosition {
            lon: crate::western::normalize_degrees(out[0]),
            lat: out[1],
            speed_lon: out[3],
        })
    }

    /// Blocking house-cusp lookup.
    ///
    /// Quadrant systems inside the polar circles fall back to Porphyry and
    /// report the substitution.
    pub fn calc_house_frame(jd: f64, location: GeoLocation, system: HouseSystem) -> CuspOutcome {
        if !(-90.0..=90.0).contains(&location.lat) || !location.lat.is_finite() {
            return CuspOutcome::Failed(format!("latitude {} is outside [-90, 90]", location.lat));
        }

        let polar = system.is_polar_sensitive() && location.lat.abs() > 90.0 - OBLIQUITY;
        let effective = if polar { HouseSystem::Porphyry } else { system };

        let (c, a) = match SWE_LOCK.lock() {
            Ok(_guard) => houses_ex(jd, 0, location.lat, location.lon, effective.code() as i32),
            Err(_) => return CuspOutcome::Failed("ephemeris lock poisoned".to_string()),
        };
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if cusp_values.iter().any(|c| !c.is_finite())
            || !ascmc.ascendant.is_finite()
            || !ascmc.mc.is_finite()
        {
            return CuspOutcome::Failed(format!(
                "house calculation returned no usable cusps for {} at lat {}",
                system.name(),
                location.lat
            ));
        }

        let frame = HouseFrame::new(effective, cusp_values, ascmc.ascendant, ascmc.mc);
        if polar {
            CuspOutcome::Degraded(
                frame,
                format!(
                    "{} houses are undefined at latitude {:.2}; using porphyry cusps",
                    system.name(),
                    location.lat
                ),
            )
        } else {
            CuspOutcome::Ok(frame)
        }
    }
}

#[async_trait]
impl EphemerisGateway for SwissEphemerisAdapter {
    async fn body_position(&self, at: TimePoint, body: Body) -> Result<PlanetPosition, EphemerisError> {
        let jd = at.julian_day();
        tokio::task::spawn_blocking(move || Self::calc_body_position(jd, body))
            .await
            .map_err(|e| EphemerisError::Unavailable(e.to_string()))?
    }

    async fn house_cusps(&self, at: TimePoint, location: GeoLocation, system: HouseSystem) -> CuspOutcome {
        let jd = at.julian_day();
        tokio::task::spawn_blocking(move || Self::calc_house_frame(jd, location, system))
            .await
            .unwrap_or_else(|e| CuspOutcome::Failed(e.to_string()))
    }
}
