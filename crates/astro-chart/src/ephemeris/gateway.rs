use crate::ephemeris::types::{Body, CuspOutcome, GeoLocation, HouseSystem, PlanetPosition};
use crate::time::TimePoint;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during ephemeris lookups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("No ephemeris data for body {body}")]
    UnknownBody { body: Body },
    #[error("Failed to calculate position for {body} at JD {julian_day}: {message}")]
    CalculationFailed {
        body: Body,
        julian_day: f64,
        message: String,
    },
    #[error("Ephemeris unavailable: {0}")]
    Unavailable(String),
}

/// Source of body positions and house cusps.
///
/// Lookups are independent of each other, so callers may issue them
/// concurrently.
#[async_trait]
pub trait EphemerisGateway: Send + Sync {
    /// Ecliptic longitude and longitudinal speed of `body` at `at`
    async fn body_position(&self, at: TimePoint, body: Body) -> Result<PlanetPosition, EphemerisError>;

    /// House cusps and angles for `at`, seen from `location`
    async fn house_cusps(&self, at: TimePoint, location: GeoLocation, system: HouseSystem) -> CuspOutcome;
}
