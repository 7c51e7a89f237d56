pub mod adapter;
pub mod gateway;
pub mod linear;
pub mod types;

pub use adapter::SwissEphemerisAdapter;
pub use gateway::{EphemerisError, EphemerisGateway};
pub use linear::LinearEphemeris;
pub use types::{Body, CuspOutcome, GeoLocation, HouseFrame, HouseSystem, PlanetPosition};
