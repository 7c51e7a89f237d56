//! Natal and transit chart computation.
//!
//! Pipeline: [`time`] turns local date/time into a Julian Day, an
//! [`ephemeris::EphemerisGateway`] supplies body positions and house cusps,
//! [`western`] resolves signs, houses and element/modality tallies,
//! [`aspects`] finds angular relationships, and [`chart`] runs the natal and
//! transit passes and assembles the response payloads.

pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod time;
pub mod western;

pub use chart::{ChartAssembler, ChartEngine, ChartReport, ChartRequest};
pub use error::ChartError;
pub use time::{CalendarMoment, MomentInput, TimePoint};
