pub mod calculator;
pub mod types;

pub use calculator::{angular_separation, AspectCalculator, LongitudeSet};
pub use types::{
    AspectMatch, AspectObjectRef, AspectSet, AspectSetKind, AspectSettings, AspectType,
};
