pub mod assembler;
pub mod engine;
pub mod natal;
pub mod request;
pub mod transit;

pub use assembler::{ChartAssembler, FlatResponse, StructuredResponse};
pub use engine::{ChartEngine, ChartReport};
pub use natal::{NatalChart, NATAL_LAYER};
pub use request::{parse_house_system, ChartRequest};
pub use transit::{TransitChart, TransitEngine, TRANSIT_LAYER};
