use crate::ephemeris::{GeoLocation, HouseSystem};
use crate::error::ChartError;
use crate::time::MomentInput;
use serde::{Deserialize, Serialize};

/// Normalized input for one chart computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub name: Option<String>,
    pub birth: MomentInput,
    /// Houses are only computed when a location is known
    pub location: Option<GeoLocation>,
    pub city: Option<String>,
    pub house_system: HouseSystem,
    /// Second moment compared against the natal chart
    pub transit: Option<MomentInput>,
}

impl ChartRequest {
    pub fn new(birth: MomentInput) -> Self {
        Self {
            name: None,
            birth,
            location: None,
            city: None,
            house_system: HouseSystem::default(),
            transit: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.location = Some(GeoLocation { lat, lon });
        self
    }

    pub fn with_house_system(mut self, system: HouseSystem) -> Self {
        self.house_system = system;
        self
    }

    pub fn with_transit(mut self, transit: MomentInput) -> Self {
        self.transit = Some(transit);
        self
    }
}

/// Parse a caller-supplied house system code or name
pub fn parse_house_system(input: &str) -> Result<HouseSystem, ChartError> {
    input.parse().map_err(|_| {
        ChartError::invalid(
            "house_system",
            input,
            format!("expected one of {}", HouseSystem::valid_names().join(", ")),
        )
    })
}
