use crate::aspects::{AspectCalculator, AspectSet, LongitudeSet};
use crate::ephemeris::{Body, EphemerisGateway, HouseFrame, PlanetPosition};
use crate::error::ChartError;
use crate::time::{CalendarMoment, TimePoint};
use crate::western::{
    element_distribution, modality_distribution, place, Distribution, Element, Modality, Placement,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

pub const NATAL_LAYER: &str = "natal";

/// Look up every body at one moment concurrently.
///
/// The first failure is returned and the outstanding lookups are dropped.
pub async fn lookup_positions(
    gateway: Arc<dyn EphemerisGateway>,
    at: TimePoint,
    bodies: &[Body],
) -> Result<BTreeMap<Body, PlanetPosition>, ChartError> {
    let mut lookups = JoinSet::new();
    for &body in bodies {
        let gateway = Arc::clone(&gateway);
        lookups.spawn(async move { (body, gateway.body_position(at, body).await) });
    }

    let mut positions = BTreeMap::new();
    while let Some(joined) = lookups.join_next().await {
        let (body, result) = joined.map_err(|e| ChartError::Internal(e.to_string()))?;
        let position = result?;
        log::debug!("{} at JD {:.5}: {:.4}°", body, at.julian_day(), position.lon);
        positions.insert(body, position);
    }
    Ok(positions)
}

/// Place every looked-up body against optional house cusps
pub fn place_all(
    positions: &BTreeMap<Body, PlanetPosition>,
    houses: Option<&HouseFrame>,
) -> BTreeMap<Body, Placement> {
    let cusps = houses.map(|frame| &frame.cusps);
    positions
        .iter()
        .map(|(body, position)| (*body, place(position, cusps)))
        .collect()
}

/// Longitudes of placed bodies, ready for aspect detection
pub fn longitudes(placements: &BTreeMap<Body, Placement>) -> LongitudeSet {
    placements
        .iter()
        .map(|(body, placement)| (*body, Some(placement.longitude)))
        .collect()
}

/// The natal layer of a chart
#[derive(Debug, Clone)]
pub struct NatalChart {
    pub moment: CalendarMoment,
    pub time_point: TimePoint,
    pub placements: BTreeMap<Body, Placement>,
    pub houses: Option<HouseFrame>,
    pub aspects: AspectSet,
    pub elements: Distribution<Element>,
    pub modalities: Distribution<Modality>,
}

impl NatalChart {
    pub fn build(
        moment: CalendarMoment,
        positions: &BTreeMap<Body, PlanetPosition>,
        houses: Option<HouseFrame>,
        calculator: &AspectCalculator,
    ) -> Self {
        let placements = place_all(positions, houses.as_ref());
        let aspects = calculator.compute_intra_layer_aspects(NATAL_LAYER, &longitudes(&placements));

        let signs: Vec<_> = placements.values().map(|p| Some(p.sign)).collect();
        let elements = element_distribution(&signs);
        let modalities = modality_distribution(&signs);

        Self {
            moment,
            time_point: moment.to_time_point(),
            placements,
            houses,
            aspects,
            elements,
            modalities,
        }
    }

    pub fn longitudes(&self) -> LongitudeSet {
        longitudes(&self.placements)
    }

    pub fn cusps(&self) -> Option<&[f64; 12]> {
        self.houses.as_ref().map(|frame| &frame.cusps)
    }
}
