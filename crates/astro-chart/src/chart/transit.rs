//! Transit pass: a second moment placed in the natal house frame and
//! aspected against the natal bodies.

use super::natal::{longitudes, lookup_positions, NatalChart, NATAL_LAYER};
use crate::aspects::{AspectCalculator, AspectSet};
use crate::ephemeris::{Body, EphemerisGateway, PlanetPosition};
use crate::error::ChartError;
use crate::time::{CalendarMoment, MomentInput};
use crate::western::{place, Placement};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const TRANSIT_LAYER: &str = "transit";

/// Transit positions looked up but not yet placed
#[derive(Debug, Clone)]
pub struct TransitPositions {
    pub input: MomentInput,
    pub moment: CalendarMoment,
    pub positions: BTreeMap<Body, PlanetPosition>,
}

#[derive(Debug, Clone)]
pub struct TransitChart {
    pub input: MomentInput,
    pub moment: CalendarMoment,
    pub placements: BTreeMap<Body, Placement>,
    pub aspects_to_natal: AspectSet,
}

pub struct TransitEngine {
    gateway: Arc<dyn EphemerisGateway>,
}

impl TransitEngine {
    pub fn new(gateway: Arc<dyn EphemerisGateway>) -> Self {
        Self { gateway }
    }

    /// Resolve the transit moment and look up its positions.
    ///
    /// Needs nothing from the natal pass, so it can run alongside it.
    pub async fn lookup(&self, input: &MomentInput, bodies: &[Body]) -> Result<TransitPositions, ChartError> {
        let moment = input.resolve()?;
        let positions = lookup_positions(Arc::clone(&self.gateway), moment.to_time_point(), bodies).await?;
        Ok(TransitPositions {
            input: input.clone(),
            moment,
            positions,
        })
    }

    /// Place transit bodies in the natal houses and aspect them to natal bodies
    pub fn assemble(
        &self,
        transit: TransitPositions,
        natal: &NatalChart,
        calculator: &AspectCalculator,
    ) -> TransitChart {
        let cusps = natal.cusps();
        let placements: BTreeMap<Body, Placement> = transit
            .positions
            .iter()
            .map(|(body, position)| (*body, place(position, cusps)))
            .collect();

        let aspects_to_natal = calculator.compute_inter_layer_aspects(
            TRANSIT_LAYER,
            &longitudes(&placements),
            NATAL_LAYER,
            &natal.longitudes(),
        );
        log::debug!(
            "Transit {} {}: {} aspects to natal",
            transit.input.date,
            transit.input.time,
            aspects_to_natal.matches.len()
        );

        TransitChart {
            input: transit.input,
            moment: transit.moment,
            placements,
            aspects_to_natal,
        }
    }

    /// Full transit pass against an already computed natal chart
    pub async fn run(
        &self,
        input: &MomentInput,
        bodies: &[Body],
        natal: &NatalChart,
        calculator: &AspectCalculator,
    ) -> Result<TransitChart, ChartError> {
        let positions = self.lookup(input, bodies).await?;
        Ok(self.assemble(positions, natal, calculator))
    }
}
